//! Content-addressing for rewrite rules.
//!
//! Spec.md §3 requires that rules be "content-addressed internally so
//! duplicates (after reordering and reduction) are detected and dropped".
//! [`WordInterner`] generalises the teacher's string [`Symbol`]/`Interner`
//! pair (one unique string per handle, O(1) equality by comparing handles)
//! from `&str` to [`Word`]: each unique word is stored once, and interning
//! the same word twice returns the same [`WordId`].

use crate::word::Word;
use std::collections::HashMap;

/// A lightweight handle to an interned [`Word`].
///
/// `WordId`s are `Copy` and compare in O(1) time regardless of word length.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct WordId(u32);

/// Interns [`Word`]s so that two rules with identical (lhs, rhs) pairs -
/// after orientation and reduction, per spec.md §3 - collapse to the same
/// pair of handles and are recognised as duplicates without a full word
/// comparison.
#[derive(Default)]
pub struct WordInterner {
    map: HashMap<Word, WordId>,
    words: Vec<Word>,
}

impl WordInterner {
    pub fn new() -> Self {
        WordInterner {
            map: HashMap::new(),
            words: Vec::new(),
        }
    }

    /// Interns `word`, returning its existing handle if already present.
    pub fn intern(&mut self, word: Word) -> WordId {
        if let Some(&id) = self.map.get(&word) {
            return id;
        }
        let id = WordId(self.words.len() as u32);
        self.words.push(word.clone());
        self.map.insert(word, id);
        id
    }

    /// Resolves a handle back to its word.
    pub fn resolve(&self, id: WordId) -> &Word {
        &self.words[id.0 as usize]
    }

    /// Looks up a word without interning it if absent.
    pub fn lookup(&self, word: &Word) -> Option<WordId> {
        self.map.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
