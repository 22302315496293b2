//! The immutable presentation handed to every engine.

use crate::error::{FpSemiError, Result};
use crate::order::{Order, Shortlex};
use crate::word::Word;
use std::sync::Arc;

/// Alphabet size, an optional printable-character mapping, a reduction
/// order, and the initial defining relations of a finitely presented
/// semigroup or monoid.
///
/// A `Presentation` is immutable once constructed and is typically cloned
/// (cheaply — the order is `Arc`-shared) when handed to several competing
/// engine instances in a [race](fpsemi-race).
#[derive(Clone)]
pub struct Presentation {
    alphabet_size: u32,
    printable_chars: Option<Vec<char>>,
    order: Arc<dyn Order>,
    rules: Vec<(Word, Word)>,
}

impl Presentation {
    /// Builds a presentation over an alphabet of `alphabet_size` letters,
    /// using the default `a, b, c, ...` printable mapping.
    ///
    /// Validation (spec.md §6): every letter in every rule must be within
    /// the alphabet. A rule whose two sides are syntactically identical is
    /// the "deliberately allowed identity form" and is dropped silently
    /// rather than rejected.
    pub fn new(
        alphabet_size: u32,
        rules: Vec<(Word, Word)>,
        order: Arc<dyn Order>,
    ) -> Result<Self> {
        if alphabet_size == 0 {
            return Err(FpSemiError::InvalidAlphabet {
                reason: "alphabet size must be positive".to_string(),
            });
        }
        let mut kept = Vec::with_capacity(rules.len());
        for (u, v) in rules {
            if !u.is_valid_for_alphabet(alphabet_size) || !v.is_valid_for_alphabet(alphabet_size) {
                return Err(FpSemiError::InvalidWord {
                    reason: "rule uses a letter outside the declared alphabet".to_string(),
                });
            }
            if u == v {
                continue;
            }
            kept.push((u, v));
        }
        Ok(Presentation {
            alphabet_size,
            printable_chars: None,
            order,
            rules: kept,
        })
    }

    /// Builds a presentation using [`Shortlex`] as the reduction order — the
    /// common case for both engines' defaults.
    pub fn with_shortlex(alphabet_size: u32, rules: Vec<(Word, Word)>) -> Result<Self> {
        Self::new(alphabet_size, rules, Arc::new(Shortlex))
    }

    /// Builds a presentation from a printable alphabet string (e.g. `"abc"`),
    /// validating that no character repeats.
    pub fn with_alphabet_string(
        alphabet: &str,
        rules: Vec<(Word, Word)>,
        order: Arc<dyn Order>,
    ) -> Result<Self> {
        let chars: Vec<char> = alphabet.chars().collect();
        let mut sorted = chars.clone();
        sorted.sort_unstable();
        sorted.dedup();
        if sorted.len() != chars.len() {
            return Err(FpSemiError::InvalidAlphabet {
                reason: "printable-character mapping has duplicate characters".to_string(),
            });
        }
        let mut p = Self::new(chars.len() as u32, rules, order)?;
        p.printable_chars = Some(chars);
        Ok(p)
    }

    /// The number of letters in the alphabet.
    pub fn alphabet_size(&self) -> u32 {
        self.alphabet_size
    }

    /// The configured reduction order.
    pub fn order(&self) -> &Arc<dyn Order> {
        &self.order
    }

    /// The (already-validated, identity-pairs-dropped) defining relations.
    pub fn rules(&self) -> &[(Word, Word)] {
        &self.rules
    }

    /// The printable-character mapping, if one was supplied.
    pub fn printable_chars(&self) -> Option<&[char]> {
        self.printable_chars.as_deref()
    }
}
