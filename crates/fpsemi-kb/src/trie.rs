//! The rule trie: one-pass multi-pattern matching over active lhss.
//!
//! A trie keyed by the lhs of every active rule (spec.md §3 "Rule trie").
//! Terminal nodes store the id of the rule whose lhs ends there. Walking a
//! candidate word while simultaneously walking the trie finds, at each
//! position, the longest active lhs starting there in one pass, rather than
//! testing every active rule's lhs against every position.

use crate::rule::RuleId;
use fpsemi_base::{Letter, Word};
use std::collections::HashMap;

#[derive(Default)]
struct Node {
    children: HashMap<Letter, usize>,
    terminal: Option<RuleId>,
}

/// A trie over the lhss of currently active rules.
///
/// Invariant (spec.md §3): "The trie's set of terminal nodes is exactly the
/// set of lhss of active rules." [`RuleTrie::insert`]/[`RuleTrie::remove`]
/// must be called in lockstep with [`crate::rule::RulePool::activate`]/
/// `deactivate` to preserve it.
pub struct RuleTrie {
    nodes: Vec<Node>,
}

impl RuleTrie {
    pub fn new() -> Self {
        RuleTrie {
            nodes: vec![Node::default()],
        }
    }

    const ROOT: usize = 0;

    /// Inserts `lhs` as a terminal mapping to `rule`. The lhs must be
    /// non-empty (spec.md "Rules with empty lhs are rejected at input").
    pub fn insert(&mut self, lhs: &Word, rule: RuleId) {
        debug_assert!(!lhs.is_empty());
        let mut cur = Self::ROOT;
        for &letter in lhs.as_slice() {
            cur = match self.nodes[cur].children.get(&letter) {
                Some(&next) => next,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(Node::default());
                    self.nodes[cur].children.insert(letter, next);
                    next
                }
            };
        }
        self.nodes[cur].terminal = Some(rule);
    }

    /// Removes the terminal marker for `lhs` (called when a rule is
    /// deactivated). Does not prune now-dead branches; they are harmless
    /// dead trie nodes, reclaimed when the whole trie is rebuilt.
    pub fn remove(&mut self, lhs: &Word) {
        let mut cur = Self::ROOT;
        for &letter in lhs.as_slice() {
            match self.nodes[cur].children.get(&letter) {
                Some(&next) => cur = next,
                None => return,
            }
        }
        self.nodes[cur].terminal = None;
    }

    /// Scans `word` starting at `start`, returning the rule whose lhs is the
    /// longest active match beginning exactly at `start`, if any.
    ///
    /// Trie semantics require walking all the way to a terminal; since no
    /// active lhs is ever itself reducible (the inter-reduction invariant),
    /// there is at most one terminal reachable on any path from an
    /// unambiguous deterministic trie, so "longest match" degenerates to
    /// "the terminal found while walking as far as possible", matching the
    /// rewriter contract in spec.md §4.2.
    pub fn longest_match_at(&self, word: &Word, start: usize) -> Option<(RuleId, usize)> {
        let mut cur = Self::ROOT;
        let mut best: Option<(RuleId, usize)> = None;
        for (offset, &letter) in word.as_slice()[start..].iter().enumerate() {
            cur = match self.nodes[cur].children.get(&letter) {
                Some(&next) => next,
                None => break,
            };
            if let Some(rule) = self.nodes[cur].terminal {
                best = Some((rule, offset + 1));
            }
        }
        best
    }
}

impl Default for RuleTrie {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(s: &str) -> Word {
        Word::from_default_str(s).unwrap()
    }

    #[test]
    fn finds_exact_match() {
        let mut trie = RuleTrie::new();
        trie.insert(&w("ba"), RuleId(0));
        let (id, len) = trie.longest_match_at(&w("xba"), 1).unwrap();
        assert_eq!(id, RuleId(0));
        assert_eq!(len, 2);
    }

    #[test]
    fn no_match_returns_none() {
        let mut trie = RuleTrie::new();
        trie.insert(&w("ba"), RuleId(0));
        assert!(trie.longest_match_at(&w("xyz"), 0).is_none());
    }

    #[test]
    fn prefers_longest_terminal_on_path() {
        let mut trie = RuleTrie::new();
        trie.insert(&w("a"), RuleId(0));
        trie.insert(&w("ab"), RuleId(1));
        let (id, len) = trie.longest_match_at(&w("ab"), 0).unwrap();
        assert_eq!(id, RuleId(1));
        assert_eq!(len, 2);
    }

    #[test]
    fn remove_drops_terminal() {
        let mut trie = RuleTrie::new();
        trie.insert(&w("ba"), RuleId(0));
        trie.remove(&w("ba"));
        assert!(trie.longest_match_at(&w("ba"), 0).is_none());
    }
}
