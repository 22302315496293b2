//! The critical-pair work queue (spec.md §3, §4.2).

use crate::config::QueueOrder;
use crate::rule::RuleId;
use std::collections::{BTreeMap, VecDeque};

/// A pair of rules whose overlaps have not yet been analysed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CriticalPair {
    pub r1: RuleId,
    pub r2: RuleId,
}

/// The enqueue policy configured for a [`crate::engine::KnuthBendix`]
/// instance: plain insertion order, or partitioned by overlap length so
/// every length-n overlap is processed before any length-(n+1) overlap.
pub enum CriticalPairQueue {
    Fifo(VecDeque<CriticalPair>),
    ByOverlapLength(BTreeMap<usize, VecDeque<CriticalPair>>),
}

impl CriticalPairQueue {
    pub fn new(order: QueueOrder) -> Self {
        match order {
            QueueOrder::Fifo => CriticalPairQueue::Fifo(VecDeque::new()),
            QueueOrder::ByOverlapLength => CriticalPairQueue::ByOverlapLength(BTreeMap::new()),
        }
    }

    /// `bucket_len` is the shortest genuine overlap length between the
    /// pair's two lhss; only meaningful for [`QueueOrder::ByOverlapLength`].
    pub fn push(&mut self, pair: CriticalPair, bucket_len: usize) {
        match self {
            CriticalPairQueue::Fifo(q) => q.push_back(pair),
            CriticalPairQueue::ByOverlapLength(m) => {
                m.entry(bucket_len).or_default().push_back(pair)
            }
        }
    }

    pub fn pop(&mut self) -> Option<CriticalPair> {
        match self {
            CriticalPairQueue::Fifo(q) => q.pop_front(),
            CriticalPairQueue::ByOverlapLength(m) => {
                let &key = m.keys().next()?;
                let bucket = m.get_mut(&key).unwrap();
                let item = bucket.pop_front();
                if bucket.is_empty() {
                    m.remove(&key);
                }
                item
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CriticalPairQueue::Fifo(q) => q.is_empty(),
            CriticalPairQueue::ByOverlapLength(m) => m.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(a: u32, b: u32) -> CriticalPair {
        CriticalPair {
            r1: RuleId(a),
            r2: RuleId(b),
        }
    }

    #[test]
    fn fifo_preserves_insertion_order() {
        let mut q = CriticalPairQueue::new(QueueOrder::Fifo);
        q.push(pair(0, 1), 0);
        q.push(pair(1, 2), 0);
        assert_eq!(q.pop(), Some(pair(0, 1)));
        assert_eq!(q.pop(), Some(pair(1, 2)));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn by_overlap_length_drains_shortest_bucket_first() {
        let mut q = CriticalPairQueue::new(QueueOrder::ByOverlapLength);
        q.push(pair(0, 1), 3);
        q.push(pair(1, 2), 1);
        q.push(pair(2, 3), 1);
        assert_eq!(q.pop(), Some(pair(1, 2)));
        assert_eq!(q.pop(), Some(pair(2, 3)));
        assert_eq!(q.pop(), Some(pair(0, 1)));
    }

    #[test]
    fn is_empty_reflects_state() {
        let mut q = CriticalPairQueue::new(QueueOrder::Fifo);
        assert!(q.is_empty());
        q.push(pair(0, 0), 0);
        assert!(!q.is_empty());
    }
}
