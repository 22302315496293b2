//! Knuth–Bendix engine configuration (spec.md §6).

pub use fpsemi_base::Cap;

/// How often (in newly-activated rules) the engine re-checks confluence
/// directly by examining all pairs of active rules (spec.md §4.2 step 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfluenceCheckInterval {
    Never,
    Every(u64),
}

/// How an overlap's length is measured for an overlap of `AB` with `BC`
/// (spec.md §4.2 "Tie-breaking & edge cases").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapPolicy {
    /// `|A| + |B| + |C|`
    Abc,
    /// `|AB| + |BC|`
    AbBc,
    /// `max(|AB|, |BC|)`
    MaxAbBc,
}

/// Which rewriter implementation `normal_form`/`equal_to` use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriterKind {
    LeftScan,
    Trie,
}

/// The critical-pair queue's enqueue policy (spec.md §3 "Critical-pair queue").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueOrder {
    Fifo,
    ByOverlapLength,
}

/// Full configuration surface for [`crate::engine::KnuthBendix`].
#[derive(Debug, Clone)]
pub struct KnuthBendixConfig {
    pub check_confluence_interval: ConfluenceCheckInterval,
    pub max_rules: Cap,
    pub max_overlap: Cap,
    pub overlap_policy: OverlapPolicy,
    pub rewriter: RewriterKind,
    pub queue_order: QueueOrder,
    /// Primitive steps between cooperative checkpoints (spec.md §4.1).
    pub checkpoint_interval: u64,
}

impl Default for KnuthBendixConfig {
    fn default() -> Self {
        KnuthBendixConfig {
            check_confluence_interval: ConfluenceCheckInterval::Every(4096),
            max_rules: Cap::Unbounded,
            max_overlap: Cap::Unbounded,
            overlap_policy: OverlapPolicy::Abc,
            rewriter: RewriterKind::Trie,
            queue_order: QueueOrder::Fifo,
            checkpoint_interval: 2048,
        }
    }
}
