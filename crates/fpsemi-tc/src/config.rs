//! Todd–Coxeter engine configuration (spec.md §4.3, §6).

pub use fpsemi_base::Cap;

/// Which congruence the coset table enumerates (spec.md §4.3).
///
/// `Left` is implemented but experimental: the table tracks right
/// multiplication internally and a `Left` enumeration traces words in
/// reverse to approximate left-congruence closure, a construction that has
/// not been cross-checked against the two-sided/right cases the way the
/// rest of the suite has (spec.md §9 Open Question). See
/// [`crate::engine::ToddCoxeter::experimental_left_congruence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    TwoSided,
}

/// Which order the main loop uses to pick new definitions (spec.md §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Definitions-first: push new cosets through as soon as possible.
    Hlt,
    /// Deductions-first: fully close every known deduction before defining
    /// a new coset.
    Felsch,
    /// Alternates HLT-style definition with periodic Felsch-style closure
    /// passes.
    Cr,
}

/// Whether, and how aggressively, the engine scans for redundant cosets
/// mid-run (spec.md §4.3 "lookahead").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookaheadMode {
    None,
    Full,
    Partial,
}

/// Standardisation order applied on `finish` (spec.md §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardiseOrder {
    Shortlex,
    Lex,
    Recursive,
    None,
}

/// Whether new definitions are recorded on a deduction stack for Felsch-style
/// backtracking (space-for-time, spec.md §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionPolicy {
    StackDefinitions,
    NoStackDefinitions,
}

/// Full configuration surface for [`crate::engine::ToddCoxeter`].
#[derive(Debug, Clone)]
pub struct ToddCoxeterConfig {
    pub side: Side,
    pub strategy: Strategy,
    pub lookahead_mode: LookaheadMode,
    /// Lookahead triggers when live cosets exceed
    /// `max(lookahead_min, last_lookahead_cosets * lookahead_growth_threshold)`.
    pub lookahead_growth_threshold: f64,
    pub lookahead_min: u64,
    pub standardise_order: StandardiseOrder,
    /// Whether to retain deductions for Felsch-style backtracking.
    pub save: bool,
    pub definition_policy: DefinitionPolicy,
    pub max_deductions: Cap,
    pub max_cosets: Cap,
    /// Primitive steps (definitions) between cooperative checkpoints.
    pub checkpoint_interval: u64,
}

impl Default for ToddCoxeterConfig {
    fn default() -> Self {
        ToddCoxeterConfig {
            side: Side::Right,
            strategy: Strategy::Hlt,
            lookahead_mode: LookaheadMode::Partial,
            lookahead_growth_threshold: 2.0,
            lookahead_min: 10_000,
            standardise_order: StandardiseOrder::Shortlex,
            save: false,
            definition_policy: DefinitionPolicy::StackDefinitions,
            max_deductions: Cap::Unbounded,
            max_cosets: Cap::Unbounded,
            checkpoint_interval: 256,
        }
    }
}
