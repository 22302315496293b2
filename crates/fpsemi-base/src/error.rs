//! The shared error taxonomy for every engine.
//!
//! Following the rest of the workspace, this is a plain enum with a hand
//! written `Display`/`Error` impl rather than a `thiserror` derive — the
//! variants below are a value taxonomy (spec.md §7), not a hierarchy that
//! benefits from macro plumbing.
//!
//! ## Example
//!
//! ```
//! use fpsemi_base::{FpSemiError, Result};
//!
//! fn check_nonempty(len: usize) -> Result<()> {
//!     if len == 0 {
//!         return Err(FpSemiError::InvalidRule {
//!             reason: "lhs must be non-empty".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! let err = check_nonempty(0).unwrap_err();
//! assert!(err.to_string().contains("lhs must be non-empty"));
//! ```

use std::fmt;

/// Which configured limit was exceeded; carried by [`FpSemiError::LimitReached`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    MaxRules,
    MaxOverlap,
    MaxCosets,
    DeductionCap,
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LimitKind::MaxRules => "max_rules",
            LimitKind::MaxOverlap => "max_overlap_length",
            LimitKind::MaxCosets => "max_cosets",
            LimitKind::DeductionCap => "max_deductions",
        };
        write!(f, "{s}")
    }
}

/// Why a Runner stopped before reaching `Finished`; carried by
/// [`FpSemiError::Cancelled`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Timeout,
    Predicate,
    Killed,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopReason::Timeout => "timeout",
            StopReason::Predicate => "predicate",
            StopReason::Killed => "killed",
        };
        write!(f, "{s}")
    }
}

/// The full error taxonomy shared by `fpsemi-base`, `fpsemi-kb`,
/// `fpsemi-tc`, and `fpsemi-race` (spec.md §7). Every variant here is a
/// value, not a wrapped external error type — the core has no I/O and no
/// third-party fallible calls to wrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FpSemiError {
    /// Alphabet size was zero, or the printable-character mapping had
    /// duplicate characters.
    InvalidAlphabet { reason: String },
    /// A word used a letter outside the declared alphabet, or was empty
    /// where the operation requires non-empty input.
    InvalidWord { reason: String },
    /// A rule had an empty lhs, or `add_rule` was called after the engine
    /// started running.
    InvalidRule { reason: String },
    /// `add_rule` was given two words that are equal or incomparable under
    /// the configured reduction order; the engine never guesses an
    /// orientation.
    CannotOrient { lhs: String, rhs: String },
    /// A configured cap was exceeded. The engine remains inspectable.
    LimitReached { which: LimitKind },
    /// A query that requires the engine to have finished was called before
    /// `run()` (or before a relevant `run_*` variant) completed.
    NotReady,
    /// The engine was stopped before finishing.
    Cancelled { reason: StopReason },
    /// `run`/`winner` was called on a `Race` with no registered runners.
    RaceEmpty,
    /// An internal invariant was violated — a bug, not a user error. Carries
    /// enough context to reproduce.
    InternalInvariantViolated { context: String },
}

impl fmt::Display for FpSemiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FpSemiError::InvalidAlphabet { reason } => {
                write!(f, "invalid alphabet: {reason}")
            }
            FpSemiError::InvalidWord { reason } => write!(f, "invalid word: {reason}"),
            FpSemiError::InvalidRule { reason } => write!(f, "invalid rule: {reason}"),
            FpSemiError::CannotOrient { lhs, rhs } => {
                write!(f, "cannot orient equation: {lhs} = {rhs} (incomparable)")
            }
            FpSemiError::LimitReached { which } => write!(f, "limit reached: {which}"),
            FpSemiError::NotReady => write!(f, "query requires a finished engine"),
            FpSemiError::Cancelled { reason } => write!(f, "cancelled: {reason}"),
            FpSemiError::RaceEmpty => write!(f, "race has no registered runners"),
            FpSemiError::InternalInvariantViolated { context } => {
                write!(f, "internal invariant violated: {context}")
            }
        }
    }
}

impl std::error::Error for FpSemiError {}

/// Alias for `std::result::Result<T, FpSemiError>`.
pub type Result<T> = std::result::Result<T, FpSemiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cannot_orient_display_names_both_sides() {
        let err = FpSemiError::CannotOrient {
            lhs: "ab".into(),
            rhs: "ba".into(),
        };
        let s = err.to_string();
        assert!(s.contains("ab"));
        assert!(s.contains("ba"));
    }

    #[test]
    fn limit_reached_display_names_the_limit() {
        let err = FpSemiError::LimitReached {
            which: LimitKind::MaxCosets,
        };
        assert!(err.to_string().contains("max_cosets"));
    }

    #[test]
    fn cancelled_display_names_the_reason() {
        let err = FpSemiError::Cancelled {
            reason: StopReason::Killed,
        };
        assert!(err.to_string().contains("killed"));
    }
}
