//! The small summary handed back alongside a race's winner (spec.md §4.4
//! supplement), grounded on returning plain summary structs rather than
//! leaking thread handles to callers.

use std::time::Duration;

/// Outcome of one call to [`crate::Race::run`] / `run_for` / `run_until`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaceStats {
    /// Index (among the runners registered at the time of the call) of the
    /// runner that won, or `None` if the round ended with nobody finished
    /// (a timeout, a predicate stop, or every runner was killed).
    pub winner_index: Option<usize>,
    pub elapsed: Duration,
    /// How many worker threads were actually spawned this round
    /// (`min(runners, max_threads)`), `0` when a prior winner short-circuited
    /// the round.
    pub threads_used: usize,
}
