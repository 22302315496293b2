//! The bounded-interval poll every engine's `run` loop must perform.
//!
//! Spec.md §4.1/§5 require every engine to poll its stop-conditions "at
//! bounded intervals (a few thousand primitive steps, not longer)". A
//! [`Checkpoint`] centralises that poll so `fpsemi-kb` and `fpsemi-tc` share
//! one implementation of "check kill, then deadline, then (optionally) the
//! caller's predicate" instead of duplicating it per engine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::status::StopSignal;

/// A reusable stop-condition poll, created fresh for each `run`/`run_for`
/// call and consulted every `interval` primitive steps.
pub struct Checkpoint {
    killed: Arc<AtomicBool>,
    deadline: Option<Instant>,
    interval: u64,
}

impl Checkpoint {
    /// `interval` is how many primitive steps elapse between actual checks;
    /// pass `1` to check every step (used by cheap loops like Todd–Coxeter's
    /// per-definition checks) or a few thousand for tighter inner loops
    /// (Knuth–Bendix's per-overlap checks).
    pub fn new(killed: Arc<AtomicBool>, deadline: Option<Instant>, interval: Option<u64>) -> Self {
        Checkpoint {
            killed,
            deadline,
            interval: interval.unwrap_or(1).max(1),
        }
    }

    /// Polls at step `step`. Returns `None` unless `step` falls on a check
    /// boundary or a stop condition fired. Checks kill first (it always
    /// wins), then the deadline.
    pub fn poll(&self, step: u64) -> Option<StopSignal> {
        if step % self.interval != 0 {
            return None;
        }
        if self.killed.load(Ordering::SeqCst) {
            return Some(StopSignal::Dead);
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Some(StopSignal::TimedOut);
            }
        }
        None
    }

    /// As [`Checkpoint::poll`], but also evaluates `predicate` on a check
    /// boundary — used by an engine's own `run_until`.
    pub fn poll_with_predicate(
        &self,
        step: u64,
        predicate: &mut dyn FnMut() -> bool,
    ) -> Option<StopSignal> {
        if let Some(signal) = self.poll(step) {
            return Some(signal);
        }
        if step % self.interval == 0 && predicate() {
            return Some(StopSignal::StoppedByPredicate);
        }
        None
    }
}
