//! The Runner state machine (spec.md §4.1).

use fpsemi_base::StopReason;

/// The lifecycle state of a `Runner`.
///
/// `NotStarted → Running` happens on the first call to `run`.
/// `Running` transitions to exactly one of `Finished`, `TimedOut`,
/// `StoppedByPredicate`, or `Dead`. The first three are resumable (a further
/// `run` call continues or re-reports); `Dead` is terminal and may leave the
/// engine in a semantically unusable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    NotStarted,
    Running,
    Finished,
    TimedOut,
    StoppedByPredicate,
    Dead,
}

impl Status {
    /// `true` for the three resumable stop states (not `Dead`, not
    /// `NotStarted`/`Running`).
    pub fn is_resumable_stop(self) -> bool {
        matches!(self, Status::Finished | Status::TimedOut | Status::StoppedByPredicate)
    }
}

/// Why a [`Checkpoint::poll`] asked the caller's `run` loop to stop early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopSignal {
    TimedOut,
    StoppedByPredicate,
    Dead,
}

impl From<StopSignal> for Status {
    fn from(s: StopSignal) -> Self {
        match s {
            StopSignal::TimedOut => Status::TimedOut,
            StopSignal::StoppedByPredicate => Status::StoppedByPredicate,
            StopSignal::Dead => Status::Dead,
        }
    }
}

impl From<StopSignal> for StopReason {
    fn from(s: StopSignal) -> Self {
        match s {
            StopSignal::TimedOut => StopReason::Timeout,
            StopSignal::StoppedByPredicate => StopReason::Predicate,
            StopSignal::Dead => StopReason::Killed,
        }
    }
}
