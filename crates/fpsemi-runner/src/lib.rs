//! # fpsemi-runner
//!
//! The cooperative scheduling protocol (spec.md §4.1) shared by every
//! long-running engine: `KnuthBendix`, `ToddCoxeter`, and, by delegation,
//! `Race` itself.
//!
//! This crate has no knowledge of rewriting or coset enumeration. It
//! provides the [`Runner`] trait, the [`Status`] state machine, and the
//! [`Checkpoint`] helper every engine's `run` loop polls — the shared base
//! that the Race harness drives through a trait object rather than an enum
//! over concrete engine types, since new engines (and the race harness
//! driving engines it doesn't know the concrete type of) should not require
//! changes here.

pub mod checkpoint;
pub mod kill;
pub mod status;

pub use checkpoint::Checkpoint;
pub use kill::KillHandle;
pub use status::{Status, StopSignal};

use fpsemi_base::Result;
use std::time::Duration;

/// The cooperative run/kill/timeout protocol every engine implements.
///
/// Implementations must poll their stop-conditions at bounded intervals
/// (spec.md §4.1 "Checkpoint discipline") — failure to poll is a
/// correctness bug, not a performance nit, since cancellation and timeouts
/// are delivered cooperatively and nothing else will interrupt a long scan.
pub trait Runner: Send {
    /// Runs to [`Status::Finished`] or until any stop-condition fires.
    /// Idempotent once the engine has already finished.
    fn run(&mut self) -> Result<()>;

    /// Sets a deadline of `now + duration` and calls [`Runner::run`].
    fn run_for(&mut self, duration: Duration) -> Result<()>;

    /// Invokes `predicate` at the engine's natural checkpoints; returns once
    /// it returns `true` (or the engine stops for another reason first).
    fn run_until(&mut self, predicate: &mut dyn FnMut() -> bool) -> Result<()>;

    /// Throttles how often the engine emits progress reports.
    fn report_every(&mut self, duration: Duration);

    /// Signals `Dead` asynchronously. Safe to call from another thread;
    /// visible at the engine's next checkpoint within bounded latency.
    fn kill(&self);

    /// A cloned handle onto this engine's dead flag, independent of the
    /// engine's own borrow. `fpsemi-race` takes this *before* moving a
    /// runner into its worker thread, since calling `kill()` through
    /// `&dyn Runner` from a second thread once the first thread holds the
    /// engine by `&mut` would not type-check (spec.md §5 "per-runner
    /// progress state is read without locking").
    fn kill_handle(&self) -> KillHandle;

    /// The engine's current status.
    fn status(&self) -> Status;

    /// Type-erased access back to the concrete engine, so a caller that gets
    /// a `&dyn Runner` back from [`crate::Runner`] (e.g. `Race::winner`) can
    /// downcast to `KnuthBendix`/`ToddCoxeter` to reach engine-specific
    /// queries (`size`, `word_graph`, ...) that don't belong on the shared
    /// trait.
    fn as_any(&self) -> &dyn std::any::Any;

    fn finished(&self) -> bool {
        self.status() == Status::Finished
    }

    fn started(&self) -> bool {
        self.status() != Status::NotStarted
    }

    fn dead(&self) -> bool {
        self.status() == Status::Dead
    }

    fn stopped(&self) -> bool {
        matches!(
            self.status(),
            Status::Finished | Status::TimedOut | Status::StoppedByPredicate | Status::Dead
        )
    }

    fn timed_out(&self) -> bool {
        self.status() == Status::TimedOut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkpoint::Checkpoint;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// A minimal Runner used to exercise the default trait methods and the
    /// Checkpoint helper together, the way a real engine's `run` loop would.
    struct CountingRunner {
        status: Status,
        killed: Arc<AtomicBool>,
        deadline: Option<std::time::Instant>,
        steps_to_finish: u64,
    }

    impl CountingRunner {
        fn new(steps_to_finish: u64) -> Self {
            CountingRunner {
                status: Status::NotStarted,
                killed: Arc::new(AtomicBool::new(false)),
                deadline: None,
                steps_to_finish,
            }
        }
    }

    impl Runner for CountingRunner {
        fn run(&mut self) -> Result<()> {
            self.status = Status::Running;
            let mut checkpoint = Checkpoint::new(self.killed.clone(), self.deadline, None);
            for i in 0..self.steps_to_finish {
                if let Some(reason) = checkpoint.poll(i) {
                    self.status = reason.into();
                    return Ok(());
                }
            }
            self.status = Status::Finished;
            Ok(())
        }

        fn run_for(&mut self, duration: Duration) -> Result<()> {
            self.deadline = Some(std::time::Instant::now() + duration);
            self.run()
        }

        fn run_until(&mut self, predicate: &mut dyn FnMut() -> bool) -> Result<()> {
            if predicate() {
                self.status = Status::StoppedByPredicate;
                return Ok(());
            }
            self.run()
        }

        fn report_every(&mut self, _duration: Duration) {}

        fn kill(&self) {
            self.killed.store(true, Ordering::SeqCst);
        }

        fn kill_handle(&self) -> KillHandle {
            KillHandle::new(self.killed.clone())
        }

        fn status(&self) -> Status {
            self.status
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    #[test]
    fn not_started_before_run() {
        let r = CountingRunner::new(10);
        assert!(!r.started());
        assert_eq!(r.status(), Status::NotStarted);
    }

    #[test]
    fn runs_to_finished() {
        let mut r = CountingRunner::new(10);
        r.run().unwrap();
        assert!(r.finished());
        assert!(r.stopped());
    }

    #[test]
    fn kill_is_observed_by_next_checkpoint() {
        let mut r = CountingRunner::new(u64::MAX >> 8);
        let killed = r.killed.clone();
        killed.store(true, Ordering::SeqCst);
        r.run().unwrap();
        assert!(r.dead());
    }

    #[test]
    fn run_for_elapsed_deadline_times_out() {
        let mut r = CountingRunner::new(u64::MAX >> 8);
        std::thread::sleep(Duration::from_millis(2));
        r.run_for(Duration::from_nanos(1)).unwrap();
        assert!(r.timed_out());
    }

    #[test]
    fn run_until_stops_on_true_predicate() {
        let mut r = CountingRunner::new(10);
        r.run_until(&mut || true).unwrap();
        assert_eq!(r.status(), Status::StoppedByPredicate);
    }
}
