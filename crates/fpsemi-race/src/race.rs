//! The multi-threaded competition harness (spec.md §4.4).
//!
//! Runners are raced to a winner by partitioning them across up to
//! `max_threads` worker threads (each running its share in turn) via
//! `std::thread::scope`, the idiomatic choice for a harness that joins every
//! thread before returning and never needs `'static` engine references.

use crate::config::RaceConfig;
use crate::stats::RaceStats;
use fpsemi_base::{FpSemiError, Result};
use fpsemi_runner::{KillHandle, Runner};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Races a set of [`Runner`]s on the same problem; the first to reach
/// `Finished` wins, the rest are killed and dropped.
pub struct Race {
    runners: Vec<Box<dyn Runner>>,
    config: RaceConfig,
    started: bool,
    stats: Option<RaceStats>,
}

impl Race {
    pub fn new() -> Self {
        Race::with_config(RaceConfig::default())
    }

    pub fn with_config(config: RaceConfig) -> Self {
        Race {
            runners: Vec::new(),
            config,
            started: false,
            stats: None,
        }
    }

    /// Registers a competitor. Legal only before the race has started
    /// (spec.md §4.4); calling this after `run`/`run_for`/`run_until` is a
    /// caller bug.
    pub fn add_runner(&mut self, runner: Box<dyn Runner>) {
        debug_assert!(!self.started, "add_runner called after the race started");
        self.runners.push(runner);
    }

    /// Caps concurrency; `n` is clamped to `[1, hardware_concurrency]`
    /// (spec.md §4.4).
    pub fn set_max_threads(&mut self, n: usize) {
        self.config = RaceConfig::with_max_threads(n);
    }

    pub fn stats(&self) -> Option<&RaceStats> {
        self.stats.as_ref()
    }

    /// The winning runner. `NotReady` if nobody has finished yet,
    /// `RaceEmpty` if no runners were ever registered.
    pub fn winner(&self) -> Result<&dyn Runner> {
        if self.runners.is_empty() {
            return Err(FpSemiError::RaceEmpty);
        }
        self.runners
            .iter()
            .find(|r| r.finished())
            .map(|r| r.as_ref())
            .ok_or(FpSemiError::NotReady)
    }

    pub fn run(&mut self) -> Result<()> {
        self.compete(|r| {
            let _ = r.run();
        })
    }

    pub fn run_for(&mut self, duration: Duration) -> Result<()> {
        self.compete(move |r| {
            let _ = r.run_for(duration);
        })
    }

    /// Drives the race with geometrically growing `run_for` rounds
    /// (spec.md §4.4 "`check_interval` grows geometrically (doubling, capped
    /// at ≈1s)"), checking `predicate` between rounds.
    pub fn run_until(&mut self, predicate: &mut dyn FnMut() -> bool) -> Result<()> {
        if self.runners.is_empty() {
            return Err(FpSemiError::RaceEmpty);
        }
        let cap = Duration::from_secs(1);
        let mut check_interval = Duration::from_millis(1);
        loop {
            self.run_for(check_interval)?;
            if self.stats.as_ref().and_then(|s| s.winner_index).is_some() {
                return Ok(());
            }
            if predicate() {
                self.started = true;
                for r in &self.runners {
                    r.kill();
                }
                return Ok(());
            }
            check_interval = (check_interval * 2).min(cap);
        }
    }

    /// Runs one round of the race: if a runner has already finished, takes
    /// it immediately; otherwise partitions the runners into `min(runners,
    /// max_threads)` contiguous chunks, runs each chunk's runners in turn on
    /// its own worker thread (so no runner is starved when there are more
    /// runners than threads), and retains whichever one finishes first
    /// (spec.md §4.4 "Scheduling").
    fn compete(&mut self, run_one: impl Fn(&mut dyn Runner) + Sync) -> Result<()> {
        if self.runners.is_empty() {
            return Err(FpSemiError::RaceEmpty);
        }
        self.started = true;

        if let Some(i) = self.runners.iter().position(|r| r.finished()) {
            self.stats = Some(RaceStats {
                winner_index: Some(i),
                elapsed: Duration::ZERO,
                threads_used: 0,
            });
            self.retain_only(i);
            return Ok(());
        }

        // Cloned before any runner is exclusively borrowed by its worker
        // thread, so a winning thread can signal every loser's dead flag
        // without ever needing a second reference to the loser's own
        // `Box<dyn Runner>` (spec.md §5 "per-runner progress state is read
        // without locking").
        let kill_handles: Vec<KillHandle> = self.runners.iter().map(|r| r.kill_handle()).collect();
        let n = self.runners.len().min(self.config.max_threads);
        let chunk_size = self.runners.len().div_ceil(n);
        let winner_lock: Mutex<Option<usize>> = Mutex::new(None);
        let start = Instant::now();
        let mut threads_used = 0;

        std::thread::scope(|scope| {
            for (chunk_idx, chunk) in self.runners.chunks_mut(chunk_size).enumerate() {
                threads_used += 1;
                let base = chunk_idx * chunk_size;
                let winner_lock = &winner_lock;
                let kill_handles = &kill_handles;
                let run_one = &run_one;
                scope.spawn(move || {
                    for (offset, runner) in chunk.iter_mut().enumerate() {
                        if winner_lock.lock().unwrap().is_some() {
                            return;
                        }
                        let i = base + offset;
                        log::debug!(
                            "race runner {i} starting on {:?}",
                            std::thread::current().id()
                        );
                        run_one(runner.as_mut());
                        if runner.finished() {
                            let mut w = winner_lock.lock().unwrap();
                            if w.is_none() {
                                *w = Some(i);
                                for (j, handle) in kill_handles.iter().enumerate() {
                                    if j != i {
                                        handle.kill();
                                    }
                                }
                                log::info!("race runner {i} won");
                            }
                        }
                    }
                });
            }
        });

        let elapsed = start.elapsed();
        let winner_idx = winner_lock.into_inner().unwrap();
        self.stats = Some(RaceStats {
            winner_index: winner_idx,
            elapsed,
            threads_used,
        });
        if let Some(w) = winner_idx {
            self.retain_only(w);
        }
        Ok(())
    }

    /// Drops every runner except `winner` (spec.md §3 "on completion it
    /// retains only the winner, freeing the others").
    fn retain_only(&mut self, winner: usize) {
        let winner_runner = self.runners.swap_remove(winner);
        self.runners.clear();
        self.runners.push(winner_runner);
    }
}

impl Default for Race {
    fn default() -> Self {
        Race::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fpsemi_runner::Status;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// A runner that finishes after `steps` calls to its checkpoint, used to
    /// exercise scheduling without pulling in a real KB/TC engine.
    struct StepRunner {
        status: Status,
        killed: Arc<AtomicBool>,
        steps_remaining: u64,
        step_sleep: Duration,
    }

    impl StepRunner {
        fn new(steps: u64, step_sleep: Duration) -> Self {
            StepRunner {
                status: Status::NotStarted,
                killed: Arc::new(AtomicBool::new(false)),
                steps_remaining: steps,
                step_sleep,
            }
        }
    }

    impl Runner for StepRunner {
        fn run(&mut self) -> Result<()> {
            self.status = Status::Running;
            while self.steps_remaining > 0 {
                if self.killed.load(Ordering::SeqCst) {
                    self.status = Status::Dead;
                    return Ok(());
                }
                std::thread::sleep(self.step_sleep);
                self.steps_remaining -= 1;
            }
            self.status = Status::Finished;
            Ok(())
        }

        fn run_for(&mut self, duration: Duration) -> Result<()> {
            let deadline = Instant::now() + duration;
            self.status = Status::Running;
            while self.steps_remaining > 0 {
                if self.killed.load(Ordering::SeqCst) {
                    self.status = Status::Dead;
                    return Ok(());
                }
                if Instant::now() >= deadline {
                    self.status = Status::TimedOut;
                    return Ok(());
                }
                std::thread::sleep(self.step_sleep);
                self.steps_remaining -= 1;
            }
            self.status = Status::Finished;
            Ok(())
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
    fn run_on_empty_race_is_race_empty() {
        let mut race = Race::new();
        assert_eq!(race.run(), Err(FpSemiError::RaceEmpty));
    }

    #[test]
    fn winner_before_run_is_not_ready() {
        let mut race = Race::new();
        race.add_runner(Box::new(StepRunner::new(5, Duration::from_millis(1))));
        assert_eq!(race.winner().unwrap_err(), FpSemiError::NotReady);
    }

    #[test]
    fn fastest_runner_wins_and_slower_one_is_killed() {
        let mut race = Race::new();
        race.add_runner(Box::new(StepRunner::new(200, Duration::from_millis(20))));
        race.add_runner(Box::new(StepRunner::new(1, Duration::from_millis(1))));
        race.run().unwrap();
        assert!(race.winner().unwrap().finished());
        let stats = race.stats().unwrap();
        assert_eq!(stats.winner_index, Some(1));
        assert_eq!(stats.threads_used, 2);
    }

    #[test]
    fn set_max_threads_clamps_to_hardware_concurrency() {
        let mut race = Race::new();
        race.set_max_threads(0);
        race.add_runner(Box::new(StepRunner::new(1, Duration::from_millis(1))));
        race.run().unwrap();
        assert!(race.winner().is_ok());
    }

    #[test]
    fn run_until_stops_on_predicate_and_kills_all() {
        let mut race = Race::new();
        race.add_runner(Box::new(StepRunner::new(10_000, Duration::from_millis(5))));
        let mut calls = 0;
        race.run_until(&mut || {
            calls += 1;
            calls >= 2
        })
        .unwrap();
        assert!(calls >= 2);
    }

    #[test]
    fn already_finished_runner_short_circuits_the_round() {
        let mut race = Race::new();
        let mut finished = StepRunner::new(0, Duration::from_millis(1));
        finished.run().unwrap();
        assert!(finished.finished());
        race.add_runner(Box::new(finished));
        race.add_runner(Box::new(StepRunner::new(5_000, Duration::from_millis(5))));
        race.run().unwrap();
        let stats = race.stats().unwrap();
        assert_eq!(stats.winner_index, Some(0));
        assert_eq!(stats.threads_used, 0);
    }
}
