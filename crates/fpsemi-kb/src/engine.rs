//! The Knuth–Bendix completion engine (spec.md §4.2).

use crate::config::{ConfluenceCheckInterval, KnuthBendixConfig};
use crate::overlap::{genuine_overlaps, measure};
use crate::queue::{CriticalPair, CriticalPairQueue};
use crate::rewrite::{left_scan_normal_form, trie_normal_form};
use crate::rule::RulePool;
use crate::trie::RuleTrie;
use crate::{RuleId, RewriterKind};
use fpsemi_base::{FpSemiError, LimitKind, Presentation, Result, Word};
use fpsemi_runner::{Checkpoint, Runner, Status};
use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Produces a confluent rewriting system equivalent to a `Presentation`, and
/// answers word-equality/normal-form queries — exactly on confluent input,
/// semi-decidably otherwise (spec.md §4.2).
pub struct KnuthBendix {
    presentation: Presentation,
    config: KnuthBendixConfig,
    pool: RulePool,
    trie: RuleTrie,
    queue: CriticalPairQueue,
    status: Status,
    killed: Arc<AtomicBool>,
    deadline: Option<Instant>,
    report_interval: Option<Duration>,
    last_report: Option<Instant>,
    new_rules_since_check: u64,
}

impl KnuthBendix {
    /// Builds an engine from a presentation and configuration, orienting and
    /// activating the presentation's own defining relations immediately
    /// (spec.md §4.2 step 1: "Initialise the active-list from the (reduced,
    /// oriented) defining rules").
    pub fn new(presentation: Presentation, config: KnuthBendixConfig) -> Result<Self> {
        let queue = CriticalPairQueue::new(config.queue_order);
        let mut kb = KnuthBendix {
            presentation,
            config,
            pool: RulePool::new(),
            trie: RuleTrie::new(),
            queue,
            status: Status::NotStarted,
            killed: Arc::new(AtomicBool::new(false)),
            deadline: None,
            report_interval: None,
            last_report: None,
            new_rules_since_check: 0,
        };
        let initial: Vec<(Word, Word)> = kb.presentation.rules().to_vec();
        for (u, v) in initial {
            kb.add_equation(u, v)?;
        }
        Ok(kb)
    }

    /// Adds a defining relation `u = v`. Configuration-time only: returns
    /// `InvalidRule` if the engine has already started running.
    pub fn add_rule(&mut self, u: Word, v: Word) -> Result<()> {
        if self.status != Status::NotStarted {
            return Err(FpSemiError::InvalidRule {
                reason: "add_rule called after the engine started running".to_string(),
            });
        }
        self.add_equation(u, v)
    }

    /// Rewrites `w` to a fixed point. Unique once [`KnuthBendix::confluent`].
    pub fn normal_form(&self, w: &Word) -> Word {
        match self.config.rewriter {
            RewriterKind::LeftScan => left_scan_normal_form(&self.pool, w),
            RewriterKind::Trie => trie_normal_form(&self.trie, &self.pool, w),
        }
    }

    /// `equal_to(u, v)` iff `normal_form(u) == normal_form(v)`. Semi-decidable
    /// before the engine is confluent: `true` answers are always correct,
    /// `false` may mean "not yet known".
    pub fn equal_to(&self, u: &Word, v: &Word) -> bool {
        self.normal_form(u) == self.normal_form(v)
    }

    /// `true` iff every critical pair between two active rules resolves to
    /// a common normal form (spec.md invariant 4), checked directly rather
    /// than inferred from the queue being empty.
    pub fn confluent(&self) -> bool {
        let active: Vec<RuleId> = self.pool.active().map(|r| r.id).collect();
        for &r1 in &active {
            for &r2 in &active {
                let lhs1 = &self.pool.get(r1).lhs;
                let lhs2 = &self.pool.get(r2).lhs;
                for overlap in genuine_overlaps(lhs1, lhs2) {
                    let a_len = lhs1.len() - overlap.len;
                    let c = lhs2.suffix_from(overlap.len);
                    let reduction1 = self.pool.get(r1).rhs.concat(&c);
                    let reduction2 = lhs1.prefix(a_len).concat(&self.pool.get(r2).rhs);
                    if self.normal_form(&reduction1) != self.normal_form(&reduction2) {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Active rules in insertion order, as `(lhs, rhs)` pairs.
    pub fn rules(&self) -> Vec<(Word, Word)> {
        self.pool
            .active()
            .map(|r| (r.lhs.clone(), r.rhs.clone()))
            .collect()
    }

    pub fn active_rule_count(&self) -> usize {
        self.pool.active_count()
    }

    /// A cheap, non-authoritative guard (spec.md's supplement) used only to
    /// pick a sane default timeout in demos/tests — never to refuse to run.
    /// `true` suggests (does not prove) that no generator ever reduces to
    /// the empty word, a pattern common to infinite monoids like the
    /// bicyclic monoid's `ab = 1` counterpart `ba` (spec.md §8 scenario 4).
    pub fn is_obviously_infinite(&self) -> bool {
        if self.presentation.alphabet_size() <= 1 {
            return false;
        }
        let eliminated: std::collections::HashSet<u32> = self
            .pool
            .active()
            .filter(|r| r.rhs.is_empty() && r.lhs.len() == 1)
            .map(|r| r.lhs.as_slice()[0].0)
            .collect();
        eliminated.len() < self.presentation.alphabet_size() as usize
    }

    fn add_equation(&mut self, u: Word, v: Word) -> Result<()> {
        let ru = self.normal_form(&u);
        let rv = self.normal_form(&v);
        if ru == rv {
            return Ok(());
        }
        let (lhs, rhs) = match self.presentation.order().compare(&ru, &rv) {
            Ordering::Greater => (ru, rv),
            Ordering::Less => (rv, ru),
            Ordering::Equal => {
                let size = self.presentation.alphabet_size();
                return Err(FpSemiError::CannotOrient {
                    lhs: ru.to_string(size),
                    rhs: rv.to_string(size),
                });
            }
        };
        if lhs.is_empty() {
            return Err(FpSemiError::InvalidRule {
                reason: "oriented lhs is empty".to_string(),
            });
        }
        if self.config.max_rules.exceeded_by(self.pool.active_count() as u64 + 1) {
            return Err(FpSemiError::LimitReached {
                which: LimitKind::MaxRules,
            });
        }
        self.activate_rule(lhs, rhs)
    }

    fn activate_rule(&mut self, lhs: Word, rhs: Word) -> Result<()> {
        let id = match self.pool.activate(lhs.clone(), rhs.clone()) {
            Some(id) => id,
            None => return Ok(()),
        };
        self.trie.insert(&lhs, id);
        log::debug!("activated rule #{}: {} -> {}", id.0, lhs, rhs);
        self.new_rules_since_check += 1;

        let deactivated = self
            .pool
            .inter_reduce_against(id, self.presentation.order().as_ref());
        for old_id in deactivated {
            let old_lhs = self.pool.get(old_id).lhs.clone();
            let old_rhs = self.pool.get(old_id).rhs.clone();
            self.trie.remove(&old_lhs);
            let nf_lhs = self.normal_form(&old_lhs);
            let nf_rhs = self.normal_form(&old_rhs);
            if nf_lhs != nf_rhs {
                self.add_equation(nf_lhs, nf_rhs)?;
            }
        }

        self.enqueue_pairs_for(id);
        self.maybe_check_confluence();
        Ok(())
    }

    fn enqueue_pairs_for(&mut self, id: RuleId) {
        let new_lhs = self.pool.get(id).lhs.clone();
        let active_ids: Vec<RuleId> = self.pool.active().map(|r| r.id).collect();
        for other in active_ids {
            let other_lhs = self.pool.get(other).lhs.clone();
            if let Some(bucket) = genuine_overlaps(&new_lhs, &other_lhs)
                .iter()
                .map(|o| o.len)
                .min()
            {
                self.queue.push(
                    CriticalPair { r1: id, r2: other },
                    bucket,
                );
            }
            if other != id {
                if let Some(bucket) = genuine_overlaps(&other_lhs, &new_lhs)
                    .iter()
                    .map(|o| o.len)
                    .min()
                {
                    self.queue.push(
                        CriticalPair { r1: other, r2: id },
                        bucket,
                    );
                }
            }
        }
    }

    fn maybe_check_confluence(&mut self) {
        if let ConfluenceCheckInterval::Every(n) = self.config.check_confluence_interval {
            if self.new_rules_since_check >= n {
                self.new_rules_since_check = 0;
                let ok = self.confluent();
                log::debug!("periodic confluence check at {} rules: {}", self.pool.active_count(), ok);
            }
        }
    }

    fn process_critical_pair(&mut self, pair: CriticalPair) -> Result<()> {
        if !self.pool.get(pair.r1).active || !self.pool.get(pair.r2).active {
            return Ok(());
        }
        let lhs1 = self.pool.get(pair.r1).lhs.clone();
        let rhs1 = self.pool.get(pair.r1).rhs.clone();
        let lhs2 = self.pool.get(pair.r2).lhs.clone();
        let rhs2 = self.pool.get(pair.r2).rhs.clone();

        for overlap in genuine_overlaps(&lhs1, &lhs2) {
            let policy_len = measure(lhs1.len(), lhs2.len(), overlap)(self.config.overlap_policy);
            if self.config.max_overlap.exceeded_by(policy_len as u64) {
                return Err(FpSemiError::LimitReached {
                    which: LimitKind::MaxOverlap,
                });
            }
            let a_len = lhs1.len() - overlap.len;
            let c = lhs2.suffix_from(overlap.len);
            let reduction1 = rhs1.concat(&c);
            let reduction2 = lhs1.prefix(a_len).concat(&rhs2);
            let nf1 = self.normal_form(&reduction1);
            let nf2 = self.normal_form(&reduction2);
            if nf1 != nf2 {
                self.add_equation(nf1, nf2)?;
            }
        }
        Ok(())
    }

    fn drive(&mut self, mut predicate: Option<&mut dyn FnMut() -> bool>) -> Result<()> {
        if self.status == Status::Finished {
            return Ok(());
        }
        if self.status == Status::Dead {
            return Err(FpSemiError::Cancelled {
                reason: fpsemi_base::StopReason::Killed,
            });
        }
        self.status = Status::Running;
        let checkpoint = Checkpoint::new(
            self.killed.clone(),
            self.deadline,
            Some(self.config.checkpoint_interval),
        );
        let mut step: u64 = 0;
        loop {
            let signal = if let Some(p) = predicate.as_mut() {
                checkpoint.poll_with_predicate(step, &mut **p)
            } else {
                checkpoint.poll(step)
            };
            if let Some(signal) = signal {
                self.status = signal.into();
                return match signal {
                    fpsemi_runner::StopSignal::Dead => Err(FpSemiError::Cancelled {
                        reason: fpsemi_base::StopReason::Killed,
                    }),
                    fpsemi_runner::StopSignal::TimedOut | fpsemi_runner::StopSignal::StoppedByPredicate => {
                        Ok(())
                    }
                };
            }
            step += 1;
            self.maybe_report();

            let pair = match self.queue.pop() {
                Some(p) => p,
                None => {
                    self.status = Status::Finished;
                    return Ok(());
                }
            };
            if let Err(e) = self.process_critical_pair(pair) {
                self.status = Status::Finished;
                return Err(e);
            }
        }
    }

    fn maybe_report(&mut self) {
        if let Some(interval) = self.report_interval {
            let now = Instant::now();
            let due = self.last_report.map(|t| now - t >= interval).unwrap_or(true);
            if due {
                log::info!(
                    "knuth-bendix progress: {} active rules, queue drained to completion pending",
                    self.pool.active_count()
                );
                self.last_report = Some(now);
            }
        }
    }
}

impl Runner for KnuthBendix {
    fn run(&mut self) -> Result<()> {
        self.drive(None)
    }

    fn run_for(&mut self, duration: Duration) -> Result<()> {
        self.deadline = Some(Instant::now() + duration);
        self.drive(None)
    }

    fn run_until(&mut self, predicate: &mut dyn FnMut() -> bool) -> Result<()> {
        self.drive(Some(predicate))
    }

    fn report_every(&mut self, duration: Duration) {
        self.report_interval = Some(duration);
    }

    fn kill(&self) {
        self.killed.store(true, AtomicOrdering::SeqCst);
    }

    fn kill_handle(&self) -> fpsemi_runner::KillHandle {
        fpsemi_runner::KillHandle::new(self.killed.clone())
    }

    fn status(&self) -> Status {
        self.status
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
