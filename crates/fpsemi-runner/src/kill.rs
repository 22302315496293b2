//! A cross-thread kill switch, decoupled from the engine it controls.
//!
//! `Runner::kill(&self)` is only sound to call concurrently with another
//! thread's `Runner::run(&mut self)` on the *same* engine if the two never
//! actually alias the same borrow — which a plain `&dyn Runner` can't
//! guarantee once the engine has been moved into its worker thread. Every
//! engine instead stores its dead flag behind an `Arc<AtomicBool>` and hands
//! out a cheaply cloned [`KillHandle`] *before* the engine is moved, so a
//! killer (e.g. `fpsemi-race`'s winner) can signal cancellation without ever
//! touching the engine's own borrow.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A `Send + Sync`, cheaply `Clone`-able handle to one engine's dead flag.
#[derive(Debug, Clone)]
pub struct KillHandle(Arc<AtomicBool>);

impl KillHandle {
    pub fn new(flag: Arc<AtomicBool>) -> Self {
        KillHandle(flag)
    }

    pub fn kill(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_killed(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
