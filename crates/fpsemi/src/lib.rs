//! # fpsemi
//!
//! The umbrella crate: re-exports the public surface of every engine crate so
//! a caller depends on one thing (spec.md §2 "a caller builds a Presentation,
//! hands copies to several engine instances configured with different
//! strategies, wraps them in a Race, and calls run or a query").
//!
//! ```
//! use fpsemi::{KnuthBendix, KnuthBendixConfig, Presentation, Runner, Word};
//!
//! let p = Presentation::with_alphabet_string(
//!     "ab",
//!     vec![(Word::from_default_str("ba").unwrap(), Word::from_default_str("ab").unwrap())],
//!     std::sync::Arc::new(fpsemi::Shortlex),
//! )
//! .unwrap();
//! let mut kb = KnuthBendix::new(p, KnuthBendixConfig::default()).unwrap();
//! kb.run().unwrap();
//! assert!(kb.confluent());
//! ```

pub use fpsemi_base::{
    Cap, FpSemiError, Letter, LimitKind, Order, Presentation, RecursivePathOrder, Result, Shortlex,
    StopReason, Word, WordId, WordInterner,
};
pub use fpsemi_kb::{
    Cap as KnuthBendixCap, ConfluenceCheckInterval, KnuthBendix, KnuthBendixConfig, OverlapPolicy,
    QueueOrder, RewriterKind,
};
pub use fpsemi_race::{Race, RaceConfig, RaceStats};
pub use fpsemi_runner::{KillHandle, Runner, Status};
pub use fpsemi_tc::{
    CosetId, CosetTable, DefinitionPolicy, LookaheadMode, Side, StandardiseOrder, Strategy,
    ToddCoxeter, ToddCoxeterConfig,
};
