//! # fpsemi-base
//!
//! Structural atoms shared by the Knuth–Bendix and Todd–Coxeter engines:
//!
//! - [`Word`]/[`Letter`] — the alphabet over which presentations are written
//! - [`Order`] — reduction orders (shortlex, recursive path order)
//! - [`WordInterner`] — content-addressed dedup for rule/presentation words
//! - [`Presentation`] — the immutable input to every engine
//! - [`FpSemiError`]/[`Result`] — the shared error taxonomy
//!
//! # Design Principles
//!
//! This crate has **no knowledge of Knuth–Bendix or Todd–Coxeter specifics**.
//! It provides only the generic, reusable representation of words and
//! presentations that both engines build upon.

pub mod cap;
pub mod error;
pub mod intern;
pub mod order;
pub mod presentation;
pub mod word;

pub use cap::Cap;
pub use error::{FpSemiError, LimitKind, StopReason, Result};
pub use intern::{WordId, WordInterner};
pub use order::{Order, RecursivePathOrder, Shortlex};
pub use presentation::Presentation;
pub use word::{Letter, Word};
