//! Interactive workshop module
//!
//! Provides a reedline-based prompt that feeds command lines to the engine.

mod repl;

pub use repl::{LineOutcome, WorkshopRepl};
