//! Application-level configuration.
//!
//! - [`EngineOptions`]: provider call policy, compliance check and output paths

pub mod engine_options;

pub use engine_options::EngineOptions;
