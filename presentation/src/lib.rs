//! Presentation layer for llm-workshop
//!
//! This crate contains the CLI definition, the interactive REPL,
//! console formatting and the provider progress spinner.

pub mod chat;
pub mod cli;
pub mod config;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::{LineOutcome, WorkshopRepl};
pub use cli::commands::{Cli, StartupSource};
pub use config::ReplConfig;
pub use output::console::ConsoleFormatter;
pub use progress::reporter::ProgressReporter;
