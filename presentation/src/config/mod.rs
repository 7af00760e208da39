//! Presentation-level configuration
//!
//! What the REPL shows after each command and where it keeps its files.

use std::path::PathBuf;

/// REPL configuration for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub struct ReplConfig {
    /// Show a spinner while the provider works
    pub show_progress: bool,
    /// Path to history file. Defaults to the platform data directory.
    pub history_file: Option<PathBuf>,
    /// Transcript lines printed after each command
    pub transcript_tail: usize,
    /// Control messages printed after each command
    pub feedback_tail: usize,
    /// Full transcript export, rewritten after each command
    pub transcript_path: PathBuf,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            history_file: None,
            transcript_tail: 20,
            feedback_tail: 5,
            transcript_path: PathBuf::from("latest_transcript.txt"),
        }
    }
}

impl ReplConfig {
    /// History file to use, if any location is available
    pub fn history_path(&self) -> Option<PathBuf> {
        self.history_file.clone().or_else(|| {
            dirs::data_dir().map(|p| p.join("llm-workshop").join("history.txt"))
        })
    }
}
