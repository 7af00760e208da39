//! Engine configuration from TOML (`[engine]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use workshop_application::EngineOptions;

/// Raw engine and output-path settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEngineConfig {
    /// Run the advisory persona-compliance check after every turn.
    pub compliance_check: bool,
    /// Transcript lines shown after each command.
    pub transcript_tail: usize,
    /// Control messages shown after each command.
    pub feedback_tail: usize,
    pub exit_backup_path: PathBuf,
    pub recovery_backup_path: PathBuf,
    pub summary_path: PathBuf,
    /// Full transcript export, rewritten after each command.
    pub transcript_path: PathBuf,
}

impl Default for FileEngineConfig {
    fn default() -> Self {
        let options = EngineOptions::default();
        Self {
            compliance_check: options.compliance_check,
            transcript_tail: 20,
            feedback_tail: 5,
            exit_backup_path: options.exit_backup_path,
            recovery_backup_path: options.recovery_backup_path,
            summary_path: options.summary_path,
            transcript_path: PathBuf::from("latest_transcript.txt"),
        }
    }
}
