//! Engine options - orchestration behavior knobs.
//!
//! [`EngineOptions`] groups the static parameters that control
//! [`WorkshopEngine`](crate::use_cases::run_workshop::WorkshopEngine).
//! These are application-layer concerns, not domain policy.

use std::path::PathBuf;
use std::time::Duration;

/// Engine behavior configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    /// Run the advisory persona-compliance check after every turn.
    pub compliance_check: bool,
    /// Maximum time to wait for one provider call.
    pub provider_timeout: Option<Duration>,
    /// Extra attempts for transport errors and timeouts.
    pub provider_retries: u32,
    /// Where `exit` writes the final snapshot.
    pub exit_backup_path: PathBuf,
    /// Where an interrupted session is saved.
    pub recovery_backup_path: PathBuf,
    /// Where `util summarize` writes its result.
    pub summary_path: PathBuf,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            compliance_check: false,
            provider_timeout: None,
            provider_retries: 0,
            exit_backup_path: PathBuf::from("final_state.json"),
            recovery_backup_path: PathBuf::from("recovery_state.json"),
            summary_path: PathBuf::from("summary.txt"),
        }
    }
}

impl EngineOptions {
    // ==================== Builder Methods ====================

    pub fn with_compliance_check(mut self, enabled: bool) -> Self {
        self.compliance_check = enabled;
        self
    }

    pub fn with_provider_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.provider_timeout = timeout;
        self
    }

    /// Creates the timeout from an optional number of seconds.
    pub fn with_timeout_seconds(self, seconds: Option<u64>) -> Self {
        self.with_provider_timeout(seconds.map(Duration::from_secs))
    }

    pub fn with_provider_retries(mut self, retries: u32) -> Self {
        self.provider_retries = retries;
        self
    }

    pub fn with_exit_backup_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.exit_backup_path = path.into();
        self
    }

    pub fn with_recovery_backup_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.recovery_backup_path = path.into();
        self
    }

    pub fn with_summary_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.summary_path = path.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let options = EngineOptions::default();
        assert!(!options.compliance_check);
        assert!(options.provider_timeout.is_none());
        assert_eq!(options.provider_retries, 0);
        assert_eq!(options.exit_backup_path, PathBuf::from("final_state.json"));
        assert_eq!(options.recovery_backup_path, PathBuf::from("recovery_state.json"));
        assert_eq!(options.summary_path, PathBuf::from("summary.txt"));
    }

    #[test]
    fn test_builder() {
        let options = EngineOptions::default()
            .with_compliance_check(true)
            .with_timeout_seconds(Some(30))
            .with_provider_retries(2)
            .with_summary_path("/tmp/summary.txt");

        assert!(options.compliance_check);
        assert_eq!(options.provider_timeout, Some(Duration::from_secs(30)));
        assert_eq!(options.provider_retries, 2);
        assert_eq!(options.summary_path, PathBuf::from("/tmp/summary.txt"));
    }
}
