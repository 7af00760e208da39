//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the settings file.
//! They are deserialized directly and converted to application types.

mod engine;
mod logging;
mod provider;
mod repl;

pub use engine::FileEngineConfig;
pub use logging::FileLoggingConfig;
pub use provider::FileProviderConfig;
pub use repl::FileReplConfig;

use serde::{Deserialize, Serialize};
use workshop_application::EngineOptions;
use workshop_domain::{ConfigIssue, ConfigIssueCode};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Inference endpoint settings
    pub provider: FileProviderConfig,
    /// Engine behavior and output paths
    pub engine: FileEngineConfig,
    /// REPL settings
    pub repl: FileReplConfig,
    /// Structured conversation logging
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.provider.model.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyField {
                    field: "provider.model".to_string(),
                },
                "provider.model is empty",
            ));
        }
        if self.provider.base_url.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyField {
                    field: "provider.base_url".to_string(),
                },
                "provider.base_url is empty",
            ));
        }

        let temperature = self.provider.temperature;
        if !(0.0..=2.0).contains(&temperature) {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::InvalidValue {
                    field: "provider.temperature".to_string(),
                    value: temperature.to_string(),
                },
                format!(
                    "provider.temperature: {} is outside 0.0..=2.0, the server may reject it",
                    temperature
                ),
            ));
        }

        if self.provider.timeout_secs == Some(0) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidValue {
                    field: "provider.timeout_secs".to_string(),
                    value: "0".to_string(),
                },
                "provider.timeout_secs must be positive; omit it to disable the timeout",
            ));
        }

        for (field, value) in [
            ("engine.transcript_tail", self.engine.transcript_tail),
            ("engine.feedback_tail", self.engine.feedback_tail),
        ] {
            if value == 0 {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::InvalidValue {
                        field: field.to_string(),
                        value: value.to_string(),
                    },
                    format!("{}: 0 hides this section of the screen", field),
                ));
            }
        }

        issues
    }

    /// Engine options described by this configuration.
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions::default()
            .with_compliance_check(self.engine.compliance_check)
            .with_timeout_seconds(self.provider.timeout_secs)
            .with_provider_retries(self.provider.retries)
            .with_exit_backup_path(self.engine.exit_backup_path.clone())
            .with_recovery_backup_path(self.engine.recovery_backup_path.clone())
            .with_summary_path(self.engine.summary_path.clone())
    }
}
