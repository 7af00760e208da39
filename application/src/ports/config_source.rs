//! Workshop configuration source port

use std::path::{Path, PathBuf};
use thiserror::Error;
use workshop_domain::WorkshopConfig;

/// Errors raised while loading a workshop configuration file
///
/// Every variant carries the offending path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to read configuration '{}': {message}", path.display())]
    Read { path: PathBuf, message: String },

    #[error("Failed to parse configuration '{}': {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Invalid configuration '{}': {message}", path.display())]
    Invalid { path: PathBuf, message: String },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path,
        }
    }
}

/// Loads a workshop configuration fragment from a file
pub trait ConfigSource: Send + Sync {
    fn load(&self, path: &Path) -> Result<WorkshopConfig, ConfigError>;
}
