//! Snapshot store port
//!
//! Persistence of [`SessionSnapshot`] values and other session artifacts.

use std::path::{Path, PathBuf};
use thiserror::Error;
use workshop_domain::SessionSnapshot;

/// Errors raised while writing or reading persisted files
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    #[error("Failed to access '{}': {message}", path.display())]
    Io { path: PathBuf, message: String },

    #[error("Failed to serialize session for '{}': {message}", path.display())]
    Serialization { path: PathBuf, message: String },

    #[error("Snapshot '{}' is not a valid session file: {message}", path.display())]
    Corrupt { path: PathBuf, message: String },
}

impl PersistenceError {
    pub fn path(&self) -> &Path {
        match self {
            PersistenceError::Io { path, .. }
            | PersistenceError::Serialization { path, .. }
            | PersistenceError::Corrupt { path, .. } => path,
        }
    }
}

/// Reads and writes session snapshots
pub trait SnapshotStore: Send + Sync {
    fn save(&self, path: &Path, snapshot: &SessionSnapshot) -> Result<(), PersistenceError>;

    fn load(&self, path: &Path) -> Result<SessionSnapshot, PersistenceError>;
}

/// Writes plain-text artifacts such as summaries and transcript exports
pub trait ArtifactSink: Send + Sync {
    fn write(&self, path: &Path, content: &str) -> Result<(), PersistenceError>;
}
