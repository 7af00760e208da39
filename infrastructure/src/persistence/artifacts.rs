//! Plain-text artifact files (summaries, transcript exports).

use super::write_atomic;
use std::path::Path;
use tracing::debug;
use workshop_application::{ArtifactSink, PersistenceError};

/// Writes artifacts to the local filesystem, replacing earlier contents.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileArtifactSink;

impl FileArtifactSink {
    pub fn new() -> Self {
        Self
    }
}

impl ArtifactSink for FileArtifactSink {
    fn write(&self, path: &Path, content: &str) -> Result<(), PersistenceError> {
        write_atomic(path, content)?;
        debug!("Wrote {} bytes to {}", content.len(), path.display());
        Ok(())
    }
}
