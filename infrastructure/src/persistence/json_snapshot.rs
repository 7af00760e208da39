//! Session snapshots as pretty-printed JSON files.

use super::{io_error, write_atomic};
use std::path::Path;
use tracing::{debug, info};
use workshop_application::{PersistenceError, SnapshotStore};
use workshop_domain::SessionSnapshot;

/// Stores each snapshot as one JSON document at the requested path.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSnapshotStore;

impl JsonSnapshotStore {
    pub fn new() -> Self {
        Self
    }
}

impl SnapshotStore for JsonSnapshotStore {
    fn save(&self, path: &Path, snapshot: &SessionSnapshot) -> Result<(), PersistenceError> {
        let json =
            serde_json::to_string_pretty(snapshot).map_err(|e| PersistenceError::Serialization {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        write_atomic(path, &json)?;
        info!(
            "Session saved to {} (turn {})",
            path.display(),
            snapshot.current_turn
        );
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SessionSnapshot, PersistenceError> {
        let raw = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
        let snapshot: SessionSnapshot =
            serde_json::from_str(&raw).map_err(|e| PersistenceError::Corrupt {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        debug!(
            "Read snapshot {} ({} transcript entries)",
            path.display(),
            snapshot.transcript_content.len()
        );
        Ok(snapshot)
    }
}
