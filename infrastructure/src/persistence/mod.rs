//! File-backed persistence: session snapshots and text artifacts.

mod artifacts;
mod json_snapshot;

pub use artifacts::FileArtifactSink;
pub use json_snapshot::JsonSnapshotStore;

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use workshop_application::PersistenceError;

fn io_error(path: &Path, error: std::io::Error) -> PersistenceError {
    PersistenceError::Io {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}

/// Create the parent directory of `path` if it has one.
fn ensure_parent(path: &Path) -> Result<(), PersistenceError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| io_error(path, e))
        }
        _ => Ok(()),
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Replace `path` with `contents` so readers see either the old file or the
/// complete new one.
fn write_atomic(path: &Path, contents: &str) -> Result<(), PersistenceError> {
    ensure_parent(path)?;
    let temp = temp_sibling(path);
    std::fs::write(&temp, contents).map_err(|e| io_error(path, e))?;
    std::fs::rename(&temp, path).map_err(|e| {
        let _ = std::fs::remove_file(&temp);
        io_error(path, e)
    })
}
