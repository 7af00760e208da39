//! Infrastructure layer for llm-workshop
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: settings and workshop file loading, the
//! Ollama-compatible HTTP provider, snapshot and artifact files, and the
//! JSONL conversation log.

pub mod config;
pub mod logging;
pub mod persistence;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileEngineConfig, FileLoggingConfig, FileProviderConfig,
    FileReplConfig, FileWorkshopConfigSource,
};
pub use logging::JsonlConversationLogger;
pub use persistence::{FileArtifactSink, JsonSnapshotStore};
pub use providers::{OllamaProvider, ProviderSettings};
