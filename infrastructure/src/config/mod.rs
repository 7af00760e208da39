//! Configuration file loading for llm-workshop
//!
//! This module handles file I/O and merging of settings from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `WORKSHOP_*` environment variables (`WORKSHOP_PROVIDER__MODEL=...`)
//! 2. `--settings <path>` specified file
//! 3. Project root: `./workshop.toml` or `./.workshop.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/llm-workshop/config.toml`
//! 5. Default values
//!
//! Workshop definitions (participants, topic) are a separate document,
//! read by [`FileWorkshopConfigSource`].

mod file_config;
mod loader;
mod workshop_loader;

pub use file_config::{
    FileConfig, FileEngineConfig, FileLoggingConfig, FileProviderConfig, FileReplConfig,
};
pub use loader::ConfigLoader;
pub use workshop_loader::FileWorkshopConfigSource;
