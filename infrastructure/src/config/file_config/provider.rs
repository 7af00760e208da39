//! Provider configuration from TOML (`[provider]` section)

use serde::{Deserialize, Serialize};

/// Ollama-compatible chat endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Base URL of the inference server (default: "http://localhost:11434").
    pub base_url: String,
    /// Model name (default: "mistral:latest").
    pub model: String,
    /// Sampling temperature (0.0 - 2.0).
    pub temperature: f32,
    /// How long the server keeps the model loaded between calls.
    pub keep_alive_secs: u64,
    /// Per-call timeout enforced by the engine. No timeout when unset.
    pub timeout_secs: Option<u64>,
    /// Extra attempts for transport errors and timeouts.
    pub retries: u32,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "mistral:latest".to_string(),
            temperature: 0.7,
            keep_alive_secs: 600,
            timeout_secs: None,
            retries: 0,
        }
    }
}
