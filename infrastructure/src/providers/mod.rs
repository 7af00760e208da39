//! Inference provider adapters

mod ollama;

pub use ollama::OllamaProvider;

use crate::config::FileProviderConfig;

/// Connection settings for an inference server.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub keep_alive_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self::from(&FileProviderConfig::default())
    }
}

impl From<&FileProviderConfig> for ProviderSettings {
    fn from(config: &FileProviderConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            keep_alive_secs: config.keep_alive_secs,
        }
    }
}
