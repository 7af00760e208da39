//! Inference provider port
//!
//! Defines the interface for the external text-generation service.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while generating text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Provider timed out after {}s", .0.as_secs_f32())]
    Timeout(Duration),

    #[error("Request cancelled")]
    Cancelled,
}

impl ProviderError {
    /// Whether the same request may succeed if sent again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProviderError::Transport(_) | ProviderError::Timeout(_))
    }
}

/// Generated text plus the tokens it cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub content: String,
    pub tokens_used: u64,
}

impl Generation {
    pub fn new(content: impl Into<String>, tokens_used: u64) -> Self {
        Self {
            content: content.into(),
            tokens_used,
        }
    }
}

/// Gateway to a text-generation service
///
/// Implementations (adapters) live in the infrastructure layer. The engine
/// applies timeouts and retries around this call; adapters should not.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Generate a completion for `prompt` under the given system message.
    async fn generate(&self, prompt: &str, system: &str) -> Result<Generation, ProviderError>;
}
