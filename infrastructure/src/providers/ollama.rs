//! Ollama-compatible chat client.
//!
//! Sends one non-streaming `/api/chat` request per generation with the
//! system message and the prompt as the two chat messages.

use super::ProviderSettings;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use workshop_application::{Generation, InferenceProvider, ProviderError};

/// Inference provider backed by an Ollama `/api/chat` endpoint.
pub struct OllamaProvider {
    client: reqwest::Client,
    settings: ProviderSettings,
}

impl OllamaProvider {
    pub fn new(settings: ProviderSettings) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.settings.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    stream: bool,
    keep_alive: String,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Option<ChatResponseMessage>,
    error: Option<String>,
    #[serde(default)]
    prompt_eval_count: u64,
    #[serde(default)]
    eval_count: u64,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[async_trait]
impl InferenceProvider for OllamaProvider {
    async fn generate(&self, prompt: &str, system: &str) -> Result<Generation, ProviderError> {
        let body = ChatRequest {
            model: &self.settings.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            stream: false,
            keep_alive: format!("{}s", self.settings.keep_alive_secs),
            options: ChatOptions {
                temperature: self.settings.temperature,
            },
        };

        debug!(
            "POST {} (model {}, {} prompt chars)",
            self.chat_url(),
            self.settings.model,
            prompt.len()
        );

        let response = self
            .client
            .post(self.chat_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ChatResponse>(&text)
                .ok()
                .and_then(|r| r.error)
                .unwrap_or(text);
            return Err(ProviderError::Transport(format!(
                "HTTP {}: {}",
                status, detail
            )));
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        if let Some(error) = parsed.error {
            return Err(ProviderError::MalformedResponse(format!(
                "server error: {}",
                error
            )));
        }

        let content = parsed
            .message
            .map(|m| m.content)
            .ok_or_else(|| ProviderError::MalformedResponse("No message in response".into()))?;

        Ok(Generation::new(
            content,
            parsed.prompt_eval_count + parsed.eval_count,
        ))
    }
}
