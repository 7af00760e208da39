//! Turn context bundle

use serde_json::Value;

/// Everything a speaker sees when asked to contribute.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnContext {
    /// Persona fields of the acting participant.
    pub persona: Value,
    /// Workshop section of the configuration, as JSON.
    pub workshop: String,
    /// Full transcript rendered as ordered lines.
    pub transcript: Vec<String>,
}

impl TurnContext {
    pub fn new(persona: Value, workshop: impl Into<String>, transcript: Vec<String>) -> Self {
        Self {
            persona,
            workshop: workshop.into(),
            transcript,
        }
    }

    /// Transcript lines joined for embedding in a prompt.
    pub fn transcript_block(&self) -> String {
        if self.transcript.is_empty() {
            "(no contributions yet)".to_string()
        } else {
            self.transcript.join("\n")
        }
    }
}
