//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A lifecycle rule was violated (e.g. starting an unnamed workshop).
    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("No participants found. Please load a configuration with participants.")]
    EmptyRoster,

    #[error("No participant found whose name starts with '{query}'")]
    Selection { query: String },

    #[error("Corrupt session state: {0}")]
    CorruptState(String),

    /// An append tried to reuse or rewind a turn number.
    #[error("Turn {attempted} does not follow turn {last}")]
    TurnOrder { last: u64, attempted: u64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DomainError {
    pub fn precondition(message: impl Into<String>) -> Self {
        DomainError::Precondition(message.into())
    }

    pub fn corrupt(message: impl Into<String>) -> Self {
        DomainError::CorruptState(message.into())
    }

    /// Short category label used in logs and control messages.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::Precondition(_) => "precondition",
            DomainError::EmptyRoster => "empty_roster",
            DomainError::Selection { .. } => "selection",
            DomainError::CorruptState(_) => "corrupt_state",
            DomainError::TurnOrder { .. } => "turn_order",
            DomainError::InvalidConfig(_) => "config",
        }
    }
}
