//! Type definitions for the workshop engine.

use super::command::CommandParseError;
use crate::ports::config_source::ConfigError;
use crate::ports::inference_provider::ProviderError;
use crate::ports::snapshot_store::PersistenceError;
use thiserror::Error;
use workshop_domain::DomainError;

/// Errors that can occur while executing a workshop command
///
/// Dispatch turns every variant into a control message; none of them ends
/// the session.
#[derive(Error, Debug)]
pub enum WorkshopError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Turn {turn} ({speaker}) failed: {source}")]
    TurnFailed {
        turn: u64,
        speaker: String,
        #[source]
        source: ProviderError,
    },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Command(#[from] CommandParseError),
}

impl WorkshopError {
    /// Short category label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            WorkshopError::Domain(e) => e.kind(),
            WorkshopError::TurnFailed { .. } | WorkshopError::Provider(_) => "provider",
            WorkshopError::Config(_) => "config",
            WorkshopError::Persistence(_) => "persistence",
            WorkshopError::Command(_) => "command",
        }
    }
}

/// What the front end should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Continue,
    /// Terminate the process. `backup_error` is set when the final
    /// snapshot could not be written.
    Exit { backup_error: Option<String> },
}

impl DispatchOutcome {
    pub fn is_exit(&self) -> bool {
        matches!(self, DispatchOutcome::Exit { .. })
    }
}

/// What a single turn asks the speaker to do.
#[derive(Debug, Clone, Copy)]
pub(super) enum TurnKind<'a> {
    /// Facilitator opening, with the caller's (or default) opening text.
    Opening(&'a str),
    /// Facilitator delivering caller-supplied text.
    Say(&'a str),
    /// Ordinary participant contribution.
    Contribution,
}
