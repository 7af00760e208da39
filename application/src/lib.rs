//! Application layer for llm-workshop
//!
//! This crate contains the orchestration engine, port definitions, and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::EngineOptions;
pub use ports::{
    config_source::{ConfigError, ConfigSource},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    inference_provider::{Generation, InferenceProvider, ProviderError},
    progress::{NoTurnObserver, TurnObserver},
    snapshot_store::{ArtifactSink, PersistenceError, SnapshotStore},
};
pub use use_cases::run_workshop::{
    Command, CommandParseError, DispatchOutcome, UtilAction, WorkshopEngine, WorkshopError,
};
