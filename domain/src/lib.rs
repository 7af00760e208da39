//! Domain layer for llm-workshop
//!
//! This crate contains the core workshop model: participants, the
//! transcript, speaker selection and the session state machine.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Session
//!
//! A workshop moves through three phases:
//!
//! - **NotStarted**: configuration may be loaded and merged
//! - **Started**: turns are taken, each one appending to the transcript
//! - **Ending**: terminal, the closing notice has been written
//!
//! ## Facilitator
//!
//! Exactly one participant leads the session. The facilitator opens the
//! workshop, delivers caller text via `say`, and is never picked by the
//! selection policy.

pub mod compliance;
pub mod config;
pub mod core;
pub mod participant;
pub mod prompt;
pub mod selection;
pub mod session;
pub mod transcript;

// Re-export commonly used types
pub use compliance::{ComplianceVerdict, parse_compliance_verdict};
pub use config::{
    ConfigIssue, ConfigIssueCode, ParticipantSpec, Severity, WorkshopConfig, WorkshopDetails,
};
pub use core::error::DomainError;
pub use participant::{entities::Participant, roster::Roster, value_objects::ParticipantId};
pub use prompt::{PromptTemplate, TurnContext};
pub use selection::{SelectionMode, SelectionPolicy, SuggestionRejection, parse_next_speaker};
pub use session::{
    phase::LifecyclePhase,
    snapshot::SessionSnapshot,
    state::{SessionState, Speaker},
};
pub use transcript::{Transcript, TranscriptEntry};
