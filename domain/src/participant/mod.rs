//! Workshop participants.
//!
//! - [`entities::Participant`] - identity plus per-agent bookkeeping
//! - [`value_objects::ParticipantId`] - stable unique identifier
//! - [`roster::Roster`] - facilitator extraction from configuration

pub mod entities;
pub mod roster;
pub mod value_objects;
