//! Workshop configuration value objects
//!
//! The workshop configuration is loaded by an outer layer (YAML/TOML/JSON)
//! and validated here once, before any participant is constructed.

pub mod validation;
mod workshop;

pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
pub use workshop::{ParticipantSpec, WorkshopConfig, WorkshopDetails};
