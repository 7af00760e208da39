//! Workshop session state.
//!
//! - [`phase::LifecyclePhase`]: `NotStarted → Started → Ending`
//! - [`state::SessionState`]: the full mutable state of one workshop
//! - [`snapshot::SessionSnapshot`]: the persisted form used by backup/restore

pub mod phase;
pub mod snapshot;
pub mod state;
