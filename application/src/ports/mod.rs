//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod config_source;
pub mod conversation_logger;
pub mod inference_provider;
pub mod progress;
pub mod snapshot_store;
