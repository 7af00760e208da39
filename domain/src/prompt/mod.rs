//! Prompt domain
//!
//! Context bundles and templates for every provider request the engine
//! makes: contributions, facilitation, speaker suggestion, summaries and
//! compliance checks.

mod context;
mod template;

pub use context::TurnContext;
pub use template::PromptTemplate;
