//! Next-speaker selection.
//!
//! - [`policy::SelectionPolicy`] - random-excluding-previous and prefix lookup
//! - [`parsing`] - extraction of provider suggestions

pub mod parsing;
pub mod policy;

pub use parsing::parse_next_speaker;
pub use policy::{SelectionMode, SelectionPolicy, SuggestionRejection};
