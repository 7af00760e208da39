//! Append-only transcript of workshop turns.

mod entities;

pub use entities::{Transcript, TranscriptEntry};
