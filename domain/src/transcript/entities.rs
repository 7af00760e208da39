//! Transcript entities

use crate::core::error::DomainError;
use crate::participant::value_objects::ParticipantId;
use serde::{Deserialize, Serialize};

/// One turn record (Entity, immutable once appended)
///
/// `speaker_id` is `None` for session notices such as the closing record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub round: u64,
    pub turn: u64,
    #[serde(rename = "participant_id")]
    pub speaker_id: Option<ParticipantId>,
    pub content: String,
}

impl TranscriptEntry {
    pub fn contribution(
        round: u64,
        turn: u64,
        speaker_id: ParticipantId,
        content: impl Into<String>,
    ) -> Self {
        Self {
            round,
            turn,
            speaker_id: Some(speaker_id),
            content: content.into(),
        }
    }

    pub fn notice(round: u64, turn: u64, content: impl Into<String>) -> Self {
        Self {
            round,
            turn,
            speaker_id: None,
            content: content.into(),
        }
    }

    /// Render as a single `Label: content` line; notices render bare.
    pub fn render(&self, label: Option<&str>) -> String {
        match label {
            Some(label) => format!("{}: {}", label, self.content),
            None => self.content.clone(),
        }
    }
}

/// Ordered, append-only log of [`TranscriptEntry`] values.
///
/// Turn numbers are strictly increasing; an append that does not advance
/// the turn is rejected and leaves the log untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a transcript from persisted entries, checking turn order.
    pub fn from_entries(entries: Vec<TranscriptEntry>) -> Result<Self, DomainError> {
        let mut transcript = Self::new();
        for entry in entries {
            transcript.append(entry)?;
        }
        Ok(transcript)
    }

    pub fn append(&mut self, entry: TranscriptEntry) -> Result<(), DomainError> {
        if let Some(last) = self.last_turn()
            && entry.turn <= last
        {
            return Err(DomainError::TurnOrder {
                last,
                attempted: entry.turn,
            });
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last_turn(&self) -> Option<u64> {
        self.entries.last().map(|e| e.turn)
    }

    /// The most recent `n` entries, oldest first.
    pub fn tail(&self, n: usize) -> &[TranscriptEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    /// Every entry rendered as one line, in turn order.
    ///
    /// `label` maps a speaker id to the name shown before the content.
    pub fn render<F>(&self, label: F) -> Vec<String>
    where
        F: Fn(&ParticipantId) -> Option<String>,
    {
        Self::render_entries(&self.entries, label)
    }

    /// The most recent `n` entries rendered as lines.
    pub fn render_tail<F>(&self, n: usize, label: F) -> Vec<String>
    where
        F: Fn(&ParticipantId) -> Option<String>,
    {
        Self::render_entries(self.tail(n), label)
    }

    fn render_entries<F>(entries: &[TranscriptEntry], label: F) -> Vec<String>
    where
        F: Fn(&ParticipantId) -> Option<String>,
    {
        entries
            .iter()
            .map(|entry| {
                let name = entry.speaker_id.as_ref().and_then(&label);
                entry.render(name.as_deref())
            })
            .collect()
    }
}
