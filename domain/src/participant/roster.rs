//! Roster extraction
//!
//! Splits configured participant records into one facilitator and the pool
//! of speakers the selection policy draws from.

use super::entities::Participant;
use crate::config::ParticipantSpec;
use rand::Rng;
use rand::seq::SliceRandom;

/// Facilitator plus participant pool built from configuration.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    pub facilitator: Option<Participant>,
    pub participants: Vec<Participant>,
    /// Human-readable notes about decisions taken during extraction.
    pub warnings: Vec<String>,
}

impl Roster {
    /// Build a roster from configuration records.
    ///
    /// The first record marked as facilitator facilitates; any further marked
    /// records join the pool as ordinary participants. When nobody is marked,
    /// the first record is promoted to facilitator and a warning is recorded.
    pub fn extract(specs: &[ParticipantSpec]) -> Self {
        let mut roster = Roster::default();

        for spec in specs {
            let mut participant = Participant::from_spec(spec);
            if participant.is_facilitator() {
                if roster.facilitator.is_none() {
                    roster.facilitator = Some(participant);
                    continue;
                }
                roster.warnings.push(format!(
                    "Warning: '{}' is also marked as facilitator; joining as a participant.",
                    participant.display_name()
                ));
                participant.set_facilitator(false);
            }
            roster.participants.push(participant);
        }

        if roster.facilitator.is_none() && !roster.participants.is_empty() {
            let mut promoted = roster.participants.remove(0);
            promoted.set_facilitator(true);
            roster.warnings.push(format!(
                "Warning: No facilitator defined. First participant '{}' will be set as facilitator.",
                promoted.display_name()
            ));
            roster.facilitator = Some(promoted);
        }

        roster
    }

    /// Randomise speaking order of the participant pool.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.participants.shuffle(rng);
    }
}
