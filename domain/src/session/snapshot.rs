//! Persisted form of a session

use super::phase::LifecyclePhase;
use super::state::FIRST_ROUND;
use crate::config::WorkshopConfig;
use crate::participant::entities::Participant;
use crate::participant::value_objects::ParticipantId;
use crate::transcript::TranscriptEntry;
use serde::{Deserialize, Serialize};

fn first_round() -> u64 {
    FIRST_ROUND
}

/// Everything needed to resume a session, as written to a backup file.
///
/// Produced by [`SessionState::to_snapshot`](super::state::SessionState::to_snapshot)
/// and checked by [`SessionState::from_snapshot`](super::state::SessionState::from_snapshot).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(default)]
    pub transcript_content: Vec<TranscriptEntry>,
    /// Diagnostic copy of the feedback log; ignored on restore.
    #[serde(default)]
    pub control_feedback: Vec<String>,
    #[serde(default)]
    pub global_config: WorkshopConfig,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub facilitator: Option<Participant>,
    #[serde(default)]
    pub current_turn: u64,
    #[serde(default)]
    pub tokens_used: u64,
    #[serde(default)]
    pub context_length: u64,
    #[serde(default = "first_round")]
    pub current_round: u64,
    #[serde(default)]
    pub state: LifecyclePhase,
    #[serde(default)]
    pub previous_speaker_id: Option<ParticipantId>,
    #[serde(default)]
    pub round_speakers: Vec<ParticipantId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::state::SessionState;

    #[test]
    fn test_minimal_document_uses_defaults() {
        let snapshot: SessionSnapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(snapshot.current_round, 1);
        assert_eq!(snapshot.state, LifecyclePhase::NotStarted);
        let state = SessionState::from_snapshot(snapshot).unwrap();
        assert_eq!(state, SessionState::new());
    }

    #[test]
    fn test_state_written_as_integer() {
        let snapshot = SessionState::new().to_snapshot(&[]);
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["state"], 0);
        assert_eq!(value["current_round"], 1);
        assert!(value["transcript_content"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_legacy_field_names_accepted() {
        let json = r#"{
            "participants": [
                {"uuid": "p1", "name": "Ann", "role": "Dev", "background": "", "contributions": 2}
            ],
            "facilitator": {"uuid": "f1", "name": "Host", "role": "Lead", "is_facilitator": true},
            "transcript_content": [
                {"round": 1, "turn": 1, "participant_id": "p1", "content": "Hi"}
            ],
            "current_turn": 1,
            "state": "started",
            "previous_speaker_id": "p1"
        }"#;
        let snapshot: SessionSnapshot = serde_json::from_str(json).unwrap();
        let state = SessionState::from_snapshot(snapshot).unwrap();
        assert_eq!(state.phase(), LifecyclePhase::Started);
        assert_eq!(state.participants()[0].contribution_count(), 2);
        assert_eq!(state.render_transcript(), vec!["Ann: Hi"]);
    }
}
