//! Participant entity

use super::value_objects::ParticipantId;
use crate::config::ParticipantSpec;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

const DEFAULT_MOOD: &str = "neutral";

fn default_mood() -> String {
    DEFAULT_MOOD.to_string()
}

/// A workshop participant (Entity)
///
/// Identity fields are fixed at creation. `contribution_count` and
/// `last_spoke_turn` change only through [`Participant::record_contribution`],
/// which the engine calls after a successful turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    #[serde(alias = "uuid")]
    id: ParticipantId,
    #[serde(alias = "name")]
    display_name: String,
    role: String,
    #[serde(default)]
    background: String,
    #[serde(default)]
    is_facilitator: bool,
    #[serde(default, alias = "contributions")]
    contribution_count: u64,
    #[serde(default)]
    last_spoke_turn: u64,
    #[serde(default = "default_mood")]
    mood: String,
}

impl Participant {
    pub fn new(
        display_name: impl Into<String>,
        role: impl Into<String>,
        background: impl Into<String>,
    ) -> Self {
        Self::with_id(ParticipantId::generate(), display_name, role, background)
    }

    pub fn with_id(
        id: ParticipantId,
        display_name: impl Into<String>,
        role: impl Into<String>,
        background: impl Into<String>,
    ) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            role: role.into(),
            background: background.into(),
            is_facilitator: false,
            contribution_count: 0,
            last_spoke_turn: 0,
            mood: default_mood(),
        }
    }

    pub fn from_spec(spec: &ParticipantSpec) -> Self {
        let mut participant = Self::new(
            spec.name.trim(),
            spec.role.trim(),
            spec.background.trim(),
        );
        participant.is_facilitator = spec.is_facilitator;
        participant
    }

    pub fn id(&self) -> &ParticipantId {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn background(&self) -> &str {
        &self.background
    }

    pub fn is_facilitator(&self) -> bool {
        self.is_facilitator
    }

    pub fn contribution_count(&self) -> u64 {
        self.contribution_count
    }

    pub fn last_spoke_turn(&self) -> u64 {
        self.last_spoke_turn
    }

    pub fn mood(&self) -> &str {
        &self.mood
    }

    pub(crate) fn set_facilitator(&mut self, is_facilitator: bool) {
        self.is_facilitator = is_facilitator;
    }

    /// Count one more contribution made at `turn`.
    pub fn record_contribution(&mut self, turn: u64) {
        self.contribution_count += 1;
        self.last_spoke_turn = turn;
    }

    pub fn update_mood(&mut self, mood: impl Into<String>) {
        self.mood = mood.into();
    }

    /// Turns elapsed since this participant last spoke.
    pub fn turns_since_last_contribution(&self, current_turn: u64) -> u64 {
        current_turn.saturating_sub(self.last_spoke_turn)
    }

    /// Case-insensitive prefix match against the display name.
    pub fn name_starts_with(&self, query: &str) -> bool {
        self.display_name
            .to_lowercase()
            .starts_with(&query.trim().to_lowercase())
    }

    /// Short introduction, optionally with background.
    pub fn bio(&self, full: bool) -> String {
        if full && !self.background.is_empty() {
            format!("{}, {}. {}", self.display_name, self.role, self.background)
        } else {
            format!("{}, {}", self.display_name, self.role)
        }
    }

    /// Label used in rendered transcripts; the facilitator is marked `(F)`.
    pub fn transcript_label(&self) -> String {
        if self.is_facilitator {
            format!("{} (F)", self.display_name)
        } else {
            self.display_name.clone()
        }
    }

    /// Persona fields handed to the provider as context.
    pub fn persona_context(&self) -> Value {
        json!({
            "name": self.display_name,
            "role": self.role,
            "background": self.background,
            "contributions": self.contribution_count,
            "mood": self.mood,
        })
    }

    /// Persona-specific system message for contribution requests.
    pub fn system_message(&self) -> String {
        if self.is_facilitator {
            format!(
                "Your persona is {}, {}, the facilitator of a workshop.",
                self.display_name, self.role
            )
        } else {
            format!(
                "Your persona is {}, {}, a willing participant in a workshop.",
                self.display_name, self.role
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_contribution_updates_stats() {
        let mut p = Participant::new("Ann", "Developer", "");
        p.record_contribution(4);
        p.record_contribution(9);
        assert_eq!(p.contribution_count(), 2);
        assert_eq!(p.last_spoke_turn(), 9);
        assert_eq!(p.turns_since_last_contribution(12), 3);
    }

    #[test]
    fn test_turns_since_never_underflows() {
        let mut p = Participant::new("Ann", "Developer", "");
        p.record_contribution(10);
        assert_eq!(p.turns_since_last_contribution(3), 0);
    }

    #[test]
    fn test_name_prefix_is_case_insensitive() {
        let p = Participant::new("Beatrice", "Designer", "");
        assert!(p.name_starts_with("bea"));
        assert!(p.name_starts_with("BEATRICE"));
        assert!(!p.name_starts_with("eat"));
    }

    #[test]
    fn test_bio() {
        let p = Participant::new("Ann", "Developer", "Ten years of Rust.");
        assert_eq!(p.bio(false), "Ann, Developer");
        assert_eq!(p.bio(true), "Ann, Developer. Ten years of Rust.");
    }

    #[test]
    fn test_from_spec_trims_and_keeps_flag() {
        let spec = ParticipantSpec::new(" Ann ", "Host").as_facilitator();
        let p = Participant::from_spec(&spec);
        assert_eq!(p.display_name(), "Ann");
        assert!(p.is_facilitator());
        assert_eq!(p.transcript_label(), "Ann (F)");
        assert_eq!(p.mood(), "neutral");
    }

    #[test]
    fn test_persona_context_fields() {
        let mut p = Participant::new("Ann", "Developer", "Rust");
        p.update_mood("curious");
        let ctx = p.persona_context();
        assert_eq!(ctx["name"], "Ann");
        assert_eq!(ctx["mood"], "curious");
        assert_eq!(ctx["contributions"], 0);
    }

    #[test]
    fn test_deserializes_legacy_field_names() {
        let p: Participant = serde_json::from_str(
            r#"{"uuid": "abc", "name": "Ann", "role": "Dev", "background": "",
                "is_facilitator": false, "contributions": 3, "last_spoke_turn": 7,
                "mood": "neutral", "prompts": []}"#,
        )
        .unwrap();
        assert_eq!(p.id().as_str(), "abc");
        assert_eq!(p.contribution_count(), 3);
        assert_eq!(p.last_spoke_turn(), 7);
    }
}
