//! Session state aggregate

use super::phase::LifecyclePhase;
use super::snapshot::SessionSnapshot;
use crate::config::{ConfigIssue, WorkshopConfig};
use crate::core::error::DomainError;
use crate::participant::entities::Participant;
use crate::participant::roster::Roster;
use crate::participant::value_objects::ParticipantId;
use crate::prompt::TurnContext;
use crate::transcript::{Transcript, TranscriptEntry};
use rand::Rng;
use std::collections::HashSet;

pub(crate) const FIRST_ROUND: u64 = 1;

/// Who acts in a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Facilitator,
    /// Index into [`SessionState::participants`].
    Participant(usize),
}

/// Full mutable state of one workshop (Aggregate)
///
/// Owns every participant and transcript entry of the session. The
/// orchestration engine is the only writer.
///
/// Rounds: `current_round` advances once every participant in the pool has
/// spoken at least once since the last boundary. Facilitator turns do not
/// count towards a round.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub(crate) config: WorkshopConfig,
    pub(crate) participants: Vec<Participant>,
    pub(crate) facilitator: Option<Participant>,
    pub(crate) transcript: Transcript,
    pub(crate) phase: LifecyclePhase,
    pub(crate) previous_speaker_id: Option<ParticipantId>,
    pub(crate) current_turn: u64,
    pub(crate) current_round: u64,
    /// Pool members who have spoken since the last round boundary.
    pub(crate) round_speakers: Vec<ParticipantId>,
    pub(crate) tokens_used: u64,
    pub(crate) context_length: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            config: WorkshopConfig::default(),
            participants: Vec::new(),
            facilitator: None,
            transcript: Transcript::new(),
            phase: LifecyclePhase::NotStarted,
            previous_speaker_id: None,
            current_turn: 0,
            current_round: FIRST_ROUND,
            round_speakers: Vec::new(),
            tokens_used: 0,
            context_length: 0,
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: WorkshopConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    // ==================== Accessors ====================

    pub fn config(&self) -> &WorkshopConfig {
        &self.config
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn facilitator(&self) -> Option<&Participant> {
        self.facilitator.as_ref()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    pub fn previous_speaker_id(&self) -> Option<&ParticipantId> {
        self.previous_speaker_id.as_ref()
    }

    pub fn current_turn(&self) -> u64 {
        self.current_turn
    }

    pub fn current_round(&self) -> u64 {
        self.current_round
    }

    pub fn tokens_used(&self) -> u64 {
        self.tokens_used
    }

    pub fn context_length(&self) -> u64 {
        self.context_length
    }

    /// Look up a speaker by id among the facilitator and the pool.
    pub fn find(&self, id: &ParticipantId) -> Option<&Participant> {
        self.facilitator
            .iter()
            .chain(self.participants.iter())
            .find(|p| p.id() == id)
    }

    pub fn speaker(&self, speaker: Speaker) -> Option<&Participant> {
        match speaker {
            Speaker::Facilitator => self.facilitator.as_ref(),
            Speaker::Participant(index) => self.participants.get(index),
        }
    }

    fn speaker_mut(&mut self, speaker: Speaker) -> Option<&mut Participant> {
        match speaker {
            Speaker::Facilitator => self.facilitator.as_mut(),
            Speaker::Participant(index) => self.participants.get_mut(index),
        }
    }

    // ==================== Rendering ====================

    /// Full transcript as `Label: content` lines.
    pub fn render_transcript(&self) -> Vec<String> {
        self.transcript
            .render(|id| self.find(id).map(Participant::transcript_label))
    }

    /// The most recent `n` transcript lines.
    pub fn render_transcript_tail(&self, n: usize) -> Vec<String> {
        self.transcript
            .render_tail(n, |id| self.find(id).map(Participant::transcript_label))
    }

    /// Context bundle for the given speaker.
    pub fn turn_context(&self, speaker: Speaker) -> Option<TurnContext> {
        let participant = self.speaker(speaker)?;
        Some(TurnContext::new(
            participant.persona_context(),
            self.config.prompt_context(),
            self.render_transcript(),
        ))
    }

    // ==================== Configuration ====================

    /// Merge and validate a configuration fragment.
    ///
    /// The fragment is applied only when the merged result has no fatal
    /// issues; warnings are returned for reporting.
    pub fn merge_config(&mut self, fragment: WorkshopConfig) -> Result<Vec<ConfigIssue>, DomainError> {
        let mut merged = self.config.clone();
        merged.merge(fragment);

        let issues = merged.validate();
        if ConfigIssue::has_errors(&issues) {
            return Err(DomainError::InvalidConfig(ConfigIssue::error_summary(
                &issues,
            )));
        }

        self.config = merged;
        Ok(issues)
    }

    // ==================== Lifecycle ====================

    /// `NotStarted → Started`.
    ///
    /// Extracts the roster, shuffles the pool and flips the phase. Returns
    /// the roster warnings (e.g. facilitator promotion). On error the state
    /// is unchanged.
    pub fn begin<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Vec<String>, DomainError> {
        match self.phase {
            LifecyclePhase::NotStarted => {}
            LifecyclePhase::Started => {
                return Err(DomainError::precondition("Workshop is already in progress."));
            }
            LifecyclePhase::Ending => {
                return Err(DomainError::precondition("Workshop has ended."));
            }
        }

        if self.config.workshop.name().is_none() {
            return Err(DomainError::precondition(
                "Please create a workshop via loading config before starting.",
            ));
        }

        let mut roster = Roster::extract(&self.config.participants);
        if roster.participants.is_empty() {
            return Err(DomainError::EmptyRoster);
        }
        roster.shuffle(rng);

        self.facilitator = roster.facilitator;
        self.participants = roster.participants;
        self.phase = LifecyclePhase::Started;
        Ok(roster.warnings)
    }

    /// Reserve the next turn number.
    ///
    /// Called once per attempted turn, before the provider is invoked, so
    /// a failed turn still consumes its number.
    pub fn begin_turn(&mut self) -> Result<u64, DomainError> {
        self.ensure_started()?;
        self.current_turn += 1;
        Ok(self.current_turn)
    }

    /// Apply a successful turn: append, count tokens, update bookkeeping.
    pub fn record_contribution(
        &mut self,
        speaker: Speaker,
        turn: u64,
        content: impl Into<String>,
        tokens: u64,
    ) -> Result<(), DomainError> {
        let round = self.current_round;
        let id = self
            .speaker(speaker)
            .map(|p| p.id().clone())
            .ok_or_else(|| DomainError::precondition("Speaker is not part of this workshop."))?;

        self.transcript
            .append(TranscriptEntry::contribution(round, turn, id.clone(), content))?;

        self.tokens_used += tokens;
        if let Some(participant) = self.speaker_mut(speaker) {
            participant.record_contribution(turn);
        }
        self.previous_speaker_id = Some(id.clone());

        if let Speaker::Participant(_) = speaker {
            self.advance_round(id);
        }
        Ok(())
    }

    fn advance_round(&mut self, id: ParticipantId) {
        if !self.round_speakers.contains(&id) {
            self.round_speakers.push(id);
        }
        let complete = self
            .participants
            .iter()
            .all(|p| self.round_speakers.contains(p.id()));
        if complete {
            self.current_round += 1;
            self.round_speakers.clear();
        }
    }

    /// Count tokens spent on calls that produce no transcript entry.
    pub fn add_tokens(&mut self, tokens: u64) {
        self.tokens_used += tokens;
    }

    pub fn set_context_length(&mut self, length: u64) {
        self.context_length = length;
    }

    /// `Started → Ending`, appending a closing notice.
    ///
    /// Returns `Ok(false)` when the workshop has already ended.
    pub fn close(&mut self, note: &str) -> Result<bool, DomainError> {
        match self.phase {
            LifecyclePhase::Ending => return Ok(false),
            LifecyclePhase::NotStarted => {
                return Err(DomainError::precondition(
                    "Workshop hasn't started. Use /start to begin the workshop.",
                ));
            }
            LifecyclePhase::Started => {}
        }
        let turn = self.current_turn + 1;
        self.transcript
            .append(TranscriptEntry::notice(self.current_round, turn, note))?;
        self.current_turn = turn;
        self.phase = LifecyclePhase::Ending;
        Ok(true)
    }

    pub fn ensure_started(&self) -> Result<(), DomainError> {
        match self.phase {
            LifecyclePhase::Started => Ok(()),
            LifecyclePhase::NotStarted => Err(DomainError::precondition(
                "Workshop hasn't started. Use /start to begin the workshop.",
            )),
            LifecyclePhase::Ending => Err(DomainError::precondition(
                "Workshop has ended. No further turns can be taken.",
            )),
        }
    }

    // ==================== Persistence ====================

    /// Capture the state for persistence.
    ///
    /// `feedback` is written alongside for diagnostics but is not part of
    /// the state.
    pub fn to_snapshot(&self, feedback: &[String]) -> SessionSnapshot {
        SessionSnapshot {
            transcript_content: self.transcript.entries().to_vec(),
            control_feedback: feedback.to_vec(),
            global_config: self.config.clone(),
            participants: self.participants.clone(),
            facilitator: self.facilitator.clone(),
            current_turn: self.current_turn,
            tokens_used: self.tokens_used,
            context_length: self.context_length,
            current_round: self.current_round,
            state: self.phase,
            previous_speaker_id: self.previous_speaker_id.clone(),
            round_speakers: self.round_speakers.clone(),
        }
    }

    /// Rebuild a state from a snapshot, rejecting inconsistent data.
    pub fn from_snapshot(snapshot: SessionSnapshot) -> Result<Self, DomainError> {
        let SessionSnapshot {
            transcript_content,
            control_feedback: _,
            global_config,
            participants,
            facilitator,
            current_turn,
            tokens_used,
            context_length,
            current_round,
            state,
            previous_speaker_id,
            round_speakers,
        } = snapshot;

        let mut pool_ids = HashSet::new();
        for participant in &participants {
            if !pool_ids.insert(participant.id().clone()) {
                return Err(DomainError::corrupt(format!(
                    "participant id {} appears more than once",
                    participant.id()
                )));
            }
        }

        if let Some(facilitator) = &facilitator
            && pool_ids.contains(facilitator.id())
        {
            return Err(DomainError::corrupt(format!(
                "facilitator {} is also listed as a participant",
                facilitator.id()
            )));
        }

        if state != LifecyclePhase::NotStarted && facilitator.is_none() {
            return Err(DomainError::corrupt(format!(
                "workshop is {} but has no facilitator",
                state
            )));
        }

        let known = |id: &ParticipantId| {
            pool_ids.contains(id) || facilitator.as_ref().is_some_and(|f| f.id() == id)
        };

        let transcript = Transcript::from_entries(transcript_content)
            .map_err(|e| DomainError::corrupt(format!("transcript out of order: {}", e)))?;

        for entry in transcript.entries() {
            if let Some(id) = &entry.speaker_id
                && !known(id)
            {
                return Err(DomainError::corrupt(format!(
                    "turn {} references unknown speaker {}",
                    entry.turn, id
                )));
            }
        }

        if let Some(last) = transcript.last_turn()
            && last > current_turn
        {
            return Err(DomainError::corrupt(format!(
                "transcript reaches turn {} but current turn is {}",
                last, current_turn
            )));
        }

        if let Some(previous) = &previous_speaker_id {
            let has_spoken = transcript
                .entries()
                .iter()
                .any(|e| e.speaker_id.as_ref() == Some(previous));
            if !known(previous) || !has_spoken {
                return Err(DomainError::corrupt(format!(
                    "previous speaker {} is unknown or never spoke",
                    previous
                )));
            }
        }

        if let Some(stray) = round_speakers.iter().find(|id| !pool_ids.contains(*id)) {
            return Err(DomainError::corrupt(format!(
                "round bookkeeping references unknown participant {}",
                stray
            )));
        }

        if current_round < FIRST_ROUND {
            return Err(DomainError::corrupt("current round must be at least 1"));
        }

        Ok(Self {
            config: global_config,
            participants,
            facilitator,
            transcript,
            phase: state,
            previous_speaker_id,
            current_turn,
            current_round,
            round_speakers,
            tokens_used,
            context_length,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParticipantSpec;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn config(names: &[&str]) -> WorkshopConfig {
        let mut config = WorkshopConfig::default();
        config.workshop.name = Some("Retro".into());
        config.participants = names
            .iter()
            .map(|n| ParticipantSpec::new(*n, "Member"))
            .collect();
        config
    }

    fn started(names: &[&str]) -> SessionState {
        let mut state = SessionState::with_config(config(names));
        state.begin(&mut StdRng::seed_from_u64(9)).unwrap();
        state
    }

    #[test]
    fn test_begin_requires_name() {
        let mut cfg = config(&["Host", "Ann"]);
        cfg.workshop.name = None;
        let mut state = SessionState::with_config(cfg);
        let before = state.clone();

        let err = state.begin(&mut StdRng::seed_from_u64(1)).unwrap_err();

        assert!(matches!(err, DomainError::Precondition(_)));
        assert_eq!(state, before);
        assert_eq!(state.phase(), LifecyclePhase::NotStarted);
    }

    #[test]
    fn test_begin_requires_participants_after_extraction() {
        let mut state = SessionState::with_config(config(&["Host"]));
        let err = state.begin(&mut StdRng::seed_from_u64(1)).unwrap_err();
        assert_eq!(err, DomainError::EmptyRoster);
        assert_eq!(state.phase(), LifecyclePhase::NotStarted);
        assert!(state.facilitator().is_none());
    }

    #[test]
    fn test_begin_promotes_first_entry() {
        let mut state = SessionState::with_config(config(&["Host", "Ann", "Bob"]));
        let warnings = state.begin(&mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(state.facilitator().unwrap().display_name(), "Host");
        assert_eq!(state.participants().len(), 2);
        assert_eq!(state.phase(), LifecyclePhase::Started);
    }

    #[test]
    fn test_begin_twice_is_precondition() {
        let mut state = started(&["Host", "Ann"]);
        assert!(matches!(
            state.begin(&mut StdRng::seed_from_u64(1)),
            Err(DomainError::Precondition(_))
        ));
    }

    #[test]
    fn test_begin_turn_requires_started() {
        let mut state = SessionState::with_config(config(&["Host", "Ann"]));
        assert!(state.begin_turn().is_err());
        assert_eq!(state.current_turn(), 0);
    }

    #[test]
    fn test_record_contribution_updates_bookkeeping() {
        let mut state = started(&["Host", "Ann", "Bob"]);
        let turn = state.begin_turn().unwrap();
        state
            .record_contribution(Speaker::Participant(0), turn, "Hello", 12)
            .unwrap();

        let speaker = &state.participants()[0];
        assert_eq!(speaker.contribution_count(), 1);
        assert_eq!(speaker.last_spoke_turn(), 1);
        assert_eq!(state.tokens_used(), 12);
        assert_eq!(state.previous_speaker_id(), Some(speaker.id()));
        assert_eq!(state.transcript().entries()[0].turn, 1);
    }

    #[test]
    fn test_round_advances_after_everyone_spoke() {
        let mut state = started(&["Host", "Ann", "Bob"]);

        let t = state.begin_turn().unwrap();
        state.record_contribution(Speaker::Facilitator, t, "Welcome", 0).unwrap();
        assert_eq!(state.current_round(), 1);

        let t = state.begin_turn().unwrap();
        state.record_contribution(Speaker::Participant(0), t, "a", 0).unwrap();
        let t = state.begin_turn().unwrap();
        state.record_contribution(Speaker::Participant(0), t, "again", 0).unwrap();
        assert_eq!(state.current_round(), 1);

        let t = state.begin_turn().unwrap();
        state.record_contribution(Speaker::Participant(1), t, "b", 0).unwrap();
        assert_eq!(state.current_round(), 2);

        let rounds: Vec<u64> = state.transcript().entries().iter().map(|e| e.round).collect();
        assert_eq!(rounds, vec![1, 1, 1, 1]);
    }

    #[test]
    fn test_failed_turn_keeps_number_consumed() {
        let mut state = started(&["Host", "Ann"]);
        let first = state.begin_turn().unwrap();
        // provider failed: nothing recorded
        let second = state.begin_turn().unwrap();
        state
            .record_contribution(Speaker::Participant(0), second, "hi", 1)
            .unwrap();
        assert_eq!(first, 1);
        assert_eq!(state.transcript().entries()[0].turn, 2);
        assert_eq!(state.current_turn(), 2);
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut state = started(&["Host", "Ann"]);
        assert!(state.close("Workshop session ended.").unwrap());
        let after_first = state.clone();
        assert!(!state.close("Workshop session ended.").unwrap());
        assert_eq!(state, after_first);
        assert_eq!(state.phase(), LifecyclePhase::Ending);
        assert_eq!(state.transcript().len(), 1);
        assert!(state.begin_turn().is_err());
    }

    #[test]
    fn test_close_before_start_is_rejected() {
        let mut state = SessionState::with_config(config(&["Host", "Ann"]));
        assert!(state.close("bye").is_err());
    }

    #[test]
    fn test_render_marks_facilitator() {
        let mut state = started(&["Host", "Ann"]);
        let t = state.begin_turn().unwrap();
        state.record_contribution(Speaker::Facilitator, t, "Welcome", 0).unwrap();
        let t = state.begin_turn().unwrap();
        state.record_contribution(Speaker::Participant(0), t, "Hi", 0).unwrap();

        assert_eq!(state.render_transcript(), vec!["Host (F): Welcome", "Ann: Hi"]);
        assert_eq!(state.render_transcript_tail(1), vec!["Ann: Hi"]);
    }

    #[test]
    fn test_merge_config_rejects_invalid_fragment() {
        let mut state = SessionState::with_config(config(&["Host", "Ann"]));
        let before = state.clone();
        let err = state.merge_config(config(&["ann"])).unwrap_err();
        assert!(matches!(err, DomainError::InvalidConfig(_)));
        assert_eq!(state, before);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut state = started(&["Host", "Ann", "Bob"]);
        let t = state.begin_turn().unwrap();
        state.record_contribution(Speaker::Facilitator, t, "Welcome", 5).unwrap();
        let _failed = state.begin_turn().unwrap();
        let t = state.begin_turn().unwrap();
        state.record_contribution(Speaker::Participant(1), t, "Hi", 7).unwrap();
        state.set_context_length(420);

        let snapshot = state.to_snapshot(&["note".to_string()]);
        let json = serde_json::to_string(&snapshot).unwrap();
        let restored =
            SessionState::from_snapshot(serde_json::from_str(&json).unwrap()).unwrap();

        assert_eq!(restored, state);
    }

    #[test]
    fn test_snapshot_unknown_speaker_is_corrupt() {
        let mut state = started(&["Host", "Ann"]);
        let t = state.begin_turn().unwrap();
        state.record_contribution(Speaker::Facilitator, t, "Welcome", 0).unwrap();

        let mut snapshot = state.to_snapshot(&[]);
        snapshot.facilitator = Some(Participant::new("Impostor", "Host", ""));
        snapshot.previous_speaker_id = None;

        assert!(matches!(
            SessionState::from_snapshot(snapshot),
            Err(DomainError::CorruptState(_))
        ));
    }

    #[test]
    fn test_snapshot_facilitator_in_pool_is_corrupt() {
        let state = started(&["Host", "Ann"]);
        let mut snapshot = state.to_snapshot(&[]);
        let facilitator = snapshot.facilitator.clone().unwrap();
        snapshot.participants.push(facilitator);
        assert!(matches!(
            SessionState::from_snapshot(snapshot),
            Err(DomainError::CorruptState(_))
        ));
    }

    #[test]
    fn test_snapshot_started_without_facilitator_is_corrupt() {
        let state = started(&["Host", "Ann"]);
        let mut snapshot = state.to_snapshot(&[]);
        snapshot.facilitator = None;
        assert!(matches!(
            SessionState::from_snapshot(snapshot),
            Err(DomainError::CorruptState(_))
        ));
    }

    #[test]
    fn test_snapshot_turn_beyond_counter_is_corrupt() {
        let mut state = started(&["Host", "Ann"]);
        let t = state.begin_turn().unwrap();
        state.record_contribution(Speaker::Facilitator, t, "Welcome", 0).unwrap();
        let mut snapshot = state.to_snapshot(&[]);
        snapshot.current_turn = 0;
        assert!(SessionState::from_snapshot(snapshot).is_err());
    }
}
