//! Selection policy
//!
//! Pure functions over the participant pool. The provider-assisted mode
//! needs an inference call, which the engine performs before handing the
//! reply to [`SelectionPolicy::resolve_suggestion`].

use super::parsing::parse_next_speaker;
use crate::core::error::DomainError;
use crate::participant::entities::Participant;
use crate::participant::value_objects::ParticipantId;
use rand::Rng;
use thiserror::Error;

/// How the next speaker is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionMode {
    /// Uniform choice among everyone except the previous speaker.
    Random,
    /// First participant (roster order) whose name starts with the query.
    ByName(String),
    /// Ask the provider, validate, fall back to [`SelectionMode::Random`].
    ProviderAssisted,
}

impl SelectionMode {
    /// Interpret the optional `next` argument: absent, `?`, or a name prefix.
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg.map(str::trim) {
            None | Some("") => SelectionMode::Random,
            Some("?") => SelectionMode::ProviderAssisted,
            Some(name) => SelectionMode::ByName(name.to_string()),
        }
    }
}

/// Why a provider suggestion could not be used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SuggestionRejection {
    #[error("reply did not contain 'Next speaker: <name>'")]
    Unparseable,

    #[error("'{0}' is not a participant")]
    UnknownName(String),

    #[error("'{0}' spoke last")]
    RepeatsPrevious(String),

    #[error("'{0}' is the facilitator")]
    NamesFacilitator(String),
}

/// Speaker selection rules
pub struct SelectionPolicy;

impl SelectionPolicy {
    /// Pick uniformly among participants other than `previous`.
    ///
    /// Falls back to the whole pool when excluding the previous speaker
    /// leaves nobody. Returns `None` only for an empty pool.
    pub fn random_excluding<R: Rng + ?Sized>(
        participants: &[Participant],
        previous: Option<&ParticipantId>,
        rng: &mut R,
    ) -> Option<usize> {
        if participants.is_empty() {
            return None;
        }

        let eligible: Vec<usize> = participants
            .iter()
            .enumerate()
            .filter(|(_, p)| Some(p.id()) != previous)
            .map(|(i, _)| i)
            .collect();

        if eligible.is_empty() {
            return Some(rng.random_range(0..participants.len()));
        }
        Some(eligible[rng.random_range(0..eligible.len())])
    }

    /// First participant in roster order whose name starts with `query`.
    pub fn by_name_prefix(participants: &[Participant], query: &str) -> Result<usize, DomainError> {
        let query = query.trim();
        if !query.is_empty()
            && let Some(index) = participants.iter().position(|p| p.name_starts_with(query))
        {
            return Ok(index);
        }
        Err(DomainError::Selection {
            query: query.to_string(),
        })
    }

    /// Validate a provider reply against the hard constraints.
    ///
    /// The suggested name must parse, must not name the facilitator, must
    /// resolve to a participant in the pool and must not be the previous
    /// speaker.
    pub fn resolve_suggestion(
        participants: &[Participant],
        reply: &str,
        previous: Option<&ParticipantId>,
        facilitator: Option<&Participant>,
    ) -> Result<usize, SuggestionRejection> {
        let name = parse_next_speaker(reply).ok_or(SuggestionRejection::Unparseable)?;
        if let Some(facilitator) = facilitator
            && name.trim().eq_ignore_ascii_case(facilitator.display_name().trim())
        {
            return Err(SuggestionRejection::NamesFacilitator(
                facilitator.display_name().to_string(),
            ));
        }
        let index = Self::by_name_prefix(participants, &name)
            .map_err(|_| SuggestionRejection::UnknownName(name.clone()))?;
        if Some(participants[index].id()) == previous {
            return Err(SuggestionRejection::RepeatsPrevious(
                participants[index].display_name().to_string(),
            ));
        }
        Ok(index)
    }
}
