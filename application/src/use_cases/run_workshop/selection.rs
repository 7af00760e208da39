//! Next-speaker selection
//!
//! Applies [`SelectionPolicy`] for `next`. Provider-assisted selection
//! costs one extra provider call, which does not consume a turn number.

use super::WorkshopEngine;
use super::types::{TurnKind, WorkshopError};
use crate::ports::conversation_logger::ConversationEvent;
use crate::ports::inference_provider::InferenceProvider;
use serde_json::json;
use tracing::{info, warn};
use workshop_domain::{DomainError, PromptTemplate, SelectionMode, SelectionPolicy, Speaker};

impl<P: InferenceProvider + 'static> WorkshopEngine<P> {
    /// Advance `count` participant turns.
    ///
    /// Stops at the first failed turn; the turns already taken are kept.
    pub async fn next(&mut self, count: usize, mode: SelectionMode) -> Result<(), WorkshopError> {
        self.state.ensure_started()?;
        for _ in 0..count {
            let index = self.choose_speaker(&mode).await?;
            self.take_turn(Speaker::Participant(index), TurnKind::Contribution)
                .await?;
        }
        Ok(())
    }

    async fn choose_speaker(&mut self, mode: &SelectionMode) -> Result<usize, WorkshopError> {
        let (index, method) = match mode {
            SelectionMode::Random => (self.random_speaker()?, "random"),
            SelectionMode::ByName(query) => (
                SelectionPolicy::by_name_prefix(self.state.participants(), query)?,
                "by_name",
            ),
            SelectionMode::ProviderAssisted => self.suggested_speaker().await?,
        };

        let name = self.state.participants()[index].display_name().to_string();
        info!("Selected {} ({})", name, method);
        self.logger.log(ConversationEvent::new(
            "selection",
            json!({
                "turn": self.state.current_turn() + 1,
                "speaker": name,
                "method": method,
            }),
        ));
        Ok(index)
    }

    fn random_speaker(&mut self) -> Result<usize, WorkshopError> {
        SelectionPolicy::random_excluding(
            self.state.participants(),
            self.state.previous_speaker_id(),
            &mut *self.rng,
        )
        .ok_or_else(|| DomainError::EmptyRoster.into())
    }

    /// Ask the provider, validate the reply, fall back to random.
    async fn suggested_speaker(&mut self) -> Result<(usize, &'static str), WorkshopError> {
        let state = &self.state;
        let candidates: Vec<String> = state
            .participants()
            .iter()
            .map(|p| p.display_name().to_string())
            .collect();
        let previous = state
            .previous_speaker_id()
            .and_then(|id| state.find(id))
            .map(|p| p.display_name().to_string());
        let facilitator = state.facilitator().map(|f| f.display_name().to_string());
        let prompt = PromptTemplate::next_speaker(
            &state.config().prompt_context(),
            &state.render_transcript(),
            &candidates,
            previous.as_deref(),
            facilitator.as_deref(),
        );

        self.observer.on_auxiliary_call("selection");
        let reply = self
            .generate(&prompt, PromptTemplate::next_speaker_system())
            .await;
        self.observer.on_auxiliary_complete("selection");

        let rejection = match reply {
            Ok(generation) => {
                self.state.add_tokens(generation.tokens_used);
                match SelectionPolicy::resolve_suggestion(
                    self.state.participants(),
                    &generation.content,
                    self.state.previous_speaker_id(),
                    self.state.facilitator(),
                ) {
                    Ok(index) => return Ok((index, "suggested")),
                    Err(rejection) => rejection.to_string(),
                }
            }
            Err(e) => e.to_string(),
        };

        warn!("Next-speaker suggestion unusable ({}), choosing randomly", rejection);
        self.notify(format!(
            "Suggestion rejected: {}. Choosing a speaker at random.",
            rejection
        ));
        Ok((self.random_speaker()?, "fallback_random"))
    }
}
