//! Turn execution
//!
//! One turn: resolve the speaker, build the prompt from the transcript,
//! reserve the turn number, call the provider, then record the result.

use super::WorkshopEngine;
use super::types::{TurnKind, WorkshopError};
use crate::ports::conversation_logger::ConversationEvent;
use crate::ports::inference_provider::{Generation, InferenceProvider, ProviderError};
use serde_json::json;
use tracing::{debug, info, warn};
use workshop_domain::core::string::{single_line, truncate};
use workshop_domain::{
    ComplianceVerdict, DomainError, PromptTemplate, Speaker, parse_compliance_verdict,
};

impl<P: InferenceProvider + 'static> WorkshopEngine<P> {
    pub(super) async fn take_turn(
        &mut self,
        speaker: Speaker,
        kind: TurnKind<'_>,
    ) -> Result<(), WorkshopError> {
        let (Some(participant), Some(context)) =
            (self.state.speaker(speaker), self.state.turn_context(speaker))
        else {
            return Err(DomainError::precondition("Speaker is not part of this workshop.").into());
        };
        let name = participant.display_name().to_string();
        let system = participant.system_message();

        let prompt = match kind {
            TurnKind::Opening(opening) => PromptTemplate::facilitator_turn(&context, Some(opening)),
            TurnKind::Say(text) => PromptTemplate::facilitator_say(&context, text),
            TurnKind::Contribution => PromptTemplate::participant_turn(&context),
        };

        // The turn number is consumed even if the provider fails below.
        let turn = self.state.begin_turn()?;
        self.state.set_context_length(prompt.chars().count() as u64);

        info!("Turn {}: {} is speaking", turn, name);
        self.observer.on_turn_start(&name, turn);
        let result = self.generate(&prompt, &system).await.and_then(non_empty);
        self.observer.on_turn_complete(&name, turn, result.is_ok());

        let generation = match result {
            Ok(generation) => generation,
            Err(e) => {
                warn!("Turn {} ({}) failed: {}", turn, name, e);
                self.logger.log(ConversationEvent::new(
                    "turn_failed",
                    json!({ "turn": turn, "speaker": name, "error": e.to_string() }),
                ));
                return Err(WorkshopError::TurnFailed {
                    turn,
                    speaker: name,
                    source: e,
                });
            }
        };

        let content = generation.content.trim().to_string();
        self.state
            .record_contribution(speaker, turn, content.clone(), generation.tokens_used)?;
        debug!(
            "Turn {} recorded ({} tokens, round {}): {}",
            turn,
            generation.tokens_used,
            self.state.current_round(),
            truncate(&single_line(&content), 80)
        );
        self.logger.log(ConversationEvent::new(
            "turn",
            json!({
                "turn": turn,
                "round": self.state.transcript().entries().last().map(|e| e.round),
                "speaker": name,
                "content": content,
                "tokens_used": generation.tokens_used,
                "prompt_chars": self.state.context_length(),
            }),
        ));

        if self.options.compliance_check {
            self.review_compliance(speaker, turn, &content).await;
        }
        Ok(())
    }

    /// Advisory persona-compliance check over a recorded contribution.
    ///
    /// The verdict is reported and logged only; the transcript entry stays
    /// as it is. Checker failures count as `FAIL`.
    async fn review_compliance(&mut self, speaker: Speaker, turn: u64, content: &str) {
        let Some(participant) = self.state.speaker(speaker) else {
            return;
        };
        let name = participant.display_name().to_string();
        let prompt = PromptTemplate::compliance(&participant.bio(true), content);

        self.observer.on_auxiliary_call("compliance");
        let reply = self
            .generate(&prompt, PromptTemplate::compliance_system())
            .await;
        self.observer.on_auxiliary_complete("compliance");

        let verdict = match reply {
            Ok(generation) => {
                self.state.add_tokens(generation.tokens_used);
                parse_compliance_verdict(&generation.content)
            }
            Err(e) => ComplianceVerdict::Fail(format!("checker unavailable: {}", e)),
        };

        let message = match &verdict {
            ComplianceVerdict::Pass => verdict.tag(&format!("{} (turn {}) stayed in persona", name, turn)),
            ComplianceVerdict::Fail(reason) => {
                verdict.tag(&format!("{} (turn {}): {}", name, turn, reason))
            }
        };
        if verdict.is_pass() {
            debug!("{}", message);
        } else {
            warn!("{}", message);
        }

        self.logger.log(ConversationEvent::new(
            "compliance",
            json!({ "turn": turn, "speaker": name, "verdict": verdict.label(), "message": message }),
        ));
        self.notify(message);
    }

    /// One provider call under the configured timeout and retry policy.
    pub(super) async fn generate(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<Generation, ProviderError> {
        let mut attempt = 0;
        loop {
            let call = self.provider.generate(prompt, system);
            let result = match self.options.provider_timeout {
                Some(limit) => tokio::time::timeout(limit, call)
                    .await
                    .unwrap_or(Err(ProviderError::Timeout(limit))),
                None => call.await,
            };

            match result {
                Err(e) if e.is_retryable() && attempt < self.options.provider_retries => {
                    attempt += 1;
                    warn!(
                        "Provider call failed ({}), retrying ({}/{})",
                        e, attempt, self.options.provider_retries
                    );
                }
                other => return other,
            }
        }
    }
}

fn non_empty(generation: Generation) -> Result<Generation, ProviderError> {
    if generation.content.trim().is_empty() {
        Err(ProviderError::MalformedResponse(
            "provider returned an empty completion".to_string(),
        ))
    } else {
        Ok(generation)
    }
}
