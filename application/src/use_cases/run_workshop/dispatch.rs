//! Command dispatch
//!
//! The contract any front end drives: one line in, one outcome out.
//! Errors never escape; they become control messages.

use super::WorkshopEngine;
use super::command::{Command, UtilAction};
use super::types::{DispatchOutcome, WorkshopError};
use crate::ports::conversation_logger::ConversationEvent;
use crate::ports::inference_provider::InferenceProvider;
use serde_json::json;
use tracing::{debug, info, warn};
use workshop_domain::{DomainError, PromptTemplate};

impl<P: InferenceProvider + 'static> WorkshopEngine<P> {
    /// Parse and execute one input line.
    pub async fn dispatch(&mut self, line: &str) -> DispatchOutcome {
        let line = line.trim();
        if line.is_empty() {
            return DispatchOutcome::Continue;
        }

        match Command::parse(line) {
            Ok(command) => self.dispatch_command(command).await,
            Err(e) => {
                debug!("Rejected input {:?}: {}", line, e);
                self.notify(e.to_string());
                DispatchOutcome::Continue
            }
        }
    }

    /// Execute a parsed command, reporting failures as control messages.
    pub async fn dispatch_command(&mut self, command: Command) -> DispatchOutcome {
        debug!("Dispatching {:?}", command);
        match self.execute(command).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(kind = e.kind(), "{}", e);
                self.notify(format!("Error: {}", e));
                DispatchOutcome::Continue
            }
        }
    }

    async fn execute(&mut self, command: Command) -> Result<DispatchOutcome, WorkshopError> {
        match command {
            Command::Load(path) => self.load(&path)?,
            Command::Show => {
                self.show();
            }
            Command::Start(opening) => self.start(opening.as_deref()).await?,
            Command::Say(text) => self.say(&text).await?,
            Command::Next { count, mode } => self.next(count, mode).await?,
            Command::Util(UtilAction::Summarize) => self.summarize().await?,
            Command::Backup(path) => self.backup(&path)?,
            Command::Restore(path) => self.restore(&path)?,
            Command::End => self.end()?,
            Command::Help => self.notify(Command::help_text()),
            Command::Exit => return Ok(self.exit()),
        }
        Ok(DispatchOutcome::Continue)
    }

    /// Compress the transcript through the provider and write the result
    /// to the summary path.
    pub async fn summarize(&mut self) -> Result<(), WorkshopError> {
        let lines = self.state.render_transcript();
        if lines.is_empty() {
            return Err(DomainError::precondition("Nothing to summarize yet.").into());
        }

        self.observer.on_auxiliary_call("summary");
        let result = self
            .generate(&PromptTemplate::summarize(&lines), PromptTemplate::summarize_system())
            .await;
        self.observer.on_auxiliary_complete("summary");
        let generation = result?;
        self.state.add_tokens(generation.tokens_used);

        let path = self.options.summary_path.clone();
        self.artifacts.write(&path, generation.content.trim())?;

        info!("Summary of {} lines written to {}", lines.len(), path.display());
        self.logger.log(ConversationEvent::new(
            "summary",
            json!({
                "path": path.display().to_string(),
                "lines": lines.len(),
                "tokens_used": generation.tokens_used,
            }),
        ));
        self.notify(format!("Summary written to {}.", path.display()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;

    #[tokio::test]
    async fn test_malformed_input_becomes_message() {
        let (mut engine, _h) = engine_with(workshop(&["Host", "Ann"]), ScriptedProvider::new());

        assert_eq!(engine.dispatch("hello there").await, DispatchOutcome::Continue);
        assert_eq!(engine.dispatch("/frobnicate").await, DispatchOutcome::Continue);
        assert_eq!(engine.dispatch("/next 0").await, DispatchOutcome::Continue);
        assert_eq!(engine.dispatch("   ").await, DispatchOutcome::Continue);

        let tail = engine.feedback_tail(3);
        assert!(tail[0].starts_with("Commands start with '/'"));
        assert!(tail[1].starts_with("Unknown command '/frobnicate'"));
        assert!(tail[2].starts_with("Usage: /next"));
    }

    #[tokio::test]
    async fn test_errors_become_messages() {
        let (mut engine, _h) = engine_with(workshop(&["Host", "Ann"]), ScriptedProvider::new());

        let outcome = engine.dispatch("/next").await;

        assert_eq!(outcome, DispatchOutcome::Continue);
        assert!(
            engine
                .feedback()
                .last()
                .unwrap()
                .contains("Workshop hasn't started. Use /start to begin the workshop.")
        );
    }

    #[tokio::test]
    async fn test_full_session_through_dispatch() {
        let (mut engine, handles) = engine_with(Default::default(), ScriptedProvider::new());
        handles.configs.insert("retro.yaml", workshop(&["Host", "Ann", "Bob"]));

        for line in [
            "/load retro.yaml",
            "/start Celebrate the release",
            "/next 2",
            "/next bo",
            "/say Time to wrap up",
            "/util summarize",
            "/end",
            "/backup session.json",
        ] {
            assert_eq!(engine.dispatch(line).await, DispatchOutcome::Continue, "{line}");
        }

        assert_eq!(engine.state().current_turn(), 6);
        assert_eq!(engine.state().transcript().len(), 6);
        assert!(handles.artifacts.get("summary.txt").is_some());
        assert!(handles.snapshots.contains("session.json"));
        assert_eq!(engine.dispatch("/exit").await, DispatchOutcome::Exit { backup_error: None });
    }

    #[tokio::test]
    async fn test_summarize_writes_artifact() {
        let provider = ScriptedProvider::new()
            .reply("Welcome", 2)
            .reply("Compressed notes", 5);
        let (mut engine, handles) = started_engine(&["Host", "Ann"], provider).await;

        engine.dispatch("/util summerize").await;

        assert_eq!(handles.artifacts.get("summary.txt").as_deref(), Some("Compressed notes"));
        assert_eq!(engine.state().tokens_used(), 7);
        assert_eq!(engine.state().current_turn(), 1);
        let (prompt, _) = handles.provider.calls().pop().unwrap();
        assert!(prompt.contains("Host (F): Welcome"));
    }

    #[tokio::test]
    async fn test_summarize_empty_transcript() {
        let (mut engine, handles) = engine_with(workshop(&["Host", "Ann"]), ScriptedProvider::new());
        engine.dispatch("/util summarize").await;
        assert!(engine.feedback().last().unwrap().contains("Nothing to summarize"));
        assert!(handles.provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_help_lists_commands() {
        let (mut engine, _h) = engine_with(Default::default(), ScriptedProvider::new());
        engine.dispatch("/help").await;
        let help = engine.feedback().last().unwrap();
        for command in ["/load", "/start", "/say", "/next", "/util", "/backup", "/restore", "/end", "/exit"] {
            assert!(help.contains(command), "{command}");
        }
    }
}
