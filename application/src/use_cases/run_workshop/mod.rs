//! Run Workshop use case
//!
//! [`WorkshopEngine`] owns one [`SessionState`] and drives it through the
//! lifecycle: configuration loading, the opening facilitator turn, turn
//! advancement, persistence and the closing record.
//!
//! Every state mutation happens synchronously before or after the single
//! provider `.await` of an operation. Dropping an in-flight operation
//! (e.g. on Ctrl-C) therefore leaves the state consistent: the attempted
//! turn number is consumed and nothing else has changed.
//!
//! # Module Structure
//!
//! - `command` - line parsing into [`Command`]
//! - `dispatch` - command execution and error-to-message conversion
//! - `turn` - turn execution, provider policy, compliance check
//! - `selection` - next-speaker choice
//! - `types` - errors and outcomes

mod command;
mod dispatch;
mod selection;
mod turn;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use command::{Command, CommandParseError, UtilAction};
pub use types::{DispatchOutcome, WorkshopError};

use crate::config::EngineOptions;
use crate::ports::config_source::{ConfigError, ConfigSource};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::inference_provider::InferenceProvider;
use crate::ports::progress::{NoTurnObserver, TurnObserver};
use crate::ports::snapshot_store::{ArtifactSink, SnapshotStore};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};
use types::TurnKind;
use workshop_domain::{DomainError, LifecyclePhase, SessionState, Speaker};

const CLOSING_NOTE: &str = "Workshop session ended.";
const DEFAULT_OPENING: &str = "Welcome everyone and open the workshop.";
/// Oldest feedback lines are dropped past this many.
const FEEDBACK_LIMIT: usize = 100;

/// Use case for running a workshop session
pub struct WorkshopEngine<P: InferenceProvider + 'static> {
    provider: Arc<P>,
    config_source: Arc<dyn ConfigSource>,
    snapshots: Arc<dyn SnapshotStore>,
    artifacts: Arc<dyn ArtifactSink>,
    logger: Arc<dyn ConversationLogger>,
    observer: Arc<dyn TurnObserver>,
    options: EngineOptions,
    rng: Box<dyn RngCore + Send>,
    state: SessionState,
    /// Control messages for the front end, oldest first.
    feedback: Vec<String>,
}

impl<P: InferenceProvider + 'static> WorkshopEngine<P> {
    pub fn new(
        provider: Arc<P>,
        config_source: Arc<dyn ConfigSource>,
        snapshots: Arc<dyn SnapshotStore>,
        artifacts: Arc<dyn ArtifactSink>,
    ) -> Self {
        Self {
            provider,
            config_source,
            snapshots,
            artifacts,
            logger: Arc::new(NoConversationLogger),
            observer: Arc::new(NoTurnObserver),
            options: EngineOptions::default(),
            rng: Box::new(StdRng::from_os_rng()),
            state: SessionState::new(),
            feedback: Vec::new(),
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn TurnObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Replace the random source used for shuffling and selection.
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(StdRng::seed_from_u64(seed))
    }

    // ==================== Accessors ====================

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn feedback(&self) -> &[String] {
        &self.feedback
    }

    /// The most recent `n` control messages, oldest first.
    pub fn feedback_tail(&self, n: usize) -> &[String] {
        let start = self.feedback.len().saturating_sub(n);
        &self.feedback[start..]
    }

    fn notify(&mut self, message: impl Into<String>) {
        self.feedback.push(message.into());
        if self.feedback.len() > FEEDBACK_LIMIT {
            let excess = self.feedback.len() - FEEDBACK_LIMIT;
            self.feedback.drain(..excess);
        }
    }

    fn log_lifecycle(&self, event: &str) {
        self.logger.log(ConversationEvent::new(
            "lifecycle",
            json!({
                "event": event,
                "phase": self.state.phase().as_str(),
                "turn": self.state.current_turn(),
                "round": self.state.current_round(),
            }),
        ));
    }

    // ==================== Configuration ====================

    /// Merge a configuration file into the session configuration.
    ///
    /// Only allowed before the workshop starts, since the roster is fixed
    /// at start. On failure the configuration is unchanged.
    pub fn load(&mut self, path: &Path) -> Result<(), WorkshopError> {
        if self.state.phase() != LifecyclePhase::NotStarted {
            return Err(DomainError::precondition(
                "Configuration can only be loaded before the workshop starts.",
            )
            .into());
        }

        let fragment = self.config_source.load(path)?;
        let issues = self
            .state
            .merge_config(fragment)
            .map_err(|e| match e {
                DomainError::InvalidConfig(message) => WorkshopError::Config(ConfigError::Invalid {
                    path: path.to_path_buf(),
                    message,
                }),
                other => other.into(),
            })?;

        for issue in issues {
            warn!("{}: {}", path.display(), issue.message);
            self.notify(format!("Warning: {}", issue.message));
        }

        info!("Loaded configuration from {}", path.display());
        self.notify(format!("Configuration loaded from {}.", path.display()));
        Ok(())
    }

    /// Report the current configuration as pretty JSON.
    pub fn show(&mut self) -> String {
        let rendered = serde_json::to_string_pretty(self.state.config())
            .unwrap_or_else(|e| format!("Configuration cannot be displayed: {}", e));
        self.notify(rendered.clone());
        rendered
    }

    // ==================== Lifecycle ====================

    /// `NotStarted → Started`, followed by the opening facilitator turn.
    ///
    /// `opening` falls back to a prompt built from the workshop details.
    /// Starting a running workshop only reports its status.
    pub async fn start(&mut self, opening: Option<&str>) -> Result<(), WorkshopError> {
        if self.state.phase() == LifecyclePhase::Started {
            self.notify("Workshop is already in progress.");
            return Ok(());
        }

        let warnings = self.state.begin(&mut *self.rng)?;
        for warning in warnings {
            warn!("{}", warning);
            self.notify(warning);
        }

        let name = self.state.config().workshop.name().unwrap_or_default().to_string();
        let facilitator = self
            .state
            .facilitator()
            .map(|f| f.display_name().to_string())
            .unwrap_or_default();
        let participants: Vec<&str> = self
            .state
            .participants()
            .iter()
            .map(|p| p.display_name())
            .collect();
        info!(
            "Starting workshop '{}' with facilitator {} and {} participants",
            name,
            facilitator,
            participants.len()
        );
        let notice = format!(
            "Workshop '{}' started. Facilitator: {}. Participants: {}.",
            name,
            facilitator,
            participants.join(", ")
        );
        self.notify(notice);
        self.log_lifecycle("started");

        let opening = match opening.map(str::trim).filter(|o| !o.is_empty()) {
            Some(text) => text.to_string(),
            None => self.default_opening(),
        };
        self.take_turn(Speaker::Facilitator, TurnKind::Opening(&opening))
            .await
    }

    fn default_opening(&self) -> String {
        let summary = self.state.config().workshop.summary();
        if summary.is_empty() {
            DEFAULT_OPENING.to_string()
        } else {
            summary
        }
    }

    /// The facilitator delivers `text` in their own voice as one turn.
    pub async fn say(&mut self, text: &str) -> Result<(), WorkshopError> {
        self.state.ensure_started()?;
        self.take_turn(Speaker::Facilitator, TurnKind::Say(text))
            .await
    }

    /// `Started → Ending`, appending the closing record.
    pub fn end(&mut self) -> Result<(), WorkshopError> {
        if self.state.close(CLOSING_NOTE)? {
            info!("Workshop ended at turn {}", self.state.current_turn());
            self.notify("Workshop ended.");
            self.log_lifecycle("ended");
        } else {
            self.notify("Workshop has already ended.");
        }
        Ok(())
    }

    // ==================== Persistence ====================

    /// Persist the session to `path`.
    pub fn backup(&mut self, path: &Path) -> Result<(), WorkshopError> {
        let snapshot = self.state.to_snapshot(&self.feedback);
        self.snapshots.save(path, &snapshot)?;
        info!("Session saved to {}", path.display());
        self.notify(format!("Session saved to {}.", path.display()));
        Ok(())
    }

    /// Replace the session with the snapshot stored at `path`.
    ///
    /// The current session is kept when the snapshot cannot be read or is
    /// inconsistent.
    pub fn restore(&mut self, path: &Path) -> Result<(), WorkshopError> {
        let snapshot = self.snapshots.load(path)?;
        let state = SessionState::from_snapshot(snapshot).inspect_err(|e| {
            warn!("Rejected snapshot {}: {}", path.display(), e);
        })?;
        self.state = state;

        info!("Session restored from {}", path.display());
        let notice = format!(
            "Session restored from {} (turn {}, {}).",
            path.display(),
            self.state.current_turn(),
            self.state.phase()
        );
        self.notify(notice);
        self.log_lifecycle("restored");
        Ok(())
    }

    /// Write the final snapshot and ask the front end to terminate.
    ///
    /// A failed backup does not prevent exiting.
    pub fn exit(&mut self) -> DispatchOutcome {
        let path = self.options.exit_backup_path.clone();
        self.log_lifecycle("exit");
        match self.backup(&path) {
            Ok(()) => DispatchOutcome::Exit { backup_error: None },
            Err(e) => {
                error!("Failed to write final backup to {}: {}", path.display(), e);
                let message = format!("FAILED to save session to {}: {}", path.display(), e);
                self.notify(message.clone());
                DispatchOutcome::Exit {
                    backup_error: Some(message),
                }
            }
        }
    }

    /// Save the session to the recovery path after an interrupted command.
    pub fn write_recovery(&mut self) -> Result<PathBuf, WorkshopError> {
        let path = self.options.recovery_backup_path.clone();
        self.log_lifecycle("interrupted");
        self.backup(&path)?;
        Ok(path)
    }
}
