//! REPL (Read-Eval-Print Loop) for workshop sessions

use crate::ConsoleFormatter;
use crate::ProgressReporter;
use crate::ReplConfig;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use workshop_application::{ArtifactSink, DispatchOutcome, InferenceProvider, WorkshopEngine};

const HISTORY_SIZE: usize = 1000;

/// What happened to one input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    Continue,
    /// `/exit` (or end of input) was processed
    Exit,
    /// Ctrl-C arrived while the command ran; the recovery snapshot was written
    Interrupted,
}

/// Interactive workshop REPL
pub struct WorkshopRepl<P: InferenceProvider + 'static> {
    engine: WorkshopEngine<P>,
    artifacts: Arc<dyn ArtifactSink>,
    config: ReplConfig,
    progress: Option<Arc<ProgressReporter>>,
}

impl<P: InferenceProvider + 'static> WorkshopRepl<P> {
    /// Create a new WorkshopRepl
    pub fn new(
        engine: WorkshopEngine<P>,
        artifacts: Arc<dyn ArtifactSink>,
        config: ReplConfig,
    ) -> Self {
        Self {
            engine,
            artifacts,
            config,
            progress: None,
        }
    }

    /// Spinner that is also registered as the engine's turn observer
    pub fn with_progress(mut self, progress: Arc<ProgressReporter>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn engine(&self) -> &WorkshopEngine<P> {
        &self.engine
    }

    /// Run the interactive REPL until `/exit`, end of input or an interrupt
    pub async fn run(&mut self) -> std::io::Result<LineOutcome> {
        let mut line_editor = Reedline::create();

        if let Some(path) = self.config.history_path() {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            match FileBackedHistory::with_file(HISTORY_SIZE, path.clone()) {
                Ok(history) => line_editor = line_editor.with_history(Box::new(history)),
                Err(e) => warn!("History disabled ({}): {}", path.display(), e),
            }
        }

        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("workshop".to_string()),
            DefaultPromptSegment::Empty,
        );

        println!("{}", ConsoleFormatter::banner());
        println!("{}", ConsoleFormatter::status_line(self.engine.state()));

        loop {
            match line_editor.read_line(&prompt)? {
                Signal::Success(line) => {
                    let outcome = self.handle_line(&line).await;
                    if outcome != LineOutcome::Continue {
                        return Ok(outcome);
                    }
                }
                Signal::CtrlC => {
                    println!("^C (use /exit to save and quit)");
                }
                Signal::CtrlD => {
                    println!("/exit");
                    return Ok(self.handle_line("/exit").await);
                }
            }
        }
    }

    /// Dispatch one line, stopping early if Ctrl-C is pressed meanwhile
    pub async fn handle_line(&mut self, line: &str) -> LineOutcome {
        let interrupt = CancellationToken::new();
        let listener = spawn_interrupt_listener(interrupt.clone());
        let outcome = self.handle_line_until(line, &interrupt).await;
        listener.abort();
        outcome
    }

    /// Dispatch one line unless `interrupt` fires first.
    ///
    /// An interrupted command is abandoned at its provider call and the
    /// session is written to the recovery path.
    pub async fn handle_line_until(
        &mut self,
        line: &str,
        interrupt: &CancellationToken,
    ) -> LineOutcome {
        let dispatched = tokio::select! {
            biased;
            _ = interrupt.cancelled() => None,
            outcome = self.engine.dispatch(line) => Some(outcome),
        };

        let Some(outcome) = dispatched else {
            self.recover();
            return LineOutcome::Interrupted;
        };

        self.export_transcript();
        println!("{}", self.screen());

        match outcome {
            DispatchOutcome::Continue => LineOutcome::Continue,
            DispatchOutcome::Exit { backup_error } => {
                if let Some(message) = backup_error {
                    eprintln!("{}", ConsoleFormatter::backup_failure(&message));
                }
                LineOutcome::Exit
            }
        }
    }

    /// What is shown after each command: transcript tail, control tail, status
    pub fn screen(&self) -> String {
        let state = self.engine.state();
        let mut output = String::new();
        output.push_str(&ConsoleFormatter::transcript(
            &state.render_transcript_tail(self.config.transcript_tail),
        ));
        output.push_str(&ConsoleFormatter::feedback(
            self.engine.feedback_tail(self.config.feedback_tail),
        ));
        output.push('\n');
        output.push_str(&ConsoleFormatter::status_line(state));
        output
    }

    fn export_transcript(&self) {
        let content = self.engine.state().render_transcript().join("\n");
        if let Err(e) = self.artifacts.write(&self.config.transcript_path, &content) {
            warn!("Transcript export failed: {}", e);
        }
    }

    fn recover(&mut self) {
        if let Some(progress) = &self.progress {
            progress.clear();
        }
        self.export_transcript();
        match self.engine.write_recovery() {
            Ok(path) => {
                info!("Recovery snapshot written to {}", path.display());
                eprintln!("Interrupted. Session saved to {}", path.display());
            }
            Err(e) => {
                error!("Recovery snapshot failed: {}", e);
                eprintln!("{}", ConsoleFormatter::backup_failure(&e.to_string()));
            }
        }
    }
}

fn spawn_interrupt_listener(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received");
            token.cancel();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use std::time::Duration;
    use workshop_application::{
        ConfigError, ConfigSource, Generation, PersistenceError, ProviderError, SnapshotStore,
    };
    use workshop_domain::{LifecyclePhase, ParticipantSpec, SessionSnapshot, WorkshopConfig};

    /// Answers every call, or never answers when `hang` is set.
    struct FakeProvider {
        hang: bool,
    }

    #[async_trait]
    impl InferenceProvider for FakeProvider {
        async fn generate(&self, _prompt: &str, _system: &str) -> Result<Generation, ProviderError> {
            if self.hang {
                std::future::pending::<()>().await;
            }
            Ok(Generation::new("Good morning, team.", 3))
        }
    }

    struct OneWorkshop;

    impl ConfigSource for OneWorkshop {
        fn load(&self, _path: &Path) -> Result<WorkshopConfig, ConfigError> {
            let mut config = WorkshopConfig::default();
            config.workshop.name = Some("Retro".into());
            config.participants = vec![
                ParticipantSpec::new("Host", "Facilitator").as_facilitator(),
                ParticipantSpec::new("Alice", "Engineer"),
            ];
            Ok(config)
        }
    }

    #[derive(Default)]
    struct MemoryFiles {
        snapshots: Mutex<HashMap<PathBuf, SessionSnapshot>>,
        texts: Mutex<HashMap<PathBuf, String>>,
        read_only: bool,
    }

    impl SnapshotStore for MemoryFiles {
        fn save(&self, path: &Path, snapshot: &SessionSnapshot) -> Result<(), PersistenceError> {
            if self.read_only {
                return Err(PersistenceError::Io {
                    path: path.to_path_buf(),
                    message: "Read-only file system".into(),
                });
            }
            self.snapshots
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), snapshot.clone());
            Ok(())
        }

        fn load(&self, path: &Path) -> Result<SessionSnapshot, PersistenceError> {
            self.snapshots
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .ok_or_else(|| PersistenceError::Io {
                    path: path.to_path_buf(),
                    message: "missing".into(),
                })
        }
    }

    impl ArtifactSink for MemoryFiles {
        fn write(&self, path: &Path, content: &str) -> Result<(), PersistenceError> {
            self.texts
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), content.to_string());
            Ok(())
        }
    }

    fn repl(hang: bool, files: Arc<MemoryFiles>) -> WorkshopRepl<FakeProvider> {
        let engine = WorkshopEngine::new(
            Arc::new(FakeProvider { hang }),
            Arc::new(OneWorkshop),
            files.clone(),
            files.clone(),
        )
        .with_seed(3);
        WorkshopRepl::new(engine, files, ReplConfig::default())
    }

    #[tokio::test]
    async fn test_line_renders_and_exports_transcript() {
        colored::control::set_override(false);
        let files = Arc::new(MemoryFiles::default());
        let mut repl = repl(false, files.clone());
        let never = CancellationToken::new();

        assert_eq!(
            repl.handle_line_until("/load retro.yaml", &never).await,
            LineOutcome::Continue
        );
        assert_eq!(
            repl.handle_line_until("/start", &never).await,
            LineOutcome::Continue
        );

        let screen = repl.screen();
        assert!(screen.contains("Host (F): Good morning, team."));
        assert!(screen.contains("[started] turn 1"));
        assert_eq!(
            files.texts.lock().unwrap()[Path::new("latest_transcript.txt")],
            "Host (F): Good morning, team."
        );
    }

    #[tokio::test]
    async fn test_interrupt_writes_recovery_snapshot() {
        let files = Arc::new(MemoryFiles::default());
        let mut repl = repl(true, files.clone());
        let never = CancellationToken::new();
        repl.handle_line_until("/load retro.yaml", &never).await;

        let interrupt = CancellationToken::new();
        let trigger = interrupt.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let outcome = repl.handle_line_until("/start", &interrupt).await;

        assert_eq!(outcome, LineOutcome::Interrupted);
        let saved = files.snapshots.lock().unwrap()[Path::new("recovery_state.json")].clone();
        assert_eq!(saved.state, LifecyclePhase::Started);
        assert_eq!(saved.current_turn, 1);
        assert!(saved.transcript_content.is_empty());
        assert_eq!(repl.engine().state().current_turn(), 1);
    }

    #[tokio::test]
    async fn test_exit_with_failed_backup_still_exits() {
        let files = Arc::new(MemoryFiles {
            read_only: true,
            ..MemoryFiles::default()
        });
        let mut repl = repl(false, files);
        let outcome = repl
            .handle_line_until("/exit", &CancellationToken::new())
            .await;
        assert_eq!(outcome, LineOutcome::Exit);
        assert!(repl.engine().feedback().last().unwrap().contains("FAILED"));
    }

    #[tokio::test]
    async fn test_malformed_line_continues() {
        let files = Arc::new(MemoryFiles::default());
        let mut repl = repl(false, files);
        let outcome = repl
            .handle_line_until("/dance", &CancellationToken::new())
            .await;
        assert_eq!(outcome, LineOutcome::Continue);
        assert_eq!(repl.engine().state().current_turn(), 0);
    }
}
