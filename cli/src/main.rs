//! CLI entrypoint for llm-workshop
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, anyhow, bail};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use workshop_application::WorkshopEngine;
use workshop_domain::{ConfigIssue, Severity};
use workshop_infrastructure::{
    ConfigLoader, FileArtifactSink, FileConfig, FileWorkshopConfigSource, JsonSnapshotStore,
    JsonlConversationLogger, OllamaProvider, ProviderSettings,
};
use workshop_presentation::{
    Cli, ConsoleFormatter, LineOutcome, ProgressReporter, ReplConfig, WorkshopRepl,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_tracing(&cli);

    info!("Starting llm-workshop");

    // === Settings ===
    let mut settings = if cli.no_settings {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.settings.as_ref()).map_err(|e| anyhow!("{}", e))?
    };
    apply_overrides(&mut settings, &cli);

    let issues = settings.validate();
    for issue in &issues {
        match issue.severity {
            Severity::Error => warn!("settings error: {}", issue.message),
            Severity::Warning => warn!("settings: {}", issue.message),
        }
    }
    if ConfigIssue::has_errors(&issues) {
        bail!("Invalid settings: {}", ConfigIssue::error_summary(&issues));
    }

    // === Dependency Injection ===
    let provider = Arc::new(OllamaProvider::new(ProviderSettings::from(
        &settings.provider,
    ))?);
    let artifacts = Arc::new(FileArtifactSink::new());

    let mut engine = WorkshopEngine::new(
        provider,
        Arc::new(FileWorkshopConfigSource::new()),
        Arc::new(JsonSnapshotStore::new()),
        artifacts.clone(),
    )
    .with_options(settings.engine_options());

    if let Some(seed) = cli.seed {
        engine = engine.with_seed(seed);
    }

    if let Some(path) = &settings.logging.conversation_log {
        match JsonlConversationLogger::new(path) {
            Some(logger) => {
                info!("Conversation log: {}", logger.path().display());
                engine = engine.with_logger(Arc::new(logger));
            }
            None => warn!("Conversation logging disabled"),
        }
    }

    let repl_config = repl_config(&settings);
    let progress =
        (repl_config.show_progress && !cli.quiet).then(|| Arc::new(ProgressReporter::new()));
    if let Some(progress) = &progress {
        engine = engine.with_observer(progress.clone());
    }

    let mut repl = WorkshopRepl::new(engine, artifacts, repl_config);
    if let Some(progress) = progress {
        repl = repl.with_progress(progress);
    }

    if let Some(source) = cli.startup_source() {
        let outcome = repl.handle_line(&source.command_line()).await;
        if outcome != LineOutcome::Continue {
            return Ok(());
        }
    }

    match repl.run().await? {
        LineOutcome::Interrupted => info!("Session interrupted"),
        LineOutcome::Exit | LineOutcome::Continue => info!("Session closed"),
    }
    println!("{}", ConsoleFormatter::status_line(repl.engine().state()));

    Ok(())
}

/// Console logging by `-v` count, plus daily files with `--log-dir`.
fn init_tracing(cli: &Cli) -> Option<WorkerGuard> {
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let (file_layer, guard) = match &cli.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "llm-workshop.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    guard
}

fn apply_overrides(settings: &mut FileConfig, cli: &Cli) {
    if let Some(model) = &cli.model {
        settings.provider.model = model.clone();
    }
    if cli.compliance_check {
        settings.engine.compliance_check = true;
    }
    if let Some(path) = &cli.conversation_log {
        settings.logging.conversation_log = Some(path.clone());
    }
}

fn repl_config(settings: &FileConfig) -> ReplConfig {
    ReplConfig {
        show_progress: settings.repl.show_progress,
        history_file: settings.repl.history_file.as_ref().map(Into::into),
        transcript_tail: settings.engine.transcript_tail,
        feedback_tail: settings.engine.feedback_tail,
        transcript_path: settings.engine.transcript_path.clone(),
    }
}
