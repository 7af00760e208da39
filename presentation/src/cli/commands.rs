//! CLI command definitions

use clap::Parser;
use std::path::{Path, PathBuf};

/// What the positional argument asks for at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupSource {
    /// Restore a session snapshot (`.json` files)
    Restore(PathBuf),
    /// Load a workshop configuration file
    Load(PathBuf),
}

impl StartupSource {
    pub fn from_path(path: &Path) -> Self {
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            StartupSource::Restore(path.to_path_buf())
        } else {
            StartupSource::Load(path.to_path_buf())
        }
    }

    /// The equivalent REPL command line
    pub fn command_line(&self) -> String {
        match self {
            StartupSource::Restore(path) => format!("/restore {}", path.display()),
            StartupSource::Load(path) => format!("/load {}", path.display()),
        }
    }
}

/// CLI arguments for llm-workshop
#[derive(Parser, Debug)]
#[command(name = "llm-workshop")]
#[command(author, version, about = "Turn-based multi-agent workshop driven by a local LLM")]
#[command(long_about = r#"
llm-workshop runs a workshop between LLM-played participants, steered by a
facilitator, one turn at a time from an interactive prompt.

Typical session:
  /load team.yaml        load participants and the workshop topic
  /start                 the facilitator opens the workshop
  /next 3                three participants speak, chosen at random
  /next Alice            Alice speaks next
  /util summarize        write a summary of the discussion
  /exit                  save the session and quit

Settings are loaded from (in priority order):
1. WORKSHOP_* environment variables (e.g. WORKSHOP_PROVIDER__MODEL=llama3)
2. --settings <path>   Explicit settings file
3. ./workshop.toml     Project-level settings
4. ~/.config/llm-workshop/config.toml   Global settings

Example:
  llm-workshop retro.yaml
  llm-workshop final_state.json      resume a saved session
"#)]
pub struct Cli {
    /// Workshop configuration to load, or a `.json` snapshot to restore
    pub source: Option<PathBuf>,

    /// Path to settings file
    #[arg(long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Disable loading of settings files
    #[arg(long)]
    pub no_settings: bool,

    /// Override the model from settings
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Seed for speaker selection and roster order
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Check every contribution against the speaker's persona
    #[arg(long)]
    pub compliance_check: bool,

    /// Write conversation events as JSONL to this file
    #[arg(long, value_name = "PATH")]
    pub conversation_log: Option<PathBuf>,

    /// Also write diagnostic logs to daily files in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn startup_source(&self) -> Option<StartupSource> {
        self.source.as_deref().map(StartupSource::from_path)
    }
}
