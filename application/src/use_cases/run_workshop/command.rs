//! Command parsing
//!
//! Lines start with `/` and are split on whitespace. The parser only
//! checks shape; lifecycle rules are enforced by the engine.

use std::path::PathBuf;
use thiserror::Error;
use workshop_domain::SelectionMode;

/// Errors for lines that are not a well-formed command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("Commands start with '/'. Type /help to list them.")]
    NotACommand,

    #[error("Unknown command '/{0}'. Type /help to list them.")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Unknown util action '{0}'. Usage: /util summarize")]
    UnknownUtil(String),
}

/// Auxiliary operations under `/util`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtilAction {
    Summarize,
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Load(PathBuf),
    Show,
    Start(Option<String>),
    Say(String),
    Next { count: usize, mode: SelectionMode },
    Util(UtilAction),
    Backup(PathBuf),
    Restore(PathBuf),
    Exit,
    End,
    Help,
}

const HELP: &str = "\
Commands:
  /load <path>           merge a workshop configuration (YAML, TOML or JSON)
  /show                  show the current configuration
  /start [prompt...]     start the workshop with an optional opening prompt
  /say <text...>         the facilitator delivers <text>
  /next [count] [name|?] advance turns (random, by name prefix, or suggested)
  /util summarize        compress the transcript into the summary file
  /backup <path>         save the session
  /restore <path>        reload a saved session
  /end                   end the workshop
  /exit                  save to the default backup file and quit";

impl Command {
    /// Parse one input line.
    pub fn parse(line: &str) -> Result<Self, CommandParseError> {
        let body = line
            .trim()
            .strip_prefix('/')
            .ok_or(CommandParseError::NotACommand)?;

        let (name, rest) = match body.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (body, ""),
        };

        match name.to_lowercase().as_str() {
            "load" => required(rest, "/load <path>").map(|p| Command::Load(PathBuf::from(p))),
            "show" => Ok(Command::Show),
            "start" => Ok(Command::Start((!rest.is_empty()).then(|| rest.to_string()))),
            "say" => required(rest, "/say <text>").map(|t| Command::Say(t.to_string())),
            "next" => parse_next(rest),
            "util" => parse_util(rest),
            "backup" => required(rest, "/backup <path>").map(|p| Command::Backup(PathBuf::from(p))),
            "restore" => {
                required(rest, "/restore <path>").map(|p| Command::Restore(PathBuf::from(p)))
            }
            "exit" | "quit" => Ok(Command::Exit),
            "end" => Ok(Command::End),
            "help" | "?" => Ok(Command::Help),
            other => Err(CommandParseError::Unknown(other.to_string())),
        }
    }

    /// Command reference shown by `/help`.
    pub fn help_text() -> &'static str {
        HELP
    }
}

fn required<'a>(rest: &'a str, usage: &'static str) -> Result<&'a str, CommandParseError> {
    if rest.is_empty() {
        Err(CommandParseError::Usage(usage))
    } else {
        Ok(rest)
    }
}

/// `[count] [name|?]`: a leading all-digit token is the count.
fn parse_next(rest: &str) -> Result<Command, CommandParseError> {
    const USAGE: &str = "/next [count] [name|?] (count must be at least 1)";

    let mut tokens: Vec<&str> = rest.split_whitespace().collect();
    let mut count = 1;
    if let Some(first) = tokens.first()
        && first.chars().all(|c| c.is_ascii_digit())
    {
        count = first
            .parse::<usize>()
            .map_err(|_| CommandParseError::Usage(USAGE))?;
        tokens.remove(0);
    }
    if count == 0 {
        return Err(CommandParseError::Usage(USAGE));
    }

    let target = tokens.join(" ");
    let mode = SelectionMode::from_arg((!target.is_empty()).then_some(target.as_str()));
    Ok(Command::Next { count, mode })
}

fn parse_util(rest: &str) -> Result<Command, CommandParseError> {
    match rest.split_whitespace().next().map(str::to_lowercase).as_deref() {
        None => Err(CommandParseError::Usage("/util summarize")),
        Some("summarize" | "summerize") => Ok(Command::Util(UtilAction::Summarize)),
        Some(other) => Err(CommandParseError::UnknownUtil(other.to_string())),
    }
}
