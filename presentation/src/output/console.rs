//! Console output formatter for workshop sessions

use colored::Colorize;
use workshop_domain::SessionState;

/// Formats session state for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Welcome box printed when the REPL starts
    pub fn banner() -> String {
        let mut output = String::new();
        output.push('\n');
        output.push_str(&Self::header("LLM Workshop"));
        output.push('\n');
        output.push_str(&format!(
            "{}\n",
            "Type /help for commands. Ctrl-D or /exit saves and quits.".dimmed()
        ));
        output
    }

    /// One-line summary of where the session stands
    pub fn status_line(state: &SessionState) -> String {
        let facilitator = state
            .facilitator()
            .map(|f| f.display_name().to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{} turn {} | round {} | {} participants | facilitator {} | {} tokens | {} prompt chars",
            format!("[{}]", state.phase().as_str()).cyan().bold(),
            state.current_turn(),
            state.current_round(),
            state.participants().len(),
            facilitator,
            state.tokens_used(),
            state.context_length()
        )
    }

    /// Transcript lines with the speaker label highlighted
    pub fn transcript(lines: &[String]) -> String {
        if lines.is_empty() {
            return String::new();
        }

        let mut output = Self::section_header("Transcript");
        for line in lines {
            match line.split_once(": ") {
                Some((speaker, content)) => output.push_str(&format!(
                    "{} {}\n",
                    format!("{}:", speaker).yellow().bold(),
                    content
                )),
                None => output.push_str(&format!("{}\n", line.dimmed())),
            }
        }
        output
    }

    /// Control messages, colored by what they report
    pub fn feedback(messages: &[String]) -> String {
        if messages.is_empty() {
            return String::new();
        }

        let mut output = Self::section_header("Control");
        for message in messages {
            let styled = if message.starts_with("Error:") || message.starts_with("FAIL") {
                message.red().to_string()
            } else if message.starts_with("Warning:") {
                message.yellow().to_string()
            } else if message.starts_with("PASS") {
                message.green().to_string()
            } else {
                message.to_string()
            };
            output.push_str(&Self::indent(&styled, "  "));
            output.push('\n');
        }
        output
    }

    /// Loud diagnostic for a final backup that could not be written
    pub fn backup_failure(message: &str) -> String {
        format!("{} {}", "!!".red().bold(), message.red().bold())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_status_line_for_new_session() {
        plain();
        let line = ConsoleFormatter::status_line(&SessionState::new());
        assert!(line.starts_with("[not_started] turn 0 | round 1"));
        assert!(line.contains("facilitator -"));
    }

    #[test]
    fn test_transcript_highlights_speaker() {
        plain();
        let out = ConsoleFormatter::transcript(&[
            "Host: Welcome everyone".to_string(),
            "Workshop session ended.".to_string(),
        ]);
        assert!(out.contains("Transcript"));
        assert!(out.contains("Host: Welcome everyone\n"));
        assert!(out.contains("Workshop session ended.\n"));
    }

    #[test]
    fn test_empty_sections_render_nothing() {
        assert!(ConsoleFormatter::transcript(&[]).is_empty());
        assert!(ConsoleFormatter::feedback(&[]).is_empty());
    }

    #[test]
    fn test_feedback_indents_multiline_messages() {
        plain();
        let out = ConsoleFormatter::feedback(&["{\n\"a\": 1\n}".to_string()]);
        assert!(out.contains("  {\n  \"a\": 1\n  }\n"));
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "> "), "> a\n> b");
    }
}
