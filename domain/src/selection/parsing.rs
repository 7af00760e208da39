//! Next-speaker suggestion parsing.
//!
//! The provider is asked to answer with exactly one line of the form
//! `Next speaker: <name>`. Models add chatter around it, so parsing is
//! lenient about surrounding text, case and decoration, and strict about
//! the marker being present.

const MARKER: &str = "next speaker:";

/// Extract the suggested name from a `Next speaker: <name>` reply.
///
/// Uses the last marker occurrence and the remainder of its line.
/// Quotes, markdown emphasis and trailing punctuation are stripped.
///
/// # Examples
///
/// ```
/// use workshop_domain::selection::parsing::parse_next_speaker;
///
/// assert_eq!(parse_next_speaker("Next speaker: Bob"), Some("Bob".to_string()));
/// assert_eq!(parse_next_speaker("**Next Speaker:** 'Ann Lee'."), Some("Ann Lee".to_string()));
/// assert_eq!(parse_next_speaker("I think Bob should talk"), None);
/// ```
pub fn parse_next_speaker(response: &str) -> Option<String> {
    // ASCII lowercasing keeps byte offsets aligned with the original text
    let lowered = response.to_ascii_lowercase();
    let start = lowered.rfind(MARKER)? + MARKER.len();
    let rest = &response[start..];
    let line = rest.lines().next().unwrap_or("");

    let decoration = |c: char| c.is_whitespace() || matches!(c, '*' | '"' | '\'' | '`' | '_');
    let name = line
        .trim_matches(decoration)
        .trim_end_matches(|c: char| matches!(c, '.' | '!' | ',' | ';'))
        .trim_matches(decoration);

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_line() {
        assert_eq!(parse_next_speaker("Next speaker: Bea"), Some("Bea".into()));
    }

    #[test]
    fn test_case_insensitive_marker() {
        assert_eq!(parse_next_speaker("NEXT SPEAKER: bea"), Some("bea".into()));
    }

    #[test]
    fn test_surrounding_chatter() {
        let reply = "Bob was asked a direct question.\nNext speaker: Bob\nThanks!";
        assert_eq!(parse_next_speaker(reply), Some("Bob".into()));
    }

    #[test]
    fn test_last_marker_wins() {
        let reply = "Next speaker: Ann\nActually, correction. Next speaker: Cat";
        assert_eq!(parse_next_speaker(reply), Some("Cat".into()));
    }

    #[test]
    fn test_decorations_stripped() {
        assert_eq!(
            parse_next_speaker("**Next speaker:** \"Dr. Ann Lee\"."),
            Some("Dr. Ann Lee".into())
        );
    }

    #[test]
    fn test_missing_marker() {
        assert_eq!(parse_next_speaker("Bob"), None);
        assert_eq!(parse_next_speaker(""), None);
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(parse_next_speaker("Next speaker:   "), None);
        assert_eq!(parse_next_speaker("Next speaker:\nBob"), None);
    }

    #[test]
    fn test_non_ascii_name() {
        assert_eq!(parse_next_speaker("Next speaker: Zoë"), Some("Zoë".into()));
    }
}
