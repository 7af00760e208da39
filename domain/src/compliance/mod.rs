//! Advisory persona-compliance verdicts.
//!
//! A second provider call may judge whether a contribution stayed in
//! persona. The verdict only tags the contribution; it never blocks or
//! removes it.

/// Outcome of a compliance check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplianceVerdict {
    Pass,
    Fail(String),
}

impl ComplianceVerdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, ComplianceVerdict::Pass)
    }

    /// `PASS` or `FAIL`.
    pub fn label(&self) -> &'static str {
        match self {
            ComplianceVerdict::Pass => "PASS",
            ComplianceVerdict::Fail(_) => "FAIL",
        }
    }

    /// Prefix `text` with the verdict label (`PASS: ...` / `FAIL: ...`).
    pub fn tag(&self, text: &str) -> String {
        format!("{}: {}", self.label(), text)
    }
}

/// Parse a checker reply.
///
/// The first non-empty line must start with `PASS` or `FAIL`; anything
/// after `FAIL` is kept as the reason. Any other reply counts as a failure.
///
/// # Examples
///
/// ```
/// use workshop_domain::compliance::{parse_compliance_verdict, ComplianceVerdict};
///
/// assert_eq!(parse_compliance_verdict("PASS"), ComplianceVerdict::Pass);
/// assert!(!parse_compliance_verdict("I think it is fine").is_pass());
/// ```
pub fn parse_compliance_verdict(reply: &str) -> ComplianceVerdict {
    let Some(first) = reply.lines().map(str::trim).find(|l| !l.is_empty()) else {
        return ComplianceVerdict::Fail("empty checker response".to_string());
    };

    let stripped = first.trim_start_matches(['*', '#', '`', ' ']);
    let upper = stripped.to_ascii_uppercase();

    if upper.starts_with("PASS") {
        ComplianceVerdict::Pass
    } else if upper.starts_with("FAIL") {
        let reason = stripped[4..]
            .trim_start_matches(['*', ':', '-', ' '])
            .trim();
        if reason.is_empty() {
            ComplianceVerdict::Fail("no reason given".to_string())
        } else {
            ComplianceVerdict::Fail(reason.to_string())
        }
    } else {
        ComplianceVerdict::Fail(format!("malformed checker response: {}", first))
    }
}
