//! Lifecycle phase

use serde::{Deserialize, Serialize};

/// Lifecycle phase of a workshop.
///
/// Persisted as an integer code (`0`, `1`, `2`); string tags such as
/// `"started"` or `"NOT_STARTED"` are accepted when reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "PhaseRepr")]
pub enum LifecyclePhase {
    #[default]
    NotStarted,
    Started,
    /// Terminal: no further turns.
    Ending,
}

impl LifecyclePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecyclePhase::NotStarted => "not_started",
            LifecyclePhase::Started => "started",
            LifecyclePhase::Ending => "ending",
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            LifecyclePhase::NotStarted => 0,
            LifecyclePhase::Started => 1,
            LifecyclePhase::Ending => 2,
        }
    }
}

impl std::fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<LifecyclePhase> for u8 {
    fn from(phase: LifecyclePhase) -> Self {
        phase.code()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PhaseRepr {
    Code(u8),
    Tag(String),
}

impl TryFrom<PhaseRepr> for LifecyclePhase {
    type Error = String;

    fn try_from(repr: PhaseRepr) -> Result<Self, Self::Error> {
        match repr {
            PhaseRepr::Code(0) => Ok(LifecyclePhase::NotStarted),
            PhaseRepr::Code(1) => Ok(LifecyclePhase::Started),
            PhaseRepr::Code(2) => Ok(LifecyclePhase::Ending),
            PhaseRepr::Code(other) => Err(format!("unknown lifecycle code {}", other)),
            PhaseRepr::Tag(tag) => match tag.replace(['_', '-', ' '], "").to_lowercase().as_str() {
                "notstarted" => Ok(LifecyclePhase::NotStarted),
                "started" => Ok(LifecyclePhase::Started),
                "ending" | "ended" => Ok(LifecyclePhase::Ending),
                _ => Err(format!("unknown lifecycle tag '{}'", tag)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_code() {
        assert_eq!(serde_json::to_string(&LifecyclePhase::Started).unwrap(), "1");
    }

    #[test]
    fn test_deserializes_codes_and_tags() {
        let from = |s: &str| serde_json::from_str::<LifecyclePhase>(s).unwrap();
        assert_eq!(from("0"), LifecyclePhase::NotStarted);
        assert_eq!(from("2"), LifecyclePhase::Ending);
        assert_eq!(from("\"NOT_STARTED\""), LifecyclePhase::NotStarted);
        assert_eq!(from("\"Started\""), LifecyclePhase::Started);
    }

    #[test]
    fn test_rejects_unknown() {
        assert!(serde_json::from_str::<LifecyclePhase>("7").is_err());
        assert!(serde_json::from_str::<LifecyclePhase>("\"paused\"").is_err());
    }
}
