//! Workshop configuration records

use super::validation::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// One roster entry as written in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSpec {
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub is_facilitator: bool,
}

impl ParticipantSpec {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            background: String::new(),
            is_facilitator: false,
        }
    }

    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = background.into();
        self
    }

    pub fn as_facilitator(mut self) -> Self {
        self.is_facilitator = true;
        self
    }
}

/// The `workshop` section: what the session is about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkshopDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub goals: Vec<String>,
    /// Free-form keys (agenda, duration, ...) passed through to prompts.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WorkshopDetails {
    /// The workshop name, if present and not blank.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }

    /// One-paragraph description used for the default opening prompt.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(name) = self.name() {
            parts.push(format!("Workshop: {}.", name));
        }
        if let Some(description) = self.description.as_deref().filter(|d| !d.trim().is_empty()) {
            parts.push(description.trim().to_string());
        }
        if !self.goals.is_empty() {
            parts.push(format!("Goals: {}.", self.goals.join("; ")));
        }
        parts.join(" ")
    }
}

/// Validated workshop configuration.
///
/// Known sections are typed; any other top-level keys are kept verbatim in
/// `extra` so that `/show` and prompts see everything that was loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkshopConfig {
    #[serde(default)]
    pub workshop: WorkshopDetails,
    #[serde(default)]
    pub participants: Vec<ParticipantSpec>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WorkshopConfig {
    /// Merge `other` into `self`.
    ///
    /// Lists are concatenated, maps are updated key by key (one level deep)
    /// and scalars from `other` replace those in `self`.
    pub fn merge(&mut self, other: WorkshopConfig) {
        let WorkshopConfig {
            workshop,
            participants,
            extra,
        } = other;

        if workshop.name.is_some() {
            self.workshop.name = workshop.name;
        }
        if workshop.description.is_some() {
            self.workshop.description = workshop.description;
        }
        self.workshop.goals.extend(workshop.goals);
        for (key, value) in workshop.extra {
            self.workshop.extra.insert(key, value);
        }

        self.participants.extend(participants);

        for (key, value) in extra {
            match (self.extra.get_mut(&key), value) {
                (Some(Value::Array(existing)), Value::Array(items)) => existing.extend(items),
                (Some(Value::Object(existing)), Value::Object(entries)) => {
                    for (k, v) in entries {
                        existing.insert(k, v);
                    }
                }
                (_, value) => {
                    self.extra.insert(key, value);
                }
            }
        }
    }

    /// Validate the configuration, returning all detected issues.
    ///
    /// A missing workshop name is not an issue here: loading partial files
    /// is allowed and the name is only required when the workshop starts.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();
        let mut facilitators = Vec::new();

        for (index, spec) in self.participants.iter().enumerate() {
            if spec.name.trim().is_empty() {
                let field = format!("participants[{}].name", index);
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyField {
                        field: field.clone(),
                    },
                    format!("{} is empty", field),
                ));
                continue;
            }
            if spec.role.trim().is_empty() {
                let field = format!("participants[{}].role", index);
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyField {
                        field: field.clone(),
                    },
                    format!("{} ('{}') is empty", field, spec.name),
                ));
            }
            if !seen.insert(spec.name.trim().to_lowercase()) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::DuplicateName {
                        name: spec.name.clone(),
                    },
                    format!("duplicate participant name '{}'", spec.name),
                ));
            }
            if spec.is_facilitator {
                facilitators.push(spec.name.clone());
            }
        }

        if facilitators.len() > 1 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::MultipleFacilitators {
                    names: facilitators.clone(),
                },
                format!(
                    "several participants are marked as facilitator ({}); only '{}' will facilitate",
                    facilitators.join(", "),
                    facilitators[0]
                ),
            ));
        }

        issues
    }

    /// Workshop section rendered as compact JSON for prompt context.
    pub fn prompt_context(&self) -> String {
        serde_json::to_string(&self.workshop).unwrap_or_default()
    }
}
