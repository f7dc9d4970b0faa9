//! Round data: structured findings, conflicts, and per-round discussion output.

use crate::agent::role::AgentRole;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Structured case findings produced by the Case Organizer.
///
/// Opaque to the engine: always replaced wholesale, never deep-merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructuredInfo(serde_json::Map<String, serde_json::Value>);

impl StructuredInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.0
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for StructuredInfo {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self(map)
    }
}

/// A disagreement reported by the Conflict Detector.
///
/// Only `issue` and `severity` are interpreted; any other fields the detector
/// sends are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    #[serde(default)]
    pub issue: String,
    #[serde(default)]
    pub severity: String,
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl Conflict {
    pub fn new(issue: impl Into<String>, severity: impl Into<String>) -> Self {
        Self {
            issue: issue.into(),
            severity: severity.into(),
            details: serde_json::Map::new(),
        }
    }
}

/// One round of discussion.
///
/// The ledger holds exactly one mutable current round; archived rounds are
/// only reachable through shared references.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// Round number (0-indexed)
    pub round: u32,
    pub opinions: BTreeMap<AgentRole, String>,
    pub summaries: BTreeMap<AgentRole, String>,
    /// Moderator's final conclusion
    pub summary: String,
    pub conflicts: Vec<Conflict>,
    pub discussion_notes: String,
}

impl Round {
    pub fn new(round: u32) -> Self {
        Self {
            round,
            ..Self::default()
        }
    }

    /// Whether the round produced anything worth archiving.
    pub fn has_content(&self) -> bool {
        self.opinions.values().any(|text| !text.is_empty()) || !self.summary.is_empty()
    }

    pub fn opinion(&self, role: AgentRole) -> &str {
        self.opinions.get(&role).map(String::as_str).unwrap_or("")
    }

    pub fn specialist_summary(&self, role: AgentRole) -> &str {
        self.summaries.get(&role).map(String::as_str).unwrap_or("")
    }

    /// Drop all round output, keeping the round number.
    pub fn clear(&mut self) {
        self.opinions.clear();
        self.summaries.clear();
        self.summary.clear();
        self.conflicts.clear();
        self.discussion_notes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_round_has_no_content() {
        let round = Round::new(0);
        assert!(!round.has_content());
    }

    #[test]
    fn test_empty_opinion_text_is_not_content() {
        let mut round = Round::new(0);
        round.opinions.insert(AgentRole::Radiologist, String::new());
        round.conflicts.push(Conflict::new("x", "high"));
        round.discussion_notes.push_str("notes");
        assert!(!round.has_content());

        round.summary.push_str("conclusion");
        assert!(round.has_content());
    }

    #[test]
    fn test_clear_keeps_number() {
        let mut round = Round::new(3);
        round.opinions.insert(AgentRole::Pathologist, "fibrosis".to_string());
        round.clear();
        assert_eq!(round, Round::new(3));
    }

    #[test]
    fn test_conflict_keeps_extra_fields() {
        let conflict: Conflict = serde_json::from_value(json!({
            "issue": "UIP vs NSIP",
            "severity": "high",
            "involved": ["Radiologist", "Pathologist"],
        }))
        .unwrap();

        assert_eq!(conflict.issue, "UIP vs NSIP");
        assert_eq!(conflict.details["involved"], json!(["Radiologist", "Pathologist"]));
        assert_eq!(serde_json::to_value(&conflict).unwrap()["involved"][1], "Pathologist");
    }

    #[test]
    fn test_structured_info_requires_object() {
        assert!(serde_json::from_value::<StructuredInfo>(json!({"age": 45})).is_ok());
        assert!(serde_json::from_value::<StructuredInfo>(json!("age: 45")).is_err());
    }
}
