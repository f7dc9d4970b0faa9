//! Consultation participants and their activity status.
//!
//! [`AgentRole`] is the fixed set of logical agents that take part in a
//! consultation. The wire names (`"Case Organizer"`, `"Radiologist"`, ...) are
//! used verbatim in events, configuration payloads and config files.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A logical agent participating in the consultation.
///
/// Ordering follows the pipeline order (organizer first, moderator last), so
/// `BTreeMap<AgentRole, _>` iterates in the order agents usually speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgentRole {
    /// Turns the raw case text into structured findings.
    #[serde(rename = "Case Organizer")]
    CaseOrganizer,
    #[serde(rename = "Radiologist")]
    Radiologist,
    #[serde(rename = "Pathologist")]
    Pathologist,
    #[serde(rename = "Pulmonologist")]
    Pulmonologist,
    #[serde(rename = "Rheumatologist")]
    Rheumatologist,
    /// Compares specialist opinions and reports disagreements.
    #[serde(rename = "Conflict Detector")]
    ConflictDetector,
    /// Produces free-form discussion notes across specialists.
    #[serde(rename = "Team Discussion")]
    TeamDiscussion,
    /// Speaks to the user and writes the final conclusion.
    #[serde(rename = "Moderator")]
    Moderator,
}

impl AgentRole {
    /// Every role, in pipeline order.
    pub const ALL: [AgentRole; 8] = [
        AgentRole::CaseOrganizer,
        AgentRole::Radiologist,
        AgentRole::Pathologist,
        AgentRole::Pulmonologist,
        AgentRole::Rheumatologist,
        AgentRole::ConflictDetector,
        AgentRole::TeamDiscussion,
        AgentRole::Moderator,
    ];

    /// Wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::CaseOrganizer => "Case Organizer",
            AgentRole::Radiologist => "Radiologist",
            AgentRole::Pathologist => "Pathologist",
            AgentRole::Pulmonologist => "Pulmonologist",
            AgentRole::Rheumatologist => "Rheumatologist",
            AgentRole::ConflictDetector => "Conflict Detector",
            AgentRole::TeamDiscussion => "Team Discussion",
            AgentRole::Moderator => "Moderator",
        }
    }

    /// Roles selected when the user does not choose any.
    pub fn default_selection() -> Vec<AgentRole> {
        vec![
            AgentRole::CaseOrganizer,
            AgentRole::Radiologist,
            AgentRole::Pathologist,
            AgentRole::Pulmonologist,
            AgentRole::Rheumatologist,
            AgentRole::Moderator,
        ]
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| DomainError::UnknownRole(s.to_string()))
    }
}

/// Activity status of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    #[default]
    Idle,
    Working,
    Offline,
}

impl AgentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStatus::Idle => "idle",
            AgentStatus::Working => "working",
            AgentStatus::Offline => "offline",
        }
    }

    pub fn is_working(&self) -> bool {
        matches!(self, AgentStatus::Working)
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
