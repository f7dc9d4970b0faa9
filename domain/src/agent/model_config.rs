//! Consultation configuration payload.
//!
//! [`ConsultationConfig`] is sent once per connection as the trigger that
//! starts generation, and is reused when submitting a case. It is a static
//! value object — once a round starts, its agent selection doesn't change.

use super::role::AgentRole;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Selected agents plus per-agent model overrides.
///
/// # Example
///
/// ```
/// use mdt_domain::{AgentRole, ConsultationConfig};
///
/// let config = ConsultationConfig::default()
///     .with_agents(vec![AgentRole::CaseOrganizer, AgentRole::Moderator])
///     .with_model(AgentRole::Moderator, "gpt-5.1");
///
/// assert_eq!(config.model_for(AgentRole::Moderator), Some("gpt-5.1"));
/// assert!(!config.is_selected(AgentRole::Radiologist));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsultationConfig {
    /// Agents taking part in the round.
    pub selected_agents: Vec<AgentRole>,
    /// Model name per agent; agents without an entry use the server default.
    #[serde(default)]
    pub model_configs: BTreeMap<AgentRole, String>,
}

impl Default for ConsultationConfig {
    fn default() -> Self {
        Self {
            selected_agents: AgentRole::default_selection(),
            model_configs: BTreeMap::new(),
        }
    }
}

impl ConsultationConfig {
    // ==================== Builder Methods ====================

    pub fn with_agents(mut self, agents: Vec<AgentRole>) -> Self {
        self.selected_agents = agents;
        self
    }

    pub fn with_model(mut self, role: AgentRole, model: impl Into<String>) -> Self {
        self.model_configs.insert(role, model.into());
        self
    }

    // ==================== Queries ====================

    pub fn is_selected(&self, role: AgentRole) -> bool {
        self.selected_agents.contains(&role)
    }

    pub fn model_for(&self, role: AgentRole) -> Option<&str> {
        self.model_configs.get(&role).map(String::as_str)
    }

    /// JSON payload sent over the event stream on connect.
    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "selected_agents": self.selected_agents,
            "model_configs": self.model_configs,
        })
    }
}
