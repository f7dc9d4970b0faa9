//! Agent configuration from TOML (`[agents]` section)
//!
//! ```toml
//! [agents]
//! selected = ["Case Organizer", "Radiologist", "Moderator"]
//!
//! [agents.models]
//! "Radiologist" = "claude-haiku-4-5"
//! ```

use mdt_domain::{AgentRole, ConfigIssue, ConfigIssueCode, ConsultationConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentsConfig {
    /// Role names taking part in each round
    pub selected: Vec<String>,
    /// Model override per role name
    pub models: BTreeMap<String, String>,
}

impl Default for FileAgentsConfig {
    fn default() -> Self {
        Self {
            selected: AgentRole::default_selection()
                .iter()
                .map(|r| r.as_str().to_string())
                .collect(),
            models: BTreeMap::new(),
        }
    }
}

impl FileAgentsConfig {
    /// Parse `selected`; unknown names are reported and skipped, duplicates dropped.
    pub fn parse_selected(&self) -> (Vec<AgentRole>, Vec<ConfigIssue>) {
        let mut roles = Vec::new();
        let mut issues = Vec::new();
        for name in &self.selected {
            match name.parse::<AgentRole>() {
                Ok(role) if !roles.contains(&role) => roles.push(role),
                Ok(_) => {}
                Err(_) => issues.push(unknown_role("agents.selected", name)),
            }
        }
        if roles.is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::NoAgentsSelected,
                "agents.selected: at least one agent must be selected",
            ));
        }
        (roles, issues)
    }

    /// Parse `models` against the given selection.
    pub fn parse_models(&self, selected: &[AgentRole]) -> (BTreeMap<AgentRole, String>, Vec<ConfigIssue>) {
        let mut models = BTreeMap::new();
        let mut issues = Vec::new();
        for (name, model) in &self.models {
            let field = format!("agents.models.\"{}\"", name);
            let role = match name.parse::<AgentRole>() {
                Ok(role) => role,
                Err(_) => {
                    issues.push(unknown_role("agents.models", name));
                    continue;
                }
            };
            if model.trim().is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyModelName {
                        field: field.clone(),
                    },
                    format!("{}: model name cannot be empty", field),
                ));
                continue;
            }
            if !selected.contains(&role) {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::UnusedModelOverride {
                        role: name.clone(),
                    },
                    format!("{}: '{}' is not a selected agent, override ignored", field, name),
                ));
                continue;
            }
            models.insert(role, model.trim().to_string());
        }
        (models, issues)
    }

    /// Build the consultation payload, collecting every issue along the way.
    pub fn to_consultation_config(&self) -> (ConsultationConfig, Vec<ConfigIssue>) {
        let (selected, mut issues) = self.parse_selected();
        let (models, model_issues) = self.parse_models(&selected);
        issues.extend(model_issues);
        (
            ConsultationConfig {
                selected_agents: selected,
                model_configs: models,
            },
            issues,
        )
    }
}

fn unknown_role(field: &str, value: &str) -> ConfigIssue {
    ConfigIssue::error(
        ConfigIssueCode::UnknownAgentRole {
            field: field.to_string(),
            value: value.to_string(),
        },
        format!(
            "{}: unknown agent '{}' (expected one of: {})",
            field,
            value,
            AgentRole::ALL
                .iter()
                .map(|r| r.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    )
}
