//! Per-agent status table.

use super::role::{AgentRole, AgentStatus};
use std::collections::BTreeMap;

/// Status of every [`AgentRole`], all starting [`AgentStatus::Idle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRoster {
    statuses: BTreeMap<AgentRole, AgentStatus>,
}

impl Default for AgentRoster {
    fn default() -> Self {
        Self {
            statuses: AgentRole::ALL
                .into_iter()
                .map(|role| (role, AgentStatus::Idle))
                .collect(),
        }
    }
}

impl AgentRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, role: AgentRole) -> AgentStatus {
        self.statuses.get(&role).copied().unwrap_or_default()
    }

    /// Set a role's status, returning the previous one.
    pub fn set(&mut self, role: AgentRole, status: AgentStatus) -> AgentStatus {
        self.statuses.insert(role, status).unwrap_or_default()
    }

    /// Put every agent back to idle.
    pub fn reset_idle(&mut self) {
        for status in self.statuses.values_mut() {
            *status = AgentStatus::Idle;
        }
    }

    /// Roles currently working, in pipeline order.
    pub fn working(&self) -> Vec<AgentRole> {
        self.statuses
            .iter()
            .filter(|(_, status)| status.is_working())
            .map(|(role, _)| *role)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AgentRole, AgentStatus)> + '_ {
        self.statuses.iter().map(|(role, status)| (*role, *status))
    }
}
