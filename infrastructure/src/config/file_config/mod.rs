//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Role names stay strings here; they are parsed (and reported) by
//! [`FileConfig::validate`] and [`FileAgentsConfig::to_consultation_config`].

mod agents;
mod output;
mod server;

pub use agents::FileAgentsConfig;
pub use output::FileOutputConfig;
pub use server::FileServerConfig;

use mdt_domain::ConfigIssue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration rejected because it contains error-severity issues
#[derive(Debug, Error)]
#[error("{} configuration error(s): {}", .issues.len(), summarize(.issues))]
pub struct ConfigValidationError {
    pub issues: Vec<ConfigIssue>,
}

fn summarize(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(|i| i.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Consultation server endpoints
    pub server: FileServerConfig,
    /// Agent selection and model overrides
    pub agents: FileAgentsConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.server.validate();
        issues.extend(self.agents.to_consultation_config().1);
        issues
    }

    /// Split issues into warnings (returned) and errors (which fail).
    pub fn check(&self) -> Result<Vec<ConfigIssue>, ConfigValidationError> {
        let (errors, warnings): (Vec<_>, Vec<_>) =
            self.validate().into_iter().partition(ConfigIssue::is_error);
        if errors.is_empty() {
            Ok(warnings)
        } else {
            Err(ConfigValidationError { issues: errors })
        }
    }
}
