//! Server configuration from TOML (`[server]` section)

use mdt_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// Base URL of the consultation HTTP API
    pub api_base_url: String,
    /// `host:port` of the event stream
    pub stream_addr: String,
    /// Connect / request timeout in seconds (0 disables the connect timeout)
    pub connect_timeout_secs: u64,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:18000".to_string(),
            stream_addr: "127.0.0.1:18001".to_string(),
            connect_timeout_secs: 10,
        }
    }
}

impl FileServerConfig {
    pub fn connect_timeout(&self) -> Option<Duration> {
        (self.connect_timeout_secs > 0).then(|| Duration::from_secs(self.connect_timeout_secs))
    }

    /// Timeout for HTTP requests; falls back to 30s when the connect timeout is disabled.
    pub fn request_timeout(&self) -> Duration {
        self.connect_timeout().unwrap_or(Duration::from_secs(30))
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        for (field, value) in [
            ("server.api_base_url", &self.api_base_url),
            ("server.stream_addr", &self.stream_addr),
        ] {
            if value.trim().is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyAddress {
                        field: field.to_string(),
                    },
                    format!("{} cannot be empty", field),
                ));
            }
        }
        issues
    }
}
