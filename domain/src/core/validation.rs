//! Configuration validation issues.
//!
//! Config adapters collect every problem they find as a [`ConfigIssue`]
//! instead of failing on the first one, so the user sees all of them at once.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// An agent name that is not one of the known roles.
    UnknownAgentRole { field: String, value: String },
    /// A model name that is empty or whitespace.
    EmptyModelName { field: String },
    /// A model override for an agent that is not selected.
    UnusedModelOverride { role: String },
    /// The agent selection is empty.
    NoAgentsSelected,
    /// A server address or URL is empty.
    EmptyAddress { field: String },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_severity() {
        let err = ConfigIssue::error(ConfigIssueCode::NoAgentsSelected, "none");
        assert!(err.is_error());

        let warn = ConfigIssue::warning(
            ConfigIssueCode::UnusedModelOverride {
                role: "Radiologist".to_string(),
            },
            "unused",
        );
        assert_eq!(warn.severity, Severity::Warning);
        assert!(!warn.is_error());
    }
}
