//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Unknown agent role: {0}")]
    UnknownRole(String),

    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    #[error("No agents selected for the consultation")]
    NoAgents,
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::MalformedEvent(err.to_string())
    }
}
