//! Consultation API port
//!
//! Request/response calls made outside the event stream: creating a server
//! session and submitting the case text for a round.

use async_trait::async_trait;
use mdt_domain::{AgentRole, ConsultationConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur when calling the consultation API
#[derive(Error, Debug)]
pub enum ConsultationApiError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Body of a case submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseSubmission {
    pub case_text: String,
    pub selected_agents: Vec<AgentRole>,
    pub model_configs: BTreeMap<AgentRole, String>,
}

impl CaseSubmission {
    pub fn new(case_text: impl Into<String>, config: &ConsultationConfig) -> Self {
        Self {
            case_text: case_text.into(),
            selected_agents: config.selected_agents.clone(),
            model_configs: config.model_configs.clone(),
        }
    }
}

/// Server acknowledgement of a submitted case.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CaseReceipt {
    #[serde(default)]
    pub status: String,
    /// Server-side round counter.
    #[serde(default)]
    pub round: u32,
}

/// Gateway to the consultation server's HTTP API
#[async_trait]
pub trait ConsultationApi: Send + Sync {
    /// Create a new session and return its identifier.
    async fn create_session(&self) -> Result<String, ConsultationApiError>;

    /// Submit case text (initial or follow-up) to an existing session.
    async fn submit_case(
        &self,
        session_id: &str,
        submission: &CaseSubmission,
    ) -> Result<CaseReceipt, ConsultationApiError>;
}
