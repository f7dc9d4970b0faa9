//! Inbound consultation events.
//!
//! Every frame on the event stream is one JSON object discriminated by its
//! `type` field. [`ConsultationEvent`] is the closed set of kinds the engine
//! understands; anything that does not decode into it (unknown `type`,
//! missing field, unknown role or status) is rejected by
//! [`ConsultationEvent::parse`] and dropped by the caller.
//!
//! | type | fields |
//! |------|--------|
//! | `status` | `role`, `content` (status) |
//! | `token` | `role`, `content`, `target?` |
//! | `node_finished` | `data` ([`NodeOutput`]), `role?` (node name) |
//! | `log` | `content` |
//! | `done` | — |
//! | `error` | `content` |

mod payload;

pub use payload::{ChatHistoryEntry, NodeOutput};

use crate::agent::role::{AgentRole, AgentStatus};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Where a streamed token should go, as hinted by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenTarget {
    Chat,
    /// Moderator's final conclusion.
    Summary,
    /// A specialist's short summary of their own opinion.
    SpecialistSummary,
    #[serde(other)]
    Other,
}

/// A decoded event from the consultation stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConsultationEvent {
    /// An agent changed status.
    Status {
        role: AgentRole,
        #[serde(rename = "content")]
        status: AgentStatus,
    },
    /// A streamed text fragment.
    Token {
        role: AgentRole,
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<TokenTarget>,
    },
    /// A pipeline node finished with authoritative output.
    NodeFinished {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        role: Option<String>,
        data: NodeOutput,
    },
    /// Server-side progress line.
    Log { content: String },
    /// The round finished normally.
    Done,
    /// The round failed on the server.
    Error { content: String },
}

impl ConsultationEvent {
    /// Decode a single frame.
    pub fn parse(text: &str) -> Result<Self, DomainError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Decode an already-parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, DomainError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Wire name of the event kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ConsultationEvent::Status { .. } => "status",
            ConsultationEvent::Token { .. } => "token",
            ConsultationEvent::NodeFinished { .. } => "node_finished",
            ConsultationEvent::Log { .. } => "log",
            ConsultationEvent::Done => "done",
            ConsultationEvent::Error { .. } => "error",
        }
    }

    /// Returns true if this event ends the running round.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ConsultationEvent::Done | ConsultationEvent::Error { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_status() {
        let event =
            ConsultationEvent::parse(r#"{"type":"status","role":"Case Organizer","content":"working"}"#)
                .unwrap();
        assert_eq!(
            event,
            ConsultationEvent::Status {
                role: AgentRole::CaseOrganizer,
                status: AgentStatus::Working,
            }
        );
    }

    #[test]
    fn parse_token_with_and_without_target() {
        let with_target = ConsultationEvent::from_value(json!({
            "type": "token", "role": "Radiologist", "content": "GGO", "target": "specialist_summary"
        }))
        .unwrap();
        assert!(matches!(
            with_target,
            ConsultationEvent::Token { target: Some(TokenTarget::SpecialistSummary), .. }
        ));

        let without = ConsultationEvent::from_value(json!({
            "type": "token", "role": "Radiologist", "content": "GGO"
        }))
        .unwrap();
        assert!(matches!(without, ConsultationEvent::Token { target: None, .. }));

        let null_target = ConsultationEvent::from_value(json!({
            "type": "token", "role": "Moderator", "content": "Hi", "target": null
        }))
        .unwrap();
        assert!(matches!(null_target, ConsultationEvent::Token { target: None, .. }));
    }

    #[test]
    fn parse_unrecognized_target_as_other() {
        let event = ConsultationEvent::from_value(json!({
            "type": "token", "role": "Moderator", "content": "Hi", "target": "sidebar"
        }))
        .unwrap();
        assert!(matches!(
            event,
            ConsultationEvent::Token { target: Some(TokenTarget::Other), .. }
        ));
    }

    #[test]
    fn parse_node_finished_ignores_unknown_fields() {
        let event = ConsultationEvent::from_value(json!({
            "type": "node_finished",
            "role": "organizer",
            "data": {"structured_info": {"age": 45}, "raw_case_text": "ignored"}
        }))
        .unwrap();
        match event {
            ConsultationEvent::NodeFinished { role, data } => {
                assert_eq!(role.as_deref(), Some("organizer"));
                assert_eq!(data.structured_info.unwrap().get("age"), Some(&json!(45)));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn parse_done_log_error() {
        assert_eq!(
            ConsultationEvent::parse(r#"{"type":"done"}"#).unwrap(),
            ConsultationEvent::Done
        );
        assert_eq!(
            ConsultationEvent::parse(r#"{"type":"log","content":"step"}"#).unwrap(),
            ConsultationEvent::Log {
                content: "step".to_string()
            }
        );
        let error = ConsultationEvent::parse(r#"{"type":"error","content":"boom"}"#).unwrap();
        assert!(error.is_terminal());
        assert_eq!(error.kind(), "error");
    }

    #[test]
    fn malformed_events_are_rejected() {
        let cases = [
            r#"{"type":"heartbeat"}"#,
            r#"{"role":"Moderator","content":"x"}"#,
            r#"{"type":"token","role":"Moderator"}"#,
            r#"{"type":"token","role":"Cardiologist","content":"x"}"#,
            r#"{"type":"status","role":"Moderator","content":"done"}"#,
            r#"{"type":"node_finished"}"#,
            r#"{"type":"error"}"#,
            "not json",
        ];
        for case in cases {
            assert!(
                matches!(ConsultationEvent::parse(case), Err(DomainError::MalformedEvent(_))),
                "expected rejection for {}",
                case
            );
        }
    }
}
