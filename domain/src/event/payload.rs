//! `node_finished` payload.

use crate::round::entities::{Conflict, StructuredInfo};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Authoritative output of a finished pipeline node.
///
/// Every field is optional; a node only reports what it produced. Role keys
/// are kept as strings here so that one unknown role does not invalidate the
/// whole payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_info: Option<StructuredInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialist_opinions: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialist_summaries: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moderator_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicts: Option<Vec<Conflict>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discussion_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_history: Option<Vec<ChatHistoryEntry>>,
}

/// A message from the server-side conversation history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatHistoryEntry {
    pub role: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub model: String,
}

impl ChatHistoryEntry {
    pub fn new(role: impl Into<String>, content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
            model: model.into(),
        }
    }
}
