//! Consultation observer port
//!
//! Callbacks fired while events are applied to the board. Implementations
//! live in the presentation layer; every method defaults to a no-op so an
//! observer only overrides what it displays.

use crate::state::execution_log::LogEntry;
use mdt_domain::{AgentRole, AgentStatus, Destination, MergeReport};

pub trait ConsultationObserver: Send + Sync {
    /// The event-stream connection opened or closed.
    fn on_connection_change(&self, _connected: bool) {}

    /// An agent changed status.
    fn on_status_change(&self, _role: AgentRole, _status: AgentStatus) {}

    /// A token was appended to `destination`.
    fn on_token(&self, _role: AgentRole, _destination: Destination, _content: &str) {}

    /// A pipeline node's output was merged.
    fn on_node_finished(&self, _node: Option<&str>, _report: &MergeReport) {}

    /// A line was appended to the execution log.
    fn on_log(&self, _entry: &LogEntry) {}

    /// The server ended the round (`success` is false for `error`).
    fn on_round_finished(&self, _success: bool) {}
}

/// Observer that ignores every callback.
pub struct NoObserver;

impl ConsultationObserver for NoObserver {}
