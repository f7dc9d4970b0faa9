//! Domain layer for mdt-consult
//!
//! This crate contains the consultation board state and the pure logic that
//! keeps it consistent. It has no dependencies on transport, configuration
//! files, or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Rounds
//!
//! A consultation proceeds in rounds. During a round, agents stream opinions,
//! summaries, and notes into the *current* round. Starting the next round
//! archives the current one (if it produced anything) and snapshots the
//! structured findings so a cancelled round can be rolled back.
//!
//! ## Streaming vs. authoritative output
//!
//! - **Tokens** are appended to one buffer each ([`StreamAccumulator`])
//! - **Finished nodes** overwrite what was streamed ([`MergeResolver`])

pub mod agent;
pub mod chat;
pub mod core;
pub mod event;
pub mod merge;
pub mod round;
pub mod session;
pub mod stream;

// Re-export commonly used types
pub use agent::{
    model_config::ConsultationConfig,
    role::{AgentRole, AgentStatus},
    roster::AgentRoster,
};
pub use chat::transcript::{ChatMessage, ChatRole, Transcript};
pub use core::{
    error::DomainError,
    validation::{ConfigIssue, ConfigIssueCode, Severity},
};
pub use event::{ChatHistoryEntry, ConsultationEvent, NodeOutput, TokenTarget};
pub use merge::resolver::{MergeReport, MergeResolver};
pub use round::{
    entities::{Conflict, Round, StructuredInfo},
    ledger::RoundLedger,
};
pub use session::entities::{ConnectionStatus, SessionStatus};
pub use stream::accumulator::{Destination, StreamAccumulator};
