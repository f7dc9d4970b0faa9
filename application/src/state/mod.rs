//! Client-side consultation state.

pub mod execution_log;

use execution_log::ExecutionLog;
use mdt_domain::{AgentRoster, RoundLedger, SessionStatus, StreamAccumulator, Transcript};

/// Everything the client knows about the consultation.
///
/// Mutated only by the event dispatcher and the session controller, both of
/// which run on a single task.
#[derive(Debug, Clone, Default)]
pub struct ConsultationState {
    pub session: SessionStatus,
    pub agents: AgentRoster,
    pub transcript: Transcript,
    pub ledger: RoundLedger,
    pub stream: StreamAccumulator,
    pub logs: ExecutionLog,
}

impl ConsultationState {
    pub fn new() -> Self {
        Self::default()
    }
}
