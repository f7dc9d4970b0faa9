//! Round ledger: current round, archive, and the rollback snapshot.
//!
//! ```text
//!            begin_round (has content)
//!   ┌───────────────────────────────────────┐
//!   │                                       ▼
//! current(n) ── begin_round (empty) ──▶ current(n)        archive: [.., n]
//!   │                                                      current(n+1)
//!   └── rollback ──▶ current(n) cleared, structured info = snapshot
//! ```
//!
//! The snapshot is retaken on every `begin_round`, so rollback can never reach
//! further back than the start of the current round.

use super::entities::{Round, StructuredInfo};

/// Owner of all round-scoped state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundLedger {
    structured_info: StructuredInfo,
    /// Streamed organizer text not yet superseded by an authoritative object.
    structured_text: String,
    current: Round,
    archive: Vec<Round>,
    snapshot: StructuredInfo,
}

impl RoundLedger {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Queries ====================

    pub fn structured_info(&self) -> &StructuredInfo {
        &self.structured_info
    }

    pub fn structured_text(&self) -> &str {
        &self.structured_text
    }

    pub fn current(&self) -> &Round {
        &self.current
    }

    pub fn round_number(&self) -> u32 {
        self.current.round
    }

    pub fn archive(&self) -> &[Round] {
        &self.archive
    }

    /// Structured info as captured by the most recent `begin_round`.
    pub fn snapshot(&self) -> &StructuredInfo {
        &self.snapshot
    }

    // ==================== Round Transitions ====================

    /// Start a new round.
    ///
    /// Snapshots the structured info, then archives the current round and
    /// advances the number only if the current round has content. Returns the
    /// archived round number, if any.
    pub fn begin_round(&mut self) -> Option<u32> {
        self.snapshot = self.structured_info.clone();

        if !self.current.has_content() {
            return None;
        }

        let next = Round::new(self.current.round + 1);
        let archived = std::mem::replace(&mut self.current, next);
        let number = archived.round;
        self.archive.push(archived);
        Some(number)
    }

    /// Cancel the current round.
    ///
    /// Restores structured info from the snapshot and clears every
    /// current-round field plus the structured-text buffer. The archive and
    /// the round number are untouched.
    pub fn rollback(&mut self) {
        self.structured_info = self.snapshot.clone();
        self.current.clear();
        self.structured_text.clear();
    }

    // ==================== Mutators (used by stream/merge) ====================

    pub fn replace_structured_info(&mut self, info: StructuredInfo) {
        self.structured_info = info;
    }

    pub fn push_structured_text(&mut self, content: &str) {
        self.structured_text.push_str(content);
    }

    pub fn clear_structured_text(&mut self) {
        self.structured_text.clear();
    }

    pub fn current_mut(&mut self) -> &mut Round {
        &mut self.current
    }
}
