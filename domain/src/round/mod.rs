//! Rounds of discussion.
//!
//! - [`entities::Round`] — per-round opinions, summaries, conflicts, notes
//! - [`entities::StructuredInfo`] — opaque structured findings
//! - [`ledger::RoundLedger`] — current round, archive, rollback snapshot

pub mod entities;
pub mod ledger;
