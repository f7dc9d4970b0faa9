//! Authoritative merge of `node_finished` payloads.
//!
//! A finished node reports the final version of whatever it produced. Each
//! present field overwrites what was streamed for it; absent fields are left
//! alone, so a payload is a set of independent corrections rather than a full
//! snapshot of the board.

use crate::agent::role::AgentRole;
use crate::chat::transcript::Transcript;
use crate::event::NodeOutput;
use crate::round::ledger::RoundLedger;
use std::collections::BTreeMap;

/// What a single merge changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub structured_info: bool,
    pub opinions: usize,
    pub summaries: usize,
    pub moderator_summary: bool,
    pub conflicts: bool,
    pub discussion_notes: bool,
    /// Moderator messages applied to the transcript.
    pub chat_messages: usize,
    /// Non-Moderator history entries that were dropped.
    pub chat_discarded: usize,
    /// Role keys that did not name a known agent.
    pub unknown_roles: Vec<String>,
}

impl MergeReport {
    pub fn is_empty(&self) -> bool {
        *self == MergeReport::default()
    }
}

/// Applies [`NodeOutput`] to the ledger and transcript.
pub struct MergeResolver;

impl MergeResolver {
    pub fn apply(
        ledger: &mut RoundLedger,
        transcript: &mut Transcript,
        output: NodeOutput,
    ) -> MergeReport {
        let mut report = MergeReport::default();

        if let Some(info) = output.structured_info {
            ledger.replace_structured_info(info);
            ledger.clear_structured_text();
            report.structured_info = true;
        }

        if let Some(opinions) = output.specialist_opinions {
            let round = ledger.current_mut();
            report.opinions = Self::overwrite_roles(&mut round.opinions, opinions, &mut report.unknown_roles);
        }

        if let Some(summaries) = output.specialist_summaries {
            let round = ledger.current_mut();
            report.summaries = Self::overwrite_roles(&mut round.summaries, summaries, &mut report.unknown_roles);
        }

        if let Some(summary) = output.moderator_summary.filter(|s| !s.is_empty()) {
            ledger.current_mut().summary = summary;
            report.moderator_summary = true;
        }

        if let Some(conflicts) = output.conflicts {
            ledger.current_mut().conflicts = conflicts;
            report.conflicts = true;
        }

        if let Some(notes) = output.discussion_notes.filter(|s| !s.is_empty()) {
            ledger.current_mut().discussion_notes = notes;
            report.discussion_notes = true;
        }

        if let Some(history) = output.chat_history {
            for entry in history {
                // Specialist and organizer history is internal to the pipeline.
                if entry.role != AgentRole::Moderator.as_str() {
                    report.chat_discarded += 1;
                    continue;
                }
                transcript.finalize_moderator(&entry.content, &entry.model);
                report.chat_messages += 1;
            }
        }

        report
    }

    /// Overwrite each listed role's text; roles not listed keep theirs.
    fn overwrite_roles(
        target: &mut BTreeMap<AgentRole, String>,
        incoming: BTreeMap<String, String>,
        unknown: &mut Vec<String>,
    ) -> usize {
        let mut applied = 0;
        for (name, text) in incoming {
            match name.parse::<AgentRole>() {
                Ok(role) => {
                    target.insert(role, text);
                    applied += 1;
                }
                Err(_) => unknown.push(name),
            }
        }
        applied
    }
}
