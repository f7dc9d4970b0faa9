//! Streaming text accumulation.
//!
//! Each token is appended to exactly one destination chosen by
//! [`Destination::route`], and mirrored as a `[role] content` line in the
//! diagnostic stream.

use crate::agent::role::AgentRole;
use crate::chat::transcript::Transcript;
use crate::event::TokenTarget;
use crate::round::ledger::RoundLedger;

/// Buffer a streamed token lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Moderator's final conclusion on the board.
    ModeratorSummary,
    /// Open Moderator message in the chat transcript.
    Chat,
    /// Case Organizer's structured-info scratch text.
    StructuredText,
    DiscussionNotes,
    SpecialistSummary(AgentRole),
    Opinion(AgentRole),
}

impl Destination {
    /// Pick the destination for a token from `role` with an optional `target`.
    pub fn route(role: AgentRole, target: Option<TokenTarget>) -> Self {
        match (role, target) {
            (AgentRole::Moderator, Some(TokenTarget::Summary)) => Destination::ModeratorSummary,
            (AgentRole::Moderator, _) => Destination::Chat,
            (AgentRole::CaseOrganizer, _) => Destination::StructuredText,
            (AgentRole::TeamDiscussion, _) => Destination::DiscussionNotes,
            (role, Some(TokenTarget::SpecialistSummary)) => Destination::SpecialistSummary(role),
            (role, _) => Destination::Opinion(role),
        }
    }
}

/// Appends streamed fragments and keeps the diagnostic stream.
#[derive(Debug, Clone, Default)]
pub struct StreamAccumulator {
    diagnostics: Vec<String>,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every token seen this session, formatted `[role] content`.
    ///
    /// Unbounded for the session's lifetime; it has no effect on state.
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    /// Append `content` to the buffer selected for (`role`, `target`).
    pub fn append(
        &mut self,
        ledger: &mut RoundLedger,
        transcript: &mut Transcript,
        role: AgentRole,
        target: Option<TokenTarget>,
        content: &str,
    ) -> Destination {
        let destination = Destination::route(role, target);
        match destination {
            Destination::ModeratorSummary => ledger.current_mut().summary.push_str(content),
            Destination::Chat => transcript.append_moderator_token(content),
            Destination::StructuredText => ledger.push_structured_text(content),
            Destination::DiscussionNotes => {
                ledger.current_mut().discussion_notes.push_str(content)
            }
            Destination::SpecialistSummary(role) => ledger
                .current_mut()
                .summaries
                .entry(role)
                .or_default()
                .push_str(content),
            Destination::Opinion(role) => ledger
                .current_mut()
                .opinions
                .entry(role)
                .or_default()
                .push_str(content),
        }
        self.diagnostics.push(format!("[{}] {}", role, content));
        destination
    }
}
