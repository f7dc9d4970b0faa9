//! Event dispatch
//!
//! Applies one decoded [`ConsultationEvent`] to the [`ConsultationState`].
//! Dispatch is synchronous and never fails: an event either applies fully or,
//! if the frame does not decode, is dropped with a debug trace.

use crate::ports::observer::ConsultationObserver;
use crate::state::ConsultationState;
use mdt_domain::{AgentRole, ConsultationEvent, MergeResolver, StructuredInfo};
use tracing::debug;

pub struct EventDispatcher;

impl EventDispatcher {
    /// Decode and apply one raw frame.
    ///
    /// Returns false when the frame was not a recognizable event.
    pub fn dispatch_frame(
        state: &mut ConsultationState,
        frame: &str,
        observer: &dyn ConsultationObserver,
    ) -> bool {
        match ConsultationEvent::parse(frame) {
            Ok(event) => {
                Self::dispatch(state, event, observer);
                true
            }
            Err(e) => {
                debug!("Ignoring frame: {}", e);
                false
            }
        }
    }

    /// Apply one event.
    pub fn dispatch(
        state: &mut ConsultationState,
        event: ConsultationEvent,
        observer: &dyn ConsultationObserver,
    ) {
        debug!("Dispatching {} event", event.kind());

        // Done and error both end the round; neither rolls anything back.
        if event.is_terminal() {
            state.session.running = false;
        }

        match event {
            ConsultationEvent::Status { role, status } => {
                state.agents.set(role, status);
                if status.is_working() {
                    if role == AgentRole::CaseOrganizer {
                        state.ledger.clear_structured_text();
                        state.ledger.replace_structured_info(StructuredInfo::new());
                    }
                    let round = state.ledger.current_mut();
                    round.opinions.remove(&role);
                    round.summaries.remove(&role);
                }
                observer.on_status_change(role, status);
            }
            ConsultationEvent::Token {
                role,
                content,
                target,
            } => {
                let destination = state.stream.append(
                    &mut state.ledger,
                    &mut state.transcript,
                    role,
                    target,
                    &content,
                );
                observer.on_token(role, destination, &content);
            }
            ConsultationEvent::NodeFinished { role, data } => {
                let report = MergeResolver::apply(&mut state.ledger, &mut state.transcript, data);
                if !report.unknown_roles.is_empty() {
                    debug!("Skipped unknown roles in node output: {:?}", report.unknown_roles);
                }
                observer.on_node_finished(role.as_deref(), &report);
            }
            ConsultationEvent::Log { content } => {
                observer.on_log(state.logs.info(content));
            }
            ConsultationEvent::Done => {
                observer.on_log(state.logs.info("Consultation round finished"));
                observer.on_round_finished(true);
            }
            ConsultationEvent::Error { content } => {
                observer.on_log(state.logs.error(format!("Error: {}", content)));
                observer.on_round_finished(false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::observer::NoObserver;
    use crate::state::execution_log::LogEntry;
    use mdt_domain::{AgentStatus, ChatRole, Destination};
    use serde_json::json;
    use std::sync::Mutex;

    fn apply(state: &mut ConsultationState, value: serde_json::Value) -> bool {
        EventDispatcher::dispatch_frame(state, &value.to_string(), &NoObserver)
    }

    #[test]
    fn test_organizer_stream_then_authoritative_info() {
        let mut state = ConsultationState::new();
        apply(&mut state, json!({"type": "status", "role": "Case Organizer", "content": "working"}));
        apply(&mut state, json!({"type": "token", "role": "Case Organizer", "content": "Age: "}));
        apply(&mut state, json!({"type": "token", "role": "Case Organizer", "content": "45"}));
        assert_eq!(state.ledger.structured_text(), "Age: 45");

        apply(
            &mut state,
            json!({"type": "node_finished", "role": "organizer", "data": {"structured_info": {"age": 45}}}),
        );

        assert_eq!(state.ledger.structured_info().get("age"), Some(&json!(45)));
        assert_eq!(state.ledger.structured_info().as_map().len(), 1);
        assert_eq!(state.ledger.structured_text(), "");
        assert_eq!(state.agents.status(AgentRole::CaseOrganizer), AgentStatus::Working);
    }

    #[test]
    fn test_moderator_chat_streams_then_finalizes_in_place() {
        let mut state = ConsultationState::new();
        apply(&mut state, json!({"type": "token", "role": "Moderator", "content": "Hello"}));
        apply(&mut state, json!({"type": "token", "role": "Moderator", "content": " there"}));

        assert_eq!(state.transcript.len(), 1);
        let msg = state.transcript.last().unwrap();
        assert_eq!(msg.role, ChatRole::Moderator);
        assert_eq!(msg.content, "Hello there");
        assert!(msg.model.is_empty());

        apply(
            &mut state,
            json!({"type": "node_finished", "data": {"chat_history": [
                {"role": "Moderator", "content": "Hello there, finalized.", "model": "m1"}
            ]}}),
        );

        assert_eq!(state.transcript.len(), 1);
        let msg = state.transcript.last().unwrap();
        assert_eq!(msg.content, "Hello there, finalized.");
        assert_eq!(msg.model, "m1");
    }

    #[test]
    fn test_organizer_working_clears_structured_info() {
        let mut state = ConsultationState::new();
        state
            .ledger
            .replace_structured_info(serde_json::from_value(json!({"age": 45})).unwrap());
        state.ledger.push_structured_text("stale");

        apply(&mut state, json!({"type": "status", "role": "Case Organizer", "content": "working"}));

        assert!(state.ledger.structured_info().is_empty());
        assert_eq!(state.ledger.structured_text(), "");
    }

    #[test]
    fn test_working_resets_role_text_even_on_repeat() {
        let mut state = ConsultationState::new();
        let working = json!({"type": "status", "role": "Radiologist", "content": "working"});

        apply(&mut state, working.clone());
        apply(&mut state, json!({"type": "token", "role": "Radiologist", "content": "GGO"}));
        apply(
            &mut state,
            json!({"type": "token", "role": "Radiologist", "content": "UIP", "target": "specialist_summary"}),
        );
        apply(&mut state, json!({"type": "token", "role": "Pathologist", "content": "kept"}));
        assert_eq!(state.ledger.current().opinion(AgentRole::Radiologist), "GGO");

        apply(&mut state, working);

        let round = state.ledger.current();
        assert_eq!(round.opinion(AgentRole::Radiologist), "");
        assert_eq!(round.specialist_summary(AgentRole::Radiologist), "");
        assert_eq!(round.opinion(AgentRole::Pathologist), "kept");
    }

    #[test]
    fn test_idle_status_keeps_text() {
        let mut state = ConsultationState::new();
        apply(&mut state, json!({"type": "token", "role": "Radiologist", "content": "GGO"}));
        apply(&mut state, json!({"type": "status", "role": "Radiologist", "content": "idle"}));
        assert_eq!(state.ledger.current().opinion(AgentRole::Radiologist), "GGO");
    }

    #[test]
    fn test_done_and_error_clear_running_without_rollback() {
        let mut state = ConsultationState::new();
        state.session.running = true;
        apply(&mut state, json!({"type": "token", "role": "Radiologist", "content": "X"}));
        apply(&mut state, json!({"type": "done"}));

        assert!(!state.session.running);
        assert_eq!(state.logs.last().unwrap().message, "Consultation round finished");
        assert_eq!(state.ledger.current().opinion(AgentRole::Radiologist), "X");

        state.session.running = true;
        apply(&mut state, json!({"type": "error", "content": "model quota exceeded"}));
        assert!(!state.session.running);
        let last = state.logs.last().unwrap();
        assert!(last.is_error());
        assert_eq!(last.message, "Error: model quota exceeded");
        assert_eq!(state.ledger.current().opinion(AgentRole::Radiologist), "X");
    }

    #[test]
    fn test_log_event_appends_info() {
        let mut state = ConsultationState::new();
        apply(&mut state, json!({"type": "log", "content": "Organizer started"}));
        assert_eq!(state.logs.messages().collect::<Vec<_>>(), vec!["Organizer started"]);
        assert!(!state.logs.last().unwrap().is_error());
    }

    #[test]
    fn test_malformed_frames_change_nothing() {
        let mut state = ConsultationState::new();
        apply(&mut state, json!({"type": "token", "role": "Radiologist", "content": "X"}));
        let before = (state.ledger.clone(), state.transcript.clone(), state.agents.clone());

        let frames = [
            json!({"type": "heartbeat"}),
            json!({"type": "status", "role": "Nephrologist", "content": "working"}),
            json!({"type": "status", "role": "Radiologist", "content": "sleeping"}),
            json!({"type": "token", "role": "Radiologist"}),
            json!({"content": "no type"}),
        ];
        for frame in frames {
            assert!(!apply(&mut state, frame));
        }
        assert!(!EventDispatcher::dispatch_frame(&mut state, "{not json", &NoObserver));

        assert_eq!(state.ledger, before.0);
        assert_eq!(state.transcript, before.1);
        assert_eq!(state.agents, before.2);
        assert!(state.logs.is_empty());
    }

    #[derive(Default)]
    struct Recording {
        calls: Mutex<Vec<String>>,
    }

    impl ConsultationObserver for Recording {
        fn on_status_change(&self, role: AgentRole, status: AgentStatus) {
            self.calls.lock().unwrap().push(format!("status {} {}", role, status));
        }
        fn on_token(&self, role: AgentRole, destination: Destination, content: &str) {
            self.calls
                .lock()
                .unwrap()
                .push(format!("token {} {:?} {}", role, destination, content));
        }
        fn on_log(&self, entry: &LogEntry) {
            self.calls.lock().unwrap().push(format!("log {}", entry.message));
        }
        fn on_round_finished(&self, success: bool) {
            self.calls.lock().unwrap().push(format!("finished {}", success));
        }
    }

    #[test]
    fn test_observer_sees_each_applied_event() {
        let mut state = ConsultationState::new();
        let observer = Recording::default();
        for frame in [
            json!({"type": "status", "role": "Moderator", "content": "working"}),
            json!({"type": "token", "role": "Moderator", "content": "Hi", "target": "summary"}),
            json!({"type": "bogus"}),
            json!({"type": "done"}),
        ] {
            EventDispatcher::dispatch_frame(&mut state, &frame.to_string(), &observer);
        }

        assert_eq!(
            *observer.calls.lock().unwrap(),
            vec![
                "status Moderator working".to_string(),
                "token Moderator ModeratorSummary Hi".to_string(),
                "log Consultation round finished".to_string(),
                "finished true".to_string(),
            ]
        );
    }
}
