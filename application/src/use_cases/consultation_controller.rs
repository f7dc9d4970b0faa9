//! Consultation session controller
//!
//! Owns the [`ConsultationState`] and the single live event connection.
//! Drives the round lifecycle: start (archive + snapshot, connect, send the
//! agent configuration), pump inbound signals through the dispatcher, and
//! stop (close + rollback).

use crate::config::SessionParams;
use crate::ports::consultation_api::{
    CaseReceipt, CaseSubmission, ConsultationApi, ConsultationApiError,
};
use crate::ports::event_recorder::{EventRecorder, NoEventRecorder, RecordedEvent};
use crate::ports::event_transport::{
    EventConnection, EventTransport, TransportError, TransportSignal,
};
use crate::ports::observer::{ConsultationObserver, NoObserver};
use crate::state::ConsultationState;
use crate::use_cases::dispatch_event::EventDispatcher;
use mdt_domain::{ConsultationConfig, DomainError};
use serde_json::{Value, json};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors surfaced by the controller
#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("No session has been created")]
    NoSession,

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Consultation API error: {0}")]
    Api(#[from] ConsultationApiError),
}

pub struct ConsultationController<T: EventTransport + 'static, A: ConsultationApi + 'static> {
    transport: Arc<T>,
    api: Arc<A>,
    params: SessionParams,
    observer: Arc<dyn ConsultationObserver>,
    recorder: Arc<dyn EventRecorder>,
    state: ConsultationState,
    connection: Option<Box<dyn EventConnection>>,
}

impl<T: EventTransport + 'static, A: ConsultationApi + 'static> ConsultationController<T, A> {
    pub fn new(transport: Arc<T>, api: Arc<A>) -> Self {
        Self {
            transport,
            api,
            params: SessionParams::default(),
            observer: Arc::new(NoObserver),
            recorder: Arc::new(NoEventRecorder),
            state: ConsultationState::new(),
            connection: None,
        }
    }

    pub fn with_params(mut self, params: SessionParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn ConsultationObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_recorder(mut self, recorder: Arc<dyn EventRecorder>) -> Self {
        self.recorder = recorder;
        self
    }

    pub fn state(&self) -> &ConsultationState {
        &self.state
    }

    pub fn into_state(self) -> ConsultationState {
        self.state
    }

    /// Whether a connection is live.
    pub fn is_active(&self) -> bool {
        self.connection.is_some()
    }

    /// Return the current session id, creating a session if there is none.
    pub async fn ensure_session(&mut self) -> Result<String, ControllerError> {
        if let Some(id) = &self.state.session.id {
            return Ok(id.clone());
        }
        match self.api.create_session().await {
            Ok(id) => {
                info!("Created session {}", id);
                self.log_info(format!("Session created: {}", id));
                self.state.session.id = Some(id.clone());
                Ok(id)
            }
            Err(e) => {
                self.log_error(format!("Failed to create session: {}", e));
                Err(e.into())
            }
        }
    }

    /// Run one full round request: make sure a session exists, submit the
    /// case text, then open the event stream.
    ///
    /// The server starts the round as soon as it receives the agent
    /// configuration, so the case must already be stored by then.
    pub async fn consult(
        &mut self,
        case_text: &str,
        config: &ConsultationConfig,
    ) -> Result<CaseReceipt, ControllerError> {
        if config.selected_agents.is_empty() {
            return Err(DomainError::NoAgents.into());
        }
        let session_id = self.ensure_session().await?;
        let receipt = self.submit_case(case_text, config).await?;
        self.start(&session_id, config).await?;
        Ok(receipt)
    }

    /// Submit case text to the current session.
    ///
    /// The text is added to the transcript as a `user` message once the
    /// server has accepted it.
    pub async fn submit_case(
        &mut self,
        case_text: &str,
        config: &ConsultationConfig,
    ) -> Result<CaseReceipt, ControllerError> {
        if config.selected_agents.is_empty() {
            return Err(DomainError::NoAgents.into());
        }
        let session_id = self.ensure_session().await?;
        let submission = CaseSubmission::new(case_text, config);

        let receipt = match self.api.submit_case(&session_id, &submission).await {
            Ok(receipt) => receipt,
            Err(e) => {
                self.log_error(format!("Case submission failed: {}", e));
                return Err(e.into());
            }
        };

        self.state.transcript.push_user(case_text);
        self.log_info(format!("Case submitted (server round {})", receipt.round));
        self.recorder.record(RecordedEvent::new(
            "case_submitted",
            json!({
                "session_id": session_id,
                "case_text": case_text,
                "round": receipt.round,
            }),
        ));
        Ok(receipt)
    }

    /// Open the event stream for `session_id` and start a round.
    ///
    /// Any previous connection is closed first without rollback.
    pub async fn start(
        &mut self,
        session_id: &str,
        config: &ConsultationConfig,
    ) -> Result<(), ControllerError> {
        if let Some(mut previous) = self.connection.take() {
            debug!("Closing previous connection before starting");
            previous.close().await;
            self.state.session.mark_disconnected();
            self.observer.on_connection_change(false);
        }
        self.state.session.id = Some(session_id.to_string());

        if let Some(archived) = self.state.ledger.begin_round() {
            info!("Archived round {}", archived);
        }

        let connect = self.transport.connect(session_id);
        let result = match self.params.connect_timeout {
            Some(limit) => tokio::time::timeout(limit, connect)
                .await
                .unwrap_or(Err(TransportError::Timeout)),
            None => connect.await,
        };
        let mut connection = match result {
            Ok(connection) => connection,
            Err(e) => {
                warn!("Connection to session {} failed: {}", session_id, e);
                self.log_error(format!("Connection failed: {}", e));
                return Err(e.into());
            }
        };

        self.state.session.mark_connected();
        self.observer.on_connection_change(true);
        self.log_info("Connected");

        if let Err(e) = connection.send(&config.to_payload()).await {
            warn!("Failed to send configuration: {}", e);
            connection.close().await;
            self.state.session.mark_disconnected();
            self.observer.on_connection_change(false);
            self.log_error(format!("Failed to send configuration: {}", e));
            return Err(e.into());
        }

        self.state.session.running = true;
        self.connection = Some(connection);
        self.recorder.record(RecordedEvent::new(
            "round_started",
            json!({
                "session_id": session_id,
                "round": self.state.ledger.round_number(),
            }),
        ));
        info!(
            "Round {} started on session {}",
            self.state.ledger.round_number(),
            session_id
        );
        Ok(())
    }

    /// Wait for one signal from the connection and apply it.
    ///
    /// Returns false once there is no live connection. Cancel-safe.
    pub async fn pump(&mut self) -> bool {
        let Some(connection) = self.connection.as_mut() else {
            return false;
        };
        let signal = connection.recv().await;
        self.handle_signal(signal);
        self.connection.is_some()
    }

    /// Pump until the round stops running or the connection goes away.
    pub async fn run_round(&mut self) {
        while self.state.session.running && self.pump().await {}
    }

    /// Pump until the connection closes.
    pub async fn run_until_closed(&mut self) {
        while self.pump().await {}
    }

    /// Cancel the running round.
    ///
    /// Closes the connection, rolls the board back to the start of the round
    /// and idles every agent. Returns false (and does nothing) when no
    /// connection is live.
    pub async fn stop(&mut self) -> bool {
        let Some(mut connection) = self.connection.take() else {
            debug!("Stop requested with no live connection");
            return false;
        };
        connection.close().await;

        self.state.ledger.rollback();
        self.state.agents.reset_idle();
        self.state.session.mark_disconnected();
        self.observer.on_connection_change(false);
        self.log_info("Session stopped by user (rolled back)");
        self.recorder.record(RecordedEvent::new(
            "stopped",
            json!({ "round": self.state.ledger.round_number() }),
        ));
        info!("Session stopped by user");
        true
    }

    fn handle_signal(&mut self, signal: TransportSignal) {
        match signal {
            TransportSignal::Message(frame) => {
                debug!("Inbound frame: {} bytes", frame.len());
                let payload = serde_json::from_str::<Value>(&frame)
                    .unwrap_or_else(|_| Value::String(frame.clone()));
                self.recorder
                    .record(RecordedEvent::new("frame", payload));
                EventDispatcher::dispatch_frame(&mut self.state, &frame, self.observer.as_ref());
            }
            TransportSignal::Error(message) => {
                warn!("Transport error: {}", message);
                self.state.session.running = false;
                self.log_error(format!("Transport error: {}", message));
            }
            TransportSignal::Closed => {
                self.connection = None;
                self.state.session.mark_disconnected();
                self.observer.on_connection_change(false);
                self.log_info("Disconnected");
                self.recorder.record(RecordedEvent::new(
                    "disconnected",
                    json!({ "round": self.state.ledger.round_number() }),
                ));
                info!("Event stream closed");
            }
        }
    }

    fn log_info(&mut self, message: impl Into<String>) {
        let entry = self.state.logs.info(message);
        self.observer.on_log(entry);
    }

    fn log_error(&mut self, message: impl Into<String>) {
        let entry = self.state.logs.error(message);
        self.observer.on_log(entry);
    }
}
