//! Event transport port
//!
//! Defines the interface for the live consultation event stream. A transport
//! opens one [`EventConnection`] per round; the connection carries text frames
//! from the server and accepts JSON payloads going the other way.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur on the event transport
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Timed out connecting to event stream")]
    Timeout,

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Connection closed")]
    Closed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// What a connection delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportSignal {
    /// One inbound text frame (a JSON-encoded event, not yet decoded).
    Message(String),
    /// The transport hit an error; the connection may still deliver more.
    Error(String),
    /// The connection is gone. No further signals follow.
    Closed,
}

/// Opens event-stream connections for a session.
#[async_trait]
pub trait EventTransport: Send + Sync {
    /// Connect to the event stream of `session_id`.
    async fn connect(&self, session_id: &str) -> Result<Box<dyn EventConnection>, TransportError>;
}

/// A single live connection.
#[async_trait]
pub trait EventConnection: Send {
    /// Send one outbound JSON payload.
    async fn send(&mut self, payload: &Value) -> Result<(), TransportError>;

    /// Wait for the next signal.
    ///
    /// Keeps returning [`TransportSignal::Closed`] once the connection is gone.
    async fn recv(&mut self) -> TransportSignal;

    /// Close the connection. Idempotent.
    async fn close(&mut self);
}
