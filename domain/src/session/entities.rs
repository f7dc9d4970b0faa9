//! Session domain entities

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of the event-stream connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connected,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Disconnected => write!(f, "disconnected"),
            ConnectionStatus::Connected => write!(f, "connected"),
        }
    }
}

/// The live consultation attempt (Entity)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    /// Server-assigned identifier, once a session has been created.
    pub id: Option<String>,
    pub connection: ConnectionStatus,
    /// A round is in progress on the server.
    pub running: bool,
}

impl SessionStatus {
    pub fn is_connected(&self) -> bool {
        self.connection == ConnectionStatus::Connected
    }

    pub fn mark_connected(&mut self) {
        self.connection = ConnectionStatus::Connected;
    }

    /// Connection gone: nothing can be running any more.
    pub fn mark_disconnected(&mut self) {
        self.connection = ConnectionStatus::Disconnected;
        self.running = false;
    }
}
