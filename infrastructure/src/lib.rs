//! Infrastructure layer for mdt-consult
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the TCP event stream, the HTTP consultation API, the
//! JSONL event recorder, and configuration file loading.

pub mod config;
pub mod http;
pub mod logging;
pub mod transport;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileAgentsConfig, FileConfig, FileOutputConfig,
    FileServerConfig,
};
pub use http::HttpConsultationApi;
pub use logging::JsonlEventRecorder;
pub use transport::{TcpEventConnection, TcpEventTransport};
