//! Application layer for mdt-consult
//!
//! This crate contains the session controller, the event dispatcher, the
//! client-side consultation state, and the port definitions adapters
//! implement. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod state;
pub mod use_cases;

// Re-export commonly used types
pub use config::SessionParams;
pub use ports::{
    consultation_api::{CaseReceipt, CaseSubmission, ConsultationApi, ConsultationApiError},
    event_recorder::{EventRecorder, NoEventRecorder, RecordedEvent},
    event_transport::{EventConnection, EventTransport, TransportError, TransportSignal},
    observer::{ConsultationObserver, NoObserver},
};
pub use state::{
    ConsultationState,
    execution_log::{ExecutionLog, LogEntry, LogLevel},
};
pub use use_cases::consultation_controller::{ConsultationController, ControllerError};
pub use use_cases::dispatch_event::EventDispatcher;
