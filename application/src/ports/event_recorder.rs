//! Port for recording the consultation as structured data.
//!
//! This is separate from `tracing`: tracing carries diagnostic messages for
//! humans, while an [`EventRecorder`] keeps a machine-readable record of
//! every inbound frame and lifecycle transition (e.g. for replay).

use serde_json::Value;

/// A single recorded item.
pub struct RecordedEvent {
    /// Record kind (e.g. "frame", "round_started", "stopped").
    pub kind: &'static str,
    pub payload: Value,
}

impl RecordedEvent {
    pub fn new(kind: &'static str, payload: Value) -> Self {
        Self { kind, payload }
    }
}

/// Sink for recorded events.
///
/// Synchronous and non-fallible so a failing sink never disturbs the
/// session; implementations swallow their own errors.
pub trait EventRecorder: Send + Sync {
    fn record(&self, event: RecordedEvent);
}

/// Recorder that drops everything.
pub struct NoEventRecorder;

impl EventRecorder for NoEventRecorder {
    fn record(&self, _event: RecordedEvent) {}
}
