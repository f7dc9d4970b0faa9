//! Logging infrastructure — structured session recording.
//!
//! Provides [`JsonlEventRecorder`], a JSONL file writer that implements the
//! [`EventRecorder`](mdt_application::EventRecorder) port.

mod jsonl_recorder;

pub use jsonl_recorder::JsonlEventRecorder;
