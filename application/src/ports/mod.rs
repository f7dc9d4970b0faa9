//! Port definitions (interfaces for external systems)

pub mod consultation_api;
pub mod event_recorder;
pub mod event_transport;
pub mod observer;
