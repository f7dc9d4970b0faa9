//! Use cases (application services)

pub mod consultation_controller;
pub mod dispatch_event;
