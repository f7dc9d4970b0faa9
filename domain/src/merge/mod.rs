//! Reconciliation of authoritative node output with streamed partials.

pub mod resolver;
