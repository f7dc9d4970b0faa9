//! Application-layer configuration.

pub mod session_params;

pub use session_params::SessionParams;
