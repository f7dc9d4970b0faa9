//! Consultation session.
//!
//! - [`entities::SessionStatus`] — identifier, connection state, running flag

pub mod entities;
