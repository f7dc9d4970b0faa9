//! User-facing chat transcript.

pub mod transcript;
