//! Session parameters — controller timing.
//!
//! [`SessionParams`] groups the knobs that govern how the
//! [`ConsultationController`](crate::use_cases::consultation_controller::ConsultationController)
//! talks to its transport. These are application concerns, not board state.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionParams {
    /// Upper bound on opening the event stream. `None` waits indefinitely.
    pub connect_timeout: Option<Duration>,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            connect_timeout: Some(Duration::from_secs(10)),
        }
    }
}

impl SessionParams {
    pub fn with_connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout() {
        assert_eq!(
            SessionParams::default().connect_timeout,
            Some(Duration::from_secs(10))
        );
    }

    #[test]
    fn test_builder() {
        let params = SessionParams::default().with_connect_timeout(None);
        assert!(params.connect_timeout.is_none());
    }
}
