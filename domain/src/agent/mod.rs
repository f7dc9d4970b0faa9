//! Consultation agents.
//!
//! - [`role::AgentRole`] / [`role::AgentStatus`] — who takes part and what they are doing
//! - [`roster::AgentRoster`] — status of every agent
//! - [`model_config::ConsultationConfig`] — agent selection and model overrides

pub mod model_config;
pub mod role;
pub mod roster;
