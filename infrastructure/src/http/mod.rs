//! HTTP adapters.

mod api;

pub use api::HttpConsultationApi;
