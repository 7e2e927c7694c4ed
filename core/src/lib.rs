//! API client core for the EduManage marketing site.
//!
//! # Overview
//! A thin REST client for the site's backend plus the two view-model flows
//! that consume it: contact form submission and the testimonial list.
//!
//! # Design
//! - `ApiClient` is constructed explicitly from `ClientConfig` and shared by
//!   `Arc`; there is no global instance.
//! - Each endpoint is split into `build_*` (produces an `HttpRequest`) and
//!   `parse_envelope` (consumes an `HttpResponse`); the `Transport` in
//!   between is injectable.
//! - All failures leave the client as a `NormalizedError`. Flows turn those
//!   into `Notification`s or a settled error state.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod flows;
pub mod http;
pub mod notify;
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

pub use client::{parse_envelope, parse_health, ApiClient, RequestOptions};
pub use config::ClientConfig;
pub use error::{ConfigError, NormalizedError, TransportError};
pub use flows::{ContactFlow, SubmitOutcome, TestimonialFlow, TestimonialState};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use notify::{LogNotifier, Notification, Notifier, Severity};
pub use transport::{ReqwestTransport, Transport};
pub use types::{
    ApiEnvelope, ContactPage, ContactQuery, ContactRecord, ContactStatus, ContactSubmission, HealthStatus,
    NewTestimonial, Pagination, SchoolStats, StatsUpdate, Testimonial, TestimonialQuery,
};
