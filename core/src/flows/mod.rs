//! View-local asynchronous state machines driven by `ApiClient` results.
//!
//! Each flow owns its view's state and an injected client. Flows catch every
//! failure at their boundary; nothing they return is a raw error.

pub mod contact;
pub mod testimonials;

pub use contact::{ContactField, ContactFlow, ContactForm, ContactState, SubmitOutcome};
pub use testimonials::{TestimonialFlow, TestimonialState};
