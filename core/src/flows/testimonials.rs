//! Testimonial list flow: `Loading -> (Loaded | Failed)`, entered once.
//!
//! The fetch runs on activation only. There is no polling, no automatic
//! retry and no invalidation; a fresh flow instance is the reload path.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::client::ApiClient;
use crate::transport::Transport;
use crate::types::{Testimonial, TestimonialQuery};

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load testimonials.";
pub const NO_TESTIMONIALS_MESSAGE: &str = "No testimonials available.";

/// Number of entries shown in the "trusted by" strip.
pub const TRUSTED_BY_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestimonialState {
    Loading,
    Loaded(Vec<Testimonial>),
    Failed(String),
}

pub struct TestimonialFlow<T> {
    client: Arc<ApiClient<T>>,
    query: TestimonialQuery,
    state: TestimonialState,
}

impl<T: Transport> TestimonialFlow<T> {
    pub fn new(client: Arc<ApiClient<T>>) -> Self {
        Self::with_query(client, TestimonialQuery::default())
    }

    pub fn with_query(client: Arc<ApiClient<T>>, query: TestimonialQuery) -> Self {
        Self {
            client,
            query,
            state: TestimonialState::Loading,
        }
    }

    pub fn state(&self) -> &TestimonialState {
        &self.state
    }

    /// Run the single fetch. Once settled, later calls return the settled
    /// state without touching the network.
    pub async fn activate(&mut self) -> &TestimonialState {
        if self.state != TestimonialState::Loading {
            return &self.state;
        }

        self.state = match self.client.list_testimonials(&self.query).await {
            Ok(envelope) if envelope.success => match envelope.data {
                Some(items) => {
                    debug!(count = items.len(), "testimonials loaded");
                    TestimonialState::Loaded(items)
                }
                None => TestimonialState::Failed(NO_TESTIMONIALS_MESSAGE.to_string()),
            },
            Ok(envelope) => TestimonialState::Failed(
                envelope
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| LOAD_FAILED_MESSAGE.to_string()),
            ),
            Err(err) => TestimonialState::Failed(err.message),
        };
        if let TestimonialState::Failed(reason) = &self.state {
            warn!(%reason, "testimonials failed to load");
        }
        &self.state
    }

    /// Number of placeholder cards to render while the fetch is pending.
    pub fn placeholder_count(&self) -> usize {
        match self.state {
            TestimonialState::Loading => self.query.limit as usize,
            _ => 0,
        }
    }

    /// The full list; empty unless loaded.
    pub fn testimonials(&self) -> &[Testimonial] {
        match &self.state {
            TestimonialState::Loaded(items) => items,
            _ => &[],
        }
    }

    /// The first few loaded entries, for the "trusted by" strip.
    pub fn trusted_by(&self) -> &[Testimonial] {
        let items = self.testimonials();
        &items[..items.len().min(TRUSTED_BY_COUNT)]
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            TestimonialState::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}
