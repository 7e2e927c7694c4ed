//! HTTP client wrapper for the EduManage API.
//!
//! # Design
//! `ApiClient` holds a `base_url` and an injected `Transport`, and carries no
//! mutable state between calls. Each endpoint has a pure `build_*` method
//! producing an `HttpRequest`; responses are decoded by `parse_envelope`.
//! Between the two sits `send`, the single place that logs every attempt and
//! outcome and turns every failure into a `NormalizedError`. Nothing that
//! leaves this module is a raw transport error.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::config::ClientConfig;
use crate::error::{decode_body, NormalizedError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{
    ApiEnvelope, ContactPage, ContactQuery, ContactStatus, ContactSubmission, HealthStatus, NewTestimonial, SchoolStats, StatsUpdate, Testimonial, TestimonialQuery,
};

/// Options for an ad hoc `request`: query parameters and an optional JSON body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub params: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestOptions {
    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Shared client for every outbound call. Construct once and hand an
/// `Arc<ApiClient<_>>` to each flow.
#[derive(Debug, Clone)]
pub struct ApiClient<T = ReqwestTransport> {
    base_url: String,
    transport: T,
}

impl ApiClient<ReqwestTransport> {
    /// Build the production client. No network activity happens here.
    pub fn configure(config: &ClientConfig) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(config)?;
        Ok(Self::with_transport(&config.base_address(), transport))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolve a path relative to the configured base address.
    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    // -----------------------------------------------------------------------
    // Request builders
    // -----------------------------------------------------------------------

    pub fn build_submit_contact(&self, input: &ContactSubmission) -> Result<HttpRequest, NormalizedError> {
        json_request(HttpMethod::Post, self.url("/contacts/"), input)
    }

    pub fn build_list_contacts(&self, query: &ContactQuery) -> HttpRequest {
        let mut req = HttpRequest::new(HttpMethod::Get, self.url("/contacts/"));
        if let Some(status) = query.status {
            req = req.with_query("status", status.as_str());
        }
        req.with_query("limit", query.limit).with_query("page", query.page)
    }

    pub fn build_update_contact_status(&self, id: &str, status: ContactStatus) -> HttpRequest {
        HttpRequest::new(HttpMethod::Patch, self.url(&format!("/contacts/{id}/status")))
            .with_query("status", status.as_str())
    }

    pub fn build_list_testimonials(&self, query: &TestimonialQuery) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, self.url("/testimonials/"))
            .with_query("limit", query.limit)
            .with_query("active", query.active)
    }

    pub fn build_create_testimonial(&self, input: &NewTestimonial) -> Result<HttpRequest, NormalizedError> {
        json_request(HttpMethod::Post, self.url("/testimonials/"), input)
    }

    pub fn build_toggle_testimonial(&self, id: &str) -> HttpRequest {
        HttpRequest::new(HttpMethod::Patch, self.url(&format!("/testimonials/{id}/toggle")))
    }

    pub fn build_get_stats(&self) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, self.url("/stats/"))
    }

    pub fn build_update_stats(&self, input: &StatsUpdate) -> Result<HttpRequest, NormalizedError> {
        json_request(HttpMethod::Patch, self.url("/stats/"), input)
    }

    pub fn build_health(&self) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, self.url("/"))
    }

    // -----------------------------------------------------------------------
    // Transport decorator
    // -----------------------------------------------------------------------

    /// Issue one call to `path` under the base address and return the
    /// decoded body.
    ///
    /// The body is JSON when it parses, the raw text as a JSON string
    /// otherwise. The envelope's `success` flag is not inspected here.
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        options: RequestOptions,
    ) -> Result<Value, NormalizedError> {
        let mut request = match &options.body {
            Some(body) => json_request(method, self.url(path), body)?,
            None => HttpRequest::new(method, self.url(path)),
        };
        for (key, value) in options.params {
            request = request.with_query(&key, value);
        }
        let response = self.send(request).await?;
        Ok(decode_body(&response.body))
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, NormalizedError> {
        let method = request.method;
        let path = request.path.clone();
        debug!(%method, %path, "API request");

        match self.transport.execute(request).await {
            Ok(response) if response.is_success() => {
                info!(%method, %path, status = response.status, "API response");
                Ok(response)
            }
            Ok(response) => {
                let err = NormalizedError::from_response(response.status, &response.body);
                warn!(%method, %path, status = err.status, message = %err.message, "API error response");
                Err(err)
            }
            Err(TransportError::NoResponse(reason)) => {
                error!(%method, %path, %reason, "API network error");
                Err(NormalizedError::no_response())
            }
            Err(TransportError::RequestFailed(reason)) => {
                error!(%method, %path, %reason, "API request error");
                Err(NormalizedError::request_failed(&reason))
            }
        }
    }

    // -----------------------------------------------------------------------
    // Endpoints
    // -----------------------------------------------------------------------

    /// Submit the contact form. `data` is left undecoded: only `success`
    /// decides the outcome, whatever shape the stored record comes back in.
    pub async fn submit_contact(&self, input: &ContactSubmission) -> Result<ApiEnvelope<Value>, NormalizedError> {
        let req = self.build_submit_contact(input)?;
        parse_envelope(&self.send(req).await?)
    }

    pub async fn list_contacts(&self, query: &ContactQuery) -> Result<ApiEnvelope<ContactPage>, NormalizedError> {
        parse_envelope(&self.send(self.build_list_contacts(query)).await?)
    }

    pub async fn update_contact_status(
        &self,
        id: &str,
        status: ContactStatus,
    ) -> Result<ApiEnvelope<Value>, NormalizedError> {
        parse_envelope(&self.send(self.build_update_contact_status(id, status)).await?)
    }

    pub async fn list_testimonials(
        &self,
        query: &TestimonialQuery,
    ) -> Result<ApiEnvelope<Vec<Testimonial>>, NormalizedError> {
        parse_envelope(&self.send(self.build_list_testimonials(query)).await?)
    }

    pub async fn create_testimonial(
        &self,
        input: &NewTestimonial,
    ) -> Result<ApiEnvelope<Testimonial>, NormalizedError> {
        let req = self.build_create_testimonial(input)?;
        parse_envelope(&self.send(req).await?)
    }

    pub async fn toggle_testimonial(&self, id: &str) -> Result<ApiEnvelope<Value>, NormalizedError> {
        parse_envelope(&self.send(self.build_toggle_testimonial(id)).await?)
    }

    pub async fn get_stats(&self) -> Result<ApiEnvelope<SchoolStats>, NormalizedError> {
        parse_envelope(&self.send(self.build_get_stats()).await?)
    }

    pub async fn update_stats(&self, input: &StatsUpdate) -> Result<ApiEnvelope<SchoolStats>, NormalizedError> {
        let req = self.build_update_stats(input)?;
        parse_envelope(&self.send(req).await?)
    }

    pub async fn health(&self) -> Result<HealthStatus, NormalizedError> {
        parse_health(&self.send(self.build_health()).await?)
    }
}

fn json_request<B: Serialize>(method: HttpMethod, path: String, input: &B) -> Result<HttpRequest, NormalizedError> {
    let body = serde_json::to_string(input).map_err(|e| NormalizedError::request_failed(&e.to_string()))?;
    Ok(HttpRequest::new(method, path).with_json_body(body))
}

/// Decode an envelope response.
///
/// The status check only matters for responses obtained outside `send`,
/// which has already normalized every non-2xx answer.
pub fn parse_envelope<D: DeserializeOwned>(response: &HttpResponse) -> Result<ApiEnvelope<D>, NormalizedError> {
    parse_body(response)
}

/// Decode the bare health object. Status handling as for `parse_envelope`.
pub fn parse_health(response: &HttpResponse) -> Result<HealthStatus, NormalizedError> {
    parse_body(response)
}

fn parse_body<D: DeserializeOwned>(response: &HttpResponse) -> Result<D, NormalizedError> {
    if !response.is_success() {
        return Err(NormalizedError::from_response(response.status, &response.body));
    }
    serde_json::from_str(&response.body)
        .map_err(|_| NormalizedError::unexpected_format(response.status, &response.body))
}
