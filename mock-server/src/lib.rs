//! In-memory stand-in for the EduManage REST backend.
//!
//! Serves the same routes under `/api` with the same envelope and error
//! shapes, backed by a `Store` behind a lock. Used by the client crate's
//! integration tests and for local development.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

pub mod models;
mod seed;

pub use models::{Contact, ContactStatus, Envelope, SchoolStats, Testimonial};
use models::{CreateContact, CreateTestimonial, UpdateStats};

/// Everything the backend persists. Vectors keep insertion order, so
/// "newest first" is reverse iteration.
#[derive(Debug, Default)]
pub struct Store {
    pub contacts: Vec<Contact>,
    pub testimonials: Vec<Testimonial>,
    pub stats: Option<SchoolStats>,
}

pub type Db = Arc<RwLock<Store>>;

/// Error response in the backend's `{"detail": ...}` shape.
#[derive(Debug)]
pub struct HttpError {
    pub status: StatusCode,
    pub detail: String,
}

impl HttpError {
    pub fn unprocessable(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail: detail.into(),
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

pub fn app() -> Router {
    app_with_store(Store::default())
}

pub fn app_with_store(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/api", get(health))
        .route("/api/", get(health))
        .route("/api/contacts/", get(list_contacts).post(create_contact))
        .route("/api/contacts/{id}/status", patch(update_contact_status))
        .route("/api/testimonials/", get(list_testimonials).post(create_testimonial))
        .route("/api/testimonials/{id}/toggle", patch(toggle_testimonial))
        .route("/api/stats/", get(get_stats).patch(update_stats))
        .with_state(db)
}

pub async fn run(listener: TcpListener, store: Store) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_store(store)).await
}

async fn health() -> Json<Value> {
    Json(json!({
        "message": "School Management System API is running",
        "status": "healthy",
    }))
}

// --- contacts ---

async fn create_contact(
    State(db): State<Db>,
    Json(input): Json<CreateContact>,
) -> Result<Json<Envelope<Contact>>, HttpError> {
    let input = input.validate()?;
    let now = Utc::now();
    let contact = Contact {
        id: Uuid::new_v4(),
        name: input.name,
        email: input.email,
        school: input.school,
        phone: input.phone,
        message: input.message,
        status: ContactStatus::New,
        created_at: now,
        updated_at: now,
    };
    db.write().await.contacts.push(contact.clone());
    info!(id = %contact.id, "contact submission created");
    Ok(Json(Envelope::ok(contact).with_message(
        "Thank you for your message! We'll get back to you within 24 hours.",
    )))
}

#[derive(Debug, Deserialize)]
struct ContactListParams {
    status: Option<ContactStatus>,
    #[serde(default = "default_contact_limit")]
    limit: u32,
    #[serde(default = "default_page")]
    page: u32,
}

fn default_contact_limit() -> u32 {
    50
}

fn default_page() -> u32 {
    1
}

async fn list_contacts(
    State(db): State<Db>,
    Query(params): Query<ContactListParams>,
) -> Result<Json<Envelope<Value>>, HttpError> {
    if !(1..=100).contains(&params.limit) || params.page < 1 {
        return Err(HttpError::unprocessable("limit must be 1-100 and page at least 1"));
    }
    let store = db.read().await;
    let matching: Vec<&Contact> = store
        .contacts
        .iter()
        .rev()
        .filter(|c| params.status.map_or(true, |s| c.status == s))
        .collect();
    let total = matching.len() as u64;
    let limit = u64::from(params.limit);
    let skip = (params.page as usize - 1) * params.limit as usize;
    let submissions: Vec<&Contact> = matching.into_iter().skip(skip).take(params.limit as usize).collect();

    Ok(Json(Envelope::ok(json!({
        "submissions": submissions,
        "pagination": {
            "page": params.page,
            "limit": params.limit,
            "total": total,
            "pages": total.div_ceil(limit),
        },
    }))))
}

#[derive(Debug, Deserialize)]
struct StatusParams {
    status: ContactStatus,
}

async fn update_contact_status(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Query(params): Query<StatusParams>,
) -> Result<Json<Envelope<Value>>, HttpError> {
    let mut store = db.write().await;
    let contact = store
        .contacts
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or_else(|| HttpError::not_found("Contact submission not found"))?;
    contact.status = params.status;
    contact.updated_at = Utc::now();
    Ok(Json(Envelope {
        success: true,
        message: Some(format!("Contact status updated to {}", params.status.as_str())),
        data: None,
    }))
}

// --- testimonials ---

#[derive(Debug, Deserialize)]
struct TestimonialListParams {
    #[serde(default = "default_testimonial_limit")]
    limit: u32,
    #[serde(default = "default_active")]
    active: bool,
}

fn default_testimonial_limit() -> u32 {
    6
}

fn default_active() -> bool {
    true
}

async fn list_testimonials(
    State(db): State<Db>,
    Query(params): Query<TestimonialListParams>,
) -> Result<Json<Envelope<Vec<Testimonial>>>, HttpError> {
    if !(1..=20).contains(&params.limit) {
        return Err(HttpError::unprocessable("limit must be between 1 and 20"));
    }
    let store = db.read().await;
    let testimonials: Vec<Testimonial> = store
        .testimonials
        .iter()
        .rev()
        .filter(|t| !params.active || t.is_active)
        .take(params.limit as usize)
        .cloned()
        .collect();
    info!(count = testimonials.len(), "retrieved testimonials");
    Ok(Json(Envelope::ok(testimonials)))
}

async fn create_testimonial(
    State(db): State<Db>,
    Json(input): Json<CreateTestimonial>,
) -> Result<Json<Envelope<Testimonial>>, HttpError> {
    let testimonial = input.validate()?.into_testimonial();
    db.write().await.testimonials.push(testimonial.clone());
    info!(id = %testimonial.id, "testimonial created");
    Ok(Json(Envelope::ok(testimonial).with_message("Testimonial created successfully")))
}

async fn toggle_testimonial(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<Value>>, HttpError> {
    let mut store = db.write().await;
    let testimonial = store
        .testimonials
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| HttpError::not_found("Testimonial not found"))?;
    testimonial.is_active = !testimonial.is_active;
    testimonial.updated_at = Utc::now();
    let verb = if testimonial.is_active { "activated" } else { "deactivated" };
    Ok(Json(Envelope {
        success: true,
        message: Some(format!("Testimonial {verb}")),
        data: None,
    }))
}

// --- stats ---

async fn get_stats(State(db): State<Db>) -> Json<Envelope<SchoolStats>> {
    let mut store = db.write().await;
    let stats = store
        .stats
        .get_or_insert_with(|| {
            info!("created default school statistics");
            SchoolStats::default()
        })
        .clone();
    Json(Envelope::ok(stats))
}

async fn update_stats(State(db): State<Db>, Json(input): Json<UpdateStats>) -> Json<Envelope<SchoolStats>> {
    let mut store = db.write().await;
    let stats = store.stats.get_or_insert_with(SchoolStats::default);
    input.apply(stats);
    Json(Envelope::ok(stats.clone()).with_message("Statistics updated successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_serializes_all_fields() {
        let json = serde_json::to_value(Envelope::<Value>::ok(json!([])).with_message("hi")).unwrap();
        assert_eq!(json, json!({"success": true, "message": "hi", "data": []}));
    }

    #[test]
    fn contact_status_parses_snake_case() {
        let status: ContactStatus = serde_json::from_str(r#""in_progress""#).unwrap();
        assert_eq!(status, ContactStatus::InProgress);
    }

    #[test]
    fn seeded_store_has_testimonials_and_stats() {
        let store = Store::seeded();
        assert_eq!(store.testimonials.len(), 6);
        assert!(store.testimonials.iter().all(|t| t.is_active && t.rating == 5));
        assert!(store.stats.is_some());
        assert!(store.contacts.is_empty());
    }

    #[test]
    fn http_error_uses_detail_shape() {
        let response = HttpError::not_found("Testimonial not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
