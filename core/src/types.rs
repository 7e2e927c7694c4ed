//! Domain DTOs for the EduManage API.
//!
//! # Design
//! These mirror the backend's JSON schema but are defined independently of
//! the mock-server crate; integration tests catch schema drift. Outbound
//! payloads keep optional fields as explicit `null` where the backend
//! distinguishes "not provided" from "empty", and omit them where the
//! backend treats absence as "leave unchanged".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The `{success, message, data}` wrapper every endpoint answers with.
///
/// Transport success says nothing about `success`; callers check both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

/// Contact form payload. `school` and `phone` serialize as `null` when
/// absent rather than being skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub school: Option<String>,
    pub phone: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    New,
    InProgress,
    Resolved,
}

impl ContactStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactStatus::New => "new",
            ContactStatus::InProgress => "in_progress",
            ContactStatus::Resolved => "resolved",
        }
    }
}

/// A contact submission as stored by the backend.
///
/// Ids are opaque strings the client only echoes back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub school: Option<String>,
    pub phone: Option<String>,
    pub message: String,
    pub status: ContactStatus,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Query for the admin contact listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactQuery {
    pub status: Option<ContactStatus>,
    pub limit: u32,
    pub page: u32,
}

impl Default for ContactQuery {
    fn default() -> Self {
        Self {
            status: None,
            limit: 50,
            page: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

/// One page of the admin contact listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPage {
    pub submissions: Vec<ContactRecord>,
    pub pagination: Pagination,
}

fn default_rating() -> u8 {
    5
}

fn default_active() -> bool {
    true
}

/// A published testimonial. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: String,
    pub text: String,
    pub author: String,
    pub role: String,
    pub school: String,
    #[serde(default = "default_rating")]
    pub rating: u8,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Payload for creating a testimonial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTestimonial {
    pub text: String,
    pub author: String,
    pub role: String,
    pub school: String,
    #[serde(default = "default_rating")]
    pub rating: u8,
}

/// Query for the public testimonial listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestimonialQuery {
    pub limit: u32,
    pub active: bool,
}

impl Default for TestimonialQuery {
    fn default() -> Self {
        Self {
            limit: 6,
            active: true,
        }
    }
}

/// Headline figures shown on the landing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolStats {
    pub id: String,
    pub total_schools: u64,
    pub total_students: u64,
    pub total_teachers: u64,
    pub average_satisfaction: f64,
    #[serde(with = "timestamp")]
    pub last_updated: DateTime<Utc>,
}

/// Partial stats update. Only fields present in the JSON are applied;
/// omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_schools: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_students: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_teachers: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_satisfaction: Option<f64>,
}

/// Body of the health endpoint. Not wrapped in an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub message: String,
    pub status: Option<String>,
}

/// Backend timestamps are UTC but may be sent without an offset
/// (`2024-05-01T10:00:00.123456`). Both forms are accepted; output is RFC 3339.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub(super) fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        raw.parse::<NaiveDateTime>().ok().map(|naive| naive.and_utc())
    }
}
