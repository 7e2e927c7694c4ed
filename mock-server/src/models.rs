use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::HttpError;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern compiles")
});

/// Response wrapper shared by every route except health.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
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

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub school: Option<String>,
    pub phone: Option<String>,
    pub message: String,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateContact {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub school: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub message: String,
}

impl CreateContact {
    /// Check field bounds and normalise the email to lowercase.
    pub fn validate(mut self) -> Result<Self, HttpError> {
        check_len("name", &self.name, 1, 100)?;
        check_len("email", &self.email, 5, 100)?;
        if !EMAIL_PATTERN.is_match(&self.email) {
            return Err(HttpError::unprocessable("Invalid email format"));
        }
        self.email = self.email.to_lowercase();
        if let Some(school) = &self.school {
            check_len("school", school, 0, 100)?;
        }
        if let Some(phone) = &self.phone {
            check_len("phone", phone, 0, 20)?;
            if phone.chars().filter(char::is_ascii_digit).count() < 10 {
                return Err(HttpError::unprocessable("Phone number must have at least 10 digits"));
            }
        }
        check_len("message", &self.message, 1, 1000)?;
        Ok(self)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: Uuid,
    pub text: String,
    pub author: String,
    pub role: String,
    pub school: String,
    pub rating: u8,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_rating() -> u8 {
    5
}

#[derive(Debug, Deserialize)]
pub struct CreateTestimonial {
    pub text: String,
    pub author: String,
    pub role: String,
    pub school: String,
    #[serde(default = "default_rating")]
    pub rating: u8,
}

impl CreateTestimonial {
    pub fn validate(self) -> Result<Self, HttpError> {
        check_len("text", &self.text, 10, 500)?;
        check_len("author", &self.author, 1, 100)?;
        check_len("role", &self.role, 1, 100)?;
        check_len("school", &self.school, 1, 100)?;
        if !(1..=5).contains(&self.rating) {
            return Err(HttpError::unprocessable("rating must be between 1 and 5"));
        }
        Ok(self)
    }

    pub fn into_testimonial(self) -> Testimonial {
        let now = Utc::now();
        Testimonial {
            id: Uuid::new_v4(),
            text: self.text,
            author: self.author,
            role: self.role,
            school: self.school,
            rating: self.rating,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SchoolStats {
    pub id: Uuid,
    pub total_schools: u64,
    pub total_students: u64,
    pub total_teachers: u64,
    pub average_satisfaction: f64,
    pub last_updated: DateTime<Utc>,
}

impl Default for SchoolStats {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            total_schools: 500,
            total_students: 125_000,
            total_teachers: 15_000,
            average_satisfaction: 4.8,
            last_updated: Utc::now(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateStats {
    pub total_schools: Option<u64>,
    pub total_students: Option<u64>,
    pub total_teachers: Option<u64>,
    pub average_satisfaction: Option<f64>,
}

impl UpdateStats {
    pub fn apply(self, stats: &mut SchoolStats) {
        if let Some(v) = self.total_schools {
            stats.total_schools = v;
        }
        if let Some(v) = self.total_students {
            stats.total_students = v;
        }
        if let Some(v) = self.total_teachers {
            stats.total_teachers = v;
        }
        if let Some(v) = self.average_satisfaction {
            stats.average_satisfaction = v;
        }
        stats.last_updated = Utc::now();
    }
}

fn check_len(field: &str, value: &str, min: usize, max: usize) -> Result<(), HttpError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(HttpError::unprocessable(format!(
            "{field} must be between {min} and {max} characters"
        )));
    }
    Ok(())
}
