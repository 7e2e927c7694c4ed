//! Contact form submission flow.
//!
//! `Idle -> Submitting -> (sent | failed) -> Idle`. The guard into
//! `Submitting` is a presence check on name, email and message; at most one
//! submission is in flight per flow instance. A submission that is not
//! ignored ends as exactly one notification, whether it failed the guard,
//! was rejected, or failed in transport.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::client::ApiClient;
use crate::error::NormalizedError;
use crate::notify::{Notification, Notifier};
use crate::transport::Transport;
use crate::types::ContactSubmission;

pub const VALIDATION_TITLE: &str = "Validation Error";
pub const VALIDATION_MESSAGE: &str = "Please fill in all required fields.";
pub const SENT_TITLE: &str = "Message Sent!";
pub const SENT_MESSAGE: &str = "We'll get back to you within 24 hours.";
pub const ERROR_TITLE: &str = "Error";
pub const ERROR_MESSAGE: &str = "Failed to send message. Please try again.";

/// Raw, untrimmed form input as the user typed it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub school: String,
    pub phone: String,
    pub message: String,
}

impl ContactForm {
    /// Trimmed payload, or `None` when a required field is blank.
    ///
    /// Blank optional fields become `None` so they go out as `null`.
    pub fn to_submission(&self) -> Option<ContactSubmission> {
        let name = self.name.trim();
        let email = self.email.trim();
        let message = self.message.trim();
        if name.is_empty() || email.is_empty() || message.is_empty() {
            return None;
        }
        Some(ContactSubmission {
            name: name.to_string(),
            email: email.to_string(),
            school: optional(&self.school),
            phone: optional(&self.phone),
            message: message.to_string(),
        })
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Email,
    School,
    Phone,
    Message,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactState {
    Idle,
    Submitting,
}

/// What a call to `submit` did.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// A required field was blank; no network call was made.
    Invalid,
    /// Another submission was already in flight; no network call was made.
    Ignored,
    /// The server accepted the submission and the form was cleared.
    Sent,
    /// The server answered `success: false`. The form is kept.
    Rejected,
    /// The call failed. The form is kept.
    Failed(NormalizedError),
}

/// Resets the in-flight flag however `submit` exits.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct ContactFlow<T, N> {
    client: Arc<ApiClient<T>>,
    notifier: N,
    form: Mutex<ContactForm>,
    submitting: AtomicBool,
}

impl<T: Transport, N: Notifier> ContactFlow<T, N> {
    pub fn new(client: Arc<ApiClient<T>>, notifier: N) -> Self {
        Self {
            client,
            notifier,
            form: Mutex::new(ContactForm::default()),
            submitting: AtomicBool::new(false),
        }
    }

    fn lock_form(&self) -> MutexGuard<'_, ContactForm> {
        self.form.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_field(&self, field: ContactField, value: &str) {
        let mut form = self.lock_form();
        let slot = match field {
            ContactField::Name => &mut form.name,
            ContactField::Email => &mut form.email,
            ContactField::School => &mut form.school,
            ContactField::Phone => &mut form.phone,
            ContactField::Message => &mut form.message,
        };
        *slot = value.to_string();
    }

    pub fn form(&self) -> ContactForm {
        self.lock_form().clone()
    }

    pub fn state(&self) -> ContactState {
        if self.submitting.load(Ordering::Acquire) {
            ContactState::Submitting
        } else {
            ContactState::Idle
        }
    }

    pub async fn submit(&self) -> SubmitOutcome {
        if self
            .submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("contact submission already in flight, ignoring");
            return SubmitOutcome::Ignored;
        }
        let _in_flight = InFlight(&self.submitting);

        let Some(submission) = self.form().to_submission() else {
            self.notifier
                .notify(Notification::destructive(VALIDATION_TITLE, VALIDATION_MESSAGE));
            return SubmitOutcome::Invalid;
        };

        match self.client.submit_contact(&submission).await {
            Ok(envelope) if envelope.success => {
                let text = non_empty(envelope.message.as_deref()).unwrap_or(SENT_MESSAGE);
                self.notifier.notify(Notification::info(SENT_TITLE, text));
                *self.lock_form() = ContactForm::default();
                SubmitOutcome::Sent
            }
            Ok(envelope) => {
                let text = non_empty(envelope.message.as_deref()).unwrap_or(ERROR_MESSAGE);
                self.notifier.notify(Notification::destructive(ERROR_TITLE, text));
                SubmitOutcome::Rejected
            }
            Err(err) => {
                let text = non_empty(Some(err.message.as_str())).unwrap_or(ERROR_MESSAGE);
                self.notifier.notify(Notification::destructive(ERROR_TITLE, text));
                SubmitOutcome::Failed(err)
            }
        }
    }
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use serde_json::Value;
    use tokio::sync::{mpsc, Notify};

    use super::*;
    use crate::error::{TransportError, NETWORK_ERROR_MESSAGE, STATUS_NO_RESPONSE};
    use crate::notify::Severity;
    use crate::testing::ScriptedTransport;

    type Flow = ContactFlow<ScriptedTransport, mpsc::UnboundedSender<Notification>>;

    fn flow(transport: ScriptedTransport) -> (Flow, mpsc::UnboundedReceiver<Notification>) {
        let client = Arc::new(ApiClient::with_transport("http://localhost:8001/api", transport));
        let (tx, rx) = mpsc::unbounded_channel();
        (ContactFlow::new(client, tx), rx)
    }

    fn fill(flow: &Flow) {
        flow.set_field(ContactField::Name, "  Sarah Johnson ");
        flow.set_field(ContactField::Email, "sarah@greenwood.edu");
        flow.set_field(ContactField::School, "Greenwood Elementary");
        flow.set_field(ContactField::Phone, "555-123-4567");
        flow.set_field(ContactField::Message, "We'd like a demo.");
    }

    fn sent_body(flow: &Flow) -> Value {
        let requests = flow.client.transport().requests();
        serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn blank_required_fields_never_reach_the_network() {
        let cases = [
            (ContactField::Name, "   "),
            (ContactField::Email, ""),
            (ContactField::Message, "\n\t"),
        ];
        for (field, value) in cases {
            let (flow, mut rx) = flow(ScriptedTransport::new());
            fill(&flow);
            flow.set_field(field, value);

            assert_eq!(flow.submit().await, SubmitOutcome::Invalid);
            assert_eq!(flow.client.transport().calls(), 0);
            let note = rx.try_recv().unwrap();
            assert_eq!(note.title, VALIDATION_TITLE);
            assert_eq!(note.severity, Severity::Destructive);
            assert_eq!(flow.state(), ContactState::Idle);
        }
    }

    #[tokio::test]
    async fn blank_optional_fields_are_sent_as_null() {
        let (flow, _rx) = flow(ScriptedTransport::new().respond(200, r#"{"success":true}"#));
        fill(&flow);
        flow.set_field(ContactField::School, "   ");
        flow.set_field(ContactField::Phone, "");

        flow.submit().await;
        let body = sent_body(&flow);
        assert_eq!(body["school"], Value::Null);
        assert_eq!(body["phone"], Value::Null);
        assert_eq!(body["name"], "Sarah Johnson");
    }

    #[tokio::test]
    async fn accepted_submission_clears_form_and_reports_server_message() {
        let (flow, mut rx) = flow(ScriptedTransport::new().respond(200, r#"{"success":true,"message":"OK"}"#));
        fill(&flow);

        assert_eq!(flow.submit().await, SubmitOutcome::Sent);
        assert_eq!(flow.form(), ContactForm::default());
        assert_eq!(flow.state(), ContactState::Idle);
        let note = rx.try_recv().unwrap();
        assert_eq!(note.title, SENT_TITLE);
        assert!(note.description.contains("OK"));
        assert_eq!(note.severity, Severity::Info);
    }

    #[tokio::test]
    async fn accepted_submission_without_message_uses_default() {
        let (flow, mut rx) = flow(ScriptedTransport::new().respond(200, r#"{"success":true,"message":null}"#));
        fill(&flow);
        flow.submit().await;
        assert_eq!(rx.try_recv().unwrap().description, SENT_MESSAGE);
    }

    #[tokio::test]
    async fn accepted_submission_with_naive_timestamps_is_sent() {
        let body = serde_json::json!({
            "success": true,
            "message": "Thank you for your message! We'll get back to you within 24 hours.",
            "data": {
                "id": "65f1c0de9a1b2c3d4e5f6789",
                "name": "Sarah Johnson",
                "email": "sarah@greenwood.edu",
                "school": "Greenwood Elementary",
                "phone": "555-123-4567",
                "message": "We'd like a demo.",
                "status": "new",
                "created_at": "2024-05-01T10:00:00.123456",
                "updated_at": "2024-05-01T10:00:00.123456"
            }
        });
        let (flow, mut rx) = flow(ScriptedTransport::new().respond(200, &body.to_string()));
        fill(&flow);

        assert_eq!(flow.submit().await, SubmitOutcome::Sent);
        assert_eq!(flow.form(), ContactForm::default());
        let note = rx.try_recv().unwrap();
        assert_eq!(note.title, SENT_TITLE);
        assert_eq!(note.severity, Severity::Info);
    }

    #[tokio::test]
    async fn rejected_submission_keeps_form() {
        let (flow, mut rx) = flow(ScriptedTransport::new().respond(200, r#"{"success":false,"message":"Duplicate"}"#));
        fill(&flow);
        let before = flow.form();

        assert_eq!(flow.submit().await, SubmitOutcome::Rejected);
        assert_eq!(flow.form(), before);
        let note = rx.try_recv().unwrap();
        assert_eq!(note.title, ERROR_TITLE);
        assert!(note.description.contains("Duplicate"));
    }

    #[tokio::test]
    async fn network_failure_reports_normalized_message() {
        let transport = ScriptedTransport::new().fail(TransportError::NoResponse("timed out".to_string()));
        let (flow, mut rx) = flow(transport);
        fill(&flow);

        let SubmitOutcome::Failed(err) = flow.submit().await else {
            panic!("expected failure");
        };
        assert_eq!(err.status, STATUS_NO_RESPONSE);
        assert_eq!(rx.try_recv().unwrap().description, NETWORK_ERROR_MESSAGE);
        assert_eq!(flow.form().name, "  Sarah Johnson ");
        assert_eq!(flow.state(), ContactState::Idle);
    }

    #[tokio::test]
    async fn server_error_detail_reaches_notification() {
        let (flow, mut rx) = flow(ScriptedTransport::new().respond(422, r#"{"detail":"Invalid email"}"#));
        fill(&flow);

        let SubmitOutcome::Failed(err) = flow.submit().await else {
            panic!("expected failure");
        };
        assert_eq!(err.status, 422);
        assert_eq!(rx.try_recv().unwrap().description, "Invalid email");
    }

    #[tokio::test]
    async fn resubmitting_while_in_flight_is_ignored() {
        let gate = Arc::new(Notify::new());
        let transport = ScriptedTransport::new()
            .respond(200, r#"{"success":true,"message":"OK"}"#)
            .gated(gate.clone());
        let (flow, mut rx) = flow(transport);
        fill(&flow);

        let first = flow.submit();
        let second = async {
            while flow.client.transport().calls() == 0 {
                tokio::task::yield_now().await;
            }
            assert_eq!(flow.state(), ContactState::Submitting);
            let outcome = flow.submit().await;
            gate.notify_one();
            outcome
        };
        let (first, second) = tokio::join!(first, second);

        assert_eq!(first, SubmitOutcome::Sent);
        assert_eq!(second, SubmitOutcome::Ignored);
        assert_eq!(flow.client.transport().calls(), 1);
        assert_eq!(rx.try_recv().unwrap().title, SENT_TITLE);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn flow_can_resubmit_after_failure() {
        let transport = ScriptedTransport::new()
            .fail(TransportError::NoResponse("refused".to_string()))
            .respond(200, r#"{"success":true}"#);
        let (flow, _rx) = flow(transport);
        fill(&flow);

        assert!(matches!(flow.submit().await, SubmitOutcome::Failed(_)));
        assert_eq!(flow.submit().await, SubmitOutcome::Sent);
        assert_eq!(flow.client.transport().calls(), 2);
    }

    #[test]
    fn form_trims_required_fields() {
        let form = ContactForm {
            name: " Ada ".to_string(),
            email: " ada@school.edu".to_string(),
            school: " Hill ".to_string(),
            phone: String::new(),
            message: "hi ".to_string(),
        };
        let submission = form.to_submission().unwrap();
        assert_eq!(submission.name, "Ada");
        assert_eq!(submission.school.as_deref(), Some("Hill"));
        assert!(submission.phone.is_none());
        assert_eq!(submission.message, "hi");
    }
}
