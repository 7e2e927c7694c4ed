//! User-facing notifications emitted by the flows.
//!
//! A notification is the only thing a failure turns into once it reaches a
//! flow boundary. Delivery is fire-and-forget: a notifier never blocks the
//! flow and never reports failure back to it.

use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    pub fn info(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            severity: Severity::Info,
        }
    }

    pub fn destructive(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            severity: Severity::Destructive,
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// The display layer holds the receiving half and renders what arrives.
impl Notifier for UnboundedSender<Notification> {
    fn notify(&self, notification: Notification) {
        // A closed receiver means the view is gone; nothing left to show.
        if let Err(err) = self.send(notification) {
            warn!(title = %err.0.title, "notification dropped, receiver closed");
        }
    }
}

/// Logs notifications instead of displaying them. Useful for headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Info => info!(title = %notification.title, "{}", notification.description),
            Severity::Destructive => warn!(title = %notification.title, "{}", notification.description),
        }
    }
}
