//! Error types for the EduManage API client.
//!
//! # Design
//! Every failed call leaves the client as exactly one `NormalizedError`,
//! whatever went wrong underneath. The status field doubles as the failure
//! class: a real HTTP status when the server answered, `0` when nothing came
//! back, `-1` when the request never left. `TransportError` is the narrower
//! type a `Transport` returns before normalization.

use serde::Serialize;
use serde_json::Value;

/// Status recorded when no response was received (connect failure, timeout).
pub const STATUS_NO_RESPONSE: i32 = 0;

/// Status recorded when the request could not be constructed or sent.
pub const STATUS_REQUEST_FAILED: i32 = -1;

pub const DEFAULT_SERVER_MESSAGE: &str = "An error occurred";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";
pub const UNEXPECTED_FORMAT_MESSAGE: &str = "Unexpected response format";

/// The uniform failure shape handed to calling code.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("{message} (status {status})")]
pub struct NormalizedError {
    pub status: i32,
    pub message: String,
    /// Raw server payload, present only when the server answered.
    pub data: Option<Value>,
}

impl NormalizedError {
    /// The server answered with a non-success status.
    pub fn from_response(status: u16, body: &str) -> Self {
        let data = decode_body(body);
        Self {
            status: i32::from(status),
            message: server_message(&data).unwrap_or_else(|| DEFAULT_SERVER_MESSAGE.to_string()),
            data: Some(data),
        }
    }

    pub fn no_response() -> Self {
        Self {
            status: STATUS_NO_RESPONSE,
            message: NETWORK_ERROR_MESSAGE.to_string(),
            data: None,
        }
    }

    pub fn request_failed(reason: &str) -> Self {
        let message = if reason.trim().is_empty() {
            UNEXPECTED_ERROR_MESSAGE.to_string()
        } else {
            reason.to_string()
        };
        Self {
            status: STATUS_REQUEST_FAILED,
            message,
            data: None,
        }
    }

    /// A response arrived but its body did not match the expected envelope.
    pub fn unexpected_format(status: u16, body: &str) -> Self {
        Self {
            status: i32::from(status),
            message: UNEXPECTED_FORMAT_MESSAGE.to_string(),
            data: Some(decode_body(body)),
        }
    }
}

impl From<TransportError> for NormalizedError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::NoResponse(_) => NormalizedError::no_response(),
            TransportError::RequestFailed(reason) => NormalizedError::request_failed(&reason),
        }
    }
}

/// Decode a response body the way the client hands it to callers: JSON when
/// it parses, the raw text as a string otherwise, null when empty.
pub(crate) fn decode_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

/// Pull a human-readable message out of an error payload.
///
/// Prefers `detail`, then `message`. A `detail` list of validation items
/// (`[{"msg": ...}, ...]`) is flattened into one line.
fn server_message(data: &Value) -> Option<String> {
    match data.get("detail") {
        Some(Value::String(detail)) if !detail.is_empty() => return Some(detail.clone()),
        Some(Value::Array(items)) => {
            let joined = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("; ");
            if !joined.is_empty() {
                return Some(joined);
            }
        }
        _ => {}
    }
    match data.get("message") {
        Some(Value::String(message)) if !message.is_empty() => Some(message.clone()),
        _ => None,
    }
}

/// Failure to obtain any HTTP response from a `Transport`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request went out but nothing came back: connect error or timeout.
    #[error("no response received: {0}")]
    NoResponse(String),

    /// The request could not be built or handed to the network.
    #[error("request failed: {0}")]
    RequestFailed(String),
}

/// Errors raised while reading client configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(String),

    #[error("invalid value {value:?} for {key}")]
    Invalid { key: String, value: String },
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn detail_string_becomes_message() {
        let err = NormalizedError::from_response(422, r#"{"detail":"Invalid email"}"#);
        assert_eq!(err.status, 422);
        assert_eq!(err.message, "Invalid email");
        assert_eq!(err.data, Some(json!({"detail": "Invalid email"})));
    }

    #[test]
    fn message_field_used_when_detail_absent() {
        let err = NormalizedError::from_response(500, r#"{"message":"Database down"}"#);
        assert_eq!(err.message, "Database down");
    }

    #[test]
    fn detail_takes_precedence_over_message() {
        let err = NormalizedError::from_response(400, r#"{"detail":"first","message":"second"}"#);
        assert_eq!(err.message, "first");
    }

    #[test]
    fn validation_item_list_is_flattened() {
        let body = r#"{"detail":[{"loc":["body","email"],"msg":"field required"},{"msg":"too short"}]}"#;
        let err = NormalizedError::from_response(422, body);
        assert_eq!(err.message, "field required; too short");
    }

    #[test]
    fn default_message_for_unstructured_body() {
        let err = NormalizedError::from_response(502, "<html>Bad Gateway</html>");
        assert_eq!(err.status, 502);
        assert_eq!(err.message, DEFAULT_SERVER_MESSAGE);
        assert_eq!(err.data, Some(Value::String("<html>Bad Gateway</html>".to_string())));
    }

    #[test]
    fn empty_body_yields_null_data() {
        let err = NormalizedError::from_response(503, "");
        assert_eq!(err.message, DEFAULT_SERVER_MESSAGE);
        assert_eq!(err.data, Some(Value::Null));
    }

    #[test]
    fn no_response_classification() {
        let err: NormalizedError = TransportError::NoResponse("timed out".to_string()).into();
        assert_eq!(err.status, STATUS_NO_RESPONSE);
        assert_eq!(err.message, NETWORK_ERROR_MESSAGE);
        assert!(err.data.is_none());
    }

    #[test]
    fn request_failure_keeps_reason() {
        let err: NormalizedError = TransportError::RequestFailed("relative URL without a base".to_string()).into();
        assert_eq!(err.status, STATUS_REQUEST_FAILED);
        assert_eq!(err.message, "relative URL without a base");
        assert!(err.data.is_none());
    }

    #[test]
    fn request_failure_without_reason_uses_fallback() {
        let err = NormalizedError::request_failed("  ");
        assert_eq!(err.message, UNEXPECTED_ERROR_MESSAGE);
    }

    #[test]
    fn display_includes_status() {
        let err = NormalizedError::no_response();
        assert_eq!(err.to_string(), "Network error. Please check your connection. (status 0)");
    }
}
