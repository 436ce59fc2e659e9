//! Client error types

use crate::client::store::StorageError;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced to callers of the client
#[derive(Debug, Error)]
pub enum ClientError {
    /// No response was received
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("Server error {status}: {body}")]
    Http { status: StatusCode, body: String },

    /// The session could not be renewed and has been torn down
    #[error("Session expired: {0}")]
    SessionExpired(SessionEndReason),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The credential store could not be written
    #[error("Credential storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Why a session was ended by the client.
///
/// Cloned to every caller that was waiting on the same renewal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionEndReason {
    #[error("no refresh token is stored")]
    MissingRefreshToken,

    #[error("refresh token rejected with status {status}")]
    RefreshRejected { status: u16 },

    #[error("token renewal failed: {0}")]
    Transport(String),

    #[error("token renewal timed out")]
    TimedOut,

    #[error("malformed renewal response: {0}")]
    MalformedResponse(String),

    #[error("session was closed")]
    LoggedOut,
}

impl ClientError {
    /// HTTP status of the failed response, if there was one
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Request(error) => error.status(),
            _ => None,
        }
    }

    /// Whether the session is gone and the user has to log in again
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired(_))
    }

    /// `409 Conflict`, used by the backend for duplicates
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(StatusCode::CONFLICT)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Parse the backend error envelope out of an HTTP failure body
    pub fn envelope(&self) -> Option<ErrorEnvelope> {
        match self {
            Self::Http { body, .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }

    /// The server supplied message, falling back to the error's own text
    pub fn user_message(&self) -> String {
        self.envelope()
            .and_then(|envelope| envelope.message)
            .unwrap_or_else(|| self.to_string())
    }
}

/// Error body returned by the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub field_errors: Vec<FieldError>,
}

/// A single validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    #[serde(default)]
    pub value: Option<String>,
    pub reason: String,
}

impl ErrorEnvelope {
    /// Reason of the first field error, which forms display next to the input
    pub fn first_reason(&self) -> Option<&str> {
        self.field_errors.first().map(|error| error.reason.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_parsing() {
        let error = ClientError::Http {
            status: StatusCode::BAD_REQUEST,
            body: r#"{"status":400,"message":"invalid","fieldErrors":[{"field":"content","value":"x","reason":"too long"}]}"#.to_string(),
        };

        let envelope = error.envelope().unwrap();
        assert_eq!(envelope.status, Some(400));
        assert_eq!(envelope.message.as_deref(), Some("invalid"));
        assert_eq!(envelope.first_reason(), Some("too long"));
        assert_eq!(error.user_message(), "invalid");
    }

    #[test]
    fn test_envelope_missing_for_plain_body() {
        let error = ClientError::Http {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".to_string(),
        };

        assert!(error.envelope().is_none());
        assert_eq!(error.user_message(), "Server error 500 Internal Server Error: boom");
    }

    #[test]
    fn test_status_helpers() {
        let conflict = ClientError::Http {
            status: StatusCode::CONFLICT,
            body: String::new(),
        };
        assert!(conflict.is_conflict());
        assert!(!conflict.is_not_found());
        assert!(!conflict.is_session_expired());

        let expired = ClientError::SessionExpired(SessionEndReason::MissingRefreshToken);
        assert!(expired.is_session_expired());
        assert_eq!(expired.status(), None);
    }
}
