//! Error types for Baselime API calls

use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by [`Client`](super::Client).
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("failed to {operation} with status {status}")]
    Status {
        operation: &'static str,
        status: StatusCode,
    },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Invalid value for header {header}")]
    InvalidHeader { header: &'static str },

    #[error("Invalid API base URL: {url}")]
    InvalidUrl { url: String },

    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("{field} '{value}' is not a valid identifier")]
    InvalidId { field: &'static str, value: String },
}

impl ClientError {
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode { message: message.into() }
    }

    /// HTTP status of the response that caused this error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Network(err) => err.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_names_operation_and_status() {
        let err = ClientError::Status {
            operation: "create alert",
            status: StatusCode::INTERNAL_SERVER_ERROR,
        };
        assert_eq!(
            err.to_string(),
            "failed to create alert with status 500 Internal Server Error"
        );
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn missing_field_has_no_status() {
        let err = ClientError::MissingField { field: "queryId" };
        assert_eq!(err.to_string(), "queryId is required");
        assert!(err.status().is_none());
    }
}
