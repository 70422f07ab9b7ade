//! Diagnostics surfaced by resource operations

use thiserror::Error;

use crate::client::ClientError;

#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("Unable to {action} {kind}, got error: {source}")]
    Client {
        action: &'static str,
        kind: &'static str,
        source: ClientError,
    },

    #[error("Invalid {kind} configuration: {message}")]
    InvalidPlan { kind: &'static str, message: String },

    #[error("Cannot import non-existent remote {kind} '{id}'")]
    ImportNotFound { kind: &'static str, id: String },

    #[error("Unexpected import identifier '{id}', expected {expected}")]
    InvalidImportId { id: String, expected: &'static str },

    #[error("Unable to create Baselime client: {0}")]
    Configure(#[source] ClientError),
}

impl ResourceError {
    pub fn client(action: &'static str, kind: &'static str) -> impl FnOnce(ClientError) -> Self {
        move |source| Self::Client {
            action,
            kind,
            source,
        }
    }

    pub fn invalid_plan(kind: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidPlan {
            kind,
            message: message.into(),
        }
    }

    /// Short heading for the diagnostic, in the style of the host tool.
    pub fn summary(&self) -> &'static str {
        match self {
            Self::Client { .. } => "Client Error",
            Self::InvalidPlan { .. } => "Invalid Configuration",
            Self::ImportNotFound { .. } | Self::InvalidImportId { .. } => "Import Error",
            Self::Configure(_) => "Unable to Configure Provider",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn client_error_reads_like_a_diagnostic() {
        let err = ResourceError::client("create", "query")(ClientError::Status {
            operation: "create query",
            status: StatusCode::BAD_REQUEST,
        });

        assert_eq!(err.summary(), "Client Error");
        assert_eq!(
            err.to_string(),
            "Unable to create query, got error: failed to create query with status 400 Bad Request"
        );
    }
}
