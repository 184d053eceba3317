//! Error types for backend access

use acehive_core::{RowId, TableName};
use thiserror::Error;

/// Result type alias for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors returned by a [`Backend`](crate::Backend)
#[derive(Error, Debug)]
pub enum BackendError {
    /// Transport-level failure talking to the backend
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with an error status
    #[error("Backend returned {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message extracted from the error body
        message: String,
    },

    /// A response body could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Sign-in was rejected or the auth response was unusable
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// An operation needing a session was called while signed out
    #[error("Not signed in")]
    NotSignedIn,

    /// No row with the given id exists
    #[error("No row with id {id} in table {table}")]
    NotFound {
        /// Table that was searched
        table: TableName,
        /// Missing row id
        id: RowId,
    },

    /// Failure injected into the in-memory backend
    #[error("Injected failure: {0}")]
    Injected(String),

    /// The backend client could not be constructed
    #[error("Invalid backend configuration: {message}")]
    Configuration {
        /// Error message
        message: String,
    },
}

impl BackendError {
    /// Human-facing message, without the variant prefix
    ///
    /// This is the text shown after "Error saving changes: " and similar
    /// notices in the dashboard.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Api { message, .. } | Self::Auth(message) | Self::Injected(message) => {
                message.clone()
            }
            Self::Configuration { message } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Whether the failure happened before any response was received
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_))
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_api_error_display_and_message() {
        let error = BackendError::Api {
            status: 409,
            message: "duplicate key value violates unique constraint".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Backend returned 409: duplicate key value violates unique constraint"
        );
        assert_eq!(
            error.message(),
            "duplicate key value violates unique constraint"
        );
        assert!(!error.is_transport());
    }

    #[test]
    fn test_not_found_message() {
        let error = BackendError::NotFound {
            table: TableName::Resources,
            id: RowId::new("7"),
        };
        assert_eq!(error.message(), "No row with id 7 in table resources");
    }

    #[test]
    fn test_injected_message() {
        let error = BackendError::Injected("update rejected".to_string());
        assert_eq!(error.message(), "update rejected");
        assert_eq!(error.to_string(), "Injected failure: update rejected");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("[").unwrap_err();
        let error = BackendError::from(json_error);
        assert!(matches!(error, BackendError::Json(_)));
    }
}
