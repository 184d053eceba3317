//! Dashboard error types

use crate::components::View;
use acehive_backend::BackendError;
use acehive_core::RowId;
use axum::http::StatusCode;
use thiserror::Error;

/// Errors raised by dashboard actions
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The action belongs to a view that is not mounted
    #[error("The {0} view is not active")]
    InactiveView(View),

    /// No fetched row has this id
    #[error("No row with id {0}")]
    NoSuchRow(RowId),

    /// The row is not in edit state
    #[error("Row {0} is not being edited")]
    NotEditing(RowId),

    /// The column is never editable
    #[error("Column '{0}' cannot be edited")]
    ColumnNotEditable(String),

    /// Confirm was sent without a pending delete
    #[error("No delete is pending")]
    NoPendingDelete,

    /// Email or password missing on sign-in
    #[error("Email and password are required")]
    EmptyCredentials,

    /// Malformed input such as an unknown table or view name
    #[error("Invalid input: {0}")]
    Invalid(#[from] acehive_core::Error),

    /// Backend call failed
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl DashboardError {
    /// HTTP status reported for this error
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InactiveView(_) | Self::NoPendingDelete => StatusCode::CONFLICT,
            Self::NoSuchRow(_) => StatusCode::NOT_FOUND,
            Self::NotEditing(_) | Self::ColumnNotEditable(_) | Self::Invalid(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::EmptyCredentials => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Backend(BackendError::Auth(_) | BackendError::NotSignedIn) => {
                StatusCode::UNAUTHORIZED
            }
            Self::Backend(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Result alias for dashboard actions
pub type DashboardResult<T> = Result<T, DashboardError>;
