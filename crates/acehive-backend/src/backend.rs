//! Backend trait shared by the Supabase client and the in-memory tables

use crate::error::BackendResult;
use acehive_core::{Row, RowId, TableName};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Single `column = value` predicate applied by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EqFilter {
    /// Column to compare
    pub column: String,
    /// Value the column must equal
    pub value: String,
}

impl EqFilter {
    /// Create an equality filter
    pub fn new(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Whether `row` satisfies the predicate
    #[must_use]
    pub fn matches(&self, row: &Row) -> bool {
        row.get_str(&self.column) == Some(self.value.as_str())
    }
}

/// Email and password for the password grant
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// An authenticated backend session
#[derive(Clone, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token sent with table requests
    pub access_token: String,
    /// Token for renewing the session
    pub refresh_token: Option<String>,
    /// Email of the signed-in user
    pub email: Option<String>,
    /// When the session was established
    pub signed_in_at: DateTime<Utc>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("email", &self.email)
            .field("signed_in_at", &self.signed_in_at)
            .finish_non_exhaustive()
    }
}

/// Remote data service used by every dashboard component
///
/// Implementations are shared behind an `Arc` and called concurrently; all
/// methods take `&self`.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Exact number of rows in `table`, optionally restricted by `filter`
    ///
    /// `Ok(None)` means the backend answered without a count.
    async fn count(&self, table: TableName, filter: Option<&EqFilter>)
        -> BackendResult<Option<u64>>;

    /// Every row of `table`, in backend order
    async fn select_all(&self, table: TableName) -> BackendResult<Vec<Row>>;

    /// Overwrite the row keyed by `id` with the columns in `row`
    async fn update(&self, table: TableName, id: &RowId, row: &Row) -> BackendResult<()>;

    /// Delete the row keyed by `id`
    async fn delete(&self, table: TableName, id: &RowId) -> BackendResult<()>;

    /// Start a session with the password grant
    async fn sign_in(&self, credentials: &Credentials) -> BackendResult<Session>;

    /// End the current session
    async fn sign_out(&self) -> BackendResult<()>;

    /// Backend name, for logs
    fn name(&self) -> &str;
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_eq_filter_matches_string_columns() {
        let row = Row::try_from(json!({"id": 1, "resource_type": "CT Paper"})).unwrap();

        assert!(EqFilter::new("resource_type", "CT Paper").matches(&row));
        assert!(!EqFilter::new("resource_type", "Sem Paper").matches(&row));
        assert!(!EqFilter::new("year", "1st Year").matches(&row));
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let credentials = Credentials {
            email: "admin@example.com".to_string(),
            password: "hunter2".to_string(),
        };
        let debug = format!("{credentials:?}");
        assert!(debug.contains("admin@example.com"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_session_debug_hides_tokens() {
        let session = Session {
            access_token: "secret-token".to_string(),
            refresh_token: Some("refresh".to_string()),
            email: None,
            signed_in_at: Utc::now(),
        };
        assert!(!format!("{session:?}").contains("secret-token"));
    }
}
