//! In-memory backend for demos and tests
//!
//! Tables live in a map guarded by a mutex. Every call is recorded so tests
//! can assert exactly which requests a component issued, and any operation
//! can be switched to fail with a given message.

use crate::backend::{Backend, Credentials, EqFilter, Session};
use crate::error::{BackendError, BackendResult};
use acehive_core::{Row, RowId, TableName};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// Backend operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// [`Backend::count`]
    Count,
    /// [`Backend::select_all`]
    SelectAll,
    /// [`Backend::update`]
    Update,
    /// [`Backend::delete`]
    Delete,
    /// [`Backend::sign_in`]
    SignIn,
    /// [`Backend::sign_out`]
    SignOut,
}

/// A recorded backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    /// Row count, with its optional filter
    Count {
        /// Counted table
        table: TableName,
        /// Equality filter, if any
        filter: Option<EqFilter>,
    },
    /// Full table fetch
    SelectAll(TableName),
    /// Row update
    Update {
        /// Updated table
        table: TableName,
        /// Updated row
        id: RowId,
    },
    /// Row delete
    Delete {
        /// Table the row was deleted from
        table: TableName,
        /// Deleted row
        id: RowId,
    },
    /// Password sign-in, with the email used
    SignIn(String),
    /// Sign-out
    SignOut,
}

impl BackendCall {
    /// Operation this call exercised
    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::Count { .. } => Operation::Count,
            Self::SelectAll(_) => Operation::SelectAll,
            Self::Update { .. } => Operation::Update,
            Self::Delete { .. } => Operation::Delete,
            Self::SignIn(_) => Operation::SignIn,
            Self::SignOut => Operation::SignOut,
        }
    }
}

/// In-memory implementation of [`Backend`]
#[derive(Debug, Default)]
pub struct MemoryBackend {
    tables: Mutex<HashMap<TableName, Vec<Row>>>,
    failures: Mutex<HashMap<Operation, String>>,
    calls: Mutex<Vec<BackendCall>>,
    accounts: HashMap<String, String>,
    session: Mutex<Option<Session>>,
    delay: Option<Duration>,
    omit_counts: bool,
    next_token: AtomicU64,
}

impl MemoryBackend {
    /// Create a backend with every table empty
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a table
    #[must_use]
    pub fn with_table(self, table: TableName, rows: Vec<Row>) -> Self {
        self.tables.lock().insert(table, rows);
        self
    }

    /// Only accept these credentials at sign-in
    ///
    /// Without any account, every non-empty email/password pair is accepted.
    #[must_use]
    pub fn with_account(mut self, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.accounts.insert(email.into(), password.into());
        self
    }

    /// Sleep before answering each call
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Answer count queries without a count, like a backend that ignored
    /// the count preference
    #[must_use]
    pub const fn without_counts(mut self) -> Self {
        self.omit_counts = true;
        self
    }

    /// Build a backend from a JSON object mapping table names to row arrays
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an object of arrays of objects
    /// or names an unknown table.
    pub fn from_json(value: Value) -> BackendResult<Self> {
        let Value::Object(tables) = value else {
            return Err(BackendError::Configuration {
                message: "seed must be a JSON object keyed by table name".to_string(),
            });
        };

        let backend = Self::new();
        for (name, rows) in tables {
            let table: TableName = name.parse().map_err(|e: acehive_core::Error| {
                BackendError::Configuration {
                    message: e.to_string(),
                }
            })?;
            let rows: Vec<Row> = serde_json::from_value(rows)?;
            backend.tables.lock().insert(table, rows);
        }
        Ok(backend)
    }

    /// Build a backend from a JSON seed file, see [`MemoryBackend::from_json`]
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_seed_file(path: &Path) -> BackendResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| BackendError::Configuration {
            message: format!("cannot read seed file {}: {e}", path.display()),
        })?;
        Self::from_json(serde_json::from_str(&contents)?)
    }

    /// Make every subsequent `operation` fail with `message`
    pub fn fail(&self, operation: Operation, message: impl Into<String>) {
        self.failures.lock().insert(operation, message.into());
    }

    /// Let `operation` succeed again
    pub fn succeed(&self, operation: Operation) {
        self.failures.lock().remove(&operation);
    }

    /// Replace the contents of a table
    pub fn set_rows(&self, table: TableName, rows: Vec<Row>) {
        self.tables.lock().insert(table, rows);
    }

    /// Current contents of a table
    #[must_use]
    pub fn rows(&self, table: TableName) -> Vec<Row> {
        self.tables.lock().get(&table).cloned().unwrap_or_default()
    }

    /// Every call made so far, oldest first
    #[must_use]
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().clone()
    }

    /// Number of calls made of the given operation
    #[must_use]
    pub fn call_count(&self, operation: Operation) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.operation() == operation)
            .count()
    }

    /// Forget the recorded calls
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Whether a session is active
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.session.lock().is_some()
    }

    /// Record the call, wait out the configured delay and apply any
    /// injected failure
    async fn enter(&self, call: BackendCall) -> BackendResult<()> {
        let operation = call.operation();
        debug!(?call, "Memory backend call");
        self.calls.lock().push(call);

        if let Some(delay) = self.delay {
            sleep(delay).await;
        }

        let failure = self.failures.lock().get(&operation).cloned();
        failure.map_or(Ok(()), |message| Err(BackendError::Injected(message)))
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn count(
        &self,
        table: TableName,
        filter: Option<&EqFilter>,
    ) -> BackendResult<Option<u64>> {
        self.enter(BackendCall::Count {
            table,
            filter: filter.cloned(),
        })
        .await?;

        if self.omit_counts {
            return Ok(None);
        }

        let tables = self.tables.lock();
        let count = tables.get(&table).map_or(0, |rows| {
            rows.iter()
                .filter(|row| filter.is_none_or(|f| f.matches(row)))
                .count()
        });
        Ok(Some(count as u64))
    }

    async fn select_all(&self, table: TableName) -> BackendResult<Vec<Row>> {
        self.enter(BackendCall::SelectAll(table)).await?;
        Ok(self.rows(table))
    }

    async fn update(&self, table: TableName, id: &RowId, row: &Row) -> BackendResult<()> {
        self.enter(BackendCall::Update {
            table,
            id: id.clone(),
        })
        .await?;

        let mut tables = self.tables.lock();
        let existing = tables
            .get_mut(&table)
            .and_then(|rows| rows.iter_mut().find(|r| r.id().as_ref() == Some(id)))
            .ok_or_else(|| BackendError::NotFound {
                table,
                id: id.clone(),
            })?;

        for (column, value) in row.as_map() {
            existing.set(column.clone(), value.clone());
        }
        Ok(())
    }

    async fn delete(&self, table: TableName, id: &RowId) -> BackendResult<()> {
        self.enter(BackendCall::Delete {
            table,
            id: id.clone(),
        })
        .await?;

        let mut tables = self.tables.lock();
        let rows = tables.entry(table).or_default();
        let before = rows.len();
        rows.retain(|row| row.id().as_ref() != Some(id));

        if rows.len() == before {
            return Err(BackendError::NotFound {
                table,
                id: id.clone(),
            });
        }
        Ok(())
    }

    async fn sign_in(&self, credentials: &Credentials) -> BackendResult<Session> {
        self.enter(BackendCall::SignIn(credentials.email.clone()))
            .await
            .map_err(|e| BackendError::Auth(e.message()))?;

        let accepted = if self.accounts.is_empty() {
            !credentials.email.is_empty() && !credentials.password.is_empty()
        } else {
            self.accounts.get(&credentials.email) == Some(&credentials.password)
        };

        if !accepted {
            return Err(BackendError::Auth("Invalid login credentials".to_string()));
        }

        let token = self.next_token.fetch_add(1, Ordering::Relaxed) + 1;
        let session = Session {
            access_token: format!("memory-session-{token}"),
            refresh_token: None,
            email: Some(credentials.email.clone()),
            signed_in_at: Utc::now(),
        };
        *self.session.lock() = Some(session.clone());
        Ok(session)
    }

    async fn sign_out(&self) -> BackendResult<()> {
        self.enter(BackendCall::SignOut).await?;
        self.session.lock().take();
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
