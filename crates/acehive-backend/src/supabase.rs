//! HTTP client for a hosted Supabase project
//!
//! Tables are served by PostgREST under `/rest/v1/<table>` and sessions by
//! GoTrue under `/auth/v1`. Every request carries the project's anon key as
//! `apikey`; the bearer token is the session's access token once signed in
//! and the anon key before that.

use crate::backend::{Backend, Credentials, EqFilter, Session};
use crate::error::{BackendError, BackendResult};
use acehive_core::config::BackendConfig;
use acehive_core::{Row, RowId, TableName};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use reqwest::{Client, RequestBuilder, Response, header};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Supabase-backed implementation of [`Backend`]
pub struct SupabaseBackend {
    client: Client,
    base_url: String,
    anon_key: String,
    session: RwLock<Option<Session>>,
}

/// Token endpoint response (only the fields we use)
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    user: Option<TokenUser>,
}

#[derive(Debug, Deserialize)]
struct TokenUser {
    #[serde(default)]
    email: Option<String>,
}

impl SupabaseBackend {
    /// Create a client for the project at `base_url`
    ///
    /// # Errors
    ///
    /// Returns an error if the URL or key is empty or the HTTP client cannot
    /// be built.
    pub fn new(
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
        timeout: Duration,
    ) -> BackendResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let anon_key = anon_key.into();

        if base_url.is_empty() {
            return Err(BackendError::Configuration {
                message: "backend url is empty".to_string(),
            });
        }
        if anon_key.is_empty() {
            return Err(BackendError::Configuration {
                message: "anon key is empty".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        Ok(Self {
            client,
            base_url,
            anon_key,
            session: RwLock::new(None),
        })
    }

    /// Create a client from the `[backend]` configuration section
    ///
    /// # Errors
    ///
    /// See [`SupabaseBackend::new`].
    pub fn from_config(config: &BackendConfig) -> BackendResult<Self> {
        Self::new(
            config.url.clone(),
            config.anon_key.clone(),
            Duration::from_secs(config.request_timeout),
        )
    }

    /// Project base URL, without trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The current session, if signed in
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.session.read().clone()
    }

    fn table_url(&self, table: TableName) -> String {
        format!("{}/rest/v1/{}", self.base_url, table.as_str())
    }

    fn auth_url(&self, endpoint: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, endpoint)
    }

    fn bearer(&self) -> String {
        self.session
            .read()
            .as_ref()
            .map_or_else(|| self.anon_key.clone(), |s| s.access_token.clone())
    }

    /// Attach the project key and bearer token
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
    }
}

impl std::fmt::Debug for SupabaseBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseBackend")
            .field("base_url", &self.base_url)
            .field("signed_in", &self.session.read().is_some())
            .finish_non_exhaustive()
    }
}

/// Query pair selecting a single row by primary key
fn id_filter(id: &RowId) -> (&'static str, String) {
    (acehive_core::types::fields::ID, format!("eq.{id}"))
}

/// Total from a `Content-Range` header such as `0-24/3573` or `*/0`
///
/// Returns `None` when the total is unknown (`*`) or the header is malformed.
#[must_use]
pub fn parse_content_range(value: &str) -> Option<u64> {
    let (_, total) = value.trim().split_once('/')?;
    total.parse().ok()
}

/// Turn a non-success response into a [`BackendError::Api`]
async fn error_from_response(response: Response) -> BackendError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|json| {
            ["message", "error_description", "msg", "error"]
                .iter()
                .find_map(|key| json.get(*key).and_then(|v| v.as_str()).map(str::to_string))
        })
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });

    BackendError::Api {
        status: status.as_u16(),
        message,
    }
}

async fn ensure_success(response: Response) -> BackendResult<Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(error_from_response(response).await)
    }
}

#[async_trait]
impl Backend for SupabaseBackend {
    async fn count(
        &self,
        table: TableName,
        filter: Option<&EqFilter>,
    ) -> BackendResult<Option<u64>> {
        let mut request = self
            .authorize(self.client.head(self.table_url(table)))
            .header("Prefer", "count=exact")
            .query(&[("select", "*")]);

        if let Some(filter) = filter {
            request = request.query(&[(filter.column.as_str(), format!("eq.{}", filter.value))]);
        }

        let response = ensure_success(request.send().await?).await?;

        let count = response
            .headers()
            .get(header::CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_content_range);

        debug!(table = %table, ?filter, ?count, "Counted rows");
        Ok(count)
    }

    async fn select_all(&self, table: TableName) -> BackendResult<Vec<Row>> {
        let response = self
            .authorize(self.client.get(self.table_url(table)))
            .query(&[("select", "*")])
            .send()
            .await?;

        let body = ensure_success(response).await?.bytes().await?;
        let rows: Vec<Row> = serde_json::from_slice(&body)?;

        debug!(table = %table, rows = rows.len(), "Fetched rows");
        Ok(rows)
    }

    async fn update(&self, table: TableName, id: &RowId, row: &Row) -> BackendResult<()> {
        let response = self
            .authorize(self.client.patch(self.table_url(table)))
            .header("Prefer", "return=minimal")
            .query(&[id_filter(id)])
            .json(row)
            .send()
            .await?;

        ensure_success(response).await?;
        debug!(table = %table, id = %id, "Updated row");
        Ok(())
    }

    async fn delete(&self, table: TableName, id: &RowId) -> BackendResult<()> {
        let response = self
            .authorize(self.client.delete(self.table_url(table)))
            .query(&[id_filter(id)])
            .send()
            .await?;

        ensure_success(response).await?;
        debug!(table = %table, id = %id, "Deleted row");
        Ok(())
    }

    async fn sign_in(&self, credentials: &Credentials) -> BackendResult<Session> {
        let response = self
            .client
            .post(self.auth_url("token"))
            .header("apikey", &self.anon_key)
            .query(&[("grant_type", "password")])
            .json(&serde_json::json!({
                "email": credentials.email,
                "password": credentials.password,
            }))
            .send()
            .await?;

        let response = match ensure_success(response).await {
            Ok(response) => response,
            Err(BackendError::Api { message, .. }) => return Err(BackendError::Auth(message)),
            Err(other) => return Err(other),
        };

        let token: TokenResponse = serde_json::from_slice(&response.bytes().await?)?;
        let session = Session {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            email: token
                .user
                .and_then(|user| user.email)
                .or_else(|| Some(credentials.email.clone())),
            signed_in_at: Utc::now(),
        };

        *self.session.write() = Some(session.clone());
        info!(email = ?session.email, "Signed in");
        Ok(session)
    }

    async fn sign_out(&self) -> BackendResult<()> {
        let current = self.session.write().take();
        let Some(session) = current else {
            debug!("Sign-out requested without a session");
            return Ok(());
        };

        let response = self
            .client
            .post(self.auth_url("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await?;

        if let Err(error) = ensure_success(response).await {
            warn!(%error, "Backend rejected sign-out; local session already cleared");
            return Err(error);
        }

        info!(email = ?session.email, "Signed out");
        Ok(())
    }

    fn name(&self) -> &str {
        "supabase"
    }
}
