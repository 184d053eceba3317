//! Form actions

use super::back_to_dashboard;
use crate::components::{RowFilters, View};
use crate::error::{DashboardError, DashboardResult};
use crate::{render, state::AppState};
use acehive_backend::Credentials;
use acehive_core::{ResourceType, RowId, TableName, YearLevel};
use axum::{
    Form,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Sign-in form
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    /// Account email
    #[serde(default)]
    pub email: String,
    /// Account password
    #[serde(default)]
    pub password: String,
}

/// Table picker form
#[derive(Debug, Deserialize)]
pub struct TableForm {
    /// Table name, e.g. `feedback`
    pub table: String,
}

/// Browse filter form; empty strings mean "any"
#[derive(Debug, Default, Deserialize)]
pub struct FilterForm {
    /// Year label
    #[serde(default)]
    pub year: String,
    /// Resource type label
    #[serde(default)]
    pub resource_type: String,
    /// Title substring
    #[serde(default)]
    pub search: String,
}

impl TryFrom<FilterForm> for RowFilters {
    type Error = acehive_core::Error;

    fn try_from(form: FilterForm) -> Result<Self, Self::Error> {
        let year = match form.year.as_str() {
            "" => None,
            label => Some(label.parse::<YearLevel>()?),
        };
        let resource_type = match form.resource_type.as_str() {
            "" => None,
            label => Some(label.parse::<ResourceType>()?),
        };
        Ok(Self {
            resource_type,
            year,
            search: form.search,
        })
    }
}

/// Title search form
#[derive(Debug, Default, Deserialize)]
pub struct SearchForm {
    /// Title substring
    #[serde(default)]
    pub search: String,
}

/// Sign in and open the dashboard, or show the form again with the error
pub async fn login(State(state): State<Arc<AppState>>, Form(form): Form<LoginForm>) -> Response {
    let credentials = Credentials {
        email: form.email.trim().to_string(),
        password: form.password,
    };

    match state.dashboard.sign_in(&credentials).await {
        Ok(session) => {
            info!(email = ?session.email, "Dashboard session started");
            Redirect::to("/dashboard").into_response()
        }
        Err(error) => {
            warn!(%error, "Sign-in failed");
            let message = match &error {
                DashboardError::Backend(backend) => backend.message(),
                other => other.to_string(),
            };
            (
                error.status_code(),
                Html(render::entry_page(&credentials.email, Some(&message))),
            )
                .into_response()
        }
    }
}

/// Sign out; stay on the dashboard when the backend refuses
pub async fn logout(State(state): State<Arc<AppState>>) -> Redirect {
    match state.dashboard.sign_out().await {
        Ok(()) => Redirect::to("/"),
        Err(_) => back_to_dashboard(),
    }
}

/// Mount another view
pub async fn navigate(
    State(state): State<Arc<AppState>>,
    Path(view): Path<String>,
) -> DashboardResult<Redirect> {
    let view: View = view.parse()?;
    state.dashboard.navigate(view).await;
    Ok(back_to_dashboard())
}

/// Reload the resource counts
pub async fn refresh_summary(State(state): State<Arc<AppState>>) -> DashboardResult<Redirect> {
    state.dashboard.refresh_summary().await?;
    Ok(back_to_dashboard())
}

/// Switch the browsed table
pub async fn select_table(
    State(state): State<Arc<AppState>>,
    Form(form): Form<TableForm>,
) -> DashboardResult<Redirect> {
    let table: TableName = form.table.parse()?;
    state.dashboard.select_table(table).await?;
    Ok(back_to_dashboard())
}

/// Reload the browsed table
pub async fn refresh_browse(State(state): State<Arc<AppState>>) -> DashboardResult<Redirect> {
    state.dashboard.refresh_browse().await?;
    Ok(back_to_dashboard())
}

/// Set and apply the browse filters
pub async fn apply_filters(
    State(state): State<Arc<AppState>>,
    Form(form): Form<FilterForm>,
) -> DashboardResult<Redirect> {
    let filters = RowFilters::try_from(form)?;
    state.dashboard.apply_filters(filters)?;
    Ok(back_to_dashboard())
}

/// Filter the browsed rows by title alone
pub async fn browse_search(
    State(state): State<Arc<AppState>>,
    Form(form): Form<FilterForm>,
) -> DashboardResult<Redirect> {
    state.dashboard.browse_search(RowFilters::try_from(form)?)?;
    Ok(back_to_dashboard())
}

/// Clear the browse filters
pub async fn reset_filters(State(state): State<Arc<AppState>>) -> DashboardResult<Redirect> {
    state.dashboard.reset_filters()?;
    Ok(back_to_dashboard())
}

/// Reload the editable table
pub async fn refresh_editor(State(state): State<Arc<AppState>>) -> DashboardResult<Redirect> {
    state.dashboard.refresh_editor().await?;
    Ok(back_to_dashboard())
}

/// Filter the editable rows by title
pub async fn editor_search(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> DashboardResult<Redirect> {
    state.dashboard.editor_search(&form.search)?;
    Ok(back_to_dashboard())
}

/// Put a row in edit state
pub async fn begin_edit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> DashboardResult<Redirect> {
    state.dashboard.begin_editing(&RowId::new(id))?;
    Ok(back_to_dashboard())
}

/// Discard a row's pending edits
pub async fn cancel_edit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> DashboardResult<Redirect> {
    state.dashboard.cancel_editing(&RowId::new(id))?;
    Ok(back_to_dashboard())
}

/// Apply the submitted fields and save the row
pub async fn save_edit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(fields): Form<Vec<(String, String)>>,
) -> DashboardResult<Redirect> {
    state.dashboard.save_row(&RowId::new(id), fields).await?;
    Ok(back_to_dashboard())
}

/// Ask for delete confirmation
pub async fn request_delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> DashboardResult<Redirect> {
    state.dashboard.request_delete(&RowId::new(id))?;
    Ok(back_to_dashboard())
}

/// Delete the row awaiting confirmation
pub async fn confirm_delete(State(state): State<Arc<AppState>>) -> DashboardResult<Redirect> {
    state.dashboard.confirm_delete().await?;
    Ok(back_to_dashboard())
}

/// Close the delete confirmation
pub async fn cancel_delete(State(state): State<Arc<AppState>>) -> DashboardResult<Redirect> {
    state.dashboard.cancel_delete()?;
    Ok(back_to_dashboard())
}
