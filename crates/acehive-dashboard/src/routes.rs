//! Route definitions for the dashboard

use crate::{
    handlers::{actions, pages},
    state::AppState,
};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

/// Build the complete dashboard router
pub fn build_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Pages
        .route("/", get(pages::entry))
        .route("/dashboard", get(pages::dashboard))
        // Session
        .route("/login", post(actions::login))
        .route("/logout", post(actions::logout))
        // Navigation
        .route("/view/:view", post(actions::navigate))
        // Summary
        .route("/summary/refresh", post(actions::refresh_summary))
        // Browse
        .route("/browse/table", post(actions::select_table))
        .route("/browse/refresh", post(actions::refresh_browse))
        .route("/browse/filters", post(actions::apply_filters))
        .route("/browse/search", post(actions::browse_search))
        .route("/browse/reset", post(actions::reset_filters))
        // Edit
        .route("/edit/refresh", post(actions::refresh_editor))
        .route("/edit/search", post(actions::editor_search))
        .route("/edit/delete/confirm", post(actions::confirm_delete))
        .route("/edit/delete/cancel", post(actions::cancel_delete))
        .route("/edit/:id/begin", post(actions::begin_edit))
        .route("/edit/:id/cancel", post(actions::cancel_edit))
        .route("/edit/:id/save", post(actions::save_edit))
        .route("/edit/:id/delete", post(actions::request_delete))
        // Health check
        .route("/health", get(pages::health_check))
}
