//! Page handlers

use crate::{render, state::AppState};
use axum::{extract::State, response::Html};
use std::sync::Arc;

/// Sign-in screen
pub async fn entry() -> Html<String> {
    Html(render::entry_page("", None))
}

/// Dashboard with the mounted view, loading it first if it never fetched
pub async fn dashboard(State(state): State<Arc<AppState>>) -> Html<String> {
    state.dashboard.ensure_mounted().await;

    let backend = state.dashboard.backend().name().to_string();
    Html(
        state
            .dashboard
            .render_once(|shell| render::dashboard_page(shell, &backend)),
    )
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}
