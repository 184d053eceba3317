//! HTTP handlers
//!
//! Page handlers render HTML. Action handlers change the dashboard state and
//! redirect back to `/dashboard`.

pub mod actions;
pub mod pages;

use crate::error::DashboardError;
use crate::render;
use axum::response::{Html, IntoResponse, Redirect, Response};
use tracing::warn;

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        warn!(%status, error = %self, "Dashboard action failed");
        (
            status,
            Html(render::error_page(status.as_u16(), &self.to_string())),
        )
            .into_response()
    }
}

/// Redirect to the dashboard page after an action
fn back_to_dashboard() -> Redirect {
    Redirect::to("/dashboard")
}
