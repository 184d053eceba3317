//! Application state management

use crate::controller::Dashboard;
use acehive_backend::Backend;
use acehive_core::Config;
use std::sync::Arc;

/// Application state holding configuration and the dashboard session
#[derive(Debug)]
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Dashboard view state and backend
    pub dashboard: Dashboard,
}

impl AppState {
    /// Create new application state
    #[must_use]
    pub fn new(config: Config, backend: Arc<dyn Backend>) -> Self {
        Self {
            config,
            dashboard: Dashboard::new(backend),
        }
    }
}
