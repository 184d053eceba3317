//! Acehive admin dashboard
//!
//! Server-rendered web interface for browsing and editing the Acehive
//! resource tables held in a remote backend.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

pub mod components;
pub mod controller;
pub mod error;
pub mod fetch;
pub mod handlers;
pub mod render;
pub mod routes;
pub mod server;
pub mod state;

// Re-export the main entry points
pub use controller::Dashboard;
pub use error::{DashboardError, DashboardResult};
pub use server::build_app;
pub use state::AppState;
