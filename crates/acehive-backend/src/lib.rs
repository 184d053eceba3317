//! Remote data access for the Acehive admin dashboard
//!
//! The dashboard only ever talks to a [`Backend`]: a hosted Supabase project
//! in production ([`SupabaseBackend`]) or in-process tables for demos and
//! tests ([`MemoryBackend`]).

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_possible_truncation
)]

pub mod backend;
pub mod error;
pub mod memory;
pub mod supabase;

pub use backend::{Backend, Credentials, EqFilter, Session};
pub use error::{BackendError, BackendResult};
pub use memory::{BackendCall, MemoryBackend, Operation};
pub use supabase::SupabaseBackend;

use acehive_core::{BackendKind, config::BackendConfig};
use std::sync::Arc;
use tracing::info;

/// Build the backend selected by the `[backend]` configuration section
///
/// The memory backend is seeded from `seed_file` when set and from a small
/// demo dataset otherwise.
///
/// # Errors
///
/// Returns an error if the Supabase client cannot be built or the seed file
/// cannot be loaded.
pub fn from_config(config: &BackendConfig) -> BackendResult<Arc<dyn Backend>> {
    let backend: Arc<dyn Backend> = match config.kind {
        BackendKind::Supabase => Arc::new(SupabaseBackend::from_config(config)?),
        BackendKind::Memory => match &config.seed_file {
            Some(path) => Arc::new(MemoryBackend::from_seed_file(path)?),
            None => Arc::new(MemoryBackend::from_json(demo_seed())?),
        },
    };

    info!(backend = backend.name(), "Backend ready");
    Ok(backend)
}

/// Demo tables served by the memory backend when no seed file is given
#[must_use]
pub fn demo_seed() -> serde_json::Value {
    serde_json::json!({
        "resources": [
            {
                "id": 1,
                "title": "Calculus I",
                "resource_type": "CT Paper",
                "year": "1st Year",
                "subject": "Mathematics",
                "description": "Class test 1, unit 1 to 3",
                "file_urls": ["calculus-ct1.pdf"],
                "tags": ["math"],
                "created_at": "2024-09-02T10:15:00Z"
            },
            {
                "id": 2,
                "title": "Engineering Physics",
                "resource_type": "Sem Paper",
                "year": "1st Year",
                "subject": "Physics",
                "description": "End semester paper",
                "file_urls": ["physics-sem.pdf"],
                "tags": ["physics"],
                "created_at": "2024-09-05T08:00:00Z"
            },
            {
                "id": 3,
                "title": "Data Structures Notes",
                "resource_type": "Study Material",
                "year": "2nd Year",
                "subject": "Computer Science",
                "description": "Trees, heaps and graphs",
                "file_urls": ["ds-notes.pdf"],
                "tags": ["cs", "notes"],
                "created_at": "2024-10-11T14:30:00Z"
            }
        ],
        "feedback": [
            {"id": 1, "name": "Riya", "message": "Please add more third year papers", "created_at": "2024-10-01T09:00:00Z"}
        ],
        "collaborations": [
            {"id": 1, "name": "Arjun", "email": "arjun@example.com", "proposal": "Share my DBMS notes"}
        ]
    })
}
