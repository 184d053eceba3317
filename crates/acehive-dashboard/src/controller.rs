//! Async driver connecting user actions, view state and the backend
//!
//! Every action follows the same shape: lock the shell, update state and draw
//! a ticket, unlock, await the backend, then lock again to hand the result
//! back. The lock is never held across an `.await`.

use crate::components::summary::fetch_counts;
use crate::components::{BrowseView, EditorView, Mount, RowFilters, Shell, View};
use crate::error::{DashboardError, DashboardResult};
use crate::fetch::Ticket;
use acehive_backend::{Backend, Credentials, Session};
use acehive_core::{RowId, TableName};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Dashboard session: the view state plus the backend it reads from
pub struct Dashboard {
    backend: Arc<dyn Backend>,
    shell: Mutex<Shell>,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("backend", &self.backend.name())
            .field("view", &self.shell.try_lock().map(|shell| shell.view()))
            .finish()
    }
}

impl Dashboard {
    /// Create a dashboard on the home view
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            shell: Mutex::new(Shell::new()),
        }
    }

    /// Backend in use
    #[must_use]
    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    /// Read the view state
    pub fn inspect<R>(&self, f: impl FnOnce(&Shell) -> R) -> R {
        f(&self.shell.lock())
    }

    /// Render with `f`, then drop one-shot notices
    pub fn render_once<R>(&self, f: impl FnOnce(&Shell) -> R) -> R {
        let mut shell = self.shell.lock();
        let output = f(&shell);
        shell.clear_flash();
        output
    }

    /// Run the mount fetch if the mounted view never fetched
    pub async fn ensure_mounted(&self) {
        let mount = self.shell.lock().mount_if_idle();
        if let Some(mount) = mount {
            self.run(mount).await;
        }
    }

    /// Replace the mounted view and load it
    pub async fn navigate(&self, view: View) {
        info!(%view, "Navigating");
        let mount = self.shell.lock().navigate(view);
        self.run(mount).await;
    }

    async fn run(&self, mount: Mount) {
        match mount {
            Mount::Counts(ticket) => self.load_counts(ticket).await,
            Mount::Rows(table, ticket) => self.load_rows(table, ticket).await,
        }
    }

    async fn load_counts(&self, ticket: Ticket) {
        let result = fetch_counts(self.backend.as_ref()).await.map_err(|e| {
            error!(error = %e, "Error fetching resource counts");
            e.message()
        });
        if !self.shell.lock().complete_counts(ticket, result) {
            debug!(%ticket, "Dropped stale count response");
        }
    }

    async fn load_rows(&self, table: TableName, ticket: Ticket) {
        let result = self.backend.select_all(table).await.map_err(|e| {
            warn!(table = %table, error = %e, "Error fetching rows");
            e.message()
        });
        if !self.shell.lock().complete_rows(ticket, result) {
            debug!(%ticket, table = %table, "Dropped stale row response");
        }
    }

    /// Reload the resource counts; ignored while a refresh is outstanding
    pub async fn refresh_summary(&self) -> DashboardResult<()> {
        let ticket = {
            let mut shell = self.shell.lock();
            let panel = shell
                .summary_mut()
                .ok_or(DashboardError::InactiveView(View::Content))?;
            panel.begin_refresh()
        };
        match ticket {
            Some(ticket) => self.load_counts(ticket).await,
            None => debug!("Summary refresh already in flight"),
        }
        Ok(())
    }

    /// Switch the browsed table and load it
    pub async fn select_table(&self, table: TableName) -> DashboardResult<()> {
        let ticket = self.with_browse(|view| view.select_table(table))?;
        info!(table = %table, "Browsing table");
        self.load_rows(table, ticket).await;
        Ok(())
    }

    /// Reload the browsed table
    pub async fn refresh_browse(&self) -> DashboardResult<()> {
        let (table, ticket) = self.with_browse(|view| (view.table(), view.refresh()))?;
        self.load_rows(table, ticket).await;
        Ok(())
    }

    /// Set the filter inputs and apply them
    pub fn apply_filters(&self, filters: RowFilters) -> DashboardResult<()> {
        self.with_browse(|view| {
            view.set_inputs(filters);
            view.apply_filters();
        })
    }

    /// Clear the filters
    pub fn reset_filters(&self) -> DashboardResult<()> {
        self.with_browse(BrowseView::reset_filters)
    }

    /// Filter the browsed rows by title alone
    ///
    /// The year and type inputs are kept as submitted but not applied.
    pub fn browse_search(&self, inputs: RowFilters) -> DashboardResult<()> {
        self.with_browse(|view| {
            let query = inputs.search.clone();
            view.set_inputs(inputs);
            view.search_as_you_type(&query);
        })
    }

    fn with_browse<R>(
        &self,
        f: impl FnOnce(&mut BrowseView) -> R,
    ) -> DashboardResult<R> {
        let mut shell = self.shell.lock();
        let view = shell
            .browse_mut()
            .ok_or(DashboardError::InactiveView(View::Database))?;
        Ok(f(view))
    }

    fn with_editor<R>(&self, f: impl FnOnce(&mut EditorView) -> R) -> DashboardResult<R> {
        let mut shell = self.shell.lock();
        let view = shell
            .editor_mut()
            .ok_or(DashboardError::InactiveView(View::Edit))?;
        Ok(f(view))
    }

    /// Reload the editable table
    pub async fn refresh_editor(&self) -> DashboardResult<()> {
        let ticket = self.with_editor(EditorView::begin_fetch)?;
        self.load_rows(EditorView::TABLE, ticket).await;
        Ok(())
    }

    /// Filter the editable rows by title
    pub fn editor_search(&self, query: &str) -> DashboardResult<()> {
        self.with_editor(|view| view.search(query))
    }

    /// Put a row in edit state
    pub fn begin_editing(&self, id: &RowId) -> DashboardResult<()> {
        self.with_editor(|view| view.enable_editing(id))?
    }

    /// Discard a row's pending edits
    pub fn cancel_editing(&self, id: &RowId) -> DashboardResult<()> {
        self.with_editor(|view| {
            view.cancel_editing(id);
        })
    }

    /// Apply submitted fields to the row's buffer, then send the buffer
    ///
    /// Only a confirmed update triggers the reload; a rejected one leaves the
    /// row in edit state.
    pub async fn save_row<I>(&self, id: &RowId, fields: I) -> DashboardResult<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let row = self.with_editor(|view| {
            view.update_fields(id, fields)?;
            view.begin_save(id)
        })??;

        let result = self
            .backend
            .update(EditorView::TABLE, id, &row)
            .await
            .map_err(|e| {
                warn!(id = %id, error = %e, "Error saving changes");
                e.message()
            });
        if result.is_ok() {
            info!(id = %id, "Saved row");
        }

        let reload = self.with_editor(|view| view.finish_save(id, result))?;
        if let Some(ticket) = reload {
            self.load_rows(EditorView::TABLE, ticket).await;
        }
        Ok(())
    }

    /// Open the delete confirmation
    pub fn request_delete(&self, id: &RowId) -> DashboardResult<()> {
        self.with_editor(|view| view.request_delete(id))?
    }

    /// Close the delete confirmation without deleting
    pub fn cancel_delete(&self) -> DashboardResult<()> {
        self.with_editor(|view| {
            view.cancel_delete();
        })
    }

    /// Delete the row awaiting confirmation
    pub async fn confirm_delete(&self) -> DashboardResult<()> {
        let id = self.with_editor(EditorView::confirm_delete)??;

        let result = self
            .backend
            .delete(EditorView::TABLE, &id)
            .await
            .map_err(|e| {
                warn!(id = %id, error = %e, "Error deleting record");
                e.message()
            });
        if result.is_ok() {
            info!(id = %id, "Deleted row");
        }

        let reload = self.with_editor(|view| view.finish_delete(&id, result))?;
        if let Some(ticket) = reload {
            self.load_rows(EditorView::TABLE, ticket).await;
        }
        Ok(())
    }

    /// Sign in with email and password
    pub async fn sign_in(&self, credentials: &Credentials) -> DashboardResult<Session> {
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            return Err(DashboardError::EmptyCredentials);
        }
        let session = self.backend.sign_in(credentials).await?;
        *self.shell.lock() = Shell::new();
        Ok(session)
    }

    /// Sign out; on success the dashboard state is discarded
    pub async fn sign_out(&self) -> DashboardResult<()> {
        match self.backend.sign_out().await {
            Ok(()) => {
                *self.shell.lock() = Shell::new();
                info!("Signed out");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Error signing out");
                Err(e.into())
            }
        }
    }
}
