//! Dashboard view state
//!
//! Exactly one view is mounted at a time. Navigating replaces it with a fresh
//! one, so nothing survives an unmount.

pub mod browse;
pub mod editor;
pub mod filter;
pub mod summary;

pub use browse::BrowseView;
pub use editor::{EditorView, Notice};
pub use filter::RowFilters;
pub use summary::{ResourceCounts, SummaryPanel};

use crate::fetch::Ticket;
use acehive_core::{Row, TableName};
use std::fmt;
use std::str::FromStr;

/// What a table area should show
#[derive(Debug, PartialEq)]
pub enum TableContent<'a> {
    /// A fetch is outstanding
    Loading,
    /// The last fetch failed
    Failed,
    /// Nothing to display
    Empty,
    /// Rows to display, in fetch order
    Rows(Vec<&'a Row>),
}

/// Selectable dashboard views
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum View {
    /// Resource counts (home)
    #[default]
    Content,
    /// Read-only table browser
    Database,
    /// Resource editor
    Edit,
}

impl View {
    /// Every view, in sidebar order
    pub const ALL: [Self; 3] = [Self::Content, Self::Database, Self::Edit];

    /// Path segment of the view
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Database => "database",
            Self::Edit => "edit",
        }
    }

    /// Sidebar label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Content => "Home",
            Self::Database => "Database",
            Self::Edit => "Edit Database",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = acehive_core::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|view| view.as_str() == s)
            .ok_or_else(|| acehive_core::Error::Validation {
                field: "view".to_string(),
                message: format!("unknown view '{s}'"),
            })
    }
}

/// The mounted view and its state
#[derive(Debug)]
pub enum ActiveView {
    /// Home
    Summary(SummaryPanel),
    /// Table browser
    Browse(BrowseView),
    /// Resource editor
    Edit(EditorView),
}

/// Fetch to run after mounting a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mount {
    /// Load the resource counts
    Counts(Ticket),
    /// Load every row of a table
    Rows(TableName, Ticket),
}

/// Top-level dashboard state
#[derive(Debug)]
pub struct Shell {
    active: ActiveView,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell {
    /// Start on the home view, not yet fetched
    #[must_use]
    pub fn new() -> Self {
        Self {
            active: ActiveView::Summary(SummaryPanel::new()),
        }
    }

    /// The mounted view
    #[must_use]
    pub const fn view(&self) -> View {
        match self.active {
            ActiveView::Summary(_) => View::Content,
            ActiveView::Browse(_) => View::Database,
            ActiveView::Edit(_) => View::Edit,
        }
    }

    /// The mounted view's state
    #[must_use]
    pub const fn active(&self) -> &ActiveView {
        &self.active
    }

    /// Mount a fresh `view` and start its fetch
    pub fn navigate(&mut self, view: View) -> Mount {
        self.active = match view {
            View::Content => ActiveView::Summary(SummaryPanel::new()),
            View::Database => ActiveView::Browse(BrowseView::new(TableName::Resources)),
            View::Edit => ActiveView::Edit(EditorView::new()),
        };
        self.mount()
    }

    /// Start the mount fetch of a view that never fetched
    ///
    /// Returns `None` when the mounted view already has data or a fetch is
    /// outstanding.
    pub fn mount_if_idle(&mut self) -> Option<Mount> {
        let idle = match &self.active {
            ActiveView::Summary(panel) => panel.is_idle(),
            ActiveView::Browse(view) => view.is_idle(),
            ActiveView::Edit(view) => view.is_idle(),
        };
        idle.then(|| self.mount())
    }

    fn mount(&mut self) -> Mount {
        match &mut self.active {
            ActiveView::Summary(panel) => {
                // A fresh panel is never loading
                let ticket = panel.begin_refresh().unwrap_or_else(Ticket::issue);
                Mount::Counts(ticket)
            }
            ActiveView::Browse(view) => {
                let table = view.table();
                Mount::Rows(table, view.select_table(table))
            }
            ActiveView::Edit(view) => Mount::Rows(EditorView::TABLE, view.begin_fetch()),
        }
    }

    /// Hand fetched counts to the home view
    ///
    /// Returns `false` when the response is stale.
    pub fn complete_counts(&mut self, ticket: Ticket, result: Result<ResourceCounts, String>) -> bool {
        match &mut self.active {
            ActiveView::Summary(panel) => panel.complete(ticket, result),
            _ => false,
        }
    }

    /// Hand fetched rows to the mounted table view
    ///
    /// Returns `false` when the response is stale.
    pub fn complete_rows(&mut self, ticket: Ticket, result: Result<Vec<Row>, String>) -> bool {
        match &mut self.active {
            ActiveView::Browse(view) => view.complete_fetch(ticket, result),
            ActiveView::Edit(view) => view.complete_fetch(ticket, result),
            ActiveView::Summary(_) => false,
        }
    }

    /// The home view, if mounted
    pub const fn summary_mut(&mut self) -> Option<&mut SummaryPanel> {
        match &mut self.active {
            ActiveView::Summary(panel) => Some(panel),
            _ => None,
        }
    }

    /// The table browser, if mounted
    pub const fn browse_mut(&mut self) -> Option<&mut BrowseView> {
        match &mut self.active {
            ActiveView::Browse(view) => Some(view),
            _ => None,
        }
    }

    /// The editor, if mounted
    pub const fn editor_mut(&mut self) -> Option<&mut EditorView> {
        match &mut self.active {
            ActiveView::Edit(view) => Some(view),
            _ => None,
        }
    }

    /// Drop one-shot notices after they were rendered
    pub fn clear_flash(&mut self) {
        if let Some(editor) = self.editor_mut() {
            editor.clear_notice();
        }
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_view_names() {
        assert_eq!("database".parse::<View>().unwrap(), View::Database);
        assert_eq!(View::Edit.label(), "Edit Database");
        assert!("settings".parse::<View>().is_err());
    }

    #[test]
    fn test_starts_on_home_view() {
        let mut shell = Shell::new();
        assert_eq!(shell.view(), View::Content);
        assert!(matches!(shell.mount_if_idle(), Some(Mount::Counts(_))));
        assert!(shell.mount_if_idle().is_none());
    }

    #[test]
    fn test_navigate_mounts_fresh_view() {
        let mut shell = Shell::new();
        let Mount::Rows(table, ticket) = shell.navigate(View::Database) else {
            panic!("Expected a row fetch");
        };
        assert_eq!(table, TableName::Resources);
        assert!(shell.complete_rows(ticket, Ok(vec![Row::new().with("id", 1)])));

        shell.navigate(View::Content);
        let Mount::Rows(_, ticket) = shell.navigate(View::Database) else {
            panic!("Expected a row fetch");
        };
        let browse = shell.browse_mut().unwrap();
        assert!(browse.rows().is_empty());
        assert!(browse.is_loading());
        assert!(shell.complete_rows(ticket, Ok(Vec::new())));
    }

    #[test]
    fn test_response_for_unmounted_view_is_dropped() {
        let mut shell = Shell::new();
        let Mount::Rows(_, ticket) = shell.navigate(View::Edit) else {
            panic!("Expected a row fetch");
        };
        shell.navigate(View::Database);

        assert!(!shell.complete_rows(ticket, Ok(vec![Row::new().with("id", 1)])));
        assert!(shell.browse_mut().unwrap().rows().is_empty());
        assert!(!shell.complete_counts(ticket, Ok(ResourceCounts::default())));
    }
}
