//! Inline edit and delete of resource rows
//!
//! A row is in edit state exactly while it owns a buffer. Saves and deletes
//! are not optimistic: the table only changes after the backend confirms and
//! a fresh fetch completes.

use super::TableContent;
use super::filter::title_matches;
use crate::error::{DashboardError, DashboardResult};
use crate::fetch::{FetchTracker, Ticket};
use acehive_core::types::is_hidden_resource_column;
use acehive_core::{Row, RowId, TableName};
use std::collections::BTreeMap;

/// Notice shown when the table is empty
pub const NO_TABLE_DATA: &str = "No data available in the selected table.";

/// Notice after a confirmed update
pub const SAVE_SUCCESS: &str = "Changes saved successfully!";

/// Notice after a confirmed delete
pub const DELETE_SUCCESS: &str = "Record deleted successfully!";

/// Outcome message of the last save or delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The backend confirmed the mutation
    Success(String),
    /// The backend rejected the mutation
    Error(String),
}

impl Notice {
    /// Message text
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success(message) | Self::Error(message) => message,
        }
    }

    /// Whether this reports a failure
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Edit view state
#[derive(Debug, Default)]
pub struct EditorView {
    rows: Vec<Row>,
    search: String,
    buffers: BTreeMap<RowId, Row>,
    pending_delete: Option<RowId>,
    notice: Option<Notice>,
    tracker: FetchTracker,
}

impl EditorView {
    /// Only the resource table is editable
    pub const TABLE: TableName = TableName::Resources;

    /// Create a view that has not fetched yet
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a full reload
    pub fn begin_fetch(&mut self) -> Ticket {
        self.tracker.begin()
    }

    /// Accept the rows fetched under `ticket`
    ///
    /// The current search is re-applied to the new rows. Buffers of rows that
    /// are gone are dropped. Returns `false` for a stale ticket.
    pub fn complete_fetch(&mut self, ticket: Ticket, result: Result<Vec<Row>, String>) -> bool {
        if !self.tracker.is_current(ticket) {
            return false;
        }
        match result {
            Ok(rows) => {
                self.rows = rows;
                let present: Vec<RowId> = self.rows.iter().filter_map(Row::id).collect();
                self.buffers.retain(|id, _| present.contains(id));
                self.tracker.settle(ticket, Ok(()))
            }
            Err(message) => {
                self.rows.clear();
                self.tracker.settle(ticket, Err(message))
            }
        }
    }

    /// Set the title search
    pub fn search(&mut self, query: &str) {
        self.search = query.to_string();
    }

    /// Current title search
    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search
    }

    /// Rows matching the search, in fetch order
    #[must_use]
    pub fn displayed(&self) -> Vec<&Row> {
        let blank = self.search.trim().is_empty();
        self.rows
            .iter()
            .filter(|row| blank || title_matches(row, &self.search))
            .collect()
    }

    /// Editable columns, taken from the first displayed row
    #[must_use]
    pub fn columns(&self) -> Vec<String> {
        self.displayed()
            .first()
            .map(|row| {
                row.columns()
                    .filter(|column| !is_hidden_resource_column(column))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// What the table area should show
    #[must_use]
    pub fn content(&self) -> TableContent<'_> {
        if self.tracker.is_loading() {
            return TableContent::Loading;
        }
        if self.tracker.error().is_some() {
            return TableContent::Failed;
        }
        let rows = self.displayed();
        if rows.is_empty() {
            TableContent::Empty
        } else {
            TableContent::Rows(rows)
        }
    }

    fn find(&self, id: &RowId) -> Option<&Row> {
        self.rows.iter().find(|row| row.id().as_ref() == Some(id))
    }

    /// Whether `id` is in edit state
    #[must_use]
    pub fn is_editing(&self, id: &RowId) -> bool {
        self.buffers.contains_key(id)
    }

    /// Pending edits of `id`
    #[must_use]
    pub fn buffer(&self, id: &RowId) -> Option<&Row> {
        self.buffers.get(id)
    }

    /// Put a row in edit state, seeding its buffer with the fetched row
    ///
    /// A row already in edit state keeps its buffer.
    pub fn enable_editing(&mut self, id: &RowId) -> DashboardResult<()> {
        let row = self
            .find(id)
            .cloned()
            .ok_or_else(|| DashboardError::NoSuchRow(id.clone()))?;
        self.buffers.entry(id.clone()).or_insert(row);
        Ok(())
    }

    /// Overwrite one buffered field
    ///
    /// Text equal to the buffered cell text is not written, so a number,
    /// boolean or null column that was left alone keeps its JSON value.
    pub fn update_field(&mut self, id: &RowId, field: &str, value: &str) -> DashboardResult<()> {
        if is_hidden_resource_column(field) {
            return Err(DashboardError::ColumnNotEditable(field.to_string()));
        }
        let buffer = self
            .buffers
            .get_mut(id)
            .ok_or_else(|| DashboardError::NotEditing(id.clone()))?;
        if buffer.display(field) != value {
            buffer.set(field, value);
        }
        Ok(())
    }

    /// Apply a submitted edit form to the buffer of `id`
    ///
    /// Nothing is written unless every field is editable.
    pub fn update_fields<I>(&mut self, id: &RowId, fields: I) -> DashboardResult<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let fields: Vec<(String, String)> = fields.into_iter().collect();
        if let Some((field, _)) = fields
            .iter()
            .find(|(field, _)| is_hidden_resource_column(field))
        {
            return Err(DashboardError::ColumnNotEditable(field.clone()));
        }
        if !self.is_editing(id) {
            return Err(DashboardError::NotEditing(id.clone()));
        }
        for (field, value) in &fields {
            self.update_field(id, field, value)?;
        }
        Ok(())
    }

    /// Leave edit state, discarding the buffer
    ///
    /// Returns whether the row was being edited.
    pub fn cancel_editing(&mut self, id: &RowId) -> bool {
        self.buffers.remove(id).is_some()
    }

    /// Text of an input cell: the buffered value, or the fetched one when
    /// the buffered value is empty
    #[must_use]
    pub fn input_value(&self, row: &Row, column: &str) -> String {
        let buffered = row
            .id()
            .and_then(|id| self.buffers.get(&id))
            .map(|buffer| buffer.display(column))
            .unwrap_or_default();
        if buffered.is_empty() {
            row.display(column)
        } else {
            buffered
        }
    }

    /// The full buffer to send for `id`
    pub fn begin_save(&self, id: &RowId) -> DashboardResult<Row> {
        self.buffers
            .get(id)
            .cloned()
            .ok_or_else(|| DashboardError::NotEditing(id.clone()))
    }

    /// Record the outcome of a save
    ///
    /// On success the row leaves edit state and a reload ticket is returned.
    /// On failure the buffer is kept for a retry.
    pub fn finish_save(&mut self, id: &RowId, result: Result<(), String>) -> Option<Ticket> {
        match result {
            Ok(()) => {
                self.buffers.remove(id);
                self.notice = Some(Notice::Success(SAVE_SUCCESS.to_string()));
                Some(self.begin_fetch())
            }
            Err(message) => {
                self.notice = Some(Notice::Error(format!("Error saving changes: {message}")));
                None
            }
        }
    }

    /// Open the delete confirmation for `id`
    pub fn request_delete(&mut self, id: &RowId) -> DashboardResult<()> {
        if self.find(id).is_none() {
            return Err(DashboardError::NoSuchRow(id.clone()));
        }
        self.pending_delete = Some(id.clone());
        Ok(())
    }

    /// Row awaiting delete confirmation
    #[must_use]
    pub const fn pending_delete(&self) -> Option<&RowId> {
        self.pending_delete.as_ref()
    }

    /// Close the confirmation without deleting
    pub fn cancel_delete(&mut self) -> Option<RowId> {
        self.pending_delete.take()
    }

    /// Close the confirmation and return the row to delete
    pub fn confirm_delete(&mut self) -> DashboardResult<RowId> {
        self.pending_delete
            .take()
            .ok_or(DashboardError::NoPendingDelete)
    }

    /// Record the outcome of a delete
    ///
    /// On success a reload ticket is returned.
    pub fn finish_delete(&mut self, id: &RowId, result: Result<(), String>) -> Option<Ticket> {
        match result {
            Ok(()) => {
                self.buffers.remove(id);
                self.notice = Some(Notice::Success(DELETE_SUCCESS.to_string()));
                Some(self.begin_fetch())
            }
            Err(message) => {
                self.notice = Some(Notice::Error(format!("Error deleting record: {message}")));
                None
            }
        }
    }

    /// Outcome of the last save or delete, until it is shown
    #[must_use]
    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Drop the notice once shown
    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Whether a fetch is outstanding
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.tracker.is_loading()
    }

    /// Whether the view has never fetched
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.tracker.is_idle()
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn resource(id: i64, title: &str) -> Row {
        Row::new()
            .with("id", id)
            .with("title", title)
            .with("year", "1st Year")
            .with("description", "notes")
            .with("created_at", "2024-01-01T00:00:00Z")
    }

    fn loaded() -> EditorView {
        let mut view = EditorView::new();
        let ticket = view.begin_fetch();
        assert!(view.complete_fetch(
            ticket,
            Ok(vec![
                resource(4, "Calculus"),
                resource(5, "Old Title"),
                resource(6, "Physics")
            ])
        ));
        view
    }

    #[test]
    fn test_columns_exclude_hidden_fields() {
        let view = loaded();
        assert_eq!(view.columns(), vec!["title", "year"]);
    }

    #[test]
    fn test_edit_buffer_leaves_fetched_row_untouched() {
        let mut view = loaded();
        let id = RowId::from(5);

        view.enable_editing(&id).unwrap();
        view.update_field(&id, "title", "New Title").unwrap();

        assert_eq!(
            view.buffer(&id).unwrap().get_str("title"),
            Some("New Title")
        );
        assert_eq!(view.displayed()[1].get_str("title"), Some("Old Title"));

        let payload = view.begin_save(&id).unwrap();
        assert_eq!(payload.get_str("title"), Some("New Title"));
        assert_eq!(payload.get_str("description"), Some("notes"));
    }

    #[test]
    fn test_several_rows_edit_independently() {
        let mut view = loaded();
        let four = RowId::from(4);
        let six = RowId::from(6);

        view.enable_editing(&four).unwrap();
        view.enable_editing(&six).unwrap();
        view.update_field(&six, "year", "3rd Year").unwrap();

        assert_eq!(view.buffer(&four).unwrap().get_str("year"), Some("1st Year"));
        assert!(view.cancel_editing(&six));
        assert!(!view.is_editing(&six));
        assert!(view.is_editing(&four));
    }

    #[test]
    fn test_rejected_edits() {
        let mut view = loaded();
        let id = RowId::from(4);

        assert!(matches!(
            view.update_field(&id, "title", "x"),
            Err(DashboardError::NotEditing(_))
        ));

        view.enable_editing(&id).unwrap();
        assert!(matches!(
            view.update_field(&id, "tags", "x"),
            Err(DashboardError::ColumnNotEditable(_))
        ));
        assert!(matches!(
            view.enable_editing(&RowId::from(99)),
            Err(DashboardError::NoSuchRow(_))
        ));
    }

    #[test]
    fn test_untouched_fields_keep_their_json_type() {
        let mut view = EditorView::new();
        let ticket = view.begin_fetch();
        let row = resource(5, "Old")
            .with("downloads", 3)
            .with("subject", serde_json::Value::Null)
            .with("approved", true);
        assert!(view.complete_fetch(ticket, Ok(vec![row.clone()])));

        let id = RowId::from(5);
        view.enable_editing(&id).unwrap();
        view.update_fields(
            &id,
            [
                ("title", "New"),
                ("year", "1st Year"),
                ("downloads", "3"),
                ("subject", ""),
                ("approved", "true"),
            ]
            .map(|(field, value)| (field.to_string(), value.to_string())),
        )
        .unwrap();

        let buffer = view.buffer(&id).unwrap();
        assert_eq!(buffer.get_str("title"), Some("New"));
        assert_eq!(buffer.get("downloads"), row.get("downloads"));
        assert_eq!(buffer.get("subject"), Some(&serde_json::Value::Null));
        assert_eq!(buffer.get("approved"), Some(&serde_json::Value::Bool(true)));

        view.update_fields(&id, [("downloads".to_string(), "4".to_string())])
            .unwrap();
        assert_eq!(view.buffer(&id).unwrap().get_str("downloads"), Some("4"));
    }

    #[test]
    fn test_form_with_hidden_field_writes_nothing() {
        let mut view = loaded();
        let id = RowId::from(4);
        view.enable_editing(&id).unwrap();

        let result = view.update_fields(
            &id,
            [
                ("title".to_string(), "X".to_string()),
                ("tags".to_string(), "y".to_string()),
            ],
        );

        assert!(matches!(result, Err(DashboardError::ColumnNotEditable(_))));
        assert_eq!(view.buffer(&id).unwrap().get_str("title"), Some("Calculus"));
        assert!(matches!(
            view.update_fields(&RowId::from(6), Vec::new()),
            Err(DashboardError::NotEditing(_))
        ));
    }

    #[test]
    fn test_input_falls_back_to_fetched_value_when_cleared() {
        let mut view = loaded();
        let id = RowId::from(5);
        view.enable_editing(&id).unwrap();
        view.update_field(&id, "title", "").unwrap();

        let row = view.displayed()[1].clone();
        assert_eq!(view.input_value(&row, "title"), "Old Title");
    }

    #[test]
    fn test_successful_save_reloads_and_leaves_edit_state() {
        let mut view = loaded();
        let id = RowId::from(5);
        view.enable_editing(&id).unwrap();

        let ticket = view.finish_save(&id, Ok(())).unwrap();
        assert!(!view.is_editing(&id));
        assert!(view.is_loading());
        assert_eq!(view.notice(), Some(&Notice::Success(SAVE_SUCCESS.to_string())));

        assert!(view.complete_fetch(ticket, Ok(vec![resource(5, "New Title")])));
        assert_eq!(view.displayed()[0].get_str("title"), Some("New Title"));
    }

    #[test]
    fn test_failed_save_keeps_buffer() {
        let mut view = loaded();
        let id = RowId::from(5);
        view.enable_editing(&id).unwrap();
        view.update_field(&id, "title", "New Title").unwrap();

        assert!(view.finish_save(&id, Err("permission denied".to_string())).is_none());
        assert!(view.is_editing(&id));
        assert_eq!(
            view.buffer(&id).unwrap().get_str("title"),
            Some("New Title")
        );
        let notice = view.notice().unwrap();
        assert!(notice.is_error());
        assert_eq!(notice.message(), "Error saving changes: permission denied");
    }

    #[test]
    fn test_delete_is_two_phase() {
        let mut view = loaded();
        let id = RowId::from(6);

        view.request_delete(&id).unwrap();
        assert_eq!(view.pending_delete(), Some(&id));
        assert_eq!(view.cancel_delete(), Some(id.clone()));
        assert!(matches!(
            view.confirm_delete(),
            Err(DashboardError::NoPendingDelete)
        ));

        view.request_delete(&id).unwrap();
        assert_eq!(view.confirm_delete().unwrap(), id);
        assert!(view.pending_delete().is_none());

        assert!(view.finish_delete(&id, Err("locked".to_string())).is_none());
        assert_eq!(
            view.notice().map(Notice::message),
            Some("Error deleting record: locked")
        );
    }

    #[test]
    fn test_search_is_reapplied_after_reload() {
        let mut view = loaded();
        view.search("calc");
        assert_eq!(view.displayed().len(), 1);

        let ticket = view.begin_fetch();
        view.complete_fetch(
            ticket,
            Ok(vec![resource(7, "Calculus II"), resource(8, "Chemistry")]),
        );
        assert_eq!(view.displayed().len(), 1);
        assert_eq!(view.displayed()[0].get_str("title"), Some("Calculus II"));

        view.search("   ");
        assert_eq!(view.displayed().len(), 2);
    }

    #[test]
    fn test_reload_drops_buffers_of_missing_rows() {
        let mut view = loaded();
        let id = RowId::from(6);
        view.enable_editing(&id).unwrap();

        let ticket = view.begin_fetch();
        view.complete_fetch(ticket, Ok(vec![resource(4, "Calculus")]));
        assert!(!view.is_editing(&id));
    }

    #[test]
    fn test_empty_table() {
        let mut view = EditorView::new();
        let ticket = view.begin_fetch();
        view.complete_fetch(ticket, Ok(Vec::new()));
        assert_eq!(view.content(), TableContent::Empty);
    }
}
