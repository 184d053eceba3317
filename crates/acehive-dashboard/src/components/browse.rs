//! Read-only table browser with filters

use super::TableContent;
use super::filter::{RowFilters, title_matches};
use crate::fetch::{FetchTracker, Ticket};
use acehive_core::types::is_hidden_resource_column;
use acehive_core::{Row, TableName};

/// Alert shown in place of the table when a fetch fails
pub const FETCH_ERROR: &str = "Error fetching data from Supabase";

/// Notice shown when nothing is displayed
pub const NO_FILTERED_DATA: &str = "No data available for the selected filters.";

/// How the displayed rows derive from the fetched rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum Selection {
    #[default]
    All,
    Filtered(RowFilters),
    Title(String),
}

/// Database view state
#[derive(Debug)]
pub struct BrowseView {
    table: TableName,
    rows: Vec<Row>,
    inputs: RowFilters,
    selection: Selection,
    tracker: FetchTracker,
}

impl Default for BrowseView {
    fn default() -> Self {
        Self::new(TableName::Resources)
    }
}

impl BrowseView {
    /// Create a view of `table` that has not fetched yet
    #[must_use]
    pub fn new(table: TableName) -> Self {
        Self {
            table,
            rows: Vec::new(),
            inputs: RowFilters::default(),
            selection: Selection::All,
            tracker: FetchTracker::new(),
        }
    }

    /// Selected table
    #[must_use]
    pub const fn table(&self) -> TableName {
        self.table
    }

    /// Switch tables, clearing every filter, and start the fetch
    pub fn select_table(&mut self, table: TableName) -> Ticket {
        self.table = table;
        self.rows.clear();
        self.inputs = RowFilters::default();
        self.selection = Selection::All;
        self.tracker.begin()
    }

    /// Re-fetch the current table, keeping the filter inputs
    pub fn refresh(&mut self) -> Ticket {
        self.selection = Selection::All;
        self.tracker.begin()
    }

    /// Accept the rows fetched under `ticket`
    ///
    /// Returns `false` for a stale ticket.
    pub fn complete_fetch(&mut self, ticket: Ticket, result: Result<Vec<Row>, String>) -> bool {
        if !self.tracker.is_current(ticket) {
            return false;
        }
        self.selection = Selection::All;
        match result {
            Ok(rows) => {
                self.rows = rows;
                self.tracker.settle(ticket, Ok(()))
            }
            Err(message) => {
                self.rows.clear();
                self.tracker.settle(ticket, Err(message))
            }
        }
    }

    /// Current filter inputs
    #[must_use]
    pub const fn inputs(&self) -> &RowFilters {
        &self.inputs
    }

    /// Replace the filter inputs without applying them
    pub fn set_inputs(&mut self, inputs: RowFilters) {
        self.inputs = inputs;
    }

    /// Filter the fetched rows by the current inputs
    pub fn apply_filters(&mut self) {
        self.selection = Selection::Filtered(self.inputs.clone());
    }

    /// Clear every input and show all fetched rows
    pub fn reset_filters(&mut self) {
        self.inputs = RowFilters::default();
        self.selection = Selection::All;
    }

    /// Filter by title alone
    pub fn search_as_you_type(&mut self, query: &str) {
        self.inputs.search = query.to_string();
        self.selection = if query.is_empty() {
            Selection::All
        } else {
            Selection::Title(query.to_string())
        };
    }

    /// Whether the "Filters Applied" banner is up
    #[must_use]
    pub const fn filters_applied(&self) -> bool {
        matches!(self.selection, Selection::Filtered(_))
    }

    /// Whether filter controls are offered for the current table
    #[must_use]
    pub fn shows_filters(&self) -> bool {
        self.table == TableName::Resources
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

    /// Every fetched row
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Rows passing the current selection, in fetch order
    #[must_use]
    pub fn displayed(&self) -> Vec<&Row> {
        self.rows
            .iter()
            .filter(|row| match &self.selection {
                Selection::All => true,
                Selection::Filtered(filters) => filters.matches(row),
                Selection::Title(query) => title_matches(row, query),
            })
            .collect()
    }

    /// Header columns, taken from the first displayed row
    #[must_use]
    pub fn columns(&self) -> Vec<String> {
        let hide = self.table == TableName::Resources;
        self.displayed()
            .first()
            .map(|row| {
                row.columns()
                    .filter(|column| !(hide && is_hidden_resource_column(column)))
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
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use acehive_core::{ResourceType, YearLevel};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn resource(id: i64, title: &str, kind: &str, year: &str) -> Row {
        Row::new()
            .with("id", id)
            .with("title", title)
            .with("resource_type", kind)
            .with("year", year)
            .with("subject", "Maths")
            .with("description", "hidden")
            .with("tags", serde_json::json!(["a"]))
    }

    fn loaded(rows: Vec<Row>) -> BrowseView {
        let mut view = BrowseView::new(TableName::Resources);
        let ticket = view.refresh();
        assert!(view.complete_fetch(ticket, Ok(rows)));
        view
    }

    fn sample() -> Vec<Row> {
        vec![
            resource(1, "Calculus I", "CT Paper", "1st Year"),
            resource(2, "Physics", "Sem Paper", "1st Year"),
            resource(3, "Advanced Calculus", "CT Paper", "2nd Year"),
        ]
    }

    fn ids(rows: &[&Row]) -> Vec<String> {
        rows.iter()
            .filter_map(|row| row.id())
            .map(|id| id.to_string())
            .collect()
    }

    #[test]
    fn test_type_filter_keeps_fetch_order() {
        let mut view = loaded(sample());
        view.set_inputs(RowFilters {
            resource_type: Some(ResourceType::CtPaper),
            ..RowFilters::default()
        });
        view.apply_filters();

        assert!(view.filters_applied());
        assert_eq!(ids(&view.displayed()), vec!["1", "3"]);
    }

    #[test]
    fn test_search_as_you_type_uses_title_only() {
        let mut view = loaded(sample());
        view.set_inputs(RowFilters {
            year: Some(YearLevel::Second),
            ..RowFilters::default()
        });

        view.search_as_you_type("calc");
        assert_eq!(ids(&view.displayed()), vec!["1", "3"]);
        assert!(!view.filters_applied());

        view.search_as_you_type("");
        assert_eq!(view.displayed().len(), 3);
    }

    #[test]
    fn test_reset_restores_full_set() {
        let mut view = loaded(sample());
        view.set_inputs(RowFilters {
            search: "physics".to_string(),
            ..RowFilters::default()
        });
        view.apply_filters();
        assert_eq!(view.displayed().len(), 1);

        view.reset_filters();
        assert_eq!(view.inputs(), &RowFilters::default());
        assert!(!view.filters_applied());
        assert_eq!(view.displayed().len(), 3);
    }

    #[test]
    fn test_select_table_clears_filters_and_fetches_once() {
        let mut view = loaded(sample());
        view.set_inputs(RowFilters {
            year: Some(YearLevel::First),
            ..RowFilters::default()
        });
        view.apply_filters();

        let ticket = view.select_table(TableName::Feedback);
        assert_eq!(view.table(), TableName::Feedback);
        assert_eq!(view.inputs(), &RowFilters::default());
        assert!(!view.filters_applied());
        assert_eq!(view.content(), TableContent::Loading);
        assert!(!view.shows_filters());

        let feedback = vec![Row::new().with("id", 1).with("message", "Great")];
        assert!(view.complete_fetch(ticket, Ok(feedback)));
        assert_eq!(view.columns(), vec!["id", "message"]);
    }

    #[test]
    fn test_refresh_keeps_inputs_and_clears_flag() {
        let mut view = loaded(sample());
        let inputs = RowFilters {
            resource_type: Some(ResourceType::SemPaper),
            ..RowFilters::default()
        };
        view.set_inputs(inputs.clone());
        view.apply_filters();

        let ticket = view.refresh();
        assert!(!view.filters_applied());
        view.complete_fetch(ticket, Ok(sample()));
        assert_eq!(view.inputs(), &inputs);
        assert_eq!(view.displayed().len(), 3);
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut view = BrowseView::new(TableName::Resources);
        let first = view.select_table(TableName::Feedback);
        let second = view.select_table(TableName::Collaborations);

        let collaborations = vec![Row::new().with("id", 9).with("name", "Arjun")];
        assert!(view.complete_fetch(second, Ok(collaborations)));
        assert!(!view.complete_fetch(first, Ok(vec![Row::new().with("id", 1)])));

        assert_eq!(view.table(), TableName::Collaborations);
        assert_eq!(ids(&view.displayed()), vec!["9"]);
    }

    #[test]
    fn test_failure_clears_rows() {
        let mut view = loaded(sample());
        let ticket = view.refresh();
        assert!(view.complete_fetch(ticket, Err("timeout".to_string())));

        assert!(view.rows().is_empty());
        assert_eq!(view.content(), TableContent::Failed);
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let mut view = loaded(sample());
        view.set_inputs(RowFilters {
            search: "zoology".to_string(),
            ..RowFilters::default()
        });
        view.apply_filters();
        assert_eq!(view.content(), TableContent::Empty);
        assert!(view.columns().is_empty());
    }

    #[test]
    fn test_resource_columns_are_projected() {
        let view = loaded(sample());
        assert_eq!(
            view.columns(),
            vec!["title", "resource_type", "year", "subject"]
        );
    }

    fn arb_row() -> impl Strategy<Value = Row> {
        (
            0i64..1000,
            proptest::option::of("[a-zA-Z ]{0,12}"),
            proptest::sample::select(vec!["CT Paper", "Sem Paper", "Study Material", "Other"]),
            proptest::sample::select(vec!["1st Year", "2nd Year", "3rd Year"]),
        )
            .prop_map(|(id, title, kind, year)| {
                let mut row = Row::new()
                    .with("id", id)
                    .with("resource_type", kind)
                    .with("year", year);
                if let Some(title) = title {
                    row.set("title", title);
                }
                row
            })
    }

    fn arb_filters() -> impl Strategy<Value = RowFilters> {
        (
            proptest::option::of(proptest::sample::select(ResourceType::ALL.to_vec())),
            proptest::option::of(proptest::sample::select(YearLevel::ALL.to_vec())),
            "[a-z]{0,3}",
        )
            .prop_map(|(resource_type, year, search)| RowFilters {
                resource_type,
                year,
                search,
            })
    }

    proptest! {
        #[test]
        fn prop_filtered_rows_are_ordered_subset(
            rows in proptest::collection::vec(arb_row(), 0..30),
            filters in arb_filters(),
        ) {
            let mut view = loaded(rows.clone());
            view.set_inputs(filters.clone());
            view.apply_filters();

            let expected: Vec<&Row> = rows.iter().filter(|row| filters.matches(row)).collect();
            prop_assert_eq!(view.displayed(), expected);

            view.reset_filters();
            prop_assert_eq!(view.displayed().len(), rows.len());
        }
    }
}
