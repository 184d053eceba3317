//! Row predicates shared by the browse and edit views

use acehive_core::types::fields;
use acehive_core::{ResourceType, Row, YearLevel};

/// Case-insensitive substring match on the row title
///
/// Rows without a string title never match.
#[must_use]
pub fn title_matches(row: &Row, query: &str) -> bool {
    row.title()
        .is_some_and(|title| title.to_lowercase().contains(&query.to_lowercase()))
}

/// Filter inputs of the browse view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFilters {
    /// Required `resource_type` label
    pub resource_type: Option<ResourceType>,
    /// Required `year` label
    pub year: Option<YearLevel>,
    /// Title substring
    pub search: String,
}

impl RowFilters {
    /// Whether no predicate is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resource_type.is_none() && self.year.is_none() && self.search.is_empty()
    }

    /// Whether `row` passes every set predicate
    #[must_use]
    pub fn matches(&self, row: &Row) -> bool {
        let type_ok = self
            .resource_type
            .is_none_or(|kind| row.get_str(fields::RESOURCE_TYPE) == Some(kind.label()));
        let year_ok = self
            .year
            .is_none_or(|year| row.get_str(fields::YEAR) == Some(year.label()));
        let title_ok = self.search.is_empty() || title_matches(row, &self.search);

        type_ok && year_ok && title_ok
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn row(title: Option<&str>, kind: &str, year: &str) -> Row {
        let mut row = Row::new().with("resource_type", kind).with("year", year);
        if let Some(title) = title {
            row.set("title", title);
        }
        row
    }

    #[test]
    fn test_title_match_ignores_case() {
        let calculus = row(Some("Calculus I"), "CT Paper", "1st Year");
        assert!(title_matches(&calculus, "calc"));
        assert!(title_matches(&calculus, "CALCULUS"));
        assert!(!title_matches(&calculus, "physics"));
    }

    #[test]
    fn test_rows_without_title_never_match() {
        let untitled = row(None, "CT Paper", "1st Year");
        assert!(!title_matches(&untitled, ""));

        let numeric = Row::new().with("title", 42);
        assert!(!title_matches(&numeric, "4"));
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let filters = RowFilters {
            resource_type: Some(ResourceType::CtPaper),
            year: Some(YearLevel::First),
            search: "calc".to_string(),
        };

        assert!(filters.matches(&row(Some("Calculus"), "CT Paper", "1st Year")));
        assert!(!filters.matches(&row(Some("Calculus"), "Sem Paper", "1st Year")));
        assert!(!filters.matches(&row(Some("Calculus"), "CT Paper", "2nd Year")));
        assert!(!filters.matches(&row(Some("Physics"), "CT Paper", "1st Year")));
    }

    #[test]
    fn test_empty_filters_match_everything() {
        let filters = RowFilters::default();
        assert!(filters.is_empty());
        assert!(filters.matches(&row(None, "", "")));
    }

    proptest! {
        #[test]
        fn prop_lowercase_title_always_matches_itself(title in "[A-Za-z ]{1,20}") {
            let subject = row(Some(&title), "CT Paper", "1st Year");
            prop_assert!(title_matches(&subject, &title.to_lowercase()));
            prop_assert!(title_matches(&subject, &title.to_uppercase()));
        }
    }
}
