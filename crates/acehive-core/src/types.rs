//! Core data types for the Acehive admin dashboard

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Well-known column names
pub mod fields {
    /// Primary key column
    pub const ID: &str = "id";
    /// Free-text title of a resource
    pub const TITLE: &str = "title";
    /// Category label of a resource
    pub const RESOURCE_TYPE: &str = "resource_type";
    /// Academic year label of a resource
    pub const YEAR: &str = "year";
    /// Long-text description
    pub const DESCRIPTION: &str = "description";
    /// Attachment references
    pub const FILE_URLS: &str = "file_urls";
    /// Tag list
    pub const TAGS: &str = "tags";
    /// Creation timestamp
    pub const CREATED_AT: &str = "created_at";
}

/// Resource columns that are never shown in the browse or edit tables
pub const HIDDEN_RESOURCE_COLUMNS: [&str; 5] = [
    fields::DESCRIPTION,
    fields::FILE_URLS,
    fields::ID,
    fields::TAGS,
    fields::CREATED_AT,
];

/// Returns true if `column` is hidden for resource rows
#[must_use]
pub fn is_hidden_resource_column(column: &str) -> bool {
    HIDDEN_RESOURCE_COLUMNS.contains(&column)
}

/// Backing tables the dashboard knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableName {
    /// Papers and study material
    Resources,
    /// User feedback submissions
    Feedback,
    /// Collaboration requests
    Collaborations,
}

impl TableName {
    /// Every table, in menu order
    pub const ALL: [Self; 3] = [Self::Resources, Self::Feedback, Self::Collaborations];

    /// Table name as the backend knows it
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resources => "resources",
            Self::Feedback => "feedback",
            Self::Collaborations => "collaborations",
        }
    }

    /// Human readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Resources => "Resources",
            Self::Feedback => "Feedback",
            Self::Collaborations => "Collaborations",
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableName {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|table| table.as_str() == s)
            .ok_or_else(|| crate::Error::Validation {
                field: "table".to_string(),
                message: format!("unknown table '{s}'"),
            })
    }
}

/// Category of a resource row (`resource_type` column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    /// Class test paper
    #[serde(rename = "CT Paper")]
    CtPaper,
    /// Semester exam paper
    #[serde(rename = "Sem Paper")]
    SemPaper,
    /// Notes and other study material
    #[serde(rename = "Study Material")]
    StudyMaterial,
}

impl ResourceType {
    /// Every category, in display order
    pub const ALL: [Self; 3] = [Self::CtPaper, Self::SemPaper, Self::StudyMaterial];

    /// Label stored in the `resource_type` column
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CtPaper => "CT Paper",
            Self::SemPaper => "Sem Paper",
            Self::StudyMaterial => "Study Material",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ResourceType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.label() == s)
            .ok_or_else(|| crate::Error::Validation {
                field: fields::RESOURCE_TYPE.to_string(),
                message: format!("unknown resource type '{s}'"),
            })
    }
}

/// Academic year of a resource row (`year` column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YearLevel {
    /// First year
    #[serde(rename = "1st Year")]
    First,
    /// Second year
    #[serde(rename = "2nd Year")]
    Second,
    /// Third year
    #[serde(rename = "3rd Year")]
    Third,
}

impl YearLevel {
    /// Every year, in display order
    pub const ALL: [Self; 3] = [Self::First, Self::Second, Self::Third];

    /// Label stored in the `year` column
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::First => "1st Year",
            Self::Second => "2nd Year",
            Self::Third => "3rd Year",
        }
    }
}

impl fmt::Display for YearLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for YearLevel {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|year| year.label() == s)
            .ok_or_else(|| crate::Error::Validation {
                field: fields::YEAR.to_string(),
                message: format!("unknown year '{s}'"),
            })
    }
}

/// Primary key of a row, normalised to text
///
/// The backend may hand out numeric or textual ids; both compare and
/// serialize as their textual form so they can be used in URLs and filters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(String);

impl RowId {
    /// Create a row id from its textual form
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Extract a row id from a JSON value, if it is a string or a number
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }

    /// Textual form of the id
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<i64> for RowId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

/// One table row: an ordered mapping of column name to value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(Map<String, Value>);

impl Row {
    /// Create an empty row
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the underlying column map
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume the row, returning the column map
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Value of a column
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    /// Value of a column if it holds a string
    #[must_use]
    pub fn get_str(&self, column: &str) -> Option<&str> {
        self.0.get(column).and_then(Value::as_str)
    }

    /// Set a column, keeping its position if it already exists
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(column.into(), value.into());
    }

    /// Builder-style [`Row::set`]
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    /// Primary key of the row
    #[must_use]
    pub fn id(&self) -> Option<RowId> {
        self.get(fields::ID).and_then(RowId::from_value)
    }

    /// Title of the row, when it has a textual one
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.get_str(fields::TITLE)
    }

    /// Column names in backend order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Text shown in a table cell for `column`
    #[must_use]
    pub fn display(&self, column: &str) -> String {
        self.get(column).map(display_value).unwrap_or_default()
    }

    /// Number of columns
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the row has no columns
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Row {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Row {
    type Error = crate::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(crate::Error::Validation {
                field: "row".to_string(),
                message: format!("expected a JSON object, got {other}"),
            }),
        }
    }
}

/// Render a JSON value as plain cell text
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    fn sample_row() -> Row {
        Row::try_from(json!({
            "id": 5,
            "title": "Calculus I",
            "resource_type": "CT Paper",
            "year": "1st Year",
            "tags": ["math", "calc"],
            "description": null
        }))
        .unwrap()
    }

    #[test]
    fn test_table_name_round_trip_through_str() {
        for table in TableName::ALL {
            assert_eq!(table.as_str().parse::<TableName>().unwrap(), table);
        }
        assert!("users".parse::<TableName>().is_err());
    }

    #[test]
    fn test_table_name_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TableName::Collaborations).unwrap(),
            "\"collaborations\""
        );
    }

    #[test]
    fn test_resource_type_labels() {
        assert_eq!(ResourceType::CtPaper.label(), "CT Paper");
        assert_eq!(ResourceType::SemPaper.label(), "Sem Paper");
        assert_eq!(ResourceType::StudyMaterial.label(), "Study Material");
        assert_eq!(
            "Study Material".parse::<ResourceType>().unwrap(),
            ResourceType::StudyMaterial
        );
        assert!("ct paper".parse::<ResourceType>().is_err());
    }

    #[test]
    fn test_year_level_serde_uses_label() {
        let json = serde_json::to_string(&YearLevel::Second).unwrap();
        assert_eq!(json, "\"2nd Year\"");
        assert_eq!(
            serde_json::from_str::<YearLevel>("\"3rd Year\"").unwrap(),
            YearLevel::Third
        );
    }

    #[test]
    fn test_row_id_from_value() {
        assert_eq!(RowId::from_value(&json!(5)), Some(RowId::new("5")));
        assert_eq!(
            RowId::from_value(&json!("a1b2")),
            Some(RowId::new("a1b2"))
        );
        assert_eq!(RowId::from_value(&json!(null)), None);
        assert_eq!(RowId::from_value(&json!([1])), None);
    }

    #[test]
    fn test_row_accessors() {
        let row = sample_row();
        assert_eq!(row.id(), Some(RowId::from(5)));
        assert_eq!(row.title(), Some("Calculus I"));
        assert_eq!(row.get_str("resource_type"), Some("CT Paper"));
        assert_eq!(row.len(), 6);
    }

    #[test]
    fn test_row_preserves_column_order() {
        let row = sample_row();
        let columns: Vec<&str> = row.columns().collect();
        assert_eq!(
            columns,
            vec!["id", "title", "resource_type", "year", "tags", "description"]
        );
    }

    #[test]
    fn test_row_set_keeps_position() {
        let mut row = sample_row();
        row.set("title", "New Title");
        let columns: Vec<&str> = row.columns().collect();
        assert_eq!(columns[1], "title");
        assert_eq!(row.title(), Some("New Title"));
    }

    #[test]
    fn test_row_try_from_rejects_non_objects() {
        assert!(Row::try_from(json!([1, 2])).is_err());
        assert!(Row::try_from(json!("row")).is_err());
    }

    #[test]
    fn test_display_value() {
        let row = sample_row();
        assert_eq!(row.display("id"), "5");
        assert_eq!(row.display("tags"), "math, calc");
        assert_eq!(row.display("description"), "");
        assert_eq!(row.display("missing"), "");
        assert_eq!(display_value(&json!(true)), "true");
    }

    #[test]
    fn test_hidden_resource_columns() {
        assert!(is_hidden_resource_column("id"));
        assert!(is_hidden_resource_column("created_at"));
        assert!(!is_hidden_resource_column("title"));
        assert!(!is_hidden_resource_column("year"));
    }

    proptest! {
        #[test]
        fn test_numeric_row_ids_match_their_text(id in any::<i64>()) {
            let from_value = RowId::from_value(&json!(id)).unwrap();
            prop_assert_eq!(from_value, RowId::from(id));
        }
    }
}
