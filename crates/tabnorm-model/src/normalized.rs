//! Typed, immutable tables produced by normalization.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::table::TableShape;

/// Element type tag of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Numeric,
    Datetime,
    Text,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Numeric => "numeric",
            Self::Datetime => "datetime",
            Self::Text => "text",
        };
        f.write_str(label)
    }
}

/// Column values; the variant is the column's type tag.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Datetime(Vec<Option<NaiveDateTime>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(values) => values.len(),
            Self::Datetime(values) => values.len(),
            Self::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Self::Numeric(_) => ColumnType::Numeric,
            Self::Datetime(_) => ColumnType::Datetime,
            Self::Text(_) => ColumnType::Text,
        }
    }

    pub fn is_null(&self, row: usize) -> bool {
        match self {
            Self::Numeric(values) => values.get(row).is_none_or(Option::is_none),
            Self::Datetime(values) => values.get(row).is_none_or(Option::is_none),
            Self::Text(values) => values.get(row).is_none_or(Option::is_none),
        }
    }

    pub fn non_null_count(&self) -> usize {
        (0..self.len()).filter(|&row| !self.is_null(row)).count()
    }

    pub fn null_count(&self) -> usize {
        self.len() - self.non_null_count()
    }

    pub fn is_all_null(&self) -> bool {
        self.non_null_count() == 0
    }

    /// Number of distinct non-null values.
    pub fn distinct_count(&self) -> usize {
        match self {
            Self::Numeric(values) => values
                .iter()
                .flatten()
                // -0.0 and 0.0 compare equal
                .map(|v| if *v == 0.0 { 0u64 } else { v.to_bits() })
                .collect::<BTreeSet<_>>()
                .len(),
            Self::Datetime(values) => values.iter().flatten().collect::<BTreeSet<_>>().len(),
            Self::Text(values) => values.iter().flatten().collect::<BTreeSet<_>>().len(),
        }
    }

    /// Renders the value at `row` for display, `None` when null.
    pub fn display_value(&self, row: usize) -> Option<String> {
        match self {
            Self::Numeric(values) => values.get(row).copied().flatten().map(format_numeric),
            Self::Datetime(values) => values.get(row).copied().flatten().map(format_datetime),
            Self::Text(values) => values.get(row).cloned().flatten(),
        }
    }
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn column_type(&self) -> ColumnType {
        self.data.column_type()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Numeric values, if this is a numeric column.
    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match &self.data {
            ColumnData::Numeric(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&[Option<NaiveDateTime>]> {
        match &self.data {
            ColumnData::Datetime(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&[Option<String>]> {
        match &self.data {
            ColumnData::Text(values) => Some(values),
            _ => None,
        }
    }
}

/// Kind of row labels carried by a table index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    Positional,
    Datetime,
    Numeric,
    Labels,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Positional => "positional",
            Self::Datetime => "datetime",
            Self::Numeric => "numeric",
            Self::Labels => "labels",
        };
        f.write_str(label)
    }
}

/// Row labels of a normalized table.
#[derive(Debug, Clone, PartialEq)]
pub enum RowIndex {
    /// Original row order, `0..len`.
    Positional(usize),
    Datetime {
        name: String,
        values: Vec<NaiveDateTime>,
    },
    Numeric {
        name: String,
        values: Vec<f64>,
    },
    Labels {
        name: String,
        values: Vec<String>,
    },
}

impl RowIndex {
    pub fn len(&self) -> usize {
        match self {
            Self::Positional(len) => *len,
            Self::Datetime { values, .. } => values.len(),
            Self::Numeric { values, .. } => values.len(),
            Self::Labels { values, .. } => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> IndexKind {
        match self {
            Self::Positional(_) => IndexKind::Positional,
            Self::Datetime { .. } => IndexKind::Datetime,
            Self::Numeric { .. } => IndexKind::Numeric,
            Self::Labels { .. } => IndexKind::Labels,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Positional(_) => None,
            Self::Datetime { name, .. } | Self::Numeric { name, .. } | Self::Labels { name, .. } => {
                Some(name.as_str())
            }
        }
    }

    /// Display form of the label at `row`.
    pub fn label(&self, row: usize) -> Option<String> {
        match self {
            Self::Positional(len) => (row < *len).then(|| row.to_string()),
            Self::Datetime { values, .. } => values.get(row).copied().map(format_datetime),
            Self::Numeric { values, .. } => values.get(row).copied().map(format_numeric),
            Self::Labels { values, .. } => values.get(row).cloned(),
        }
    }

    pub fn as_datetime(&self) -> Option<&[NaiveDateTime]> {
        match self {
            Self::Datetime { values, .. } => Some(values),
            _ => None,
        }
    }
}

/// Whether a table was analyzed in its original layout or transposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Wide,
    Tall,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wide => f.write_str("wide"),
            Self::Tall => f.write_str("tall"),
        }
    }
}

/// Why an orientation was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrientationReason {
    ExplicitOverride,
    ColumnsExceedRows { rows: usize, columns: usize },
    Default { rows: usize, columns: usize },
}

impl fmt::Display for OrientationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExplicitOverride => f.write_str("explicit override"),
            Self::ColumnsExceedRows { rows, columns } => {
                write!(f, "shape: columns exceed rows ({columns} > {rows})")
            }
            Self::Default { rows, columns } => {
                write!(f, "default: rows >= columns ({rows} >= {columns})")
            }
        }
    }
}

/// Immutable orientation verdict for one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrientationDecision {
    pub orientation: Orientation,
    pub reason: OrientationReason,
}

impl OrientationDecision {
    pub fn is_wide(&self) -> bool {
        self.orientation == Orientation::Wide
    }
}

impl fmt::Display for OrientationDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.orientation, self.reason)
    }
}

/// Shapes before and after a wide-to-tall transposition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranspositionReport {
    pub rows_before: usize,
    pub columns_before: usize,
    pub identifier_columns: Vec<String>,
    pub rows_after: usize,
    pub columns_after: usize,
    pub index_kind: IndexKind,
}

impl TranspositionReport {
    /// Body cells before (identifier columns excluded) equal cells after.
    pub fn preserves_cell_count(&self) -> bool {
        let body_columns = self
            .columns_before
            .saturating_sub(self.identifier_columns.len());
        self.rows_before * body_columns == self.rows_after * self.columns_after
    }
}

/// A typed table whose columns all have the index's length.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    index: RowIndex,
    columns: Vec<Column>,
}

impl NormalizedTable {
    /// Builds a table, rejecting ragged columns and names that repeat each
    /// other or the index name.
    pub fn new(index: RowIndex, columns: Vec<Column>) -> Result<Self> {
        let expected = index.len();
        let mut seen: BTreeSet<&str> = index.name().into_iter().collect();
        for column in &columns {
            if column.len() != expected {
                return Err(ModelError::ColumnLengthMismatch {
                    column: column.name.clone(),
                    expected,
                    found: column.len(),
                });
            }
            if !seen.insert(column.name.as_str()) {
                return Err(ModelError::DuplicateColumn {
                    column: column.name.clone(),
                });
            }
        }
        Ok(Self { index, columns })
    }

    pub fn index(&self) -> &RowIndex {
        &self.index
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn height(&self) -> usize {
        self.index.len()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn shape(&self) -> TableShape {
        TableShape::new(self.height(), self.width())
    }

    pub fn numeric_columns(&self) -> impl Iterator<Item = (&str, &[Option<f64>])> {
        self.columns
            .iter()
            .filter_map(|c| c.as_numeric().map(|values| (c.name.as_str(), values)))
    }
}

/// Column name and type, used where the data itself is not needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub column_type: ColumnType,
}

/// Shape and column types of a normalized table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub index_name: Option<String>,
    pub index_kind: IndexKind,
    pub shape: TableShape,
    pub columns: Vec<ColumnSchema>,
}

impl TableSchema {
    pub fn of(table: &NormalizedTable) -> Self {
        Self {
            index_name: table.index().name().map(str::to_string),
            index_kind: table.index().kind(),
            shape: table.shape(),
            columns: table
                .columns()
                .iter()
                .map(|c| ColumnSchema {
                    name: c.name.clone(),
                    column_type: c.column_type(),
                })
                .collect(),
        }
    }
}

/// Formats a floating-point number without a trailing `.0`.
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Formats a timestamp, omitting the time when it is midnight.
pub fn format_datetime(value: NaiveDateTime) -> String {
    if value.time() == NaiveTime::MIN {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_column_length_invariant() {
        let result = NormalizedTable::new(
            RowIndex::Positional(3),
            vec![Column::new("A", ColumnData::Numeric(vec![Some(1.0), None]))],
        );
        assert!(matches!(
            result,
            Err(ModelError::ColumnLengthMismatch {
                expected: 3,
                found: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        let result = NormalizedTable::new(
            RowIndex::Positional(1),
            vec![
                Column::new("A", ColumnData::Text(vec![None])),
                Column::new("A", ColumnData::Text(vec![None])),
            ],
        );
        assert!(matches!(result, Err(ModelError::DuplicateColumn { .. })));
    }

    #[test]
    fn test_column_named_like_index_rejected() {
        let result = NormalizedTable::new(
            RowIndex::Labels {
                name: "TimePeriod".to_string(),
                values: vec!["Q1".to_string()],
            },
            vec![Column::new("TimePeriod", ColumnData::Numeric(vec![Some(1.0)]))],
        );
        assert!(matches!(
            result,
            Err(ModelError::DuplicateColumn { column }) if column == "TimePeriod"
        ));
    }

    #[test]
    fn test_null_and_distinct_counts() {
        let data = ColumnData::Numeric(vec![Some(1.0), None, Some(1.0), Some(-0.0), Some(0.0)]);
        assert_eq!(data.null_count(), 1);
        assert_eq!(data.non_null_count(), 4);
        assert_eq!(data.distinct_count(), 2);
    }

    #[test]
    fn test_format_numeric() {
        assert_eq!(format_numeric(1200.0), "1200");
        assert_eq!(format_numeric(1.5), "1.5");
        assert_eq!(format_numeric(-0.25), "-0.25");
    }

    #[test]
    fn test_format_datetime() {
        let midnight = NaiveDate::from_ymd_opt(2023, 1, 31)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        assert_eq!(format_datetime(midnight), "2023-01-31");
        let afternoon = NaiveDate::from_ymd_opt(2023, 1, 31)
            .and_then(|d| d.and_hms_opt(13, 5, 0))
            .unwrap();
        assert_eq!(format_datetime(afternoon), "2023-01-31 13:05:00");
    }

    #[test]
    fn test_transposition_cell_count() {
        let report = TranspositionReport {
            rows_before: 3,
            columns_before: 6,
            identifier_columns: vec!["Series".to_string(), "Unit".to_string()],
            rows_after: 4,
            columns_after: 3,
            index_kind: IndexKind::Numeric,
        };
        assert!(report.preserves_cell_count());
    }
}
