//! Derived analysis results: column descriptors, correlations, notes.

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::normalized::{
    ColumnType, NormalizedTable, OrientationDecision, TableSchema, TranspositionReport,
    format_datetime,
};
use crate::table::{HeaderDetection, SourceEncoding, TableShape};

/// Rendered form of [`Statistic::NotApplicable`].
pub const NOT_APPLICABLE: &str = "N/A";

/// A statistic that may be undefined for a given column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic<T> {
    Value(T),
    NotApplicable,
}

impl<T> Statistic<T> {
    pub fn from_option(value: Option<T>) -> Self {
        value.map_or(Self::NotApplicable, Self::Value)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            Self::NotApplicable => None,
        }
    }
}

impl Statistic<f64> {
    /// Builds a statistic from a float, treating NaN and infinities as undefined.
    pub fn finite(value: f64) -> Self {
        if value.is_finite() {
            Self::Value(value)
        } else {
            Self::NotApplicable
        }
    }

    /// Fixed three-decimal rendering.
    pub fn render(&self) -> String {
        match self {
            Self::Value(v) => format!("{v:.3}"),
            Self::NotApplicable => NOT_APPLICABLE.to_string(),
        }
    }
}

impl Statistic<NaiveDateTime> {
    pub fn render(&self) -> String {
        match self {
            Self::Value(v) => format_datetime(*v),
            Self::NotApplicable => NOT_APPLICABLE.to_string(),
        }
    }
}

impl Statistic<String> {
    pub fn render(&self) -> String {
        match self {
            Self::Value(v) => v.clone(),
            Self::NotApplicable => NOT_APPLICABLE.to_string(),
        }
    }
}

impl<T> Default for Statistic<T> {
    fn default() -> Self {
        Self::NotApplicable
    }
}

/// Numeric moments and order statistics of a column.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NumericMoments {
    pub mean: Statistic<f64>,
    pub std_dev: Statistic<f64>,
    pub min: Statistic<f64>,
    pub q25: Statistic<f64>,
    pub median: Statistic<f64>,
    pub q75: Statistic<f64>,
    pub max: Statistic<f64>,
    pub skewness: Statistic<f64>,
    pub kurtosis: Statistic<f64>,
}

/// Header labels for [`ColumnDescriptor::rendered_row`], in order.
pub const DESCRIPTOR_HEADERS: &[&str] = &[
    "Column",
    "DataType",
    "NonNullCount",
    "NullCount",
    "NullPct",
    "UniqueCount",
    "Mean",
    "StdDev",
    "Min",
    "25%",
    "50%",
    "75%",
    "Max",
    "Skewness",
    "Kurtosis",
    "MinDate",
    "MaxDate",
    "FirstNonNull",
    "LastNonNull",
];

/// Per-column descriptive statistics.
///
/// Every field is always present; statistics that do not apply to the
/// column's type (or are undefined for its values) are `NotApplicable`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub column_type: ColumnType,
    pub non_null_count: usize,
    pub null_count: usize,
    /// Share of null cells in percent (0-100).
    pub null_pct: f64,
    pub distinct_count: usize,
    pub first_non_null: Statistic<String>,
    pub last_non_null: Statistic<String>,
    pub numeric: NumericMoments,
    pub min_date: Statistic<NaiveDateTime>,
    pub max_date: Statistic<NaiveDateTime>,
}

impl ColumnDescriptor {
    /// Null percentage with two decimals, e.g. `"12.50%"`.
    pub fn rendered_null_pct(&self) -> String {
        format!("{:.2}%", self.null_pct)
    }

    /// All fields rendered for display, matching [`DESCRIPTOR_HEADERS`].
    pub fn rendered_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.column_type.to_string(),
            self.non_null_count.to_string(),
            self.null_count.to_string(),
            self.rendered_null_pct(),
            self.distinct_count.to_string(),
            self.numeric.mean.render(),
            self.numeric.std_dev.render(),
            self.numeric.min.render(),
            self.numeric.q25.render(),
            self.numeric.median.render(),
            self.numeric.q75.render(),
            self.numeric.max.render(),
            self.numeric.skewness.render(),
            self.numeric.kurtosis.render(),
            self.min_date.render(),
            self.max_date.render(),
            self.first_non_null.render(),
            self.last_non_null.render(),
        ]
    }
}

/// A pair of numeric columns with their Pearson coefficient.
///
/// `left` precedes `right` in the table's column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    pub left: String,
    pub right: String,
    pub coefficient: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CorrelationReport {
    pub numeric_columns: usize,
    /// Pairs above the threshold, strongest first, truncated to the configured limit.
    pub pairs: Vec<CorrelationPair>,
    /// Number of pairs above the threshold before truncation.
    pub total_found: usize,
    /// Numeric columns left out because they have zero variance.
    pub constant_columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMissing {
    pub name: String,
    pub missing: usize,
}

/// Missing cells across a whole table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MissingSummary {
    pub total_missing: usize,
    pub total_cells: usize,
    pub missing_fraction: f64,
    /// Columns with at least one missing value, most missing first.
    pub columns: Vec<ColumnMissing>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Most frequent values of a text column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCounts {
    pub column: String,
    pub distinct: usize,
    pub top: Vec<ValueCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValueCountsReport {
    pub columns: Vec<ValueCounts>,
    /// Text columns beyond the configured limit.
    pub omitted_columns: usize,
}

/// Regular spacing inferred from a date series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Annual,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Annual => "annual",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum DateSource {
    Index(String),
    Column(String),
}

impl fmt::Display for DateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(name) => write!(f, "index `{name}`"),
            Self::Column(name) => write!(f, "column `{name}`"),
        }
    }
}

/// Coverage of the table's main date series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateAnalysis {
    pub source: DateSource,
    pub min: NaiveDateTime,
    pub max: NaiveDateTime,
    pub distinct: usize,
    pub frequency: Option<Frequency>,
    /// Periods absent between min and max at the inferred frequency.
    pub missing_periods: Option<usize>,
    pub duplicates: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteLevel {
    Info,
    Warning,
    Error,
}

/// A user-visible remark recorded while processing a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub level: NoteLevel,
    pub message: String,
}

impl Note {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoteLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoteLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoteLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            NoteLevel::Info => "info",
            NoteLevel::Warning => "warning",
            NoteLevel::Error => "error",
        };
        write!(f, "{level}: {}", self.message)
    }
}

/// Layout the analysis actually ran on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    Tall,
    Transposed,
    /// Wide was decided but transposition failed.
    TallAfterFailedTransposition,
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Tall => "tall",
            Self::Transposed => "transposed",
            Self::TallAfterFailedTransposition => "tall (transposition failed)",
        };
        f.write_str(label)
    }
}

/// Everything derived from one input file.
#[derive(Debug, Clone, Serialize)]
pub struct FileAnalysis {
    pub file_name: String,
    pub path: PathBuf,
    pub encoding: SourceEncoding,
    pub delimiter: char,
    pub header: HeaderDetection,
    pub original_shape: TableShape,
    pub original_columns: Vec<String>,
    pub orientation: OrientationDecision,
    pub mode: AnalysisMode,
    pub transposition: Option<TranspositionReport>,
    pub schema: TableSchema,
    #[serde(skip)]
    pub table: NormalizedTable,
    pub descriptors: Vec<ColumnDescriptor>,
    pub missing: MissingSummary,
    pub value_counts: ValueCountsReport,
    pub dates: Option<DateAnalysis>,
    pub correlations: CorrelationReport,
    pub notes: Vec<Note>,
}

impl FileAnalysis {
    pub fn has_warnings(&self) -> bool {
        self.notes.iter().any(|n| n.level >= NoteLevel::Warning)
    }
}
