//! Type inference for text columns.
//!
//! Two policies:
//! - [`InferencePolicy::Tall`]: date-named columns are tried as datetimes,
//!   then every column as numbers. A conversion is kept only if more than
//!   `inference_min_parse_ratio` of the non-null cells parse.
//! - [`InferencePolicy::Wide`]: every column with any value is tried as
//!   numbers. Cells that fail become null. A column where nothing parses
//!   stays text.

use std::sync::LazyLock;

use chrono::{Datelike, Month, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use tabnorm_model::{AnalysisConfig, Column, ColumnData, Note};

use crate::frame::TextColumn;

/// Column-name fragments that mark a column as holding dates.
pub const DATE_NAME_KEYWORDS: &[&str] = &["date", "month", "period"];

/// `YYYYMmm` monthly labels, as in `2020M01`.
static MONTH_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{4})M([0-9]{1,2})$").expect("Invalid month code regex"));

/// `Mon YYYY`, `Mon-YYYY` and `Month YYYY` labels.
static MONTH_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]{3,9})[ -]([0-9]{4})$").expect("Invalid month name regex")
});

static YEAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}$").expect("Invalid year regex"));

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%b-%Y", "%d %b %Y", "%d %B %Y", "%b %d, %Y",
];

/// Accepted years. chrono's `%Y` also takes signed and short years.
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1000..=9999;

/// Which inference rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferencePolicy {
    /// Columns of the original layout.
    Tall,
    /// Series columns of a transposed wide table.
    Wide,
}

/// Typed columns and the conversion notes.
#[derive(Debug, Clone, PartialEq)]
pub struct Inference {
    pub columns: Vec<Column>,
    pub notes: Vec<Note>,
}

/// Parses a number, ignoring thousands separators and spaces.
///
/// Non-finite results (`NaN`, `inf`) are rejected.
pub fn parse_numeric(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let cleaned = trimmed
        .replace(',', "")
        .replace(' ', "")
        .replace('\u{a0}', "");
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a date or date-time in one of the accepted layouts.
///
/// Dates without a time resolve to midnight; month and year values resolve
/// to the first day of the period. Years outside 1000..=9999 are rejected.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let parsed = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            DATE_FORMATS.iter().find_map(|format| {
                NaiveDate::parse_from_str(value, format)
                    .ok()
                    .map(|date| date.and_time(NaiveTime::MIN))
            })
        })
        .or_else(|| parse_period(value))
        .or_else(|| parse_month_name(value))?;
    YEAR_RANGE.contains(&parsed.year()).then_some(parsed)
}

/// Parses `Mon YYYY`, `Mon-YYYY` or `Month YYYY` to the first day of the month.
fn parse_month_name(value: &str) -> Option<NaiveDateTime> {
    let caps = MONTH_NAME_REGEX.captures(value)?;
    let month: Month = caps[1].parse().ok()?;
    NaiveDate::from_ymd_opt(caps[2].parse().ok()?, month.number_from_month(), 1)
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// Parses `YYYY-MM`, `YYYYMmm` or `YYYY` to the start of the period.
pub fn parse_period(value: &str) -> Option<NaiveDateTime> {
    parse_month(value).or_else(|| parse_year(value))
}

/// Parses `YYYY-MM` or `YYYYMmm` to the first day of the month.
pub fn parse_month(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    let (year, month) = if let Some(caps) = MONTH_CODE_REGEX.captures(value) {
        (caps[1].parse().ok()?, caps[2].parse().ok()?)
    } else {
        let (year, month) = value.split_once('-')?;
        if year.len() != 4 || month.is_empty() || month.len() > 2 {
            return None;
        }
        (year.parse().ok()?, month.parse().ok()?)
    };
    NaiveDate::from_ymd_opt(year, month, 1).map(|date| date.and_time(NaiveTime::MIN))
}

/// Parses a bare four-digit year to January 1st.
pub fn parse_year(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if !YEAR_REGEX.is_match(value) {
        return None;
    }
    NaiveDate::from_ymd_opt(value.parse().ok()?, 1, 1).map(|date| date.and_time(NaiveTime::MIN))
}

/// Infers a type for every column.
pub fn infer_columns(
    columns: Vec<TextColumn>,
    policy: InferencePolicy,
    config: &AnalysisConfig,
) -> Inference {
    let mut notes = Vec::new();
    let mut typed = Vec::with_capacity(columns.len());
    let mut wide_converted = 0usize;
    let mut wide_coerced_cells = 0usize;
    let total = columns.len();

    for column in columns {
        let converted = match policy {
            InferencePolicy::Tall => infer_tall(&column, config.inference_min_parse_ratio),
            InferencePolicy::Wide => infer_wide(&column).map(|(data, coerced)| {
                wide_coerced_cells += coerced;
                data
            }),
        };
        match converted {
            Some(data) => {
                let target = data.column_type();
                if policy == InferencePolicy::Tall {
                    notes.push(Note::info(format!("`{}`: text -> {target}", column.name)));
                } else {
                    wide_converted += 1;
                }
                tracing::trace!(column = %column.name, %target, "column converted");
                typed.push(Column::new(column.name, data));
            }
            None => typed.push(Column::new(column.name, ColumnData::Text(column.values))),
        }
    }

    if policy == InferencePolicy::Wide {
        notes.push(Note::info(format!(
            "{wide_converted} of {total} series converted to numeric"
        )));
        if wide_coerced_cells > 0 {
            notes.push(Note::info(format!(
                "{wide_coerced_cells} non-numeric cells set to null"
            )));
        }
    } else if notes.is_empty() {
        notes.push(Note::info("no type conversions applied"));
    }

    Inference {
        columns: typed,
        notes,
    }
}

fn has_date_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    DATE_NAME_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

fn infer_tall(column: &TextColumn, min_ratio: f64) -> Option<ColumnData> {
    let non_null = column.non_null_count();
    if non_null == 0 {
        return None;
    }
    let accepted = |parsed: usize| parsed as f64 / non_null as f64 > min_ratio;

    if has_date_name(&column.name) {
        let values: Vec<Option<NaiveDateTime>> = column
            .values
            .iter()
            .map(|v| v.as_deref().and_then(parse_datetime))
            .collect();
        if accepted(values.iter().flatten().count()) {
            return Some(ColumnData::Datetime(values));
        }
    }

    let values: Vec<Option<f64>> = column
        .values
        .iter()
        .map(|v| v.as_deref().and_then(parse_numeric))
        .collect();
    accepted(values.iter().flatten().count()).then_some(ColumnData::Numeric(values))
}

/// Returns the numeric column and how many non-null cells failed to parse.
fn infer_wide(column: &TextColumn) -> Option<(ColumnData, usize)> {
    let non_null = column.non_null_count();
    let values: Vec<Option<f64>> = column
        .values
        .iter()
        .map(|v| v.as_deref().and_then(parse_numeric))
        .collect();
    let parsed = values.iter().flatten().count();
    (parsed > 0).then(|| (ColumnData::Numeric(values), non_null - parsed))
}

impl std::fmt::Display for InferencePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tall => f.write_str("tall"),
            Self::Wide => f.write_str("wide"),
        }
    }
}
