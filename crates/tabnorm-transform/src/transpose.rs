//! Wide-to-tall transposition.
//!
//! The first column and up to `max_identifier_columns` other non-period
//! columns form a row key. The remaining (period) columns become the rows
//! of the result, and each original row becomes a series column named by
//! its key.

use std::sync::LazyLock;

use regex::Regex;

use tabnorm_model::{AnalysisConfig, RowIndex, TranspositionReport};

use crate::error::{Result, TransformError};
use crate::frame::{TextColumn, TextFrame, dedupe_names};
use crate::inference::{parse_month, parse_year};

/// Name of the index built from the former column headers.
pub const TRANSPOSED_INDEX_NAME: &str = "TimePeriod";

/// Headers that look like time periods and are therefore not identifiers.
static PERIOD_HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}(-[0-9]{2})?M?[0-9]{0,2}$").expect("Invalid period header regex")
});

/// A transposed table whose series are still text.
#[derive(Debug, Clone, PartialEq)]
pub struct Transposed {
    pub index: RowIndex,
    pub columns: Vec<TextColumn>,
    pub report: TranspositionReport,
}

/// Positions of the identifier columns: the first column, then up to
/// `max_auxiliary` later columns whose header is not a period.
pub fn identifier_columns(names: &[String], max_auxiliary: usize) -> Vec<usize> {
    if names.is_empty() {
        return Vec::new();
    }
    let mut ids = vec![0];
    ids.extend(
        names
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, name)| !PERIOD_HEADER_REGEX.is_match(name))
            .map(|(position, _)| position)
            .take(max_auxiliary),
    );
    ids
}

/// Transposes a wide frame.
pub fn transpose(frame: &TextFrame, config: &AnalysisConfig) -> Result<Transposed> {
    if frame.width() == 0 {
        return Err(TransformError::NoColumns);
    }
    if frame.height() == 0 {
        return Err(TransformError::NoRows);
    }

    let columns = frame.columns();
    let names = frame.column_names();
    let ids = identifier_columns(&names, config.max_identifier_columns);
    let body: Vec<&TextColumn> = columns
        .iter()
        .enumerate()
        .filter(|(position, _)| !ids.contains(position))
        .map(|(_, column)| column)
        .collect();
    if body.is_empty() {
        return Err(TransformError::NoPeriodColumns {
            identifiers: ids.len(),
        });
    }

    let keys = row_keys(frame, &ids);
    let series: Vec<TextColumn> = keys
        .into_iter()
        .enumerate()
        .map(|(row, key)| {
            let values = body.iter().map(|column| column.values[row].clone()).collect();
            TextColumn::new(key, values)
        })
        .collect();

    let labels: Vec<String> = body.iter().map(|column| column.name.clone()).collect();
    let index = period_index(labels);
    let identifier_names: Vec<String> = ids.iter().map(|&i| names[i].clone()).collect();

    let report = TranspositionReport {
        rows_before: frame.height(),
        columns_before: frame.width(),
        identifier_columns: identifier_names,
        rows_after: index.len(),
        columns_after: series.len(),
        index_kind: index.kind(),
    };
    tracing::debug!(
        identifiers = ?report.identifier_columns,
        rows_after = report.rows_after,
        columns_after = report.columns_after,
        index_kind = %report.index_kind,
        "table transposed"
    );

    Ok(Transposed {
        index,
        columns: series,
        report,
    })
}

/// Joins the identifier cells of each row with `_`. Rows with no identifier
/// value are named `row_<n>`; repeated keys, and a key equal to
/// [`TRANSPOSED_INDEX_NAME`], get numeric suffixes.
fn row_keys(frame: &TextFrame, ids: &[usize]) -> Vec<String> {
    let columns = frame.columns();
    let mut keys = vec![TRANSPOSED_INDEX_NAME.to_string()];
    keys.extend((0..frame.height()).map(|row| {
        let parts: Vec<&str> = ids
            .iter()
            .filter_map(|&i| columns[i].values[row].as_deref())
            .collect();
        if parts.is_empty() {
            format!("row_{row}")
        } else {
            parts.join("_")
        }
    }));
    dedupe_names(keys).split_off(1)
}

/// Index for the former column headers, trying in order: monthly dates,
/// distinct numbers, year-prefixed dates, then plain labels.
pub fn period_index(labels: Vec<String>) -> RowIndex {
    let name = TRANSPOSED_INDEX_NAME.to_string();

    let monthly: Option<Vec<_>> = labels.iter().map(|label| parse_month(label)).collect();
    if let Some(values) = monthly {
        return RowIndex::Datetime { name, values };
    }

    let numeric: Option<Vec<f64>> = labels
        .iter()
        .map(|label| label.trim().parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect();
    if let Some(values) = numeric
        && values.len() >= 2
        && all_distinct(&values)
    {
        return RowIndex::Numeric { name, values };
    }

    let yearly: Option<Vec<_>> = labels
        .iter()
        .map(|label| label.get(..4).and_then(parse_year))
        .collect();
    if let Some(values) = yearly {
        return RowIndex::Datetime { name, values };
    }

    RowIndex::Labels {
        name,
        values: labels,
    }
}

fn all_distinct(values: &[f64]) -> bool {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.windows(2).all(|pair| pair[0] != pair[1])
}
