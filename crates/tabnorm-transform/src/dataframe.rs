//! Polars export of normalized tables.

use std::fs::File;
use std::path::Path;

use polars::prelude::{
    CsvWriter, DataFrame, IntoColumn, NamedFrom, PlSmallStr, SerWriter, Series,
};

use tabnorm_model::{ColumnData, NormalizedTable, RowIndex, format_datetime};

use crate::error::{Result, TransformError};

/// Converts a table to a `DataFrame`.
///
/// A named index becomes the first column. Datetimes are written as text in
/// `YYYY-MM-DD[ HH:MM:SS]` form.
pub fn to_dataframe(table: &NormalizedTable) -> Result<DataFrame> {
    let mut columns = Vec::with_capacity(table.width() + 1);

    match table.index() {
        RowIndex::Positional(_) => {}
        RowIndex::Datetime { name, values } => {
            let labels: Vec<String> = values.iter().copied().map(format_datetime).collect();
            columns.push(Series::new(name.as_str().into(), labels).into_column());
        }
        RowIndex::Numeric { name, values } => {
            columns.push(Series::new(name.as_str().into(), values.clone()).into_column());
        }
        RowIndex::Labels { name, values } => {
            columns.push(Series::new(name.as_str().into(), values.clone()).into_column());
        }
    }

    for column in table.columns() {
        let name = PlSmallStr::from(column.name.as_str());
        let series = match &column.data {
            ColumnData::Numeric(values) => Series::new(name, values.clone()),
            ColumnData::Datetime(values) => {
                let labels: Vec<Option<String>> =
                    values.iter().map(|v| v.map(format_datetime)).collect();
                Series::new(name, labels)
            }
            ColumnData::Text(values) => Series::new(name, values.clone()),
        };
        columns.push(series.into_column());
    }

    Ok(DataFrame::new(columns)?)
}

/// Writes a table as CSV through Polars.
pub fn write_csv(table: &NormalizedTable, path: &Path) -> Result<()> {
    let mut df = to_dataframe(table)?;
    let mut file = File::create(path).map_err(|source| TransformError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)?;
    tracing::debug!(path = %path.display(), rows = df.height(), "table exported");
    Ok(())
}
