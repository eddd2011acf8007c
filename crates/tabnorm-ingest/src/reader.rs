//! Raw record reading.

use std::path::Path;

use tabnorm_model::{AnalysisConfig, RawTable};

use crate::dialect::sniff_delimiter;
use crate::encoding::decode_bytes;
use crate::error::{IngestError, Result};
use crate::header::HeaderDetector;

/// Reads a CSV file into a [`RawTable`] with its header row detected.
pub fn read_raw_table(path: &Path, config: &AnalysisConfig) -> Result<RawTable> {
    let bytes = std::fs::read(path).map_err(|source| IngestError::file(path, source))?;
    parse_raw_table(path, &bytes, config)
}

/// Parses file bytes into a [`RawTable`]. `path` is only used in errors.
pub fn parse_raw_table(path: &Path, bytes: &[u8], config: &AnalysisConfig) -> Result<RawTable> {
    let decoded = decode_bytes(bytes).ok_or_else(|| IngestError::Decode {
        path: path.to_path_buf(),
    })?;
    let text = decoded.text.trim_start_matches('\u{feff}');
    let delimiter = sniff_delimiter(text, config.header_scan_rows);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        records.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    let header = HeaderDetector::standard().detect(&records, config);
    tracing::debug!(
        file = %path.display(),
        encoding = %decoded.encoding,
        delimiter = %char::from(delimiter).escape_default(),
        records = records.len(),
        header_row = header.row,
        "raw table read"
    );

    Ok(RawTable {
        records,
        header,
        encoding: decoded.encoding,
        delimiter,
    })
}
