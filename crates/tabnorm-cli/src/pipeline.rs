//! Per-file analysis pipeline with explicit stages.
//!
//! The stages run in this order for every file:
//! 1. **Ingest**: decode, sniff the delimiter, read records, detect the header row
//! 2. **Normalize**: classify orientation, transpose wide tables, infer types
//! 3. **Analyze**: column statistics, missing values, value counts, dates, correlations
//!
//! A file that fails ingest or normalization becomes a [`FileOutcome::Failed`]
//! entry; the remaining files are still processed.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use tabnorm_ingest::{list_csv_files, read_raw_table};
use tabnorm_model::{
    AnalysisConfig, CorrelationReport, FileAnalysis, Note, RawTable, TableSchema,
    ValueCountsReport,
};
use tabnorm_stats::{
    analyze_correlations, analyze_dates, count_values, summarize_columns, summarize_missing,
};
use tabnorm_transform::{Normalized, normalize};

/// A file that could not be analyzed.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub file_name: String,
    pub path: PathBuf,
    pub error: String,
}

/// Result of processing one file.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Analyzed(Box<FileAnalysis>),
    Failed(FileFailure),
}

impl FileOutcome {
    pub fn file_name(&self) -> &str {
        match self {
            Self::Analyzed(analysis) => &analysis.file_name,
            Self::Failed(failure) => &failure.file_name,
        }
    }

    pub fn analysis(&self) -> Option<&FileAnalysis> {
        match self {
            Self::Analyzed(analysis) => Some(analysis.as_ref()),
            Self::Failed(_) => None,
        }
    }

    pub fn analysis_mut(&mut self) -> Option<&mut FileAnalysis> {
        match self {
            Self::Analyzed(analysis) => Some(analysis.as_mut()),
            Self::Failed(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Analyzes every CSV file in `dir`, in file name order.
///
/// Only a missing or unreadable directory is an error.
pub fn analyze_directory(dir: &Path, config: &AnalysisConfig) -> Result<Vec<FileOutcome>> {
    let files = list_csv_files(dir)
        .with_context(|| format!("list CSV files in {}", dir.display()))?;
    info!(dir = %dir.display(), file_count = files.len(), "files discovered");

    let outcomes = files
        .iter()
        .map(|path| match analyze_file(path, config) {
            Ok(analysis) => FileOutcome::Analyzed(Box::new(analysis)),
            Err(error) => {
                warn!(file = %path.display(), error = format!("{error:#}"), "file failed");
                FileOutcome::Failed(FileFailure {
                    file_name: file_name_of(path),
                    path: path.clone(),
                    error: format!("{error:#}"),
                })
            }
        })
        .collect();
    Ok(outcomes)
}

/// Runs the full pipeline on one file.
pub fn analyze_file(path: &Path, config: &AnalysisConfig) -> Result<FileAnalysis> {
    let file_name = file_name_of(path);
    let file_span = info_span!("file", file = %file_name);
    let _file_guard = file_span.enter();
    let start = Instant::now();

    // =========================================================================
    // Stage 1: Ingest
    // =========================================================================
    let raw = info_span!("ingest")
        .in_scope(|| read_raw_table(path, config))
        .with_context(|| format!("read {}", path.display()))?;
    let mut notes = ingest_notes(&raw);

    // =========================================================================
    // Stage 2: Normalize
    // =========================================================================
    let Normalized {
        table,
        original_shape,
        original_columns,
        orientation,
        mode,
        transposition,
        notes: normalize_notes,
    } = info_span!("normalize")
        .in_scope(|| normalize(&raw, &file_name, config))
        .with_context(|| format!("normalize {file_name}"))?;
    notes.extend(normalize_notes);

    // =========================================================================
    // Stage 3: Analyze
    // =========================================================================
    let analyze_span = info_span!("analyze");
    let _analyze_guard = analyze_span.enter();
    if table.height() == 0 || table.width() == 0 {
        notes.push(Note::warning("no data left after header detection and cleanup"));
    }
    let descriptors = summarize_columns(&table);
    let missing = summarize_missing(&table);
    let value_counts = count_values(&table, config);
    notes.extend(value_count_note(&value_counts, config));
    let dates = analyze_dates(&table);
    let correlations = analyze_correlations(&table, config);
    notes.extend(correlation_notes(&correlations));
    debug!(
        descriptors = descriptors.len(),
        missing = missing.total_missing,
        pairs = correlations.pairs.len(),
        "analysis complete"
    );

    info!(
        mode = %mode,
        rows = table.height(),
        columns = table.width(),
        duration_ms = start.elapsed().as_millis(),
        "file analyzed"
    );

    Ok(FileAnalysis {
        file_name,
        path: path.to_path_buf(),
        encoding: raw.encoding,
        delimiter: char::from(raw.delimiter),
        header: raw.header,
        original_shape,
        original_columns,
        orientation,
        mode,
        transposition,
        schema: TableSchema::of(&table),
        table,
        descriptors,
        missing,
        value_counts,
        dates,
        correlations,
        notes,
    })
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn ingest_notes(raw: &RawTable) -> Vec<Note> {
    let mut notes = Vec::new();
    if raw.encoding.is_fallback() {
        notes.push(Note::info(format!(
            "not valid UTF-8; decoded as {}",
            raw.encoding
        )));
    }
    if raw.header.is_low_confidence() {
        notes.push(Note::warning(format!(
            "header row {} chosen by {} rule with low confidence",
            raw.header.row, raw.header.rule
        )));
    }
    notes
}

fn value_count_note(report: &ValueCountsReport, config: &AnalysisConfig) -> Option<Note> {
    (report.omitted_columns > 0).then(|| {
        Note::info(format!(
            "value counts limited to {} text columns; {} omitted",
            config.max_value_count_columns, report.omitted_columns
        ))
    })
}

fn correlation_notes(report: &CorrelationReport) -> Vec<Note> {
    let mut notes = Vec::new();
    if report.numeric_columns < 2 {
        notes.push(Note::info(format!(
            "correlation skipped: {} numeric column(s)",
            report.numeric_columns
        )));
        return notes;
    }
    if !report.constant_columns.is_empty() {
        notes.push(Note::info(format!(
            "constant columns excluded from correlation: {}",
            report.constant_columns.join(", ")
        )));
    }
    if report.total_found > report.pairs.len() {
        notes.push(Note::info(format!(
            "showing {} of {} correlated pairs",
            report.pairs.len(),
            report.total_found
        )));
    }
    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabnorm_model::{CorrelationPair, HeaderDetection, SourceEncoding};

    #[test]
    fn test_ingest_notes() {
        let raw = RawTable {
            records: Vec::new(),
            header: HeaderDetection::fallback(),
            encoding: SourceEncoding::Windows1252,
            delimiter: b';',
        };
        let notes = ingest_notes(&raw);
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].message, "not valid UTF-8; decoded as windows-1252");
        assert!(notes[1].message.contains("low confidence"));
    }

    #[test]
    fn test_correlation_notes() {
        let report = CorrelationReport {
            numeric_columns: 1,
            ..CorrelationReport::default()
        };
        assert_eq!(
            correlation_notes(&report)[0].message,
            "correlation skipped: 1 numeric column(s)"
        );

        let pair = CorrelationPair {
            left: "A".to_string(),
            right: "B".to_string(),
            coefficient: 0.9,
        };
        let report = CorrelationReport {
            numeric_columns: 4,
            pairs: vec![pair],
            total_found: 3,
            constant_columns: vec!["K".to_string()],
        };
        let messages: Vec<String> = correlation_notes(&report)
            .into_iter()
            .map(|note| note.message)
            .collect();
        assert_eq!(
            messages,
            vec![
                "constant columns excluded from correlation: K",
                "showing 1 of 3 correlated pairs",
            ]
        );
    }
}
