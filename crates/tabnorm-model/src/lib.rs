//! Tabular normalization data model.
//!
//! The types here carry a file from its raw records ([`RawTable`]) to a typed
//! [`NormalizedTable`] and the derived views computed from it
//! ([`ColumnDescriptor`], [`CorrelationPair`], ...). Logic lives in the
//! ingest, transform and stats crates; this crate only enforces invariants.

pub mod analysis;
pub mod config;
pub mod error;
pub mod normalized;
pub mod table;

pub use analysis::{
    AnalysisMode, ColumnDescriptor, ColumnMissing, CorrelationPair, CorrelationReport,
    DESCRIPTOR_HEADERS, DateAnalysis, DateSource, FileAnalysis, Frequency, MissingSummary,
    NOT_APPLICABLE, Note, NoteLevel, NumericMoments, Statistic, ValueCount, ValueCounts,
    ValueCountsReport,
};
pub use config::{AnalysisConfig, DEFAULT_HEADER_KEYWORDS, DEFAULT_NA_TOKENS};
pub use error::{ModelError, Result};
pub use normalized::{
    Column, ColumnData, ColumnSchema, ColumnType, IndexKind, NormalizedTable, Orientation,
    OrientationDecision, OrientationReason, RowIndex, TableSchema, TranspositionReport,
    format_datetime, format_numeric,
};
pub use table::{Confidence, HeaderDetection, HeaderRuleKind, RawTable, SourceEncoding, TableShape};
