//! Error types for normalization.

use std::path::PathBuf;

use thiserror::Error;

use tabnorm_model::ModelError;

/// Errors raised while reshaping or exporting a table.
#[derive(Debug, Error)]
pub enum TransformError {
    // === Transposition Errors ===
    /// The table has no columns to use as identifiers.
    #[error("cannot transpose: no columns found")]
    NoColumns,

    /// The table has columns but no data rows.
    #[error("cannot transpose: no data rows")]
    NoRows,

    /// Every column was taken as an identifier, leaving nothing to transpose.
    #[error("cannot transpose: all {identifiers} columns are identifiers")]
    NoPeriodColumns { identifiers: usize },

    // === Table Errors ===
    /// A built table violated a model invariant.
    #[error(transparent)]
    Model(#[from] ModelError),

    // === Export Errors ===
    /// Polars rejected the exported frame.
    #[error("polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Failed to create or write an export file.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;
