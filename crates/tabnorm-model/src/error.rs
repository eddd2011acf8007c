//! Error types for the tabular data model.

use thiserror::Error;

/// Errors raised when a table or configuration would violate a model invariant.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    /// A column does not have as many values as the index has labels.
    #[error("column '{column}' has {found} values but the index has {expected} labels")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    /// Two columns share the same name.
    #[error("duplicate column name '{column}'")]
    DuplicateColumn { column: String },

    /// A configuration value is out of range.
    #[error("invalid configuration value for {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
