//! Normalization of raw CSV tables.
//!
//! # Overview
//!
//! This crate turns a [`RawTable`](tabnorm_model::RawTable) into a typed
//! [`NormalizedTable`](tabnorm_model::NormalizedTable):
//! - **Frame construction**: header names, NA tokens, empty row/column removal
//! - **Orientation**: ordered rules decide between wide and tall layouts
//! - **Transposition**: wide tables become period-indexed series columns
//! - **Type inference**: text columns become numeric or datetime where the
//!   values support it
//! - **Export**: conversion to a Polars `DataFrame` and CSV output
//!
//! # Example
//!
//! ```ignore
//! use tabnorm_model::AnalysisConfig;
//! use tabnorm_transform::normalize;
//!
//! let config = AnalysisConfig::default();
//! let normalized = normalize(&raw, "prices.csv", &config)?;
//! println!("{} ({:?})", normalized.orientation, normalized.mode);
//! ```

mod dataframe;
mod error;
mod frame;
mod inference;
mod orientation;
mod pipeline;
mod transpose;

// === Error Types ===
pub use error::{Result, TransformError};

// === Frame ===
pub use frame::{TextColumn, TextFrame};

// === Orientation ===
pub use orientation::{
    ExplicitOverrideRule, OrientationClassifier, OrientationInput, OrientationRule, ShapeRule,
    classify_orientation,
};

// === Transposition ===
pub use transpose::{
    TRANSPOSED_INDEX_NAME, Transposed, identifier_columns, period_index, transpose,
};

// === Type Inference ===
pub use inference::{
    DATE_NAME_KEYWORDS, Inference, InferencePolicy, infer_columns, parse_datetime, parse_month,
    parse_numeric, parse_period, parse_year,
};

// === Pipeline ===
pub use pipeline::{Normalized, normalize};

// === Export ===
pub use dataframe::{to_dataframe, write_csv};
