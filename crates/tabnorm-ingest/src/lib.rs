//! CSV ingestion for tabular normalization.
//!
//! Turns files on disk into [`RawTable`](tabnorm_model::RawTable)s:
//!
//! - **Discovery**: list candidate CSV files in a data directory
//! - **Decoding**: BOM, strict UTF-8, then windows-1252
//! - **Dialect**: sniff the delimiter from the first records
//! - **Header detection**: locate the header row with an ordered rule chain
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use tabnorm_ingest::{list_csv_files, read_raw_table};
//! use tabnorm_model::AnalysisConfig;
//!
//! let config = AnalysisConfig::default();
//! for path in list_csv_files(Path::new("data"))? {
//!     let raw = read_raw_table(&path, &config)?;
//!     println!("{}: header at row {}", path.display(), raw.header.row);
//! }
//! ```

mod dialect;
mod discovery;
mod encoding;
mod error;
mod header;
mod reader;

// === Error Types ===
pub use error::{IngestError, Result};

// === File Discovery ===
pub use discovery::list_csv_files;

// === Decoding and Dialect ===
pub use dialect::{CANDIDATE_DELIMITERS, sniff_delimiter};
pub use encoding::{Decoded, decode_bytes};

// === Header Detection ===
pub use header::{
    HeaderDetector, HeaderProbe, HeaderRule, KeywordRule, MaxStringRatioRule, StringRatioRule,
    WideShapeRule, detect_header_row,
};

// === Reading ===
pub use reader::{parse_raw_table, read_raw_table};
