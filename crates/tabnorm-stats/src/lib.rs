//! Statistics over normalized tables.
//!
//! Every function here takes an immutable
//! [`NormalizedTable`](tabnorm_model::NormalizedTable) and returns a fresh
//! result value; nothing is cached between tables.
//!
//! - [`summarize_columns`]: one [`ColumnDescriptor`](tabnorm_model::ColumnDescriptor) per column
//! - [`analyze_correlations`]: strongly correlated numeric pairs
//! - [`summarize_missing`]: missing cells overall and per column
//! - [`count_values`]: most frequent values of text columns
//! - [`analyze_dates`]: range, frequency and gaps of the main date series

mod correlation;
mod dates;
mod missing;
mod summary;
mod value_counts;

pub use correlation::{analyze_correlations, pearson};
pub use dates::{analyze_dates, infer_frequency};
pub use missing::summarize_missing;
pub use summary::{describe_column, kurtosis, numeric_moments, skewness, summarize_columns};
pub use value_counts::{count_values, top_values};
