//! CLI library components for the tabular normalizer.
//!
//! The binary wires these together: [`config`] builds the run configuration,
//! [`logging`] installs the tracing subscriber and [`pipeline`] analyzes a
//! directory of CSV files one file at a time.

pub mod config;
pub mod logging;
pub mod pipeline;
