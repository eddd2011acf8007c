//! Analysis configuration.
//!
//! One immutable [`AnalysisConfig`] value is built per run and threaded by
//! reference through every stage. It deserializes from TOML with every field
//! optional, so a config file only needs to mention what it changes.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Tokens interpreted as missing values when no configuration overrides them.
pub const DEFAULT_NA_TOKENS: &[&str] = &["", "..", "...", "-", "na", "n/a", "nan", "none", "null"];

/// Keywords that mark a line as a likely header row.
pub const DEFAULT_HEADER_KEYWORDS: &[&str] = &[
    "date",
    "series",
    "value",
    "sector",
    "indicator",
    "country",
    "year",
    "month",
    "quarter",
];

/// Settings shared by every stage of the per-file pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Cell values treated as missing (matched trimmed, case-insensitively).
    pub na_tokens: BTreeSet<String>,
    /// Number of leading records inspected when looking for the header row.
    pub header_scan_rows: usize,
    /// Minimum share of string-like cells for a row to count as a header.
    pub header_min_string_ratio: f64,
    /// Keywords counted by the keyword header rule.
    pub header_keywords: Vec<String>,
    /// Absolute Pearson coefficient a pair must exceed to be reported.
    pub correlation_threshold: f64,
    /// Maximum number of correlation pairs kept in a report.
    pub max_correlation_pairs: usize,
    /// Number of most frequent values listed per text column.
    pub top_value_counts: usize,
    /// Maximum number of text columns that get value counts.
    pub max_value_count_columns: usize,
    /// File names that are always treated as wide tables.
    pub wide_overrides: BTreeSet<String>,
    /// Maximum number of auxiliary identifier columns kept during transposition.
    pub max_identifier_columns: usize,
    /// Share of non-null cells that must parse before a column conversion is accepted.
    pub inference_min_parse_ratio: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            na_tokens: DEFAULT_NA_TOKENS.iter().map(|t| (*t).to_string()).collect(),
            header_scan_rows: 20,
            header_min_string_ratio: 0.6,
            header_keywords: DEFAULT_HEADER_KEYWORDS
                .iter()
                .map(|k| (*k).to_string())
                .collect(),
            correlation_threshold: 0.8,
            max_correlation_pairs: 50,
            top_value_counts: 20,
            max_value_count_columns: 50,
            wide_overrides: BTreeSet::new(),
            max_identifier_columns: 3,
            inference_min_parse_ratio: 0.5,
        }
    }
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the cell value is one of the configured NA tokens.
    pub fn is_na(&self, value: &str) -> bool {
        let trimmed = value.trim();
        self.na_tokens
            .iter()
            .any(|token| token.trim().eq_ignore_ascii_case(trimmed))
    }

    /// Returns true if the file name was explicitly marked as wide.
    pub fn is_wide_override(&self, file_name: &str) -> bool {
        self.wide_overrides.contains(file_name)
    }

    #[must_use]
    pub fn with_na_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.na_tokens = tokens.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_wide_overrides<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.wide_overrides.extend(files.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_correlation_threshold(mut self, threshold: f64) -> Self {
        self.correlation_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_header_scan_rows(mut self, rows: usize) -> Self {
        self.header_scan_rows = rows;
        self
    }

    /// Checks that every ratio lies in `[0, 1]` and the scan window is non-empty.
    pub fn validate(&self) -> Result<()> {
        check_ratio("header_min_string_ratio", self.header_min_string_ratio)?;
        check_ratio("correlation_threshold", self.correlation_threshold)?;
        check_ratio("inference_min_parse_ratio", self.inference_min_parse_ratio)?;
        if self.header_scan_rows == 0 {
            return Err(ModelError::InvalidConfig {
                field: "header_scan_rows",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn check_ratio(field: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ModelError::InvalidConfig {
            field,
            reason: format!("{value} is outside [0, 1]"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_na_tokens_case_insensitive() {
        let config = AnalysisConfig::default();
        assert!(config.is_na(".."));
        assert!(config.is_na(" N/A "));
        assert!(config.is_na(""));
        assert!(config.is_na("   "));
        assert!(!config.is_na("0"));
        assert!(!config.is_na("1,200"));
    }

    #[test]
    fn test_wide_override() {
        let config = AnalysisConfig::default().with_wide_overrides(["inflation.csv"]);
        assert!(config.is_wide_override("inflation.csv"));
        assert!(!config.is_wide_override("other.csv"));
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let config = AnalysisConfig::default().with_correlation_threshold(1.5);
        assert!(matches!(
            config.validate(),
            Err(ModelError::InvalidConfig {
                field: "correlation_threshold",
                ..
            })
        ));
        let config = AnalysisConfig::default().with_header_scan_rows(0);
        assert!(config.validate().is_err());
        assert!(AnalysisConfig::default().validate().is_ok());
    }
}
