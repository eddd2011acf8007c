//! Raw, untyped tables as read from disk.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Text encoding a file was decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
    /// Latin-1 family fallback (WHATWG `windows-1252`).
    Windows1252,
}

impl SourceEncoding {
    pub fn label(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Utf16Le => "UTF-16LE",
            Self::Utf16Be => "UTF-16BE",
            Self::Windows1252 => "windows-1252",
        }
    }

    /// Returns true if decoding needed the Latin-1 fallback.
    pub fn is_fallback(self) -> bool {
        matches!(self, Self::Windows1252)
    }
}

impl fmt::Display for SourceEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which header detection rule produced a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderRuleKind {
    Keyword,
    WideShape,
    StringRatio,
    MaxStringRatio,
    Default,
}

impl fmt::Display for HeaderRuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Keyword => "keyword",
            Self::WideShape => "wide shape",
            Self::StringRatio => "string ratio",
            Self::MaxStringRatio => "max string ratio",
            Self::Default => "default",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Low,
}

/// Outcome of header row detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderDetection {
    /// Zero-based record index of the header row.
    pub row: usize,
    pub rule: HeaderRuleKind,
    pub confidence: Confidence,
}

impl HeaderDetection {
    pub fn new(row: usize, rule: HeaderRuleKind) -> Self {
        let confidence = match rule {
            HeaderRuleKind::Keyword | HeaderRuleKind::WideShape | HeaderRuleKind::StringRatio => {
                Confidence::High
            }
            HeaderRuleKind::MaxStringRatio | HeaderRuleKind::Default => Confidence::Low,
        };
        Self {
            row,
            rule,
            confidence,
        }
    }

    /// Header row 0, chosen because no rule matched.
    pub fn fallback() -> Self {
        Self::new(0, HeaderRuleKind::Default)
    }

    pub fn is_low_confidence(&self) -> bool {
        self.confidence == Confidence::Low
    }
}

/// Table dimensions as (rows, columns).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableShape {
    pub rows: usize,
    pub columns: usize,
}

impl TableShape {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }

    pub fn cells(self) -> usize {
        self.rows * self.columns
    }
}

impl fmt::Display for TableShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rows x {} columns", self.rows, self.columns)
    }
}

/// Every non-blank record of a file, with the detected header offset.
///
/// Cells are trimmed strings; nothing has been typed yet. Records before
/// `header.row` are preamble and are ignored downstream.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub records: Vec<Vec<String>>,
    pub header: HeaderDetection,
    pub encoding: SourceEncoding,
    pub delimiter: u8,
}

impl RawTable {
    /// Cells of the header row, or an empty slice for an empty file.
    pub fn header_cells(&self) -> &[String] {
        self.records
            .get(self.header.row)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Records after the header row.
    pub fn data_records(&self) -> &[Vec<String>] {
        let start = (self.header.row + 1).min(self.records.len());
        &self.records[start..]
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(records: &[&[&str]], header_row: usize) -> RawTable {
        RawTable {
            records: records
                .iter()
                .map(|r| r.iter().map(|c| (*c).to_string()).collect())
                .collect(),
            header: HeaderDetection::new(header_row, HeaderRuleKind::Keyword),
            encoding: SourceEncoding::Utf8,
            delimiter: b',',
        }
    }

    #[test]
    fn test_header_and_data_split() {
        let table = raw(&[&["junk"], &["Date", "Value"], &["2020", "1"]], 1);
        assert_eq!(table.header_cells(), &["Date".to_string(), "Value".to_string()]);
        assert_eq!(table.data_records().len(), 1);
    }

    #[test]
    fn test_empty_table() {
        let table = raw(&[], 0);
        assert!(table.header_cells().is_empty());
        assert!(table.data_records().is_empty());
    }

    #[test]
    fn test_confidence_by_rule() {
        assert!(!HeaderDetection::new(3, HeaderRuleKind::StringRatio).is_low_confidence());
        assert!(HeaderDetection::new(3, HeaderRuleKind::MaxStringRatio).is_low_confidence());
        assert!(HeaderDetection::fallback().is_low_confidence());
    }
}
