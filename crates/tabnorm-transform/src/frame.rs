//! Untyped column-major view of a raw table.

use std::collections::BTreeSet;

use tabnorm_model::{AnalysisConfig, RawTable, TableShape};

/// A named column of optional text cells. `None` is an NA token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextColumn {
    pub name: String,
    pub values: Vec<Option<String>>,
}

impl TextColumn {
    pub fn new(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn non_null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn is_all_null(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }
}

/// The header row and data records of a raw table, split into columns.
///
/// Built with NA tokens resolved and entirely-null rows and columns removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFrame {
    columns: Vec<TextColumn>,
    height: usize,
}

impl TextFrame {
    /// Builds a frame from the columns given, which must share one length.
    pub fn from_columns(columns: Vec<TextColumn>) -> Self {
        let height = columns.first().map_or(0, |c| c.values.len());
        debug_assert!(columns.iter().all(|c| c.values.len() == height));
        Self { columns, height }
    }

    /// Builds a frame from the records after `raw`'s header row.
    pub fn from_raw(raw: &RawTable, config: &AnalysisConfig) -> Self {
        let header = raw.header_cells();
        let data = raw.data_records();
        let width = data
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(header.len()))
            .max()
            .unwrap_or(0);

        let names = column_names(header, width);
        let mut columns: Vec<TextColumn> = names
            .into_iter()
            .map(|name| TextColumn::new(name, Vec::with_capacity(data.len())))
            .collect();

        for record in data {
            let cells: Vec<Option<String>> = (0..width)
                .map(|i| {
                    record
                        .get(i)
                        .filter(|cell| !config.is_na(cell))
                        .map(|cell| cell.trim().to_string())
                })
                .collect();
            if cells.iter().all(Option::is_none) {
                continue;
            }
            for (column, cell) in columns.iter_mut().zip(cells) {
                column.values.push(cell);
            }
        }

        let before = columns.len();
        columns.retain(|column| !column.is_all_null());
        if columns.len() < before {
            tracing::debug!(dropped = before - columns.len(), "dropped empty columns");
        }
        Self::from_columns(columns)
    }

    pub fn columns(&self) -> &[TextColumn] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<TextColumn> {
        self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn shape(&self) -> TableShape {
        TableShape::new(self.height, self.width())
    }
}

/// Names for `width` columns: empty headers become `Unnamed: <i>` and
/// repeated names get `.1`, `.2`, ... suffixes.
fn column_names(header: &[String], width: usize) -> Vec<String> {
    let raw: Vec<String> = (0..width)
        .map(|i| match header.get(i).map(|cell| cell.trim()) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Unnamed: {i}"),
        })
        .collect();
    dedupe_names(raw)
}

/// Appends `.1`, `.2`, ... to repeated names, skipping suffixes already taken.
pub(crate) fn dedupe_names(names: Vec<String>) -> Vec<String> {
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let mut candidate = name.clone();
        let mut suffix = 1;
        while seen.contains(&candidate) {
            candidate = format!("{name}.{suffix}");
            suffix += 1;
        }
        seen.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabnorm_model::{HeaderDetection, HeaderRuleKind, SourceEncoding};

    fn raw(lines: &[&[&str]], header_row: usize) -> RawTable {
        RawTable {
            records: lines
                .iter()
                .map(|r| r.iter().map(|c| (*c).to_string()).collect())
                .collect(),
            header: HeaderDetection::new(header_row, HeaderRuleKind::StringRatio),
            encoding: SourceEncoding::Utf8,
            delimiter: b',',
        }
    }

    #[test]
    fn test_names_and_na_tokens() {
        let frame = TextFrame::from_raw(
            &raw(&[&["junk"], &["A", "", "A"], &["1", "x", ".."], &["2", "y", "3"]], 1),
            &AnalysisConfig::default(),
        );
        assert_eq!(frame.column_names(), vec!["A", "Unnamed: 1", "A.1"]);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.columns()[2].values, vec![None, Some("3".to_string())]);
    }

    #[test]
    fn test_wide_rows_extend_header() {
        let frame = TextFrame::from_raw(
            &raw(&[&["A"], &["1", "2"], &["3"]], 0),
            &AnalysisConfig::default(),
        );
        assert_eq!(frame.column_names(), vec!["A", "Unnamed: 1"]);
        assert_eq!(frame.columns()[1].values, vec![Some("2".to_string()), None]);
    }

    #[test]
    fn test_empty_rows_and_columns_dropped() {
        let frame = TextFrame::from_raw(
            &raw(&[&["A", "B", "C"], &["1", "n/a", ""], &["-", "NULL", ".."], &["2", "", ""]], 0),
            &AnalysisConfig::default(),
        );
        assert_eq!(frame.column_names(), vec!["A"]);
        assert_eq!(frame.height(), 2);
    }

    #[test]
    fn test_empty_raw_table() {
        let frame = TextFrame::from_raw(&raw(&[], 0), &AnalysisConfig::default());
        assert_eq!(frame.shape(), TableShape::new(0, 0));
    }

    #[test]
    fn test_dedupe_skips_taken_suffix() {
        let names = dedupe_names(vec!["A".into(), "A.1".into(), "A".into()]);
        assert_eq!(names, vec!["A", "A.1", "A.2"]);
    }
}
