//! Missing-value overview.

use tabnorm_model::{ColumnMissing, MissingSummary, NormalizedTable};

/// Counts missing cells per column and overall.
pub fn summarize_missing(table: &NormalizedTable) -> MissingSummary {
    let mut columns: Vec<ColumnMissing> = table
        .columns()
        .iter()
        .map(|column| ColumnMissing {
            name: column.name.clone(),
            missing: column.data.null_count(),
        })
        .filter(|entry| entry.missing > 0)
        .collect();
    columns.sort_by(|a, b| b.missing.cmp(&a.missing));

    let total_missing = columns.iter().map(|c| c.missing).sum();
    let total_cells = table.shape().cells();
    let missing_fraction = if total_cells == 0 {
        0.0
    } else {
        total_missing as f64 / total_cells as f64
    };

    MissingSummary {
        total_missing,
        total_cells,
        missing_fraction,
        columns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabnorm_model::{Column, ColumnData, RowIndex};

    #[test]
    fn test_missing_summary() {
        let table = NormalizedTable::new(
            RowIndex::Positional(4),
            vec![
                Column::new("Full", ColumnData::Numeric(vec![Some(1.0); 4])),
                Column::new("Half", ColumnData::Numeric(vec![Some(1.0), None, Some(2.0), None])),
                Column::new("Most", ColumnData::Text(vec![None, None, None, Some("x".into())])),
            ],
        )
        .unwrap();
        let summary = summarize_missing(&table);
        assert_eq!(summary.total_missing, 5);
        assert_eq!(summary.total_cells, 12);
        assert!((summary.missing_fraction - 5.0 / 12.0).abs() < 1e-12);
        let names: Vec<_> = summary.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Most", "Half"]);
    }

    #[test]
    fn test_empty_table() {
        let table = NormalizedTable::new(RowIndex::Positional(0), Vec::new()).unwrap();
        let summary = summarize_missing(&table);
        assert_eq!(summary.total_cells, 0);
        assert_eq!(summary.missing_fraction, 0.0);
    }
}
