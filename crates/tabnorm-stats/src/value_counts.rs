//! Frequent values of text columns.

use std::collections::HashMap;

use tabnorm_model::{
    AnalysisConfig, NormalizedTable, ValueCount, ValueCounts, ValueCountsReport,
};

/// Top values for the first `max_value_count_columns` text columns.
pub fn count_values(table: &NormalizedTable, config: &AnalysisConfig) -> ValueCountsReport {
    let text_columns: Vec<(&str, &[Option<String>])> = table
        .columns()
        .iter()
        .filter_map(|column| Some((column.name.as_str(), column.as_text()?)))
        .collect();

    let omitted_columns = text_columns
        .len()
        .saturating_sub(config.max_value_count_columns);
    let columns = text_columns
        .into_iter()
        .take(config.max_value_count_columns)
        .map(|(name, values)| top_values(name, values, config.top_value_counts))
        .collect();

    ValueCountsReport {
        columns,
        omitted_columns,
    }
}

/// Counts distinct values; ties keep the order of first appearance.
pub fn top_values(name: &str, values: &[Option<String>], limit: usize) -> ValueCounts {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<ValueCount> = Vec::new();
    for value in values.iter().flatten() {
        match positions.get(value.as_str()) {
            Some(&position) => counts[position].count += 1,
            None => {
                positions.insert(value.as_str(), counts.len());
                counts.push(ValueCount {
                    value: value.clone(),
                    count: 1,
                });
            }
        }
    }

    let distinct = counts.len();
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    ValueCounts {
        column: name.to_string(),
        distinct,
        top: counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabnorm_model::{Column, ColumnData, RowIndex};

    fn text(values: &[&str]) -> Vec<Option<String>> {
        values
            .iter()
            .map(|v| (!v.is_empty()).then(|| (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_top_values_order() {
        let counts = top_values("Region", &text(&["b", "a", "a", "", "b", "c"]), 2);
        assert_eq!(counts.distinct, 3);
        let top: Vec<_> = counts.top.iter().map(|v| (v.value.as_str(), v.count)).collect();
        assert_eq!(top, vec![("b", 2), ("a", 2)]);
    }

    #[test]
    fn test_column_limit() {
        let table = NormalizedTable::new(
            RowIndex::Positional(1),
            vec![
                Column::new("A", ColumnData::Text(text(&["x"]))),
                Column::new("N", ColumnData::Numeric(vec![Some(1.0)])),
                Column::new("B", ColumnData::Text(text(&["y"]))),
                Column::new("C", ColumnData::Text(text(&["z"]))),
            ],
        )
        .unwrap();
        let config = AnalysisConfig {
            max_value_count_columns: 2,
            ..AnalysisConfig::default()
        };
        let report = count_values(&table, &config);
        let names: Vec<_> = report.columns.iter().map(|c| c.column.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(report.omitted_columns, 1);
    }
}
