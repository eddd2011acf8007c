//! Pearson correlation between numeric columns.

use tabnorm_model::{AnalysisConfig, CorrelationPair, CorrelationReport, NormalizedTable};

/// Finds numeric column pairs whose correlation magnitude exceeds
/// `correlation_threshold`.
///
/// Each unordered pair appears once, as (earlier column, later column).
/// Pairs are sorted by descending magnitude and cut to
/// `max_correlation_pairs`. Columns without variance are left out and
/// listed in `constant_columns`.
pub fn analyze_correlations(table: &NormalizedTable, config: &AnalysisConfig) -> CorrelationReport {
    let numeric: Vec<(&str, &[Option<f64>])> = table.numeric_columns().collect();
    let mut report = CorrelationReport {
        numeric_columns: numeric.len(),
        ..CorrelationReport::default()
    };
    if numeric.len() < 2 {
        return report;
    }

    let (varying, constant): (Vec<_>, Vec<_>) = numeric
        .into_iter()
        .partition(|(_, values)| has_variance(values));
    report.constant_columns = constant.iter().map(|(name, _)| (*name).to_string()).collect();

    let mut pairs = Vec::new();
    for (i, (left, left_values)) in varying.iter().enumerate() {
        for (right, right_values) in &varying[i + 1..] {
            let Some(coefficient) = pearson(left_values, right_values) else {
                continue;
            };
            if coefficient.abs() > config.correlation_threshold {
                pairs.push(CorrelationPair {
                    left: (*left).to_string(),
                    right: (*right).to_string(),
                    coefficient,
                });
            }
        }
    }

    // Stable sort keeps column order among equal magnitudes.
    pairs.sort_by(|a, b| b.coefficient.abs().total_cmp(&a.coefficient.abs()));
    report.total_found = pairs.len();
    pairs.truncate(config.max_correlation_pairs);
    report.pairs = pairs;
    tracing::debug!(
        numeric_columns = report.numeric_columns,
        found = report.total_found,
        "correlations computed"
    );
    report
}

fn has_variance(values: &[Option<f64>]) -> bool {
    let mut present = values.iter().flatten();
    match present.next() {
        Some(first) => present.any(|v| v != first),
        None => false,
    }
}

/// Pearson coefficient over rows where both values are present.
///
/// `None` when fewer than two such rows exist or either side has no
/// variance across them.
pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    let r = sxy / (sxx * syy).sqrt();
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabnorm_model::{Column, ColumnData, RowIndex};

    fn table(columns: Vec<(&str, Vec<Option<f64>>)>) -> NormalizedTable {
        let len = columns.first().map_or(0, |(_, v)| v.len());
        NormalizedTable::new(
            RowIndex::Positional(len),
            columns
                .into_iter()
                .map(|(name, values)| Column::new(name, ColumnData::Numeric(values)))
                .collect(),
        )
        .unwrap()
    }

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn test_identical_columns_reported_once() {
        let values = some(&[1.0, 2.5, 3.0, 7.0, 4.0]);
        let report = analyze_correlations(
            &table(vec![("A", values.clone()), ("B", values)]),
            &AnalysisConfig::default(),
        );
        assert_eq!(report.pairs.len(), 1);
        let pair = &report.pairs[0];
        assert_eq!((pair.left.as_str(), pair.right.as_str()), ("A", "B"));
        assert!((pair.coefficient - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_threshold_and_order() {
        let report = analyze_correlations(
            &table(vec![
                ("A", some(&[1.0, 2.0, 3.0, 4.0, 5.0])),
                ("B", some(&[2.0, 4.1, 6.0, 8.2, 9.9])),
                ("C", some(&[5.0, 4.0, 3.0, 2.0, 1.0])),
                ("D", some(&[1.0, -1.0, 1.0, -1.0, 1.0])),
            ]),
            &AnalysisConfig::default(),
        );
        assert_eq!(report.total_found, 3);
        // A and C are perfectly anti-correlated and come first.
        assert_eq!(report.pairs[0].left, "A");
        assert_eq!(report.pairs[0].right, "C");
        assert!((report.pairs[0].coefficient + 1.0).abs() < 1e-12);
        assert!(report.pairs.iter().all(|p| p.left != "D" && p.right != "D"));
    }

    #[test]
    fn test_pair_limit() {
        let base = some(&[1.0, 2.0, 3.0, 5.0]);
        let columns: Vec<_> = ["A", "B", "C", "D"]
            .into_iter()
            .map(|name| (name, base.clone()))
            .collect();
        let config = AnalysisConfig {
            max_correlation_pairs: 2,
            ..AnalysisConfig::default()
        };
        let report = analyze_correlations(&table(columns), &config);
        assert_eq!(report.total_found, 6);
        assert_eq!(report.pairs.len(), 2);
    }

    #[test]
    fn test_constant_columns_excluded() {
        let report = analyze_correlations(
            &table(vec![
                ("A", some(&[1.0, 2.0, 3.0])),
                ("K", some(&[4.0, 4.0, 4.0])),
            ]),
            &AnalysisConfig::default(),
        );
        assert!(report.pairs.is_empty());
        assert_eq!(report.constant_columns, vec!["K"]);
    }

    #[test]
    fn test_single_numeric_column() {
        let report = analyze_correlations(
            &table(vec![("A", some(&[1.0, 2.0]))]),
            &AnalysisConfig::default(),
        );
        assert_eq!(report.numeric_columns, 1);
        assert!(report.pairs.is_empty());
    }

    #[test]
    fn test_pearson_uses_complete_rows() {
        let x = vec![Some(1.0), Some(2.0), None, Some(4.0)];
        let y = vec![Some(2.0), Some(4.0), Some(100.0), Some(8.0)];
        let r = pearson(&x, &y).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
        assert_eq!(pearson(&[Some(1.0)], &[Some(2.0)]), None);
    }
}
