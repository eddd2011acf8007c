//! Per-column descriptive statistics.

use polars::prelude::{ChunkAgg, ChunkQuantile, ChunkVar, NamedFrom, QuantileMethod, Series};

use tabnorm_model::{
    Column, ColumnData, ColumnDescriptor, NormalizedTable, NumericMoments, Statistic,
};

/// Describes every column of a table, in column order.
pub fn summarize_columns(table: &NormalizedTable) -> Vec<ColumnDescriptor> {
    table.columns().iter().map(describe_column).collect()
}

/// Describes one column. Statistics that are undefined for the column are
/// `NotApplicable`.
pub fn describe_column(column: &Column) -> ColumnDescriptor {
    let data = &column.data;
    let len = data.len();
    let non_null_count = data.non_null_count();
    let null_count = len - non_null_count;
    let null_pct = if len == 0 {
        0.0
    } else {
        null_count as f64 / len as f64 * 100.0
    };

    let first = (0..len).find_map(|row| data.display_value(row));
    let last = (0..len).rev().find_map(|row| data.display_value(row));

    let (numeric, min_date, max_date) = match data {
        ColumnData::Numeric(values) => (
            numeric_moments(&column.name, values),
            Statistic::NotApplicable,
            Statistic::NotApplicable,
        ),
        ColumnData::Datetime(values) => (
            NumericMoments::default(),
            Statistic::from_option(values.iter().flatten().min().copied()),
            Statistic::from_option(values.iter().flatten().max().copied()),
        ),
        ColumnData::Text(_) => (
            NumericMoments::default(),
            Statistic::NotApplicable,
            Statistic::NotApplicable,
        ),
    };

    ColumnDescriptor {
        name: column.name.clone(),
        column_type: data.column_type(),
        non_null_count,
        null_count,
        null_pct,
        distinct_count: data.distinct_count(),
        first_non_null: Statistic::from_option(first),
        last_non_null: Statistic::from_option(last),
        numeric,
        min_date,
        max_date,
    }
}

/// Mean, sample standard deviation, quartiles and extremes (through
/// Polars), plus bias-corrected skewness and excess kurtosis.
pub fn numeric_moments(name: &str, values: &[Option<f64>]) -> NumericMoments {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        return NumericMoments::default();
    }

    let series = Series::new(name.into(), present.clone());
    let Ok(ca) = series.f64() else {
        tracing::debug!(column = name, "numeric series unavailable, moments skipped");
        return NumericMoments::default();
    };
    let quantile = |q: f64| finite(ca.quantile(q, QuantileMethod::Linear).ok().flatten());

    NumericMoments {
        mean: finite(ca.mean()),
        std_dev: finite(ca.std(1)),
        min: finite(ca.min()),
        q25: quantile(0.25),
        median: quantile(0.5),
        q75: quantile(0.75),
        max: finite(ca.max()),
        skewness: Statistic::from_option(skewness(&present)),
        kurtosis: Statistic::from_option(kurtosis(&present)),
    }
}

fn finite(value: Option<f64>) -> Statistic<f64> {
    value.map_or(Statistic::NotApplicable, Statistic::finite)
}

/// Central moments `m2`, `m3`, `m4` (population form), or `None`
/// when the values have no spread.
fn central_moments(values: &[f64]) -> Option<(f64, f64, f64)> {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for v in values {
        let d = v - mean;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    let (m2, m3, m4) = (m2 / n, m3 / n, m4 / n);
    let constant = values.windows(2).all(|pair| pair[0] == pair[1]);
    (!constant && m2 > 0.0).then_some((m2, m3, m4))
}

/// Adjusted Fisher-Pearson skewness; needs three values and some spread.
pub fn skewness(values: &[f64]) -> Option<f64> {
    if values.len() < 3 {
        return None;
    }
    let (m2, m3, _) = central_moments(values)?;
    let n = values.len() as f64;
    let g1 = m3 / m2.powf(1.5);
    let adjusted = g1 * (n * (n - 1.0)).sqrt() / (n - 2.0);
    adjusted.is_finite().then_some(adjusted)
}

/// Bias-corrected excess kurtosis; needs four values and some spread.
pub fn kurtosis(values: &[f64]) -> Option<f64> {
    if values.len() < 4 {
        return None;
    }
    let (m2, _, m4) = central_moments(values)?;
    let n = values.len() as f64;
    let g2 = m4 / (m2 * m2) - 3.0;
    let adjusted = ((n + 1.0) * g2 + 6.0) * (n - 1.0) / ((n - 2.0) * (n - 3.0));
    adjusted.is_finite().then_some(adjusted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tabnorm_model::ColumnType;

    fn approx(stat: Statistic<f64>, expected: f64) {
        let value = *stat.value().expect("statistic should be applicable");
        assert!(
            (value - expected).abs() < 1e-9,
            "expected {expected}, got {value}"
        );
    }

    #[test]
    fn test_all_null_column() {
        let column = Column::new("Empty", ColumnData::Numeric(vec![None, None, None]));
        let descriptor = describe_column(&column);
        assert_eq!(descriptor.rendered_null_pct(), "100.00%");
        assert_eq!(descriptor.numeric.mean.render(), "N/A");
        assert_eq!(descriptor.first_non_null, Statistic::NotApplicable);
        assert_eq!(descriptor.last_non_null, Statistic::NotApplicable);
        assert_eq!(descriptor.distinct_count, 0);
    }

    #[test]
    fn test_numeric_moments() {
        let column = Column::new(
            "X",
            ColumnData::Numeric(vec![Some(1.0), None, Some(2.0), Some(3.0), Some(4.0), Some(10.0)]),
        );
        let d = describe_column(&column);
        assert_eq!(d.non_null_count, 5);
        assert_eq!(d.null_count, 1);
        assert_eq!(d.rendered_null_pct(), "16.67%");
        approx(d.numeric.mean, 4.0);
        approx(d.numeric.std_dev, 12.5_f64.sqrt());
        approx(d.numeric.min, 1.0);
        approx(d.numeric.q25, 2.0);
        approx(d.numeric.median, 3.0);
        approx(d.numeric.q75, 4.0);
        approx(d.numeric.max, 10.0);
        // Reference values from the adjusted Fisher-Pearson formulas.
        approx(d.numeric.skewness, 1.697_056_274_847_714);
        approx(d.numeric.kurtosis, 3.152);
        assert_eq!(d.first_non_null.render(), "1");
        assert_eq!(d.last_non_null.render(), "10");
    }

    #[test]
    fn test_constant_column_has_no_shape_statistics() {
        let column = Column::new("C", ColumnData::Numeric(vec![Some(5.0); 6]));
        let d = describe_column(&column);
        approx(d.numeric.std_dev, 0.0);
        assert_eq!(d.numeric.skewness, Statistic::NotApplicable);
        assert_eq!(d.numeric.kurtosis, Statistic::NotApplicable);
    }

    #[test]
    fn test_short_column_has_no_shape_statistics() {
        assert_eq!(skewness(&[1.0, 2.0]), None);
        assert_eq!(kurtosis(&[1.0, 2.0, 4.0]), None);
        assert!(skewness(&[1.0, 2.0, 4.0]).is_some());
    }

    #[test]
    fn test_datetime_bounds() {
        let day = |d| {
            NaiveDate::from_ymd_opt(2020, 1, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        };
        let column = Column::new(
            "Date",
            ColumnData::Datetime(vec![Some(day(5)), None, Some(day(2)), Some(day(9))]),
        );
        let d = describe_column(&column);
        assert_eq!(d.column_type, ColumnType::Datetime);
        assert_eq!(d.min_date.render(), "2020-01-02");
        assert_eq!(d.max_date.render(), "2020-01-09");
        assert_eq!(d.numeric.mean, Statistic::NotApplicable);
        assert_eq!(d.first_non_null.render(), "2020-01-05");
    }

    #[test]
    fn test_text_row_rendering() {
        let column = Column::new(
            "Region",
            ColumnData::Text(vec![Some("North".into()), Some("South".into()), Some("North".into()), None]),
        );
        let row = describe_column(&column).rendered_row().join(" | ");
        insta::assert_snapshot!(row, @"Region | text | 3 | 1 | 25.00% | 2 | N/A | N/A | N/A | N/A | N/A | N/A | N/A | N/A | N/A | N/A | N/A | North | North");
    }
}
