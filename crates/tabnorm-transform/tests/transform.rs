use proptest::prelude::*;
use tabnorm_model::{AnalysisConfig, AnalysisMode, ColumnType};
use tabnorm_transform::{
    InferencePolicy, TextColumn, TextFrame, infer_columns, normalize, transpose,
};

fn wide_frame(rows: usize, periods: usize, identifiers: usize) -> TextFrame {
    let mut columns = vec![TextColumn::new(
        "Series",
        (0..rows).map(|r| Some(format!("S{r}"))).collect(),
    )];
    for i in 0..identifiers {
        columns.push(TextColumn::new(
            format!("Attr{i}"),
            (0..rows).map(|r| Some(format!("a{r}"))).collect(),
        ));
    }
    for p in 0..periods {
        columns.push(TextColumn::new(
            format!("{}", 2000 + p),
            (0..rows).map(|r| Some(format!("{}", r * p))).collect(),
        ));
    }
    TextFrame::from_columns(columns)
}

proptest! {
    #[test]
    fn transposition_preserves_body_cells(
        rows in 1usize..12,
        periods in 1usize..12,
        identifiers in 0usize..5,
    ) {
        let frame = wide_frame(rows, periods, identifiers);
        let transposed = transpose(&frame, &AnalysisConfig::default()).expect("transposes");
        let report = &transposed.report;
        prop_assert!(report.preserves_cell_count());
        prop_assert_eq!(report.rows_after, periods + identifiers.saturating_sub(3));
        prop_assert_eq!(report.columns_after, rows);
        prop_assert_eq!(report.identifier_columns.len(), 1 + identifiers.min(3));
        prop_assert_eq!(
            rows * (frame.width() - report.identifier_columns.len()),
            report.rows_after * report.columns_after
        );
    }

    #[test]
    fn wide_inference_keeps_column_lengths(values in proptest::collection::vec("[0-9a-z,.]{0,6}", 1..20)) {
        let column = TextColumn::new(
            "S",
            values.iter().map(|v| Some(v.clone())).collect(),
        );
        let inference = infer_columns(vec![column], InferencePolicy::Wide, &AnalysisConfig::default());
        prop_assert_eq!(inference.columns[0].len(), values.len());
    }
}

#[test]
fn na_tokens_and_thousands_separators() {
    let raw = tabnorm_model::RawTable {
        records: vec![
            vec!["Amount".to_string()],
            vec!["1,200".to_string()],
            vec!["3,400".to_string()],
            vec!["..".to_string()],
            vec!["5".to_string()],
        ],
        header: tabnorm_model::HeaderDetection::new(0, tabnorm_model::HeaderRuleKind::StringRatio),
        encoding: tabnorm_model::SourceEncoding::Utf8,
        delimiter: b',',
    };
    let normalized = normalize(&raw, "amounts.csv", &AnalysisConfig::default()).expect("normalize");
    assert_eq!(normalized.mode, AnalysisMode::Tall);
    let column = normalized.table.column("Amount").expect("column");
    assert_eq!(column.column_type(), ColumnType::Numeric);
    // The all-NA row is dropped before inference.
    assert_eq!(column.as_numeric().expect("numeric"), &[Some(1200.0), Some(3400.0), Some(5.0)]);
}

#[test]
fn raw_values_with_na_token_convert_with_one_null() {
    let records = [["Value", "Key"], ["1,200", "a"], ["3,400", "b"], ["..", "c"]];
    let raw = tabnorm_model::RawTable {
        records: records
            .iter()
            .map(|r| r.iter().map(|c| (*c).to_string()).collect())
            .collect(),
        header: tabnorm_model::HeaderDetection::new(0, tabnorm_model::HeaderRuleKind::StringRatio),
        encoding: tabnorm_model::SourceEncoding::Utf8,
        delimiter: b',',
    };
    let normalized = normalize(&raw, "values.csv", &AnalysisConfig::default()).expect("normalize");
    let values = normalized
        .table
        .column("Value")
        .and_then(|c| c.as_numeric())
        .expect("numeric");
    assert_eq!(values.iter().flatten().count(), 2);
    assert_eq!(values.iter().filter(|v| v.is_none()).count(), 1);
}

#[test]
fn custom_na_tokens_replace_defaults() {
    let records = [["Amount", "Key"], ["1", "a"], ["x", "b"], ["..", "c"]];
    let raw = tabnorm_model::RawTable {
        records: records
            .iter()
            .map(|r| r.iter().map(|c| (*c).to_string()).collect())
            .collect(),
        header: tabnorm_model::HeaderDetection::new(0, tabnorm_model::HeaderRuleKind::StringRatio),
        encoding: tabnorm_model::SourceEncoding::Utf8,
        delimiter: b',',
    };
    let config = AnalysisConfig::default().with_na_tokens(["", "x"]);
    let normalized = normalize(&raw, "amounts.csv", &config).expect("normalize");
    let column = normalized.table.column("Amount").expect("column");
    // Half of the present values parse, which is not enough to convert.
    assert_eq!(column.column_type(), ColumnType::Text);
    assert_eq!(
        column.as_text().expect("text"),
        &[Some("1".to_string()), None, Some("..".to_string())]
    );
}
