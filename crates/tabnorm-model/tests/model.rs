use tabnorm_model::{
    AnalysisConfig, Column, ColumnData, ColumnType, NormalizedTable, Orientation,
    OrientationDecision, OrientationReason, RowIndex, TableSchema,
};

#[test]
fn schema_reflects_table() {
    let table = NormalizedTable::new(
        RowIndex::Labels {
            name: "TimePeriod".to_string(),
            values: vec!["2020Q1".to_string(), "2020Q2".to_string()],
        },
        vec![
            Column::new("CPI", ColumnData::Numeric(vec![Some(1.0), Some(2.0)])),
            Column::new(
                "Note",
                ColumnData::Text(vec![Some("a".to_string()), None]),
            ),
        ],
    )
    .expect("valid table");

    let schema = TableSchema::of(&table);
    assert_eq!(schema.index_name.as_deref(), Some("TimePeriod"));
    assert_eq!(schema.shape.rows, 2);
    assert_eq!(schema.shape.columns, 2);
    assert_eq!(schema.columns[0].column_type, ColumnType::Numeric);
    assert_eq!(schema.columns[1].column_type, ColumnType::Text);
    assert_eq!(table.numeric_columns().count(), 1);
}

#[test]
fn orientation_decision_serializes() {
    let decision = OrientationDecision {
        orientation: Orientation::Wide,
        reason: OrientationReason::ColumnsExceedRows {
            rows: 3,
            columns: 12,
        },
    };
    let json = serde_json::to_string(&decision).expect("serialize decision");
    let round: OrientationDecision = serde_json::from_str(&json).expect("deserialize decision");
    assert_eq!(round, decision);
    assert_eq!(
        decision.to_string(),
        "wide (shape: columns exceed rows (12 > 3))"
    );
}

#[test]
fn config_deserializes_partial_overrides() {
    let json = r#"{"correlation_threshold": 0.9, "wide_overrides": ["energy.csv"]}"#;
    let config: AnalysisConfig = serde_json::from_str(json).expect("deserialize config");
    assert!((config.correlation_threshold - 0.9).abs() < f64::EPSILON);
    assert!(config.is_wide_override("energy.csv"));
    assert_eq!(config.header_scan_rows, 20);
    assert!(config.is_na(".."));
}
