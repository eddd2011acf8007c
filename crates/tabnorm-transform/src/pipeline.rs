//! The normalization stage: raw table to typed table.

use tabnorm_model::{
    AnalysisConfig, AnalysisMode, NormalizedTable, Note, OrientationDecision, RawTable, RowIndex,
    TableShape, TranspositionReport,
};

use crate::error::Result;
use crate::frame::TextFrame;
use crate::inference::{InferencePolicy, infer_columns};
use crate::orientation::{OrientationClassifier, OrientationInput};
use crate::transpose::transpose;

/// Output of [`normalize`].
#[derive(Debug, Clone)]
pub struct Normalized {
    pub table: NormalizedTable,
    /// Shape after header detection and empty row/column removal.
    pub original_shape: TableShape,
    pub original_columns: Vec<String>,
    pub orientation: OrientationDecision,
    pub mode: AnalysisMode,
    pub transposition: Option<TranspositionReport>,
    pub notes: Vec<Note>,
}

/// Classifies, reshapes and types one raw table.
///
/// A failed transposition is not an error: the table is analyzed in its
/// original layout and a warning note is recorded.
pub fn normalize(raw: &RawTable, file_name: &str, config: &AnalysisConfig) -> Result<Normalized> {
    let frame = TextFrame::from_raw(raw, config);
    let original_shape = frame.shape();
    let original_columns = frame.column_names();
    let mut notes = Vec::new();

    let orientation = OrientationClassifier::standard().classify(&OrientationInput {
        file_name,
        shape: original_shape,
        config,
    });
    tracing::info!(
        rows = original_shape.rows,
        columns = original_shape.columns,
        orientation = %orientation,
        "orientation classified"
    );

    if orientation.is_wide() {
        match transpose(&frame, config) {
            Ok(transposed) => {
                notes.push(Note::info(format!(
                    "transposed on identifier columns {:?}",
                    transposed.report.identifier_columns
                )));
                notes.push(Note::info(format!(
                    "transposed index parsed as {}",
                    transposed.report.index_kind
                )));
                let inference = infer_columns(transposed.columns, InferencePolicy::Wide, config);
                notes.extend(inference.notes);
                let table = NormalizedTable::new(transposed.index, inference.columns)?;
                return Ok(Normalized {
                    table,
                    original_shape,
                    original_columns,
                    orientation,
                    mode: AnalysisMode::Transposed,
                    transposition: Some(transposed.report),
                    notes,
                });
            }
            Err(e) => {
                tracing::warn!(file = file_name, error = %e, "transposition failed, analyzing original layout");
                notes.push(Note::warning(format!(
                    "transposition failed: {e}; analyzing original layout"
                )));
                let table = tall_table(frame, config, &mut notes)?;
                return Ok(Normalized {
                    table,
                    original_shape,
                    original_columns,
                    orientation,
                    mode: AnalysisMode::TallAfterFailedTransposition,
                    transposition: None,
                    notes,
                });
            }
        }
    }

    let table = tall_table(frame, config, &mut notes)?;
    Ok(Normalized {
        table,
        original_shape,
        original_columns,
        orientation,
        mode: AnalysisMode::Tall,
        transposition: None,
        notes,
    })
}

fn tall_table(
    frame: TextFrame,
    config: &AnalysisConfig,
    notes: &mut Vec<Note>,
) -> Result<NormalizedTable> {
    let height = frame.height();
    let inference = infer_columns(frame.into_columns(), InferencePolicy::Tall, config);
    notes.extend(inference.notes);
    Ok(NormalizedTable::new(
        RowIndex::Positional(height),
        inference.columns,
    )?)
}
