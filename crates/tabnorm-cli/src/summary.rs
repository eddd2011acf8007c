use std::fmt::Write as _;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use tabnorm_cli::pipeline::FileOutcome;
use tabnorm_model::{
    DESCRIPTOR_HEADERS, DateAnalysis, FileAnalysis, Note, NoteLevel, TableShape, format_datetime,
};

use crate::types::RunResult;

pub fn print_summary(result: &RunResult) {
    println!("Data: {}", result.data_dir.display());
    if let Some(path) = &result.json_output {
        println!("JSON: {}", path.display());
    }
    if !result.exported.is_empty() {
        println!("Exported tables: {}", result.exported.len());
    }
    if result.outcomes.is_empty() {
        println!("No CSV files found.");
        return;
    }
    println!("{}", summary_table(&result.outcomes));

    for analysis in result.outcomes.iter().filter_map(FileOutcome::analysis) {
        if result.show_columns {
            print_columns(analysis);
        }
        if !analysis.notes.is_empty() {
            print!("{}", notes_block(&analysis.file_name, &analysis.notes));
        }
    }

    let failures: Vec<_> = result
        .outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            FileOutcome::Failed(failure) => Some(failure),
            FileOutcome::Analyzed(_) => None,
        })
        .collect();
    if !failures.is_empty() {
        eprintln!("Errors:");
        for failure in failures {
            eprintln!("- {}: {}", failure.file_name, failure.error);
        }
    }
}

fn summary_table(outcomes: &[FileOutcome]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Encoding"),
        header_cell("Header"),
        header_cell("Orientation"),
        header_cell("Mode"),
        header_cell("Original"),
        header_cell("Analyzed"),
        header_cell("Numeric"),
        header_cell("Pairs"),
        header_cell("Status"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 7, CellAlignment::Right);
    align_column(&mut table, 8, CellAlignment::Right);
    align_column(&mut table, 9, CellAlignment::Center);

    for outcome in outcomes {
        match outcome {
            FileOutcome::Analyzed(analysis) => {
                table.add_row(vec![
                    file_cell(&analysis.file_name),
                    Cell::new(analysis.encoding),
                    Cell::new(format!("row {} ({})", analysis.header.row, analysis.header.rule)),
                    Cell::new(analysis.orientation.orientation),
                    Cell::new(analysis.mode),
                    Cell::new(compact_shape(analysis.original_shape)),
                    Cell::new(compact_shape(analysis.schema.shape)),
                    Cell::new(analysis.correlations.numeric_columns),
                    count_cell(analysis.correlations.total_found),
                    status_cell(analysis),
                ]);
            }
            FileOutcome::Failed(failure) => {
                let mut row = vec![file_cell(&failure.file_name)];
                row.extend((0..8).map(|_| dim_cell("-")));
                row.push(
                    Cell::new("failed")
                        .fg(Color::Red)
                        .add_attribute(Attribute::Bold),
                );
                table.add_row(row);
            }
        }
    }
    table
}

fn print_columns(analysis: &FileAnalysis) {
    println!();
    println!("{}: {}", analysis.file_name, analysis.orientation);
    let mut table = Table::new();
    table.set_header(DESCRIPTOR_HEADERS.iter().copied().map(header_cell).collect::<Vec<_>>());
    apply_table_style(&mut table);
    for descriptor in &analysis.descriptors {
        table.add_row(descriptor.rendered_row());
    }
    println!("{table}");

    if let Some(dates) = &analysis.dates {
        println!("{}", date_line(dates));
    }
    if analysis.missing.total_missing > 0 {
        println!(
            "Missing: {} of {} cells ({:.2}%)",
            analysis.missing.total_missing,
            analysis.missing.total_cells,
            analysis.missing.missing_fraction * 100.0
        );
    }
    for pair in &analysis.correlations.pairs {
        println!("Correlation {} ~ {}: {:.3}", pair.left, pair.right, pair.coefficient);
    }
}

fn date_line(dates: &DateAnalysis) -> String {
    let mut line = format!(
        "Dates ({}): {} to {}, {} distinct",
        dates.source,
        format_datetime(dates.min),
        format_datetime(dates.max),
        dates.distinct
    );
    if let Some(frequency) = dates.frequency {
        let _ = write!(line, ", {frequency}");
    }
    if let Some(missing) = dates.missing_periods {
        let _ = write!(line, ", {missing} missing periods");
    }
    if dates.duplicates > 0 {
        let _ = write!(line, ", {} duplicates", dates.duplicates);
    }
    line
}

fn notes_block(file_name: &str, notes: &[Note]) -> String {
    let mut block = format!("{file_name}:\n");
    for note in notes {
        let _ = writeln!(block, "  {note}");
    }
    block
}

fn compact_shape(shape: TableShape) -> String {
    format!("{} x {}", shape.rows, shape.columns)
}

fn status_cell(analysis: &FileAnalysis) -> Cell {
    let worst = analysis.notes.iter().map(|note| note.level).max();
    match worst {
        Some(NoteLevel::Error) => Cell::new("errors").fg(Color::Red),
        Some(NoteLevel::Warning) => Cell::new("warnings").fg(Color::Yellow),
        _ => Cell::new("ok").fg(Color::Green),
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(160);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn file_cell(name: &str) -> Cell {
    Cell::new(name)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
