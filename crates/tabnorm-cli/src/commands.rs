use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, info_span, warn};

use tabnorm_cli::config::{ConfigOverrides, load_config};
use tabnorm_cli::pipeline::{FileOutcome, analyze_directory};
use tabnorm_model::Note;
use tabnorm_transform::write_csv;

use crate::cli::{AnalyzeArgs, ConfigArgs};
use crate::types::RunResult;

#[derive(Serialize)]
struct JsonReport<'a> {
    data_dir: &'a Path,
    files: &'a [FileOutcome],
}

pub fn run_config(args: &ConfigArgs) -> Result<()> {
    let config = load_config(args.config.as_deref(), ConfigOverrides::default())
        .context("load configuration")?;
    let text = toml::to_string_pretty(&config).context("serialize configuration")?;
    print!("{text}");
    Ok(())
}

pub fn run_analyze(args: &AnalyzeArgs) -> Result<RunResult> {
    let config =
        load_config(args.config.as_deref(), args.overrides()).context("load configuration")?;
    let run_span = info_span!("run", data_dir = %args.data_dir.display());
    let _run_guard = run_span.enter();
    let start = Instant::now();

    let mut outcomes = analyze_directory(&args.data_dir, &config)?;

    if let Some(path) = &args.json {
        write_json(path, &args.data_dir, &outcomes)?;
    }
    let exported = match &args.export_dir {
        Some(dir) => export_tables(dir, &mut outcomes)?,
        None => Vec::new(),
    };

    let result = RunResult {
        data_dir: args.data_dir.clone(),
        outcomes,
        json_output: args.json.clone(),
        exported,
        show_columns: args.columns,
    };
    info!(
        files = result.outcomes.len(),
        failed = result.failed_count(),
        duration_ms = start.elapsed().as_millis(),
        "run complete"
    );
    Ok(result)
}

/// Writes every analyzed table into `dir`.
///
/// Only an unusable export directory is an error. A table that cannot be
/// written gets a warning note on its file.
fn export_tables(dir: &Path, outcomes: &mut [FileOutcome]) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create export directory {}", dir.display()))?;
    let mut written = Vec::new();
    for analysis in outcomes.iter_mut().filter_map(FileOutcome::analysis_mut) {
        let stem = Path::new(&analysis.file_name)
            .file_stem()
            .map_or_else(|| analysis.file_name.clone(), |s| s.to_string_lossy().into_owned());
        let path = dir.join(format!("{stem}_normalized.csv"));
        match write_csv(&analysis.table, &path) {
            Ok(()) => written.push(path),
            Err(error) => {
                warn!(file = %analysis.file_name, path = %path.display(), %error, "export failed");
                analysis.notes.push(Note::warning(format!(
                    "export to {} failed: {error}",
                    path.display()
                )));
            }
        }
    }
    info!(dir = %dir.display(), tables = written.len(), "tables exported");
    Ok(written)
}

fn write_json(path: &Path, data_dir: &Path, outcomes: &[FileOutcome]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    let report = JsonReport {
        data_dir,
        files: outcomes,
    };
    serde_json::to_writer_pretty(&mut writer, &report)
        .with_context(|| format!("write {}", path.display()))?;
    writer.flush()?;
    info!(path = %path.display(), "json results written");
    Ok(())
}
