use std::path::PathBuf;

use tabnorm_cli::pipeline::FileOutcome;

#[derive(Debug)]
pub struct RunResult {
    pub data_dir: PathBuf,
    pub outcomes: Vec<FileOutcome>,
    pub json_output: Option<PathBuf>,
    pub exported: Vec<PathBuf>,
    pub show_columns: bool,
}

impl RunResult {
    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    pub fn has_errors(&self) -> bool {
        self.failed_count() > 0
    }
}
