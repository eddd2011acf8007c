//! `tabnorm` command-line entry point.
//!
//! Exit status:
//! - `0`: every discovered CSV file was analyzed. Files that only carry
//!   warnings (low-confidence header, empty table, failed export) count as
//!   analyzed.
//! - `1`: at least one file could not be read or normalized, or the run
//!   could not start (invalid configuration, missing data directory,
//!   unwritable JSON or export location).

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use clap::{ColorChoice, Parser};
use tabnorm_cli::logging::{LogConfig, LogFormat, init_logging};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;
mod types;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_analyze, run_config};
use crate::summary::print_summary;
use crate::types::RunResult;

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(error) = init_logging(&log_config_from_cli(&cli)) {
        eprintln!("error: failed to initialize logging: {error}");
        return ExitCode::FAILURE;
    }

    let status = match &cli.command {
        Command::Analyze(args) => run_analyze(args).map(|result| {
            print_summary(&result);
            ExitCode::from(run_status(&result))
        }),
        Command::Config(args) => run_config(args).map(|()| ExitCode::SUCCESS),
    };
    status.unwrap_or_else(|error| {
        eprintln!("error: {error:#}");
        ExitCode::FAILURE
    })
}

/// Failed files make the whole run fail, after every other file has been
/// analyzed and reported.
fn run_status(result: &RunResult) -> u8 {
    if result.has_errors() {
        tracing::warn!(failed = result.failed_count(), "some files could not be analyzed");
        1
    } else {
        0
    }
}

/// Explicit `-v`/`-q` or `--log-level` flags win over `RUST_LOG`.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level_filter = match cli.log_level {
        Some(LogLevelArg::Error) => LevelFilter::ERROR,
        Some(LogLevelArg::Warn) => LevelFilter::WARN,
        Some(LogLevelArg::Info) => LevelFilter::INFO,
        Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
        Some(LogLevelArg::Trace) => LevelFilter::TRACE,
        None => cli.verbosity.tracing_level_filter(),
    };
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    LogConfig {
        level_filter,
        use_env_filter: !(cli.verbosity.is_present() || cli.log_level.is_some()),
        format,
        log_file: cli.log_file.clone(),
        with_ansi,
        ..LogConfig::default()
    }
}
