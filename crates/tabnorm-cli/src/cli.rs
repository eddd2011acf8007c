//! CLI argument definitions for the tabular normalizer.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use tabnorm_cli::config::ConfigOverrides;

#[derive(Parser)]
#[command(
    name = "tabnorm",
    version,
    about = "Normalize and profile messy CSV tables",
    long_about = "Detect header rows, classify wide and tall layouts, transpose wide\n\
                  tables, infer column types and report per-column statistics,\n\
                  missing values and correlations for every CSV file in a directory."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyze every CSV file in a directory.
    Analyze(AnalyzeArgs),

    /// Print the effective analysis configuration as TOML.
    Config(ConfigArgs),
}

#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Directory containing the CSV files to analyze.
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,

    /// TOML file with analysis settings.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Treat this file name as a wide table regardless of its shape (repeatable).
    #[arg(long = "wide", value_name = "FILE")]
    pub wide: Vec<String>,

    /// Additional cell value to read as missing (repeatable).
    #[arg(long = "na-token", value_name = "TOKEN")]
    pub na_tokens: Vec<String>,

    /// Minimum absolute Pearson coefficient for reported pairs.
    #[arg(long = "correlation-threshold", value_name = "X")]
    pub correlation_threshold: Option<f64>,

    /// Number of leading records searched for the header row.
    #[arg(long = "header-scan-rows", value_name = "N")]
    pub header_scan_rows: Option<usize>,

    /// Write all results as JSON to this file.
    #[arg(long = "json", value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// Write each normalized table as CSV into this directory.
    #[arg(long = "export-dir", value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Print per-column statistics for every analyzed file.
    #[arg(long = "columns")]
    pub columns: bool,
}

impl AnalyzeArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            wide: self.wide.clone(),
            na_tokens: self.na_tokens.clone(),
            correlation_threshold: self.correlation_threshold,
            header_scan_rows: self.header_scan_rows,
        }
    }
}

#[derive(Parser)]
pub struct ConfigArgs {
    /// TOML file to merge over the defaults before printing.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_analyze_args() {
        let cli = Cli::try_parse_from([
            "tabnorm",
            "analyze",
            "data",
            "--wide",
            "inflation.csv",
            "--wide",
            "gdp.csv",
            "--na-token",
            "x",
            "--correlation-threshold",
            "0.9",
        ])
        .unwrap();
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.data_dir, PathBuf::from("data"));
        let overrides = args.overrides();
        assert_eq!(overrides.wide, vec!["inflation.csv", "gdp.csv"]);
        assert_eq!(overrides.na_tokens, vec!["x"]);
        assert_eq!(overrides.correlation_threshold, Some(0.9));
        assert_eq!(overrides.header_scan_rows, None);
    }
}
