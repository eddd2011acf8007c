//! Loading the analysis configuration from TOML and command-line flags.

use std::path::{Path, PathBuf};

use thiserror::Error;

use tabnorm_model::{AnalysisConfig, ModelError};

/// Errors raised while building the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Invalid(#[from] ModelError),
}

/// Settings given on the command line, applied over the file configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub wide: Vec<String>,
    /// Added to the configured NA tokens.
    pub na_tokens: Vec<String>,
    pub correlation_threshold: Option<f64>,
    pub header_scan_rows: Option<usize>,
}

impl ConfigOverrides {
    pub fn apply(self, mut config: AnalysisConfig) -> AnalysisConfig {
        config.na_tokens.extend(self.na_tokens);
        config = config.with_wide_overrides(self.wide);
        if let Some(threshold) = self.correlation_threshold {
            config = config.with_correlation_threshold(threshold);
        }
        if let Some(rows) = self.header_scan_rows {
            config = config.with_header_scan_rows(rows);
        }
        config
    }
}

/// Parses a TOML document; fields it leaves out keep their defaults.
pub fn parse_config(path: &Path, text: &str) -> Result<AnalysisConfig, ConfigError> {
    toml::from_str(text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Builds the validated configuration for a run.
pub fn load_config(
    path: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<AnalysisConfig, ConfigError> {
    let base = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            tracing::debug!(path = %path.display(), "config file loaded");
            parse_config(path, &text)?
        }
        None => AnalysisConfig::default(),
    };
    let config = overrides.apply(base);
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = parse_config(
            Path::new("tabnorm.toml"),
            "correlation_threshold = 0.5\nwide_overrides = [\"gdp.csv\"]\n",
        )
        .unwrap();
        assert_eq!(config.correlation_threshold, 0.5);
        assert!(config.is_wide_override("gdp.csv"));
        assert_eq!(config.header_scan_rows, 20);
        assert!(config.is_na(".."));
    }

    #[test]
    fn test_overrides_win_over_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "correlation_threshold = 0.5").unwrap();
        let overrides = ConfigOverrides {
            wide: vec!["a.csv".to_string()],
            na_tokens: vec!["missing".to_string()],
            correlation_threshold: Some(0.95),
            header_scan_rows: Some(5),
        };
        let config = load_config(Some(file.path()), overrides).unwrap();
        assert_eq!(config.correlation_threshold, 0.95);
        assert_eq!(config.header_scan_rows, 5);
        assert!(config.is_na("Missing"));
        assert!(config.is_na(".."));
        assert!(config.is_wide_override("a.csv"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let overrides = ConfigOverrides {
            header_scan_rows: Some(0),
            ..ConfigOverrides::default()
        };
        assert!(matches!(
            load_config(None, overrides),
            Err(ConfigError::Invalid(ModelError::InvalidConfig {
                field: "header_scan_rows",
                ..
            }))
        ));
    }

    #[test]
    fn test_bad_toml() {
        let err = parse_config(Path::new("bad.toml"), "correlation_threshold = \"high\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().starts_with("failed to parse config file bad.toml"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Some(Path::new("/nonexistent/tabnorm.toml")), ConfigOverrides::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
