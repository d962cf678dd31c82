//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (YAML/JSON)
//! - Command-line arguments, which take precedence

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use clap::ValueEnum;
use reshape_core::{ConvertOptions, Strategy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output settings
    pub output: OutputConfig,

    /// Defaults for the convert command
    pub convert: ConvertConfig,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format (human, json, json-pretty, yaml)
    pub format: String,

    /// Use colored output by default
    pub color: bool,
}

/// Conversion defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Copy subject fields the mapping does not mention
    pub include_all: bool,

    /// Traversal strategy (source_driven or mapping_driven)
    pub strategy: Strategy,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
            color: true,
        }
    }
}

impl OutputConfig {
    /// Parse the configured output format
    pub fn output_format(&self) -> Result<OutputFormat> {
        OutputFormat::from_str(&self.format, true)
            .map_err(|_| Error::config(format!("Unknown output format '{}'", self.format)))
    }
}

impl ConvertConfig {
    /// Conversion options with command-line overrides applied
    pub fn options(&self, include_all: bool, strategy: Option<Strategy>) -> ConvertOptions {
        ConvertOptions::new(strategy.unwrap_or(self.strategy))
            .include_all(include_all || self.include_all)
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;

        let config = if is_yaml(path) {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in &Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(path) {
                    Ok(config) => {
                        tracing::debug!(path = %path.display(), "Loaded configuration");
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to load config");
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            Self::from_file(path)
        } else {
            Self::load()
        }
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".reshape.yaml"),
            PathBuf::from(".reshape.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let reshape_dir = config_dir.join("reshape");
            paths.push(reshape_dir.join("config.yaml"));
            paths.push(reshape_dir.join("config.json"));
        }

        paths
    }
}

/// Whether a path names a YAML file
pub fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s == "yaml" || s == "yml")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.output.output_format().unwrap(), OutputFormat::Human);
        assert!(!config.convert.include_all);
        assert_eq!(config.convert.strategy, Strategy::SourceDriven);
    }

    #[test]
    fn test_yaml_file_with_partial_sections() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "convert:\n  strategy: mapping_driven\noutput:\n  format: json-pretty").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.convert.strategy, Strategy::MappingDriven);
        assert_eq!(config.output.output_format().unwrap(), OutputFormat::JsonPretty);
        assert!(config.output.color);
    }

    #[test]
    fn test_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"convert": {{"include_all": true}}}}"#).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert!(config.convert.include_all);
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file(Path::new("does-not-exist.yaml")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_unknown_output_format() {
        let config = OutputConfig {
            format: "xml".to_string(),
            color: false,
        };
        assert!(matches!(config.output_format(), Err(Error::Config(_))));
    }

    #[test]
    fn test_command_line_overrides() {
        let convert = ConvertConfig {
            include_all: true,
            strategy: Strategy::MappingDriven,
        };

        let options = convert.options(false, None);
        assert!(options.include_all);
        assert_eq!(options.strategy, Strategy::MappingDriven);

        let options = convert.options(false, Some(Strategy::SourceDriven));
        assert_eq!(options.strategy, Strategy::SourceDriven);
    }
}
