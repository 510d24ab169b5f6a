use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::parser::PROGRESS_BATCH_SIZE;

/// Viewer tuning: extents are in terminal rows, buffers in item counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewerConfig {
    /// Rows each message card occupies
    #[serde(default = "default_row_extent")]
    pub row_extent: usize,

    /// Extra items rendered above and below the viewport
    #[serde(default = "default_buffer_items")]
    pub buffer_items: usize,
}

fn default_row_extent() -> usize {
    5
}

fn default_buffer_items() -> usize {
    15
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self { row_extent: default_row_extent(), buffer_items: default_buffer_items() }
    }
}

/// Parser tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParserConfig {
    /// Lines between progress reports and cooperative yields
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_batch_size() -> usize {
    PROGRESS_BATCH_SIZE
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self { batch_size: default_batch_size() }
    }
}

/// Logging section as written in `chatlens.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// Default log level for stderr output
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: "pretty", "json", or "compact"
    #[serde(default = "default_log_format")]
    pub format: String,

    /// File logging
    #[serde(default)]
    pub file: FileLoggingSection,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: FileLoggingSection::default(),
        }
    }
}

/// File logging sub-section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileLoggingSection {
    /// Write JSON logs to the log directory
    #[serde(default)]
    pub enabled: bool,
}

/// Top-level chatlens configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub viewer: ViewerConfig,

    #[serde(default)]
    pub parser: ParserConfig,

    #[serde(default)]
    pub logging: LoggingSection,
}

impl Config {
    /// Load configuration from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(toml_str).map_err(|e| crate::Error::Config(format!("TOML parse error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        use crate::Error;

        if self.viewer.row_extent == 0 {
            return Err(Error::Config(ConfigError::ZeroExtent("viewer.row_extent").to_string()));
        }

        if self.parser.batch_size == 0 {
            return Err(Error::Config(ConfigError::ZeroExtent("parser.batch_size").to_string()));
        }

        Ok(())
    }

    /// Get example configuration (as a string)
    pub fn example() -> &'static str {
        r#"# chatlens configuration example
# Copy this file to chatlens.toml and customize as needed

[viewer]
# Terminal rows each message card occupies
row_extent = 5
# Extra items rendered above and below the viewport to mask pop-in
buffer_items = 15

[parser]
# Lines between progress reports while parsing large exports
batch_size = 5000

[logging]
# Log level for stderr: "error", "warn", "info", "debug", "trace"
level = "warn"
# Output format: "pretty", "json", or "compact"
format = "pretty"

[logging.file]
# Also write JSON logs to ~/.chatlens/logs/
enabled = false
"#
    }
}

/// Configuration-specific errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A size or extent that must be positive was zero
    #[error("{0} must be at least 1")]
    ZeroExtent(&'static str),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::TomlParse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.viewer.row_extent, 5);
        assert_eq!(config.viewer.buffer_items, 15);
        assert_eq!(config.parser.batch_size, 5000);
        assert!(!config.logging.file.enabled);
    }

    #[test]
    fn test_example_config_parses() {
        let config = Config::from_toml_str(Config::example()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::from_toml_str(
            r#"
[viewer]
row_extent = 7
"#,
        )
        .unwrap();

        assert_eq!(config.viewer.row_extent, 7);
        assert_eq!(config.viewer.buffer_items, 15);
        assert_eq!(config.parser.batch_size, 5000);
    }

    #[test]
    fn test_zero_row_extent_rejected() {
        let result = Config::from_toml_str(
            r#"
[viewer]
row_extent = 0
"#,
        );

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("row_extent"));
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let result = Config::from_toml_str(
            r#"
[parser]
batch_size = 0
"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = Config::from_toml_str(
            r#"
[viewer]
row_height = 5
"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chatlens.toml");
        std::fs::write(&path, Config::example()).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_from_missing_file_is_io_error() {
        let result = Config::from_file(Path::new("/nonexistent/chatlens.toml"));
        assert!(matches!(result, Err(crate::Error::Io(_))));
    }
}
