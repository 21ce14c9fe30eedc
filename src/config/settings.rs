//! Loader for the depscope run configuration.
//!
//! The configuration is a flat JSON record. All fields except
//! `filter_substring` are required; validation rejects records that
//! deserialize cleanly but are semantically unusable (e.g. a blank
//! package name).

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors that can occur while loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// The file is not valid JSON or is missing a required field.
    #[error("Invalid config: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The record deserialized but a field value is unusable.
    #[error("Invalid config value for '{field}': {reason}")]
    InvalidValue {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// A parsed run configuration.
///
/// # Example
///
/// ```
/// use depscope::config::parse_str;
///
/// let json = r#"{
///     "package_name": "A",
///     "repo_url": "deps.txt",
///     "test_mode": true,
///     "output_file": "out.svg",
///     "filter_substring": "test"
/// }"#;
///
/// let config = parse_str(json).unwrap();
/// assert!(config.test_mode);
/// assert_eq!(config.filter_substring, "test");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root package whose dependency graph is resolved.
    pub package_name: String,

    /// Package index base URL, or a stub repository file path in test mode.
    pub repo_url: String,

    /// When true, `repo_url` is treated as a local stub repository file.
    pub test_mode: bool,

    /// Diagram output filename; the D2 description is written next to it.
    pub output_file: String,

    /// Case-insensitive substring excluding matching packages from the
    /// graph. Empty means filtering is disabled.
    #[serde(default)]
    pub filter_substring: String,
}

impl Config {
    /// Validates field values beyond what deserialization enforces.
    fn validate(&self) -> ConfigResult<()> {
        if self.package_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "package_name",
                reason: "must not be empty".to_string(),
            });
        }
        if self.repo_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "repo_url",
                reason: "must not be empty".to_string(),
            });
        }
        if self.output_file.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "output_file",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Configuration parameters:")?;
        writeln!(f, "  package_name: {}", self.package_name)?;
        writeln!(f, "  repo_url: {}", self.repo_url)?;
        writeln!(f, "  test_mode: {}", self.test_mode)?;
        writeln!(f, "  output_file: {}", self.output_file)?;
        write!(f, "  filter_substring: {}", self.filter_substring)
    }
}

/// Loads and validates a configuration from a file path.
///
/// # Arguments
///
/// * `path` - Path to the JSON configuration file
///
/// # Returns
///
/// A `ConfigResult` containing the validated `Config` or an error.
pub fn load_file(path: &Path) -> ConfigResult<Config> {
    let content = fs::read_to_string(path)?;
    parse_str(&content)
}

/// Parses and validates a configuration from a JSON string.
///
/// # Arguments
///
/// * `content` - JSON string content of the configuration
///
/// # Returns
///
/// A `ConfigResult` containing the validated `Config` or an error.
///
/// # Example
///
/// ```
/// use depscope::config::parse_str;
///
/// let result = parse_str(r#"{"package_name": "requests"}"#);
/// assert!(result.is_err()); // missing required fields
/// ```
pub fn parse_str(content: &str) -> ConfigResult<Config> {
    let config: Config = serde_json::from_str(content)?;
    config.validate()?;
    Ok(config)
}
