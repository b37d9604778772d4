//! Configuration data types.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::validation;
use crate::domain::codec::DecodePolicy;
use crate::domain::filters::FilterBehavior;

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Enable debug logging to file
    pub debug: bool,

    /// Path to log directory
    pub log_path: PathBuf,

    /// Dictionary file; the builtin dictionary when unset
    pub dictionary: Option<PathBuf>,

    /// Reject frames whose path is not in the dictionary
    pub strict_paths: bool,

    /// Default output format
    pub output: OutputFormat,

    /// Command filter
    pub filter: FilterConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            log_path: default_log_path(),
            dictionary: None,
            strict_paths: false,
            output: OutputFormat::default(),
            filter: FilterConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration and return errors if invalid.
    /// Delegates to the comprehensive validation module.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }

    pub fn decode_policy(&self) -> DecodePolicy {
        if self.strict_paths {
            DecodePolicy::Strict
        } else {
            DecodePolicy::Lenient
        }
    }
}

/// Output format of the CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable lines (default)
    #[default]
    Text,
    /// One JSON object per result
    Json,
}

/// Command filter configuration.
///
/// ```toml
/// [filter]
/// default = "allowed"
///
/// [[filter.rules]]
/// path = "ardrone3.Piloting"
/// behavior = "blocked"
///
/// [[filter.rules]]
/// path = "ardrone3.Piloting.Landing"
/// behavior = "allowed"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Behavior of commands no rule covers
    pub default: FilterBehavior,

    /// Overrides by `project`, `project.Class` or `project.Class.Command`
    pub rules: Vec<FilterRule>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            default: FilterBehavior::Allowed,
            rules: Vec::new(),
        }
    }
}

/// One filter override.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterRule {
    /// Dotted name of a project, class or command
    pub path: String,

    pub behavior: FilterBehavior,
}

/// Get default log path (relative to config directory).
/// This returns a placeholder; the actual path is set by ConfigService based on config file location.
pub fn default_log_path() -> PathBuf {
    default_log_path_for_config_dir(None)
}

/// Get log path based on config directory.
pub fn default_log_path_for_config_dir(config_dir: Option<&Path>) -> PathBuf {
    config_dir
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config")
                .join("arcommands")
        })
        .join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(!config.debug);
        assert!(config.dictionary.is_none());
        assert_eq!(config.output, OutputFormat::Text);
        assert_eq!(config.filter.default, FilterBehavior::Allowed);
        assert_eq!(config.decode_policy(), DecodePolicy::Lenient);
    }

    #[test]
    fn test_filter_section() {
        let config: Config = toml::from_str(
            r#"
strict_paths = true
output = "json"

[filter]
default = "blocked"

[[filter.rules]]
path = "common"
behavior = "allowed"
"#,
        )
        .unwrap();
        assert_eq!(config.decode_policy(), DecodePolicy::Strict);
        assert_eq!(config.output, OutputFormat::Json);
        assert_eq!(config.filter.default, FilterBehavior::Blocked);
        assert_eq!(config.filter.rules[0].path, "common");
    }

    #[test]
    fn test_invalid_behavior_rejected() {
        let result = toml::from_str::<Config>(
            r#"
[filter]
default = "error"
"#,
        );
        assert!(result.is_err());
    }
}
