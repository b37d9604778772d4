//! Configuration service for loading and generating config files.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::types::default_log_path_for_config_dir;
use super::Config;

/// Configuration service.
pub struct ConfigService;

impl ConfigService {
    /// Get the default configuration file path.
    /// Always uses ~/.config/arcommands/config.toml for cross-platform consistency.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("arcommands")
            .join("config.toml")
    }

    /// Load configuration from file.
    ///
    /// If `path` is `None`, uses the default path.
    /// If the file doesn't exist, creates default configuration file.
    /// Validates configuration after loading.
    /// Log path defaults to the same directory as config file.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let path = path.map(PathBuf::from).unwrap_or_else(Self::default_path);
        let config_dir = path.parent();

        if !path.exists() {
            // Create default config file
            Self::generate_at(&path)?;
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        // If log_path was not explicitly set in config, use config file directory
        // Check if log_path matches the general default (meaning it wasn't set in file)
        let general_default = default_log_path_for_config_dir(None);
        if config.log_path == general_default {
            config.log_path = default_log_path_for_config_dir(config_dir);
        }

        // A relative dictionary path is relative to the config file
        if let (Some(dictionary), Some(dir)) = (config.dictionary.as_mut(), config_dir) {
            if dictionary.is_relative() && !dictionary.as_os_str().is_empty() {
                *dictionary = dir.join(&*dictionary);
            }
        }

        // Validate configuration
        config
            .validate()
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;

        Ok(config)
    }

    /// Generate default configuration file at the default path.
    pub fn generate_default() -> Result<()> {
        Self::generate_at(&Self::default_path())
    }

    /// Generate default configuration file at the specified path.
    pub fn generate_at(path: &Path) -> Result<()> {
        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = Self::default_config_content();
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Generate default configuration content with comments.
    pub fn default_config_content() -> String {
        r#"# arcommands configuration file

# Enable debug logging to file (default: false)
debug = false

# Path to log directory (default: same directory as config.toml/logs)
# If --config is specified, logs go to that directory/logs
# log_path = "~/.config/arcommands/logs"

# Command dictionary (default: builtin dictionary)
# dictionary = "/path/to/arsdk.toml"

# Reject frames whose path is not in the dictionary instead of
# reporting them as unknown commands (default: false)
strict_paths = false

# Output format: "text" or "json" (default: "text")
output = "text"

# Command filter
# Lookups use the most specific rule: command, then class, then project,
# then the default.
[filter]
default = "allowed"

# Block every piloting command of ardrone3...
# [[filter.rules]]
# path = "ardrone3.Piloting"
# behavior = "blocked"

# ...except landing
# [[filter.rules]]
# path = "ardrone3.Piloting.Landing"
# behavior = "allowed"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("arcommands-config-{}-{}", name, std::process::id()))
            .join("config.toml")
    }

    #[test]
    fn test_default_content_is_valid() {
        let config: Config = toml::from_str(&ConfigService::default_config_content()).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_creates_missing_file() {
        let path = temp_config("create");
        let _ = fs::remove_file(&path);
        let config = ConfigService::load(Some(&path)).unwrap();
        assert!(path.exists());
        assert_eq!(config.log_path, path.parent().unwrap().join("logs"));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_load_rejects_invalid_rule() {
        let path = temp_config("invalid");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            "[[filter.rules]]\npath = \"a.b.c.d\"\nbehavior = \"blocked\"\n",
        )
        .unwrap();
        let err = ConfigService::load(Some(&path)).unwrap_err();
        assert!(format!("{:#}", err).contains("invalid path"));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
