//! Configuration validation.

use anyhow::{bail, Result};
use regex::Regex;
use std::collections::HashSet;

use super::Config;

/// Shape of a filter rule path: one to three dotted identifiers.
const RULE_PATH_PATTERN: &str = r"^[A-Za-z][A-Za-z0-9_]*(\.[A-Za-z][A-Za-z0-9_]*){0,2}$";

/// Validate configuration.
///
/// Rule names are only checked for shape here; they are resolved against
/// the dictionary when the filter is built.
pub fn validate(config: &Config) -> Result<()> {
    if config.log_path.to_string_lossy().contains('\0') {
        bail!("Invalid log_path: contains null character");
    }

    if let Some(dictionary) = &config.dictionary {
        if dictionary.as_os_str().is_empty() {
            bail!("dictionary: path cannot be empty");
        }
        if dictionary.to_string_lossy().contains('\0') {
            bail!("Invalid dictionary path: contains null character");
        }
    }

    let rule_path = Regex::new(RULE_PATH_PATTERN)?;
    let mut seen = HashSet::new();
    for (i, rule) in config.filter.rules.iter().enumerate() {
        if rule.path.is_empty() {
            bail!("filter.rules[{}]: path cannot be empty", i);
        }
        if !rule_path.is_match(&rule.path) {
            bail!(
                "filter.rules[{}]: invalid path '{}' (expected project, project.Class or project.Class.Command)",
                i,
                rule.path
            );
        }
        if !seen.insert(rule.path.to_lowercase()) {
            bail!("filter.rules[{}]: duplicate path '{}'", i, rule.path);
        }
    }

    Ok(())
}
