//! Building a filter from the `[filter]` configuration section.

use tracing::{debug, info};

use super::CommandFilter;
use crate::config::FilterConfig;
use crate::domain::dictionary::Dictionary;
use crate::domain::error::FilterError;

impl CommandFilter {
    /// Build a filter from configured rules, resolving names against `dictionary`.
    ///
    /// Rules are applied in file order; since lookups always prefer the most
    /// specific override, order only matters between rules on the same name.
    pub fn from_config(config: &FilterConfig, dictionary: &Dictionary) -> Result<Self, FilterError> {
        let mut filter = CommandFilter::with_default(config.default);
        for rule in &config.rules {
            let selector = filter.set_behavior_by_name(dictionary, &rule.path, rule.behavior)?;
            debug!("Filter rule {} ({}) = {}", rule.path, selector, rule.behavior);
        }
        info!(
            "Filter built: default {}, {} rules",
            config.default,
            config.rules.len()
        );
        Ok(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterRule;
    use crate::domain::error::DictionaryError;
    use crate::domain::filters::{FilterBehavior, FilterStatus};
    use crate::domain::types::CommandPath;

    fn rule(path: &str, behavior: FilterBehavior) -> FilterRule {
        FilterRule {
            path: path.to_string(),
            behavior,
        }
    }

    #[test]
    fn test_from_config() {
        let dictionary = Dictionary::builtin().unwrap();
        let config = FilterConfig {
            default: FilterBehavior::Blocked,
            rules: vec![
                rule("common", FilterBehavior::Allowed),
                rule("ardrone3.PilotingState", FilterBehavior::Allowed),
                rule("ardrone3.PilotingState.AttitudeChanged", FilterBehavior::Blocked),
            ],
        };
        let filter = CommandFilter::from_config(&config, &dictionary).unwrap();
        assert_eq!(filter.evaluate(CommandPath::new(0, 4, 3)), FilterStatus::Allowed);
        assert_eq!(filter.evaluate(CommandPath::new(1, 4, 1)), FilterStatus::Allowed);
        assert_eq!(filter.evaluate(CommandPath::new(1, 4, 6)), FilterStatus::Blocked);
        assert_eq!(filter.evaluate(CommandPath::new(1, 0, 2)), FilterStatus::Blocked);
    }

    #[test]
    fn test_from_config_unknown_name() {
        let dictionary = Dictionary::builtin().unwrap();
        let config = FilterConfig {
            default: FilterBehavior::Allowed,
            rules: vec![rule("ardrone4", FilterBehavior::Blocked)],
        };
        assert_eq!(
            CommandFilter::from_config(&config, &dictionary).unwrap_err(),
            FilterError::Dictionary(DictionaryError::UnknownCommand("ardrone4".to_string()))
        );
    }
}
