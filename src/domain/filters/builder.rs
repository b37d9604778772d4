//! Setters used to populate a command filter.

use tracing::debug;

use super::{CommandFilter, FilterBehavior, FilterStatus};
use crate::domain::dictionary::Dictionary;
use crate::domain::error::FilterError;
use crate::domain::types::{CommandPath, PathSelector};

impl CommandFilter {
    /// Set the behavior of a project, a class or a single command.
    pub fn set_behavior(
        &mut self,
        selector: impl Into<PathSelector>,
        behavior: FilterBehavior,
    ) -> Result<(), FilterError> {
        let selector = selector.into();
        self.table_mut()?.set(selector, behavior);
        debug!("Filter override {} = {}", selector, behavior);
        Ok(())
    }

    /// Like [`CommandFilter::set_behavior`], for a status coming from outside.
    ///
    /// Only `Allowed` and `Blocked` can be stored.
    pub fn set_status(
        &mut self,
        selector: impl Into<PathSelector>,
        status: FilterStatus,
    ) -> Result<(), FilterError> {
        let table = self.table_mut()?;
        table.set(selector.into(), FilterBehavior::try_from(status)?);
        Ok(())
    }

    /// Set the behavior of every command of `project`.
    pub fn set_project_behavior(&mut self, project: u8, behavior: FilterBehavior) -> Result<(), FilterError> {
        self.set_behavior(PathSelector::project(project), behavior)
    }

    /// Set the behavior of every command of `project.class`.
    pub fn set_class_behavior(
        &mut self,
        project: u8,
        class: u8,
        behavior: FilterBehavior,
    ) -> Result<(), FilterError> {
        self.set_behavior(PathSelector::class(project, class), behavior)
    }

    pub fn set_command_behavior(&mut self, path: CommandPath, behavior: FilterBehavior) -> Result<(), FilterError> {
        self.set_behavior(PathSelector::Command(path), behavior)
    }

    /// Drop the override of `selector`, if any.
    pub fn clear_behavior(
        &mut self,
        selector: impl Into<PathSelector>,
    ) -> Result<Option<FilterBehavior>, FilterError> {
        Ok(self.table_mut()?.clear(selector.into()))
    }

    /// Set a behavior by name: `project`, `project.Class` or `project.Class.Command`.
    pub fn set_behavior_by_name(
        &mut self,
        dictionary: &Dictionary,
        name: &str,
        behavior: FilterBehavior,
    ) -> Result<PathSelector, FilterError> {
        // Misuse of an unusable filter is reported before name errors
        self.table()?;
        let selector = dictionary.resolve_selector(name)?;
        self.set_behavior(selector, behavior)?;
        Ok(selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::DictionaryError;

    #[test]
    fn test_wildcard_precedence() {
        let mut filter = CommandFilter::new(FilterStatus::Allowed);
        filter.set_project_behavior(1, FilterBehavior::Blocked).unwrap();
        filter.set_class_behavior(1, 5, FilterBehavior::Allowed).unwrap();
        filter
            .set_command_behavior(CommandPath::new(1, 5, 20), FilterBehavior::Blocked)
            .unwrap();

        assert_eq!(filter.evaluate(CommandPath::new(1, 5, 20)), FilterStatus::Blocked);
        assert_eq!(filter.evaluate(CommandPath::new(1, 5, 21)), FilterStatus::Allowed);
        assert_eq!(filter.evaluate(CommandPath::new(1, 6, 0)), FilterStatus::Blocked);
        assert_eq!(filter.evaluate(CommandPath::new(2, 0, 0)), FilterStatus::Allowed);
    }

    #[test]
    fn test_setters_on_unusable_filter() {
        let mut filter = CommandFilter::new(FilterStatus::Error);
        assert_eq!(
            filter.set_project_behavior(1, FilterBehavior::Blocked),
            Err(FilterError::BadFilter)
        );
        assert_eq!(
            filter.clear_behavior(PathSelector::project(1)),
            Err(FilterError::BadFilter)
        );
        let dictionary = Dictionary::builtin().unwrap();
        assert_eq!(
            filter.set_behavior_by_name(&dictionary, "nope", FilterBehavior::Blocked),
            Err(FilterError::BadFilter)
        );
    }

    #[test]
    fn test_set_status_rejects_unknown() {
        let mut filter = CommandFilter::default();
        assert_eq!(
            filter.set_status(PathSelector::project(1), FilterStatus::Unknown),
            Err(FilterError::InvalidBehavior(FilterStatus::Unknown))
        );
        filter
            .set_status(PathSelector::project(1), FilterStatus::Blocked)
            .unwrap();
        assert_eq!(filter.evaluate(CommandPath::new(1, 9, 9)), FilterStatus::Blocked);
    }

    #[test]
    fn test_set_behavior_by_name() {
        let dictionary = Dictionary::builtin().unwrap();
        let mut filter = CommandFilter::default();
        let selector = filter
            .set_behavior_by_name(&dictionary, "ardrone3.Piloting", FilterBehavior::Blocked)
            .unwrap();
        assert_eq!(selector, PathSelector::class(1, 0));
        assert_eq!(filter.evaluate(CommandPath::new(1, 0, 1)), FilterStatus::Blocked);

        let err = filter
            .set_behavior_by_name(&dictionary, "ardrone3.Piloting.Barrel", FilterBehavior::Blocked)
            .unwrap_err();
        assert_eq!(
            err,
            FilterError::Dictionary(DictionaryError::UnknownCommand(
                "ardrone3.Piloting.Barrel".to_string()
            ))
        );
    }
}
