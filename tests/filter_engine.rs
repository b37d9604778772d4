//! Filter engine tests against the builtin dictionary.

use arcommands::config::{FilterConfig, FilterRule};
use arcommands::domain::{
    CommandFilter, CommandPath, Dictionary, FilterBehavior, FilterError, FilterStatus, PathSelector,
};

const TAKE_OFF: CommandPath = CommandPath::new(1, 0, 1);
const LANDING: CommandPath = CommandPath::new(1, 0, 3);
const FLYING_STATE: CommandPath = CommandPath::new(1, 4, 1);
const ALL_STATES: CommandPath = CommandPath::new(0, 4, 0);

#[test]
fn test_most_specific_override_wins() {
    let mut filter = CommandFilter::new(FilterStatus::Blocked);
    filter.set_project_behavior(1, FilterBehavior::Allowed).unwrap();
    filter.set_class_behavior(1, 0, FilterBehavior::Blocked).unwrap();
    filter.set_command_behavior(LANDING, FilterBehavior::Allowed).unwrap();

    assert_eq!(filter.evaluate(LANDING), FilterStatus::Allowed);
    assert_eq!(filter.evaluate(TAKE_OFF), FilterStatus::Blocked);
    assert_eq!(filter.evaluate(FLYING_STATE), FilterStatus::Allowed);
    assert_eq!(filter.evaluate(ALL_STATES), FilterStatus::Blocked);
}

#[test]
fn test_wildcard_precedence() {
    for default in [FilterBehavior::Allowed, FilterBehavior::Blocked] {
        let mut filter = CommandFilter::with_default(default);
        filter.set_project_behavior(1, FilterBehavior::Blocked).unwrap();
        filter.set_class_behavior(1, 5, FilterBehavior::Allowed).unwrap();
        filter
            .set_command_behavior(CommandPath::new(1, 5, 20), FilterBehavior::Blocked)
            .unwrap();

        assert_eq!(filter.evaluate(CommandPath::new(1, 5, 20)), FilterStatus::Blocked);
        assert_eq!(filter.evaluate(CommandPath::new(1, 5, 21)), FilterStatus::Allowed);
        assert_eq!(filter.evaluate(CommandPath::new(1, 6, 0)), FilterStatus::Blocked);
        assert_eq!(filter.evaluate(CommandPath::new(2, 0, 0)), FilterStatus::from(default));
        // Evaluation does not change the table
        assert_eq!(filter.evaluate(CommandPath::new(1, 5, 21)), FilterStatus::Allowed);
    }
}

#[test]
fn test_insertion_order_does_not_matter() {
    let mut filter = CommandFilter::new(FilterStatus::Allowed);
    filter.set_command_behavior(LANDING, FilterBehavior::Allowed).unwrap();
    filter.set_project_behavior(1, FilterBehavior::Blocked).unwrap();

    assert_eq!(filter.evaluate(LANDING), FilterStatus::Allowed);
    assert_eq!(filter.evaluate(TAKE_OFF), FilterStatus::Blocked);
}

#[test]
fn test_later_setting_replaces_earlier() {
    let mut filter = CommandFilter::default();
    filter.set_class_behavior(1, 0, FilterBehavior::Blocked).unwrap();
    filter.set_class_behavior(1, 0, FilterBehavior::Allowed).unwrap();

    assert_eq!(filter.evaluate(TAKE_OFF), FilterStatus::Allowed);
    assert_eq!(filter.table().unwrap().len(), 1);
}

#[test]
fn test_clear_falls_back_to_wider_selector() {
    let mut filter = CommandFilter::new(FilterStatus::Allowed);
    filter.set_project_behavior(1, FilterBehavior::Blocked).unwrap();
    filter.set_command_behavior(TAKE_OFF, FilterBehavior::Allowed).unwrap();
    assert_eq!(filter.evaluate(TAKE_OFF), FilterStatus::Allowed);

    let removed = filter.clear_behavior(TAKE_OFF).unwrap();
    assert_eq!(removed, Some(FilterBehavior::Allowed));
    assert_eq!(filter.evaluate(TAKE_OFF), FilterStatus::Blocked);
    assert_eq!(filter.clear_behavior(TAKE_OFF).unwrap(), None);
}

#[test]
fn test_filter_command_reads_header_only() {
    let mut filter = CommandFilter::new(FilterStatus::Allowed);
    filter.set_command_behavior(TAKE_OFF, FilterBehavior::Blocked).unwrap();

    // Trailing garbage is never parsed
    assert_eq!(filter.filter_command(&[1, 0, 1, 0, 0xff, 0xff]), FilterStatus::Blocked);
    assert_eq!(filter.filter_command(&[1, 0, 3, 0]), FilterStatus::Allowed);
    assert_eq!(filter.filter_command(&[1, 0]), FilterStatus::Error);
}

#[test]
fn test_unknown_paths_follow_default() {
    let filter = CommandFilter::new(FilterStatus::Blocked);
    assert_eq!(filter.evaluate(CommandPath::new(200, 9, 999)), FilterStatus::Blocked);
}

#[test]
fn test_invalid_default_makes_unusable_filter() {
    for status in [FilterStatus::Unknown, FilterStatus::Error] {
        let mut filter = CommandFilter::new(status);
        assert!(!filter.is_valid());
        assert_eq!(filter.evaluate(TAKE_OFF), FilterStatus::Error);
        assert_eq!(filter.try_evaluate(TAKE_OFF), Err(FilterError::BadFilter));
        assert_eq!(
            filter.set_project_behavior(1, FilterBehavior::Allowed),
            Err(FilterError::BadFilter)
        );
        assert_eq!(filter.dispose(), Err(FilterError::BadFilter));
    }
}

#[test]
fn test_storing_non_behavior_status_is_rejected() {
    let mut filter = CommandFilter::default();
    assert_eq!(
        filter.set_status(TAKE_OFF, FilterStatus::Unknown),
        Err(FilterError::InvalidBehavior(FilterStatus::Unknown))
    );
    assert!(filter.table().unwrap().is_empty());

    filter.set_status(TAKE_OFF, FilterStatus::Blocked).unwrap();
    assert_eq!(filter.evaluate(TAKE_OFF), FilterStatus::Blocked);
}

#[test]
fn test_dispose_only_once() {
    let mut filter = CommandFilter::default();
    filter.set_project_behavior(0, FilterBehavior::Blocked).unwrap();

    assert_eq!(filter.dispose(), Ok(()));
    assert!(!filter.is_valid());
    assert_eq!(filter.dispose(), Err(FilterError::BadFilter));
    assert_eq!(filter.evaluate(ALL_STATES), FilterStatus::Error);
    assert!(filter.table().is_err());
}

#[test]
fn test_set_behavior_by_name() {
    let dictionary = Dictionary::builtin().unwrap();
    let mut filter = CommandFilter::default();

    let selector = filter
        .set_behavior_by_name(&dictionary, "ARDRONE3.piloting", FilterBehavior::Blocked)
        .unwrap();
    assert_eq!(selector, PathSelector::class(1, 0));
    assert_eq!(filter.evaluate(TAKE_OFF), FilterStatus::Blocked);

    let err = filter
        .set_behavior_by_name(&dictionary, "ardrone3.Nope", FilterBehavior::Blocked)
        .unwrap_err();
    assert!(matches!(err, FilterError::Dictionary(_)));
}

#[test]
fn test_set_behavior_by_name_on_disposed_filter() {
    let dictionary = Dictionary::builtin().unwrap();
    let mut filter = CommandFilter::default();
    filter.dispose().unwrap();

    // Reported as misuse, even for a name that does not resolve
    assert_eq!(
        filter.set_behavior_by_name(&dictionary, "nothing.here", FilterBehavior::Allowed),
        Err(FilterError::BadFilter)
    );
}

#[test]
fn test_from_config() {
    let dictionary = Dictionary::builtin().unwrap();
    let config = FilterConfig {
        default: FilterBehavior::Blocked,
        rules: vec![
            FilterRule {
                path: "common".to_string(),
                behavior: FilterBehavior::Allowed,
            },
            FilterRule {
                path: "ardrone3.PilotingState".to_string(),
                behavior: FilterBehavior::Allowed,
            },
            FilterRule {
                path: "common.Common.Reboot".to_string(),
                behavior: FilterBehavior::Blocked,
            },
        ],
    };
    let filter = CommandFilter::from_config(&config, &dictionary).unwrap();

    assert_eq!(filter.evaluate(ALL_STATES), FilterStatus::Allowed);
    assert_eq!(filter.evaluate(CommandPath::new(0, 4, 3)), FilterStatus::Blocked);
    assert_eq!(filter.evaluate(FLYING_STATE), FilterStatus::Allowed);
    assert_eq!(filter.evaluate(TAKE_OFF), FilterStatus::Blocked);

    let overrides = filter.table().unwrap().overrides();
    assert_eq!(overrides.len(), 3);
}

#[test]
fn test_from_config_unknown_name() {
    let dictionary = Dictionary::builtin().unwrap();
    let config = FilterConfig {
        default: FilterBehavior::Allowed,
        rules: vec![FilterRule {
            path: "jumpingsumo.Flying".to_string(),
            behavior: FilterBehavior::Blocked,
        }],
    };
    assert!(CommandFilter::from_config(&config, &dictionary).is_err());
}
