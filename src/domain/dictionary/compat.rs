//! Append-only compatibility check between two dictionary versions.
//!
//! A newer dictionary may add projects, classes, commands, trailing
//! arguments and enum members. It may not remove or renumber anything an
//! older peer could still send.

use std::fmt;

use serde::Serialize;

use super::{ArgSpec, Dictionary};
use crate::domain::types::CommandPath;
use crate::domain::version::VersionCode;

/// One break of the append-only rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// Command present in the old dictionary is gone
    RemovedCommand { path: CommandPath, name: String },
    /// Same path now carries a different name
    RenamedCommand {
        path: CommandPath,
        old_name: String,
        new_name: String,
    },
    /// Declared arguments are not an extension of the old ones
    ArgumentsChanged { path: CommandPath, name: String },
    /// Enum member no longer declared
    EnumMemberRemoved { family: String, member: String },
    /// Enum member kept its name but not its value
    EnumMemberRenumbered {
        family: String,
        member: String,
        old_value: i32,
        new_value: i32,
    },
    /// Newer dictionary carries a lower version code
    VersionRegressed { old: VersionCode, new: VersionCode },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::RemovedCommand { path, name } => {
                write!(f, "command {} ({}) was removed", name, path)
            }
            Violation::RenamedCommand {
                path,
                old_name,
                new_name,
            } => write!(f, "command {} was renamed from {} to {}", path, old_name, new_name),
            Violation::ArgumentsChanged { path, name } => {
                write!(f, "arguments of {} ({}) changed", name, path)
            }
            Violation::EnumMemberRemoved { family, member } => {
                write!(f, "enum member {}.{} was removed", family, member)
            }
            Violation::EnumMemberRenumbered {
                family,
                member,
                old_value,
                new_value,
            } => write!(
                f,
                "enum member {}.{} changed value from {} to {}",
                family, member, old_value, new_value
            ),
            Violation::VersionRegressed { old, new } => {
                write!(f, "version went backwards from {} to {}", old, new)
            }
        }
    }
}

/// Result of [`check_compatibility`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompatibilityReport {
    pub violations: Vec<Violation>,
    /// Commands only present in the new dictionary
    pub added_commands: usize,
    /// Enum members only present in the new dictionary
    pub added_enum_members: usize,
}

impl CompatibilityReport {
    pub fn is_compatible(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Check that `new` only appends to `old`.
pub fn check_compatibility(old: &Dictionary, new: &Dictionary) -> CompatibilityReport {
    let mut report = CompatibilityReport::default();

    if new.version() < old.version() {
        report.violations.push(Violation::VersionRegressed {
            old: old.version(),
            new: new.version(),
        });
    }

    for old_cmd in old.commands() {
        let Some(new_cmd) = new.command(old_cmd.path) else {
            report.violations.push(Violation::RemovedCommand {
                path: old_cmd.path,
                name: old_cmd.qualified_name.clone(),
            });
            continue;
        };
        if !old_cmd.qualified_name.eq_ignore_ascii_case(&new_cmd.qualified_name) {
            report.violations.push(Violation::RenamedCommand {
                path: old_cmd.path,
                old_name: old_cmd.qualified_name.clone(),
                new_name: new_cmd.qualified_name.clone(),
            });
        }
        if !args_extend(old, &old_cmd.args, new, &new_cmd.args) {
            report.violations.push(Violation::ArgumentsChanged {
                path: old_cmd.path,
                name: old_cmd.qualified_name.clone(),
            });
        }
    }
    report.added_commands = new
        .commands()
        .filter(|cmd| old.command(cmd.path).is_none())
        .count();

    for old_family in old.enums().families() {
        let Some(new_family) = new.enums().family_by_name(old_family.name()) else {
            for member in old_family.members() {
                report.violations.push(Violation::EnumMemberRemoved {
                    family: old_family.name().to_string(),
                    member: member.name.clone(),
                });
            }
            continue;
        };
        for member in old_family.members() {
            match new_family.member_by_name(&member.name) {
                None => report.violations.push(Violation::EnumMemberRemoved {
                    family: old_family.name().to_string(),
                    member: member.name.clone(),
                }),
                Some(new_member) if new_member.value != member.value => {
                    report.violations.push(Violation::EnumMemberRenumbered {
                        family: old_family.name().to_string(),
                        member: member.name.clone(),
                        old_value: member.value,
                        new_value: new_member.value,
                    })
                }
                Some(_) => {}
            }
        }
        report.added_enum_members += new_family
            .members()
            .iter()
            .filter(|m| old_family.member_by_name(&m.name).is_none())
            .count();
    }

    report
}

/// Old arguments must be a prefix of the new ones, with matching types and enum families.
fn args_extend(old: &Dictionary, old_args: &[ArgSpec], new: &Dictionary, new_args: &[ArgSpec]) -> bool {
    if new_args.len() < old_args.len() {
        return false;
    }
    old_args.iter().zip(new_args).all(|(o, n)| {
        if o.ty != n.ty {
            return false;
        }
        match (o.family, n.family) {
            (Some(of), Some(nf)) => match (old.enums().get(of), new.enums().get(nf)) {
                (Some(of), Some(nf)) => of.name() == nf.name(),
                _ => false,
            },
            (None, None) => true,
            _ => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = r#"
version = "1.0.0.0"
[[project]]
name = "demo"
id = 1
[[project.class]]
name = "State"
id = 0
[[project.class.cmd]]
name = "Mode"
id = 0
[[project.class.cmd.arg]]
name = "mode"
type = "enum"
values = [{ name = "idle" }, { name = "busy" }]
"#;

    fn load(source: &str) -> Dictionary {
        Dictionary::from_toml_str(source).unwrap()
    }

    #[test]
    fn test_identical_dictionaries_are_compatible() {
        let report = check_compatibility(&load(BASE), &load(BASE));
        assert!(report.is_compatible());
        assert_eq!(report.added_commands, 0);
    }

    #[test]
    fn test_appending_is_compatible() {
        let newer = BASE.replace("1.0.0.0", "1.1.0.0").replace(
            r#"values = [{ name = "idle" }, { name = "busy" }]"#,
            r#"values = [{ name = "idle" }, { name = "busy" }, { name = "sleeping" }]
[[project.class.cmd.arg]]
name = "level"
type = "u8"
[[project.class.cmd]]
name = "Extra"
id = 1"#,
        );
        let report = check_compatibility(&load(BASE), &load(&newer));
        assert!(report.is_compatible(), "{:?}", report.violations);
        assert_eq!(report.added_commands, 1);
        assert_eq!(report.added_enum_members, 1);
    }

    #[test]
    fn test_renumbered_member_is_violation() {
        let newer = BASE.replace(r#"{ name = "busy" }"#, r#"{ name = "busy", value = 7 }"#);
        let report = check_compatibility(&load(BASE), &load(&newer));
        assert!(report.violations.iter().any(|v| matches!(
            v,
            Violation::EnumMemberRenumbered { new_value: 7, .. }
        )));
    }

    #[test]
    fn test_removed_command_and_version_regression() {
        let older = BASE.replace("1.0.0.0", "2.0.0.0");
        let newer = r#"
version = "1.5"
[[project]]
name = "demo"
id = 1
"#;
        let report = check_compatibility(&load(&older), &load(newer));
        assert!(!report.is_compatible());
        assert!(report
            .violations
            .iter()
            .any(|v| matches!(v, Violation::VersionRegressed { .. })));
        assert!(report
            .violations
            .iter()
            .any(|v| matches!(v, Violation::RemovedCommand { .. })));
    }

    #[test]
    fn test_changed_argument_type_is_violation() {
        let newer = BASE.replace(
            "name = \"mode\"\ntype = \"enum\"\nvalues = [{ name = \"idle\" }, { name = \"busy\" }]",
            "name = \"mode\"\ntype = \"u8\"",
        );
        let report = check_compatibility(&load(BASE), &load(&newer));
        assert!(report
            .violations
            .iter()
            .any(|v| matches!(v, Violation::ArgumentsChanged { .. })));
    }
}
