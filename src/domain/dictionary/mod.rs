//! Command dictionary: the identifier space of projects, classes, commands
//! and enums, loaded once from a TOML source.
//!
//! The dictionary is append-only across releases: a numeric path or enum
//! value, once published, keeps its meaning forever. See [`compat`] for the
//! checker that enforces this between two dictionary versions.

pub mod compat;
mod model;
mod registry;

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info};

use super::error::DictionaryError;
use super::types::{ArgType, CommandPath, PathSelector};
use super::version::VersionCode;

pub use model::DictionarySource;
pub use registry::{
    EnumFamily, EnumMember, EnumRegistry, FamilyId, UNKNOWN_ENUM_VALUE, UNKNOWN_MEMBER_NAME,
};

/// Dictionary shipped with the crate.
const BUILTIN_DICTIONARY: &str = include_str!("../../../dictionary/arsdk.toml");

fn identifier_regex() -> &'static Regex {
    static IDENTIFIER: OnceLock<Regex> = OnceLock::new();
    IDENTIFIER.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("identifier pattern is valid")
    })
}

/// Declared argument of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgSpec {
    pub name: String,
    pub ty: ArgType,
    /// Family of an `enum` argument
    pub family: Option<FamilyId>,
    pub comment: Option<String>,
}

/// Dictionary entry for one command or event.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub path: CommandPath,
    pub name: String,
    /// `project.Class.Command`
    pub qualified_name: String,
    pub args: Vec<ArgSpec>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone)]
struct ProjectInfo {
    name: String,
}

#[derive(Debug, Clone)]
struct ClassInfo {
    name: String,
}

/// The loaded, validated dictionary. Immutable once built.
#[derive(Debug, Clone)]
pub struct Dictionary {
    version: VersionCode,
    projects: HashMap<u8, ProjectInfo>,
    classes: HashMap<(u8, u8), ClassInfo>,
    commands: HashMap<CommandPath, CommandSpec>,
    order: Vec<CommandPath>,
    selectors: HashMap<String, PathSelector>,
    enums: EnumRegistry,
}

impl Dictionary {
    /// Load the dictionary compiled into the crate.
    pub fn builtin() -> Result<Self, DictionaryError> {
        Self::from_toml_str(BUILTIN_DICTIONARY)
    }

    /// Load a dictionary file.
    pub fn from_path(path: &Path) -> Result<Self, DictionaryError> {
        let content = fs::read_to_string(path).map_err(|e| DictionaryError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let dictionary = Self::from_toml_str(&content)?;
        info!(
            "Loaded dictionary {} (version {}, {} commands)",
            path.display(),
            dictionary.version,
            dictionary.len()
        );
        Ok(dictionary)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, DictionaryError> {
        let source: DictionarySource =
            toml::from_str(content).map_err(|e| DictionaryError::Parse(e.to_string()))?;
        Self::from_source(source)
    }

    /// Validate a parsed source and build the lookup tables.
    pub fn from_source(source: DictionarySource) -> Result<Self, DictionaryError> {
        let mut dictionary = Dictionary {
            version: source
                .version
                .as_deref()
                .map(VersionCode::parse)
                .unwrap_or_default(),
            projects: HashMap::new(),
            classes: HashMap::new(),
            commands: HashMap::new(),
            order: Vec::new(),
            selectors: HashMap::new(),
            enums: EnumRegistry::new(),
        };

        for project in &source.projects {
            check_identifier(&project.name, "project")?;
            if dictionary.projects.contains_key(&project.id) {
                return Err(duplicate("project id", project.id, "dictionary"));
            }
            dictionary.add_selector(&project.name, PathSelector::project(project.id))?;
            dictionary.projects.insert(
                project.id,
                ProjectInfo {
                    name: project.name.clone(),
                },
            );

            let mut shared_enums = HashMap::new();
            for source_enum in &project.enums {
                check_identifier(&source_enum.name, &project.name)?;
                let family_name = format!("{}_{}", project.name, source_enum.name).to_uppercase();
                let id = dictionary
                    .enums
                    .insert(&family_name, model::number_members(&source_enum.values))?;
                shared_enums.insert(source_enum.name.to_lowercase(), id);
            }

            for class in &project.classes {
                let class_context = format!("{}.{}", project.name, class.name);
                check_identifier(&class.name, &project.name)?;
                if dictionary.classes.contains_key(&(project.id, class.id)) {
                    return Err(duplicate("class id", class.id, &project.name));
                }
                dictionary.add_selector(&class_context, PathSelector::class(project.id, class.id))?;
                dictionary.classes.insert(
                    (project.id, class.id),
                    ClassInfo {
                        name: class.name.clone(),
                    },
                );

                for command in &class.commands {
                    check_identifier(&command.name, &class_context)?;
                    let path = CommandPath::new(project.id, class.id, command.id);
                    if dictionary.commands.contains_key(&path) {
                        return Err(duplicate("command id", command.id, &class_context));
                    }
                    let qualified_name = format!("{}.{}", class_context, command.name);
                    dictionary.add_selector(&qualified_name, PathSelector::Command(path))?;

                    let mut args = Vec::with_capacity(command.args.len());
                    for arg in &command.args {
                        check_identifier(&arg.name, &qualified_name)?;
                        let family = dictionary.arg_family(
                            &qualified_name,
                            arg,
                            &shared_enums,
                            &format!("{}_{}_{}_{}", project.name, class.name, command.name, arg.name),
                        )?;
                        args.push(ArgSpec {
                            name: arg.name.clone(),
                            ty: arg.ty,
                            family,
                            comment: arg.comment.clone(),
                        });
                    }

                    dictionary.order.push(path);
                    dictionary.commands.insert(
                        path,
                        CommandSpec {
                            path,
                            name: command.name.clone(),
                            qualified_name,
                            args,
                            comment: command.comment.clone(),
                        },
                    );
                }
            }
        }

        debug!(
            "Dictionary built: {} projects, {} classes, {} commands, {} enums",
            dictionary.projects.len(),
            dictionary.classes.len(),
            dictionary.commands.len(),
            dictionary.enums.len()
        );
        Ok(dictionary)
    }

    fn add_selector(&mut self, name: &str, selector: PathSelector) -> Result<(), DictionaryError> {
        let key = name.to_lowercase();
        if self.selectors.contains_key(&key) {
            let context = name.rsplit_once('.').map_or("dictionary", |(parent, _)| parent);
            return Err(duplicate("name", name, context));
        }
        self.selectors.insert(key, selector);
        Ok(())
    }

    /// Resolve the enum family of an argument, registering inline enums.
    fn arg_family(
        &mut self,
        command: &str,
        arg: &model::ArgSource,
        shared_enums: &HashMap<String, FamilyId>,
        inline_name: &str,
    ) -> Result<Option<FamilyId>, DictionaryError> {
        let invalid = |reason: &str| DictionaryError::InvalidArgument {
            command: command.to_string(),
            arg: arg.name.clone(),
            reason: reason.to_string(),
        };

        match (arg.ty, &arg.family, arg.values.is_empty()) {
            (ArgType::Enum, Some(_), false) => {
                Err(invalid("declares both an enum reference and inline values"))
            }
            (ArgType::Enum, Some(name), true) => shared_enums
                .get(&name.to_lowercase())
                .copied()
                .map(Some)
                .ok_or_else(|| invalid(&format!("unknown enum '{}'", name))),
            (ArgType::Enum, None, false) => self
                .enums
                .insert(
                    &inline_name.to_uppercase(),
                    model::number_members(&arg.values),
                )
                .map(Some),
            (ArgType::Enum, None, true) => Err(invalid("enum argument without values")),
            (_, None, true) => Ok(None),
            (ty, _, _) => Err(invalid(&format!("{} argument cannot carry enum values", ty))),
        }
    }

    pub fn version(&self) -> VersionCode {
        self.version
    }

    /// Number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn enums(&self) -> &EnumRegistry {
        &self.enums
    }

    pub fn command(&self, path: CommandPath) -> Option<&CommandSpec> {
        self.commands.get(&path)
    }

    /// Commands in declaration order.
    pub fn commands(&self) -> impl Iterator<Item = &CommandSpec> {
        self.order.iter().filter_map(|path| self.commands.get(path))
    }

    pub fn project_name(&self, project: u8) -> Option<&str> {
        self.projects.get(&project).map(|p| p.name.as_str())
    }

    pub fn class_name(&self, project: u8, class: u8) -> Option<&str> {
        self.classes.get(&(project, class)).map(|c| c.name.as_str())
    }

    /// Resolve `project.Class.Command` to its path. Names are case-insensitive.
    pub fn resolve_path(&self, name: &str) -> Result<CommandPath, DictionaryError> {
        match self.resolve_selector(name)? {
            PathSelector::Command(path) => Ok(path),
            _ => Err(DictionaryError::UnknownCommand(name.to_string())),
        }
    }

    /// Resolve `project`, `project.Class` or `project.Class.Command`.
    pub fn resolve_selector(&self, name: &str) -> Result<PathSelector, DictionaryError> {
        self.selectors
            .get(&name.trim().to_lowercase())
            .copied()
            .ok_or_else(|| DictionaryError::UnknownCommand(name.to_string()))
    }

    /// Resolve a wire value of the family `family`; unknown values give the UNKNOWN member.
    pub fn resolve_enum_value(&self, family: &str, value: i32) -> Result<&EnumMember, DictionaryError> {
        self.enums.resolve(family, value)
    }

    /// Readable name of a selector, falling back to numbers for unknown parts.
    pub fn selector_name(&self, selector: PathSelector) -> String {
        match selector {
            PathSelector::Project(p) => self
                .project_name(p)
                .map(str::to_string)
                .unwrap_or_else(|| p.to_string()),
            PathSelector::Class(p, c) => match self.class_name(p, c) {
                Some(class) => format!("{}.{}", self.selector_name(PathSelector::Project(p)), class),
                None => format!("{}.{}", self.selector_name(PathSelector::Project(p)), c),
            },
            PathSelector::Command(path) => match self.command(path) {
                Some(spec) => spec.qualified_name.clone(),
                None => format!(
                    "{}.{}",
                    self.selector_name(PathSelector::Class(path.project, path.class)),
                    path.command
                ),
            },
        }
    }
}

fn check_identifier(name: &str, context: &str) -> Result<(), DictionaryError> {
    if identifier_regex().is_match(name) {
        Ok(())
    } else {
        Err(DictionaryError::InvalidIdentifier {
            name: name.to_string(),
            context: context.to_string(),
        })
    }
}

fn duplicate(what: &'static str, name: impl ToString, context: &str) -> DictionaryError {
    DictionaryError::Duplicate {
        what,
        name: name.to_string(),
        context: context.to_string(),
    }
}
