//! Filter table: a default behavior plus per-project, per-class and
//! per-command overrides.

use std::collections::HashMap;

use super::FilterBehavior;
use crate::domain::types::{CommandPath, PathSelector};

#[derive(Debug, Clone)]
pub struct FilterTable {
    default: FilterBehavior,
    projects: HashMap<u8, FilterBehavior>,
    classes: HashMap<(u8, u8), FilterBehavior>,
    commands: HashMap<CommandPath, FilterBehavior>,
}

impl FilterTable {
    pub fn new(default: FilterBehavior) -> Self {
        Self {
            default,
            projects: HashMap::new(),
            classes: HashMap::new(),
            commands: HashMap::new(),
        }
    }

    pub fn default_behavior(&self) -> FilterBehavior {
        self.default
    }

    /// Store `behavior` for `selector`, replacing any previous value.
    pub fn set(&mut self, selector: PathSelector, behavior: FilterBehavior) {
        match selector {
            PathSelector::Project(p) => self.projects.insert(p, behavior),
            PathSelector::Class(p, c) => self.classes.insert((p, c), behavior),
            PathSelector::Command(path) => self.commands.insert(path, behavior),
        };
    }

    /// Remove the override of `selector`, returning it.
    pub fn clear(&mut self, selector: PathSelector) -> Option<FilterBehavior> {
        match selector {
            PathSelector::Project(p) => self.projects.remove(&p),
            PathSelector::Class(p, c) => self.classes.remove(&(p, c)),
            PathSelector::Command(path) => self.commands.remove(&path),
        }
    }

    /// Override stored for exactly `selector`.
    pub fn get(&self, selector: PathSelector) -> Option<FilterBehavior> {
        match selector {
            PathSelector::Project(p) => self.projects.get(&p),
            PathSelector::Class(p, c) => self.classes.get(&(p, c)),
            PathSelector::Command(path) => self.commands.get(&path),
        }
        .copied()
    }

    /// Most specific override covering `path`, if any.
    pub fn lookup(&self, path: CommandPath) -> Option<(PathSelector, FilterBehavior)> {
        let exact = PathSelector::Command(path);
        let class = PathSelector::class(path.project, path.class);
        let project = PathSelector::project(path.project);
        [exact, class, project]
            .into_iter()
            .find_map(|selector| self.get(selector).map(|b| (selector, b)))
    }

    /// Behavior for `path`: exact, then class-wide, then project-wide, then the default.
    pub fn evaluate(&self, path: CommandPath) -> FilterBehavior {
        self.lookup(path).map_or(self.default, |(_, behavior)| behavior)
    }

    /// Number of overrides.
    pub fn len(&self) -> usize {
        self.projects.len() + self.classes.len() + self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All overrides, least specific first.
    pub fn overrides(&self) -> Vec<(PathSelector, FilterBehavior)> {
        let mut out: Vec<_> = self
            .projects
            .iter()
            .map(|(&p, &b)| (PathSelector::project(p), b))
            .chain(
                self.classes
                    .iter()
                    .map(|(&(p, c), &b)| (PathSelector::class(p, c), b)),
            )
            .chain(
                self.commands
                    .iter()
                    .map(|(&path, &b)| (PathSelector::Command(path), b)),
            )
            .collect();
        out.sort_by_key(|(selector, _)| (selector.specificity(), *selector));
        out
    }
}
