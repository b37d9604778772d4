//! Serialized form of the command dictionary.
//!
//! ```toml
//! version = "3.1.0.0"
//!
//! [[project]]
//! name = "ardrone3"
//! id = 1
//!
//! [[project.class]]
//! name = "PilotingState"
//! id = 4
//!
//! [[project.class.cmd]]
//! name = "FlyingStateChanged"
//! id = 1
//!
//! [[project.class.cmd.arg]]
//! name = "state"
//! type = "enum"
//! values = [{ name = "landed" }, { name = "takingoff" }]
//! ```

use serde::Deserialize;

use crate::domain::types::ArgType;

/// Root of a dictionary file.
#[derive(Debug, Clone, Deserialize)]
pub struct DictionarySource {
    /// Dictionary version code, e.g. "3.1.0.2"
    #[serde(default)]
    pub version: Option<String>,

    #[serde(default, rename = "project")]
    pub projects: Vec<ProjectSource>,
}

/// A project (product line or feature).
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSource {
    pub name: String,
    pub id: u8,

    #[serde(default)]
    pub comment: Option<String>,

    /// Enums shared by several commands of the project
    #[serde(default, rename = "enum")]
    pub enums: Vec<EnumSource>,

    #[serde(default, rename = "class")]
    pub classes: Vec<ClassSource>,
}

/// A class of commands inside a project.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassSource {
    pub name: String,
    pub id: u8,

    #[serde(default)]
    pub comment: Option<String>,

    #[serde(default, rename = "cmd")]
    pub commands: Vec<CommandSource>,
}

/// A command or event.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandSource {
    pub name: String,
    pub id: u16,

    #[serde(default)]
    pub comment: Option<String>,

    #[serde(default, rename = "arg")]
    pub args: Vec<ArgSource>,
}

/// A command argument.
#[derive(Debug, Clone, Deserialize)]
pub struct ArgSource {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: ArgType,

    /// Project-level enum this argument refers to
    #[serde(default, rename = "enum")]
    pub family: Option<String>,

    /// Inline enum members
    #[serde(default)]
    pub values: Vec<EnumMemberSource>,

    #[serde(default)]
    pub comment: Option<String>,
}

/// A project-level enum.
#[derive(Debug, Clone, Deserialize)]
pub struct EnumSource {
    pub name: String,

    #[serde(default)]
    pub comment: Option<String>,

    pub values: Vec<EnumMemberSource>,
}

/// An enum member. Without `value`, it follows the previous member.
#[derive(Debug, Clone, Deserialize)]
pub struct EnumMemberSource {
    pub name: String,

    #[serde(default)]
    pub value: Option<i32>,

    #[serde(default)]
    pub comment: Option<String>,
}

/// Assign C-style values: explicit values win, the rest count up from the previous one.
pub(crate) fn number_members(members: &[EnumMemberSource]) -> Vec<(String, i32, Option<String>)> {
    let mut next = 0i32;
    members
        .iter()
        .map(|m| {
            let value = m.value.unwrap_or(next);
            next = value.wrapping_add(1);
            (m.name.to_uppercase(), value, m.comment.clone())
        })
        .collect()
}
