//! Core domain types for command paths, argument values and frames.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::dictionary::FamilyId;

/// Size in bytes of the `[project][class][command]` header.
pub const HEADER_LEN: usize = 4;

/// Wire address of a command or event: `(project, class, command)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CommandPath {
    pub project: u8,
    pub class: u8,
    pub command: u16,
}

impl CommandPath {
    pub const fn new(project: u8, class: u8, command: u16) -> Self {
        Self {
            project,
            class,
            command,
        }
    }
}

impl fmt::Display for CommandPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.project, self.class, self.command)
    }
}

/// A command path that may leave the class and/or command unspecified.
///
/// `Project(p)` stands for `(p, ANY, ANY)` and `Class(p, c)` for `(p, c, ANY)`.
/// A path with a wildcard class but a concrete command is not addressable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSelector {
    Project(u8),
    Class(u8, u8),
    Command(CommandPath),
}

impl PathSelector {
    pub const fn project(project: u8) -> Self {
        PathSelector::Project(project)
    }

    pub const fn class(project: u8, class: u8) -> Self {
        PathSelector::Class(project, class)
    }

    pub const fn command(project: u8, class: u8, command: u16) -> Self {
        PathSelector::Command(CommandPath::new(project, class, command))
    }

    /// Number of concrete components (1 = project-wide, 3 = exact command).
    pub fn specificity(&self) -> u8 {
        match self {
            PathSelector::Project(_) => 1,
            PathSelector::Class(..) => 2,
            PathSelector::Command(_) => 3,
        }
    }

    /// Check whether `path` falls under this selector.
    pub fn matches(&self, path: CommandPath) -> bool {
        match *self {
            PathSelector::Project(p) => path.project == p,
            PathSelector::Class(p, c) => path.project == p && path.class == c,
            PathSelector::Command(exact) => path == exact,
        }
    }
}

impl From<CommandPath> for PathSelector {
    fn from(path: CommandPath) -> Self {
        PathSelector::Command(path)
    }
}

impl fmt::Display for PathSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSelector::Project(p) => write!(f, "{}.*.*", p),
            PathSelector::Class(p, c) => write!(f, "{}.{}.*", p, c),
            PathSelector::Command(path) => fmt::Display::fmt(path, f),
        }
    }
}

/// Dictionary-declared argument type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    Float,
    Double,
    String,
    Enum,
}

impl ArgType {
    /// Fixed wire width, `None` for NUL-terminated strings.
    pub fn wire_size(self) -> Option<usize> {
        match self {
            ArgType::U8 | ArgType::I8 => Some(1),
            ArgType::U16 | ArgType::I16 => Some(2),
            ArgType::U32 | ArgType::I32 | ArgType::Float | ArgType::Enum => Some(4),
            ArgType::U64 | ArgType::I64 | ArgType::Double => Some(8),
            ArgType::String => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ArgType::U8 => "u8",
            ArgType::I8 => "i8",
            ArgType::U16 => "u16",
            ArgType::I16 => "i16",
            ArgType::U32 => "u32",
            ArgType::I32 => "i32",
            ArgType::U64 => "u64",
            ArgType::I64 => "i64",
            ArgType::Float => "float",
            ArgType::Double => "double",
            ArgType::String => "string",
            ArgType::Enum => "enum",
        }
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An enum argument resolved against its family.
///
/// `value` is the raw wire integer; `ordinal` is the member index in the
/// family, `0` being the UNKNOWN sentinel when the value matched nothing.
/// Built only by [`EnumFamily::arg`](super::dictionary::EnumFamily::arg),
/// so the ordinal always agrees with the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumArg {
    family: FamilyId,
    value: i32,
    ordinal: usize,
}

impl EnumArg {
    pub(crate) fn new(family: FamilyId, value: i32, ordinal: usize) -> Self {
        Self {
            family,
            value,
            ordinal,
        }
    }

    pub fn family(&self) -> FamilyId {
        self.family
    }

    /// Raw wire value.
    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn is_unknown(&self) -> bool {
        self.ordinal == 0
    }
}

/// A typed argument value. Decoded strings borrow from the receive buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue<'a> {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    Float(f32),
    Double(f64),
    String(Cow<'a, str>),
    Enum(EnumArg),
}

impl<'a> ArgValue<'a> {
    pub fn arg_type(&self) -> ArgType {
        match self {
            ArgValue::U8(_) => ArgType::U8,
            ArgValue::I8(_) => ArgType::I8,
            ArgValue::U16(_) => ArgType::U16,
            ArgValue::I16(_) => ArgType::I16,
            ArgValue::U32(_) => ArgType::U32,
            ArgValue::I32(_) => ArgType::I32,
            ArgValue::U64(_) => ArgType::U64,
            ArgValue::I64(_) => ArgType::I64,
            ArgValue::Float(_) => ArgType::Float,
            ArgValue::Double(_) => ArgType::Double,
            ArgValue::String(_) => ArgType::String,
            ArgValue::Enum(_) => ArgType::Enum,
        }
    }

    pub fn string(value: impl Into<Cow<'a, str>>) -> Self {
        ArgValue::String(value.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_owned(self) -> ArgValue<'static> {
        match self {
            ArgValue::U8(v) => ArgValue::U8(v),
            ArgValue::I8(v) => ArgValue::I8(v),
            ArgValue::U16(v) => ArgValue::U16(v),
            ArgValue::I16(v) => ArgValue::I16(v),
            ArgValue::U32(v) => ArgValue::U32(v),
            ArgValue::I32(v) => ArgValue::I32(v),
            ArgValue::U64(v) => ArgValue::U64(v),
            ArgValue::I64(v) => ArgValue::I64(v),
            ArgValue::Float(v) => ArgValue::Float(v),
            ArgValue::Double(v) => ArgValue::Double(v),
            ArgValue::String(s) => ArgValue::String(Cow::Owned(s.into_owned())),
            ArgValue::Enum(e) => ArgValue::Enum(e),
        }
    }
}

/// Body of a command frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload<'a> {
    /// Arguments parsed according to the dictionary entry.
    Args(Vec<ArgValue<'a>>),
    /// Bytes following the header of a command the dictionary does not know.
    Raw(Cow<'a, [u8]>),
}

/// A single command or event instance.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandFrame<'a> {
    pub path: CommandPath,
    pub payload: Payload<'a>,
}

impl<'a> CommandFrame<'a> {
    pub fn new(path: CommandPath, args: Vec<ArgValue<'a>>) -> Self {
        Self {
            path,
            payload: Payload::Args(args),
        }
    }

    pub fn unknown(path: CommandPath, raw: impl Into<Cow<'a, [u8]>>) -> Self {
        Self {
            path,
            payload: Payload::Raw(raw.into()),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.payload, Payload::Raw(_))
    }

    /// Parsed arguments; empty for unknown frames.
    pub fn args(&self) -> &[ArgValue<'a>] {
        match &self.payload {
            Payload::Args(args) => args,
            Payload::Raw(_) => &[],
        }
    }

    pub fn arg(&self, index: usize) -> Option<&ArgValue<'a>> {
        self.args().get(index)
    }

    pub fn into_owned(self) -> CommandFrame<'static> {
        let payload = match self.payload {
            Payload::Args(args) => {
                Payload::Args(args.into_iter().map(ArgValue::into_owned).collect())
            }
            Payload::Raw(raw) => Payload::Raw(Cow::Owned(raw.into_owned())),
        };
        CommandFrame {
            path: self.path,
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_matches() {
        let path = CommandPath::new(1, 5, 20);
        assert!(PathSelector::project(1).matches(path));
        assert!(PathSelector::class(1, 5).matches(path));
        assert!(PathSelector::command(1, 5, 20).matches(path));
        assert!(!PathSelector::class(1, 6).matches(path));
        assert!(!PathSelector::command(1, 5, 21).matches(path));
        assert!(!PathSelector::project(2).matches(path));
    }

    #[test]
    fn test_wire_sizes() {
        assert_eq!(ArgType::U8.wire_size(), Some(1));
        assert_eq!(ArgType::I16.wire_size(), Some(2));
        assert_eq!(ArgType::Enum.wire_size(), Some(4));
        assert_eq!(ArgType::Double.wire_size(), Some(8));
        assert_eq!(ArgType::String.wire_size(), None);
    }

    #[test]
    fn test_unknown_frame_has_no_args() {
        let frame = CommandFrame::unknown(CommandPath::new(9, 9, 9), &[1u8, 2, 3][..]);
        assert!(frame.is_unknown());
        assert!(frame.args().is_empty());
    }

    #[test]
    fn test_into_owned_keeps_values() {
        let owned = {
            let text = String::from("hello");
            let frame = CommandFrame::new(
                CommandPath::new(0, 1, 2),
                vec![ArgValue::string(text.as_str()), ArgValue::U8(7)],
            );
            frame.into_owned()
        };
        assert_eq!(owned.arg(0).and_then(ArgValue::as_str), Some("hello"));
        assert_eq!(owned.arg(1), Some(&ArgValue::U8(7)));
    }
}
