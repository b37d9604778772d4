//! Error types for arcommands.

use thiserror::Error;

use super::filters::FilterStatus;
use super::types::{ArgType, CommandPath};

/// Errors raised while loading or querying the command dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DictionaryError {
    /// No command, class or project with this name
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// No enum family with this name
    #[error("Unknown enum family: {0}")]
    UnknownEnumFamily(String),

    /// Dictionary file could not be read
    #[error("Failed to read dictionary {path}: {reason}")]
    Read { path: String, reason: String },

    /// Dictionary source could not be parsed
    #[error("Failed to parse dictionary: {0}")]
    Parse(String),

    /// Identifier does not follow the naming rules
    #[error("Invalid identifier '{name}' in {context}")]
    InvalidIdentifier { name: String, context: String },

    /// Two entries share an id or a name at the same level
    #[error("Duplicate {what} '{name}' in {context}")]
    Duplicate {
        what: &'static str,
        name: String,
        context: String,
    },

    /// Enum argument without family, or non-enum argument with one
    #[error("Argument '{arg}' of {command}: {reason}")]
    InvalidArgument {
        command: String,
        arg: String,
        reason: String,
    },

    /// Family ids are 16 bits wide
    #[error("Enum {0}: too many enum families in one dictionary")]
    TooManyEnumFamilies(String),

    /// Enum member uses the reserved UNKNOWN value
    #[error("Enum {family}: member '{member}' uses the reserved value {value}")]
    ReservedEnumValue {
        family: String,
        member: String,
        value: i32,
    },
}

/// Errors that can occur while encoding a command frame
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Arguments given for a path the dictionary does not declare
    #[error("Cannot encode arguments for unknown command {0}")]
    UnknownCommand(CommandPath),

    /// Raw payload for a declared path, which must be encoded from typed arguments
    #[error("Raw payload given for known command {0}")]
    RawPayloadForKnownCommand(CommandPath),

    /// Wrong number of arguments
    #[error("Command {path} expects {expected} arguments, got {found}")]
    ArgumentCount {
        path: CommandPath,
        expected: usize,
        found: usize,
    },

    /// Runtime type disagrees with the declared type
    #[error("Argument {index} of {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: CommandPath,
        index: usize,
        expected: ArgType,
        found: ArgType,
    },

    /// Enum value from a different family than declared
    #[error("Argument {index} of {path}: enum value belongs to another family")]
    EnumFamilyMismatch { path: CommandPath, index: usize },

    /// String argument contains a NUL byte and cannot be terminated
    #[error("Argument {index} of {path}: string contains a NUL byte")]
    InteriorNul { path: CommandPath, index: usize },

    /// Text literal could not be converted to the declared type
    #[error("Invalid {expected} literal '{literal}': {reason}")]
    InvalidLiteral {
        expected: ArgType,
        literal: String,
        reason: String,
    },
}

/// Errors that can occur while decoding a command frame
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Fewer bytes remain than the next field requires
    #[error("Truncated frame: field at offset {offset} needs {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// String argument is not valid UTF-8
    #[error("Invalid UTF-8 string at offset {offset}")]
    InvalidUtf8 { offset: usize },

    /// Path not in the dictionary (strict policy only)
    #[error("Unknown command path {0}")]
    UnknownPath(CommandPath),
}

/// Errors returned by filter construction, mutation and evaluation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// Filter was built with an invalid default or has been disposed
    #[error("Bad filter: the filter is invalid or has been disposed")]
    BadFilter,

    /// Status that cannot be stored as a behavior
    #[error("Invalid filter behavior {0:?}: only ALLOWED and BLOCKED can be stored")]
    InvalidBehavior(FilterStatus),

    /// Name did not resolve against the dictionary
    #[error("Filter rule: {0}")]
    Dictionary(#[from] DictionaryError),
}

/// Errors that can occur while splitting a datagram into network frames
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkFrameError {
    /// Not enough bytes for a frame header
    #[error("Truncated network frame header at offset {offset}: {available} bytes available")]
    TruncatedHeader { offset: usize, available: usize },

    /// Declared size is smaller than the header or overruns the datagram
    #[error("Invalid network frame size {size} at offset {offset}")]
    InvalidSize { offset: usize, size: u32 },

    /// Unknown frame type
    #[error("Invalid network frame type {frame_type} at offset {offset}")]
    InvalidType { offset: usize, frame_type: u8 },
}

/// Main error type for arcommands.
#[derive(Debug, Error)]
pub enum ArCommandsError {
    /// Dictionary error
    #[error("Dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    /// Encoding error
    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Decoding error
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Filter error
    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    /// Network frame error
    #[error("Network frame error: {0}")]
    NetworkFrame(#[from] NetworkFrameError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Hex input error
    #[error("Hex error: {0}")]
    Hex(#[from] hex::FromHexError),
}
