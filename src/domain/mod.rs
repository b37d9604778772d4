//! Domain layer containing the protocol core.
//!
//! This module contains:
//! - The command dictionary (identifier space and enums)
//! - The binary command codec
//! - The allow/block filter engine
//! - Transport frame splitting
//! - Logger with rotation

pub mod codec;
pub mod dictionary;
pub mod error;
pub mod filters;
pub mod logger;
pub mod network;
pub mod types;
pub mod version;

pub use codec::{Codec, DecodePolicy};
pub use dictionary::Dictionary;
pub use error::{ArCommandsError, DecodeError, DictionaryError, EncodeError, FilterError, NetworkFrameError};
pub use filters::{CommandFilter, FilterBehavior, FilterStatus};
pub use types::{ArgType, ArgValue, CommandFrame, CommandPath, Payload, PathSelector};
