//! Binary command codec.
//!
//! Layout: `[project:u8][class:u8][command:u16 LE][arg0][arg1]...` where the
//! arguments follow the dictionary entry of the path. Fixed-width fields are
//! little-endian and strings are NUL-terminated UTF-8. The format is not
//! self-describing: a frame can only be parsed with the dictionary at hand.

mod describe;
mod literal;
mod reader;
mod writer;

use std::borrow::Cow;
use std::sync::Arc;

use tracing::trace;

use super::dictionary::{ArgSpec, Dictionary, EnumRegistry};
use super::error::{DecodeError, EncodeError};
use super::types::{ArgType, ArgValue, CommandFrame, CommandPath, Payload, HEADER_LEN};

pub use describe::{describe, frame_json, FrameDisplay};
pub use literal::{parse_args, parse_literal};
use reader::ByteReader;

/// What to do with a well-formed header whose path the dictionary lacks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecodePolicy {
    /// Produce a raw "unknown command" frame
    #[default]
    Lenient,
    /// Fail with `DecodeError::UnknownPath`
    Strict,
}

/// Parse only the 4-byte header of an encoded frame.
pub fn peek_path(bytes: &[u8]) -> Result<CommandPath, DecodeError> {
    let mut reader = ByteReader::new(bytes);
    read_header(&mut reader)
}

fn read_header(reader: &mut ByteReader<'_>) -> Result<CommandPath, DecodeError> {
    if reader.remaining().len() < HEADER_LEN {
        return Err(DecodeError::Truncated {
            offset: reader.offset(),
            needed: HEADER_LEN,
            available: reader.remaining().len(),
        });
    }
    let project = reader.read_u8()?;
    let class = reader.read_u8()?;
    let command = reader.read_u16()?;
    Ok(CommandPath::new(project, class, command))
}

/// Encoder and decoder bound to one dictionary.
#[derive(Debug, Clone)]
pub struct Codec {
    dictionary: Arc<Dictionary>,
    policy: DecodePolicy,
}

impl Codec {
    pub fn new(dictionary: Arc<Dictionary>) -> Self {
        Self {
            dictionary,
            policy: DecodePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: DecodePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> DecodePolicy {
        self.policy
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn shared_dictionary(&self) -> Arc<Dictionary> {
        Arc::clone(&self.dictionary)
    }

    /// Encode a frame into a new buffer.
    pub fn encode(&self, frame: &CommandFrame<'_>) -> Result<Vec<u8>, EncodeError> {
        let mut out = Vec::new();
        self.encode_into(frame, &mut out)?;
        Ok(out)
    }

    /// Append the encoding of `frame` to `out`. On error `out` is left as it was.
    pub fn encode_into(&self, frame: &CommandFrame<'_>, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        let args = match &frame.payload {
            Payload::Raw(_) if self.dictionary.command(frame.path).is_some() => {
                return Err(EncodeError::RawPayloadForKnownCommand(frame.path));
            }
            Payload::Raw(raw) => {
                out.reserve(HEADER_LEN + raw.len());
                writer::put_header(out, frame.path);
                out.extend_from_slice(raw);
                return Ok(());
            }
            Payload::Args(args) => args,
        };

        let spec = self
            .dictionary
            .command(frame.path)
            .ok_or(EncodeError::UnknownCommand(frame.path))?;
        if spec.args.len() != args.len() {
            return Err(EncodeError::ArgumentCount {
                path: frame.path,
                expected: spec.args.len(),
                found: args.len(),
            });
        }
        for (index, (arg, value)) in spec.args.iter().zip(args).enumerate() {
            check_arg(frame.path, index, arg, value)?;
        }

        out.reserve(HEADER_LEN + args.iter().map(writer::arg_len).sum::<usize>());
        writer::put_header(out, frame.path);
        for value in args {
            writer::put_arg(out, value);
        }
        Ok(())
    }

    /// Decode one command buffer. Strings borrow from `bytes`.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Result<CommandFrame<'a>, DecodeError> {
        let mut reader = ByteReader::new(bytes);
        let path = read_header(&mut reader)?;

        let Some(spec) = self.dictionary.command(path) else {
            return match self.policy {
                DecodePolicy::Lenient => {
                    trace!("Unknown command path {}, keeping raw payload", path);
                    Ok(CommandFrame::unknown(path, Cow::Borrowed(reader.remaining())))
                }
                DecodePolicy::Strict => Err(DecodeError::UnknownPath(path)),
            };
        };

        let mut args = Vec::with_capacity(spec.args.len());
        for arg in &spec.args {
            args.push(read_arg(&mut reader, arg, self.dictionary.enums())?);
        }
        Ok(CommandFrame::new(path, args))
    }
}

fn check_arg(path: CommandPath, index: usize, arg: &ArgSpec, value: &ArgValue<'_>) -> Result<(), EncodeError> {
    let found = value.arg_type();
    if found != arg.ty {
        return Err(EncodeError::TypeMismatch {
            path,
            index,
            expected: arg.ty,
            found,
        });
    }
    match value {
        ArgValue::Enum(e) if Some(e.family()) != arg.family => {
            Err(EncodeError::EnumFamilyMismatch { path, index })
        }
        ArgValue::String(s) if s.contains('\0') => Err(EncodeError::InteriorNul { path, index }),
        _ => Ok(()),
    }
}

fn read_arg<'a>(
    reader: &mut ByteReader<'a>,
    arg: &ArgSpec,
    enums: &EnumRegistry,
) -> Result<ArgValue<'a>, DecodeError> {
    Ok(match arg.ty {
        ArgType::U8 => ArgValue::U8(reader.read_u8()?),
        ArgType::I8 => ArgValue::I8(reader.read_i8()?),
        ArgType::U16 => ArgValue::U16(reader.read_u16()?),
        ArgType::I16 => ArgValue::I16(reader.read_i16()?),
        ArgType::U32 => ArgValue::U32(reader.read_u32()?),
        ArgType::I32 => ArgValue::I32(reader.read_i32()?),
        ArgType::U64 => ArgValue::U64(reader.read_u64()?),
        ArgType::I64 => ArgValue::I64(reader.read_i64()?),
        ArgType::Float => ArgValue::Float(reader.read_f32()?),
        ArgType::Double => ArgValue::Double(reader.read_f64()?),
        ArgType::String => ArgValue::String(Cow::Borrowed(reader.read_cstr()?)),
        ArgType::Enum => {
            let value = reader.read_i32()?;
            match arg.family.and_then(|id| enums.get(id)) {
                Some(family) => ArgValue::Enum(family.arg(value)),
                None => ArgValue::I32(value),
            }
        }
    })
}
