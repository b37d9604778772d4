//! Little-endian writes into an output buffer.

use crate::domain::types::{ArgValue, CommandPath};

pub(crate) fn put_header(out: &mut Vec<u8>, path: CommandPath) {
    out.push(path.project);
    out.push(path.class);
    out.extend_from_slice(&path.command.to_le_bytes());
}

/// Append one argument. Strings get their terminator; the caller has
/// already rejected interior NUL bytes.
pub(crate) fn put_arg(out: &mut Vec<u8>, value: &ArgValue<'_>) {
    match value {
        ArgValue::U8(v) => out.push(*v),
        ArgValue::I8(v) => out.extend_from_slice(&v.to_le_bytes()),
        ArgValue::U16(v) => out.extend_from_slice(&v.to_le_bytes()),
        ArgValue::I16(v) => out.extend_from_slice(&v.to_le_bytes()),
        ArgValue::U32(v) => out.extend_from_slice(&v.to_le_bytes()),
        ArgValue::I32(v) => out.extend_from_slice(&v.to_le_bytes()),
        ArgValue::U64(v) => out.extend_from_slice(&v.to_le_bytes()),
        ArgValue::I64(v) => out.extend_from_slice(&v.to_le_bytes()),
        ArgValue::Float(v) => out.extend_from_slice(&v.to_le_bytes()),
        ArgValue::Double(v) => out.extend_from_slice(&v.to_le_bytes()),
        ArgValue::String(s) => {
            out.extend_from_slice(s.as_bytes());
            out.push(0);
        }
        ArgValue::Enum(e) => out.extend_from_slice(&e.value().to_le_bytes()),
    }
}

/// Encoded size of one argument.
pub(crate) fn arg_len(value: &ArgValue<'_>) -> usize {
    match value {
        ArgValue::String(s) => s.len() + 1,
        other => other.arg_type().wire_size().unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let mut out = Vec::new();
        put_header(&mut out, CommandPath::new(1, 0, 0x0102));
        assert_eq!(out, vec![1, 0, 0x02, 0x01]);
    }

    #[test]
    fn test_string_is_terminated() {
        let mut out = Vec::new();
        put_arg(&mut out, &ArgValue::string("FR"));
        assert_eq!(out, b"FR\0");
        assert_eq!(arg_len(&ArgValue::string("FR")), 3);
    }

    #[test]
    fn test_float_bits() {
        let mut out = Vec::new();
        put_arg(&mut out, &ArgValue::Float(1.0));
        assert_eq!(out, vec![0x00, 0x00, 0x80, 0x3f]);
    }
}
