//! Human-readable and JSON rendering of decoded frames.

use std::fmt;

use serde_json::{json, Value};

use crate::domain::dictionary::{Dictionary, UNKNOWN_MEMBER_NAME};
use crate::domain::types::{ArgValue, CommandFrame, Payload};

/// Formats a frame as `project.Class.Command(arg:value, ...)`.
pub struct FrameDisplay<'f, 'd> {
    frame: &'f CommandFrame<'f>,
    dictionary: &'d Dictionary,
}

impl fmt::Display for FrameDisplay<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frame = self.frame;
        let raw = match &frame.payload {
            Payload::Raw(raw) => raw,
            Payload::Args(args) => {
                let Some(spec) = self.dictionary.command(frame.path) else {
                    return write!(f, "unknown({})", frame.path);
                };
                write!(f, "{}(", spec.qualified_name)?;
                for (i, (arg, value)) in spec.args.iter().zip(args).enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}:", arg.name)?;
                    self.write_value(f, value)?;
                }
                return f.write_str(")");
            }
        };
        write!(f, "unknown({})[{} bytes]", frame.path, raw.len())
    }
}

impl FrameDisplay<'_, '_> {
    fn write_value(&self, f: &mut fmt::Formatter<'_>, value: &ArgValue<'_>) -> fmt::Result {
        match value {
            ArgValue::U8(v) => write!(f, "{}", v),
            ArgValue::I8(v) => write!(f, "{}", v),
            ArgValue::U16(v) => write!(f, "{}", v),
            ArgValue::I16(v) => write!(f, "{}", v),
            ArgValue::U32(v) => write!(f, "{}", v),
            ArgValue::I32(v) => write!(f, "{}", v),
            ArgValue::U64(v) => write!(f, "{}", v),
            ArgValue::I64(v) => write!(f, "{}", v),
            ArgValue::Float(v) => write!(f, "{}", v),
            ArgValue::Double(v) => write!(f, "{}", v),
            ArgValue::String(s) => write!(f, "{:?}", s),
            ArgValue::Enum(e) => match self.dictionary.enums().member(e) {
                Some(member) if !member.is_unknown() => f.write_str(&member.name),
                _ => write!(f, "{}({})", UNKNOWN_MEMBER_NAME, e.value()),
            },
        }
    }
}

/// Display adapter for `frame`.
pub fn describe<'f, 'd>(frame: &'f CommandFrame<'f>, dictionary: &'d Dictionary) -> FrameDisplay<'f, 'd> {
    FrameDisplay { frame, dictionary }
}

fn value_json(dictionary: &Dictionary, value: &ArgValue<'_>) -> Value {
    match value {
        ArgValue::U8(v) => json!(v),
        ArgValue::I8(v) => json!(v),
        ArgValue::U16(v) => json!(v),
        ArgValue::I16(v) => json!(v),
        ArgValue::U32(v) => json!(v),
        ArgValue::I32(v) => json!(v),
        ArgValue::U64(v) => json!(v),
        ArgValue::I64(v) => json!(v),
        ArgValue::Float(v) => json!(v),
        ArgValue::Double(v) => json!(v),
        ArgValue::String(s) => json!(s),
        ArgValue::Enum(e) => {
            let name = dictionary
                .enums()
                .member(e)
                .map(|m| m.name.as_str())
                .unwrap_or(UNKNOWN_MEMBER_NAME);
            json!({ "name": name, "value": e.value() })
        }
    }
}

/// JSON object for `frame`, used by the `--format json` output.
pub fn frame_json(frame: &CommandFrame<'_>, dictionary: &Dictionary) -> Value {
    let path = json!({
        "project": frame.path.project,
        "class": frame.path.class,
        "command": frame.path.command,
    });
    match (&frame.payload, dictionary.command(frame.path)) {
        (Payload::Args(args), Some(spec)) => {
            let args: Vec<Value> = spec
                .args
                .iter()
                .zip(args)
                .map(|(arg, value)| {
                    json!({
                        "name": arg.name,
                        "type": arg.ty,
                        "value": value_json(dictionary, value),
                    })
                })
                .collect();
            json!({ "path": path, "name": spec.qualified_name, "args": args })
        }
        (Payload::Raw(raw), _) => json!({
            "path": path,
            "name": Value::Null,
            "raw": hex::encode(raw),
        }),
        (Payload::Args(_), None) => json!({ "path": path, "name": Value::Null }),
    }
}
