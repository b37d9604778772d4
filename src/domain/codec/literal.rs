//! Text literals to typed argument values.

use std::str::FromStr;

use crate::domain::dictionary::{ArgSpec, CommandSpec, EnumRegistry};
use crate::domain::error::EncodeError;
use crate::domain::types::{ArgType, ArgValue};

fn number<T>(ty: ArgType, text: &str) -> Result<T, EncodeError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    text.trim().parse::<T>().map_err(|e| EncodeError::InvalidLiteral {
        expected: ty,
        literal: text.to_string(),
        reason: e.to_string(),
    })
}

/// Convert `text` to a value of the type declared by `arg`.
///
/// Enum members are accepted by name (case-insensitive) or by wire value.
pub fn parse_literal(
    arg: &ArgSpec,
    text: &str,
    enums: &EnumRegistry,
) -> Result<ArgValue<'static>, EncodeError> {
    let ty = arg.ty;
    Ok(match ty {
        ArgType::U8 => ArgValue::U8(number(ty, text)?),
        ArgType::I8 => ArgValue::I8(number(ty, text)?),
        ArgType::U16 => ArgValue::U16(number(ty, text)?),
        ArgType::I16 => ArgValue::I16(number(ty, text)?),
        ArgType::U32 => ArgValue::U32(number(ty, text)?),
        ArgType::I32 => ArgValue::I32(number(ty, text)?),
        ArgType::U64 => ArgValue::U64(number(ty, text)?),
        ArgType::I64 => ArgValue::I64(number(ty, text)?),
        ArgType::Float => ArgValue::Float(number(ty, text)?),
        ArgType::Double => ArgValue::Double(number(ty, text)?),
        ArgType::String => ArgValue::string(text.to_string()),
        ArgType::Enum => {
            let family = arg
                .family
                .and_then(|id| enums.get(id))
                .ok_or_else(|| EncodeError::InvalidLiteral {
                    expected: ty,
                    literal: text.to_string(),
                    reason: format!("argument '{}' has no enum family", arg.name),
                })?;
            if let Some(member) = family.member_by_name(text.trim()) {
                ArgValue::Enum(family.arg(member.value))
            } else if let Ok(value) = text.trim().parse::<i32>() {
                ArgValue::Enum(family.arg(value))
            } else {
                return Err(EncodeError::InvalidLiteral {
                    expected: ty,
                    literal: text.to_string(),
                    reason: format!("not a member of {}", family.name()),
                });
            }
        }
    })
}

/// Convert one literal per declared argument of `command`.
pub fn parse_args(
    command: &CommandSpec,
    literals: &[String],
    enums: &EnumRegistry,
) -> Result<Vec<ArgValue<'static>>, EncodeError> {
    if literals.len() != command.args.len() {
        return Err(EncodeError::ArgumentCount {
            path: command.path,
            expected: command.args.len(),
            found: literals.len(),
        });
    }
    command
        .args
        .iter()
        .zip(literals)
        .map(|(arg, text)| parse_literal(arg, text, enums))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dictionary::Dictionary;

    fn dictionary() -> Dictionary {
        Dictionary::builtin().unwrap()
    }

    #[test]
    fn test_integer_range_checked() {
        let dictionary = dictionary();
        let spec = dictionary
            .command(dictionary.resolve_path("ardrone3.Piloting.PCMD").unwrap())
            .unwrap();
        let roll = &spec.args[1];
        assert_eq!(
            parse_literal(roll, "-100", dictionary.enums()).unwrap(),
            ArgValue::I8(-100)
        );
        assert!(matches!(
            parse_literal(roll, "200", dictionary.enums()),
            Err(EncodeError::InvalidLiteral { expected: ArgType::I8, .. })
        ));
    }

    #[test]
    fn test_enum_by_name_or_value() {
        let dictionary = dictionary();
        let spec = dictionary
            .command(
                dictionary
                    .resolve_path("ardrone3.PilotingState.FlyingStateChanged")
                    .unwrap(),
            )
            .unwrap();
        let state = &spec.args[0];
        match parse_literal(state, "Hovering", dictionary.enums()).unwrap() {
            ArgValue::Enum(e) => assert_eq!(e.value(), 2),
            other => panic!("unexpected {:?}", other),
        }
        match parse_literal(state, "3", dictionary.enums()).unwrap() {
            ArgValue::Enum(e) => assert_eq!(e.ordinal(), 4),
            other => panic!("unexpected {:?}", other),
        }
        assert!(parse_literal(state, "cruising", dictionary.enums()).is_err());
    }

    #[test]
    fn test_parse_args_counts() {
        let dictionary = dictionary();
        let spec = dictionary
            .command(dictionary.resolve_path("common.Settings.Country").unwrap())
            .unwrap();
        let args = parse_args(spec, &["FR".to_string()], dictionary.enums()).unwrap();
        assert_eq!(args, vec![ArgValue::string("FR")]);
        assert!(matches!(
            parse_args(spec, &[], dictionary.enums()),
            Err(EncodeError::ArgumentCount { expected: 1, found: 0, .. })
        ));
    }
}
