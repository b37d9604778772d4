//! Enum registry: every enum family of the dictionary, keyed by name.

use std::collections::HashMap;

use crate::domain::error::DictionaryError;
use crate::domain::types::EnumArg;

/// Wire value reserved for the UNKNOWN member of every family.
pub const UNKNOWN_ENUM_VALUE: i32 = i32::MIN;

/// Name of the UNKNOWN member of every family.
pub const UNKNOWN_MEMBER_NAME: &str = "UNKNOWN_ENUM_VALUE";

/// Index of a family inside the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FamilyId(pub(crate) u16);

impl FamilyId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One member of an enum family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    pub name: String,
    pub value: i32,
    pub ordinal: usize,
    pub comment: Option<String>,
}

impl EnumMember {
    pub fn is_unknown(&self) -> bool {
        self.ordinal == 0
    }
}

/// A named enum family. Member 0 is always the UNKNOWN sentinel.
#[derive(Debug, Clone)]
pub struct EnumFamily {
    id: FamilyId,
    name: String,
    members: Vec<EnumMember>,
    by_value: HashMap<i32, usize>,
}

impl EnumFamily {
    pub fn id(&self) -> FamilyId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The UNKNOWN sentinel member.
    pub fn unknown(&self) -> &EnumMember {
        &self.members[0]
    }

    /// Declared members, without the sentinel.
    pub fn members(&self) -> &[EnumMember] {
        &self.members[1..]
    }

    /// Resolve a wire value, falling back to the UNKNOWN sentinel.
    pub fn resolve(&self, value: i32) -> &EnumMember {
        self.by_value
            .get(&value)
            .map(|&ordinal| &self.members[ordinal])
            .unwrap_or_else(|| self.unknown())
    }

    /// Build the frame-level representation of `value`.
    pub fn arg(&self, value: i32) -> EnumArg {
        EnumArg::new(self.id, value, self.resolve(value).ordinal)
    }

    /// Find a member by name, ignoring ASCII case. Never returns the sentinel.
    pub fn member_by_name(&self, name: &str) -> Option<&EnumMember> {
        self.members()
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
    }
}

/// All enum families of a dictionary.
#[derive(Debug, Clone, Default)]
pub struct EnumRegistry {
    families: Vec<EnumFamily>,
    by_name: HashMap<String, FamilyId>,
}

impl EnumRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a family. Members are `(name, value, comment)` in declaration order.
    pub(crate) fn insert(
        &mut self,
        name: &str,
        members: Vec<(String, i32, Option<String>)>,
    ) -> Result<FamilyId, DictionaryError> {
        if self.by_name.contains_key(name) {
            return Err(DictionaryError::Duplicate {
                what: "enum",
                name: name.to_string(),
                context: "dictionary".to_string(),
            });
        }

        let id = u16::try_from(self.families.len())
            .map(FamilyId)
            .map_err(|_| DictionaryError::TooManyEnumFamilies(name.to_string()))?;
        let mut family = EnumFamily {
            id,
            name: name.to_string(),
            members: Vec::with_capacity(members.len() + 1),
            by_value: HashMap::with_capacity(members.len()),
        };
        family.members.push(EnumMember {
            name: UNKNOWN_MEMBER_NAME.to_string(),
            value: UNKNOWN_ENUM_VALUE,
            ordinal: 0,
            comment: Some("Dummy value for all unknown cases".to_string()),
        });

        for (member_name, value, comment) in members {
            if value == UNKNOWN_ENUM_VALUE {
                return Err(DictionaryError::ReservedEnumValue {
                    family: name.to_string(),
                    member: member_name,
                    value,
                });
            }
            if family.by_value.contains_key(&value)
                || family.members.iter().any(|m| m.name == member_name)
            {
                return Err(DictionaryError::Duplicate {
                    what: "enum member",
                    name: member_name,
                    context: name.to_string(),
                });
            }
            let ordinal = family.members.len();
            family.by_value.insert(value, ordinal);
            family.members.push(EnumMember {
                name: member_name,
                value,
                ordinal,
                comment,
            });
        }

        self.by_name.insert(name.to_string(), id);
        self.families.push(family);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// Family for an id handed out by this registry.
    ///
    /// # Panics
    ///
    /// Panics if `id` comes from another registry with more families.
    pub fn family(&self, id: FamilyId) -> &EnumFamily {
        &self.families[id.index()]
    }

    pub fn get(&self, id: FamilyId) -> Option<&EnumFamily> {
        self.families.get(id.index())
    }

    pub fn family_by_name(&self, name: &str) -> Option<&EnumFamily> {
        self.by_name.get(name).map(|id| self.family(*id))
    }

    pub fn families(&self) -> impl Iterator<Item = &EnumFamily> {
        self.families.iter()
    }

    /// Resolve `value` in the family `name`.
    ///
    /// Unknown values resolve to the family's UNKNOWN sentinel; only an
    /// unknown family name is an error.
    pub fn resolve(&self, name: &str, value: i32) -> Result<&EnumMember, DictionaryError> {
        self.family_by_name(name)
            .map(|family| family.resolve(value))
            .ok_or_else(|| DictionaryError::UnknownEnumFamily(name.to_string()))
    }

    /// Member backing a decoded enum argument.
    pub fn member(&self, arg: &EnumArg) -> Option<&EnumMember> {
        self.get(arg.family())
            .and_then(|family| family.members.get(arg.ordinal()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> EnumRegistry {
        let mut registry = EnumRegistry::new();
        registry
            .insert(
                "TEST_STATE",
                vec![
                    ("LANDED".to_string(), 0, None),
                    ("FLYING".to_string(), 3, Some("In the air".to_string())),
                ],
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_resolve_known_value() {
        let registry = registry();
        let member = registry.resolve("TEST_STATE", 3).unwrap();
        assert_eq!(member.name, "FLYING");
        assert_eq!(member.ordinal, 2);
    }

    #[test]
    fn test_resolve_unknown_value_gives_sentinel() {
        let registry = registry();
        let member = registry.resolve("TEST_STATE", 42).unwrap();
        assert!(member.is_unknown());
        assert_eq!(member.value, UNKNOWN_ENUM_VALUE);
        assert_eq!(member.name, UNKNOWN_MEMBER_NAME);
    }

    #[test]
    fn test_unknown_family_is_error() {
        let registry = registry();
        assert_eq!(
            registry.resolve("NOPE", 0),
            Err(DictionaryError::UnknownEnumFamily("NOPE".to_string()))
        );
    }

    #[test]
    fn test_reserved_value_rejected() {
        let mut registry = EnumRegistry::new();
        let err = registry
            .insert("BAD", vec![("MIN".to_string(), i32::MIN, None)])
            .unwrap_err();
        assert!(matches!(err, DictionaryError::ReservedEnumValue { .. }));
    }

    #[test]
    fn test_family_ids_do_not_wrap() {
        let mut registry = EnumRegistry::new();
        for i in 0..=u16::MAX {
            registry.insert(&format!("F{}", i), Vec::new()).unwrap();
        }
        assert_eq!(registry.family_by_name("F65535").unwrap().id(), FamilyId(u16::MAX));

        assert_eq!(
            registry.insert("OVERFLOW", Vec::new()),
            Err(DictionaryError::TooManyEnumFamilies("OVERFLOW".to_string()))
        );
        assert!(registry.family_by_name("OVERFLOW").is_none());
        assert_eq!(registry.family(FamilyId(0)).name(), "F0");
    }

    #[test]
    fn test_duplicate_value_rejected() {
        let mut registry = EnumRegistry::new();
        let err = registry
            .insert(
                "DUP",
                vec![("A".to_string(), 1, None), ("B".to_string(), 1, None)],
            )
            .unwrap_err();
        assert!(matches!(err, DictionaryError::Duplicate { .. }));
    }

    #[test]
    fn test_member_by_name_ignores_case() {
        let registry = registry();
        let family = registry.family_by_name("TEST_STATE").unwrap();
        assert_eq!(family.member_by_name("flying").map(|m| m.value), Some(3));
        assert!(family.member_by_name(UNKNOWN_MEMBER_NAME).is_none());
    }

    #[test]
    fn test_arg_keeps_raw_value() {
        let registry = registry();
        let family = registry.family_by_name("TEST_STATE").unwrap();
        let arg = family.arg(99);
        assert!(arg.is_unknown());
        assert_eq!(arg.value(), 99);
    }
}
