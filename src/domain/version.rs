//! Four-part version codes ("major.minor.revision.build").

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

/// A version code such as `3.1.0.2`.
///
/// Parsing is lenient: an incomplete code is padded with zeroes and parsing
/// stops at the first component that does not start with a number, so
/// `"3.2"` equals `"3.2.0.0"` and garbage equals `"0.0.0.0"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct VersionCode {
    pub major: i32,
    pub minor: i32,
    pub revision: i32,
    pub build: i32,
}

impl VersionCode {
    pub const fn new(major: i32, minor: i32, revision: i32, build: i32) -> Self {
        Self {
            major,
            minor,
            revision,
            build,
        }
    }

    /// Build from up to four components, padding the rest with zeroes.
    pub fn from_parts(parts: &[i32]) -> Self {
        let part = |i: usize| parts.get(i).copied().unwrap_or(0);
        Self::new(part(0), part(1), part(2), part(3))
    }

    pub fn parse(text: &str) -> Self {
        let mut parts = [0i32; 4];
        for (slot, component) in parts.iter_mut().zip(text.trim().split('.')) {
            match leading_int(component) {
                Some(value) => *slot = value,
                None => break,
            }
            // A component like "2rc1" ends the code after its numeric prefix.
            if !component.trim_start().bytes().skip(1).all(|b| b.is_ascii_digit()) {
                break;
            }
        }
        Self::from_parts(&parts)
    }

    pub fn as_array(&self) -> [i32; 4] {
        [self.major, self.minor, self.revision, self.build]
    }
}

impl fmt::Display for VersionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.revision, self.build
        )
    }
}

/// Parse an optionally signed decimal prefix, like `%d`.
fn leading_int(text: &str) -> Option<i32> {
    let text = text.trim_start();
    let (sign, digits) = match text.as_bytes().first() {
        Some(b'-') => (-1i64, &text[1..]),
        Some(b'+') => (1i64, &text[1..]),
        _ => (1i64, text),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end]
        .parse::<i64>()
        .ok()
        .map(|v| (sign * v).clamp(i32::MIN as i64, i32::MAX as i64) as i32)
}

/// Compare two version code strings.
pub fn compare_version_codes(v1: &str, v2: &str) -> Ordering {
    VersionCode::parse(v1).cmp(&VersionCode::parse(v2))
}

/// Human-readable comparison result, named after the direction of the difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompareResult {
    V1Newer,
    SameVersions,
    V2Newer,
}

impl From<Ordering> for CompareResult {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Greater => CompareResult::V1Newer,
            Ordering::Equal => CompareResult::SameVersions,
            Ordering::Less => CompareResult::V2Newer,
        }
    }
}

impl fmt::Display for CompareResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CompareResult::V1Newer => "V1_NEWER",
            CompareResult::SameVersions => "SAME_VERSIONS",
            CompareResult::V2Newer => "V2_NEWER",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_code() {
        assert_eq!(VersionCode::parse("3.1.0.2"), VersionCode::new(3, 1, 0, 2));
    }

    #[test]
    fn test_parse_pads_with_zeroes() {
        assert_eq!(VersionCode::parse("3.2"), VersionCode::new(3, 2, 0, 0));
    }

    #[test]
    fn test_parse_garbage_is_zero() {
        assert_eq!(VersionCode::parse("garbage"), VersionCode::default());
        assert_eq!(VersionCode::parse(""), VersionCode::default());
    }

    #[test]
    fn test_parse_stops_at_suffix() {
        assert_eq!(VersionCode::parse("3.2rc1.5"), VersionCode::new(3, 2, 0, 0));
    }

    #[test]
    fn test_compare() {
        assert_eq!(compare_version_codes("3.1.0.2", "3.1.0.1"), Ordering::Greater);
        assert_eq!(compare_version_codes("3.1", "3.1.0.0"), Ordering::Equal);
        assert_eq!(compare_version_codes("2.9.9.9", "3"), Ordering::Less);
        assert_eq!(
            CompareResult::from(compare_version_codes("1.0", "2.0")),
            CompareResult::V2Newer
        );
    }
}
