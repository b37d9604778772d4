//! Filter behaviors and statuses.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::FilterError;

/// Behavior that can be stored in a filter table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterBehavior {
    Allowed,
    Blocked,
}

impl FilterBehavior {
    pub fn is_blocked(self) -> bool {
        self == FilterBehavior::Blocked
    }
}

impl fmt::Display for FilterBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&FilterStatus::from(*self), f)
    }
}

/// Result of evaluating a filter.
///
/// `Unknown` and `Error` are never stored; `Error` is what an unusable
/// filter reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterStatus {
    Allowed,
    Blocked,
    Unknown,
    Error,
}

impl FilterStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterStatus::Allowed => "ALLOWED",
            FilterStatus::Blocked => "BLOCKED",
            FilterStatus::Unknown => "UNKNOWN",
            FilterStatus::Error => "ERROR",
        }
    }
}

impl fmt::Display for FilterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<FilterBehavior> for FilterStatus {
    fn from(behavior: FilterBehavior) -> Self {
        match behavior {
            FilterBehavior::Allowed => FilterStatus::Allowed,
            FilterBehavior::Blocked => FilterStatus::Blocked,
        }
    }
}

impl TryFrom<FilterStatus> for FilterBehavior {
    type Error = FilterError;

    fn try_from(status: FilterStatus) -> Result<Self, Self::Error> {
        match status {
            FilterStatus::Allowed => Ok(FilterBehavior::Allowed),
            FilterStatus::Blocked => Ok(FilterBehavior::Blocked),
            other => Err(FilterError::InvalidBehavior(other)),
        }
    }
}
