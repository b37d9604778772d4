//! Command filter: owns a filter table and guards its lifecycle.

use tracing::{debug, warn};

use super::{FilterBehavior, FilterStatus, FilterTable};
use crate::domain::codec::peek_path;
use crate::domain::error::FilterError;
use crate::domain::types::CommandPath;

#[derive(Debug, Clone)]
enum State {
    Ready(FilterTable),
    /// Built with a default that cannot be stored
    Invalid,
    Disposed,
}

/// Allow/block filter over command paths.
///
/// A filter built with an `Unknown` or `Error` default is unusable: every
/// operation on it reports [`FilterError::BadFilter`] and evaluation returns
/// [`FilterStatus::Error`]. The same holds after [`CommandFilter::dispose`].
#[derive(Debug, Clone)]
pub struct CommandFilter {
    state: State,
}

impl CommandFilter {
    pub fn new(default: FilterStatus) -> Self {
        match FilterBehavior::try_from(default) {
            Ok(behavior) => Self::with_default(behavior),
            Err(_) => {
                warn!("Filter created with invalid default {}, it is unusable", default);
                Self {
                    state: State::Invalid,
                }
            }
        }
    }

    pub fn with_default(default: FilterBehavior) -> Self {
        Self {
            state: State::Ready(FilterTable::new(default)),
        }
    }

    /// Whether the filter can still be used.
    pub fn is_valid(&self) -> bool {
        matches!(self.state, State::Ready(_))
    }

    pub fn table(&self) -> Result<&FilterTable, FilterError> {
        match &self.state {
            State::Ready(table) => Ok(table),
            State::Invalid | State::Disposed => Err(FilterError::BadFilter),
        }
    }

    pub(super) fn table_mut(&mut self) -> Result<&mut FilterTable, FilterError> {
        match &mut self.state {
            State::Ready(table) => Ok(table),
            State::Invalid | State::Disposed => {
                warn!("Filter mutation on an invalid or disposed filter");
                Err(FilterError::BadFilter)
            }
        }
    }

    /// Behavior for `path`, or `BadFilter` if the filter is unusable.
    pub fn try_evaluate(&self, path: CommandPath) -> Result<FilterBehavior, FilterError> {
        self.table().map(|table| table.evaluate(path))
    }

    /// Status for `path`. Never fails: an unusable filter gives `Error`.
    pub fn evaluate(&self, path: CommandPath) -> FilterStatus {
        match self.try_evaluate(path) {
            Ok(behavior) => behavior.into(),
            Err(_) => FilterStatus::Error,
        }
    }

    /// Status for an encoded command frame, judged by its header alone.
    pub fn filter_command(&self, bytes: &[u8]) -> FilterStatus {
        match peek_path(bytes) {
            Ok(path) => {
                let status = self.evaluate(path);
                debug!("Filter {} -> {}", path, status);
                status
            }
            Err(e) => {
                debug!("Filter cannot read command header: {}", e);
                FilterStatus::Error
            }
        }
    }

    /// Release the table. Only the first call succeeds.
    pub fn dispose(&mut self) -> Result<(), FilterError> {
        match std::mem::replace(&mut self.state, State::Disposed) {
            State::Ready(_) => Ok(()),
            previous => {
                self.state = previous;
                Err(FilterError::BadFilter)
            }
        }
    }
}

impl Default for CommandFilter {
    fn default() -> Self {
        Self::with_default(FilterBehavior::Allowed)
    }
}
