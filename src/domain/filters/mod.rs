//! Allow/block filtering of commands by path.

mod behavior;
mod builder;
mod command_filter;
mod rules;
mod table;

pub use behavior::{FilterBehavior, FilterStatus};
pub use command_filter::CommandFilter;
pub use table::FilterTable;
