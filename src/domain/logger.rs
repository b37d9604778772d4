//! File logging with daily rotation.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// File name prefix of every log file.
pub const LOG_FILE_PREFIX: &str = "arcommands";

/// Log files are kept for two days.
const RETENTION: Duration = Duration::from_secs(2 * 24 * 60 * 60);

type Timer = OffsetTime<&'static [BorrowedFormatItem<'static>]>;

fn local_timer() -> Timer {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]");
    let offset = time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC);
    OffsetTime::new(offset, format)
}

/// Install the global subscriber writing to `config.log_path`.
pub fn init(config: &Config) -> Result<()> {
    fs::create_dir_all(&config.log_path).with_context(|| {
        format!("Failed to create log directory: {}", config.log_path.display())
    })?;
    cleanup_old_logs(&config.log_path)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &config.log_path, LOG_FILE_PREFIX);

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()))
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_timer(local_timer()),
        );

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;

    tracing::info!("arcommands {} logging to {}", env!("CARGO_PKG_VERSION"), config.log_path.display());
    Ok(())
}

/// Remove our log files last modified before the retention window.
pub fn cleanup_old_logs(log_path: &Path) -> Result<()> {
    let Some(cutoff) = SystemTime::now().checked_sub(RETENTION) else {
        return Ok(());
    };
    if !log_path.exists() {
        return Ok(());
    }

    for entry in fs::read_dir(log_path)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let is_ours = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(LOG_FILE_PREFIX));
        if !is_ours {
            continue;
        }

        let expired = entry
            .metadata()
            .and_then(|m| m.modified())
            .is_ok_and(|modified| modified < cutoff);
        if expired {
            let _ = fs::remove_file(&path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_keeps_recent_and_foreign_files() {
        let dir = std::env::temp_dir().join(format!("arcommands-logs-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let ours = dir.join("arcommands.2026-10-19");
        let foreign = dir.join("other.log");
        fs::write(&ours, "x").unwrap();
        fs::write(&foreign, "y").unwrap();

        cleanup_old_logs(&dir).unwrap();
        assert!(ours.exists());
        assert!(foreign.exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_cleanup_missing_dir_is_ok() {
        let dir = std::env::temp_dir().join("arcommands-logs-does-not-exist");
        assert!(cleanup_old_logs(&dir).is_ok());
    }
}
