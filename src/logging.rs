//! Structured logging for tandem using the tracing crate.
//!
//! Configures a rolling file logger that writes to daily-rotated log files
//! under the XDG state directory. Nothing is logged to the terminal: the
//! record command owns the terminal for its status line. Old log files are
//! cleaned up at startup, keeping the 7 most recent days.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing_appender::rolling;
use tracing_subscriber::prelude::*;

/// Number of daily log files kept on disk.
const MAX_LOG_DAYS: usize = 7;

/// Global non-blocking guard holder to keep the appender alive for the program lifetime.
static APPENDER_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// Initializes the logging system with file-based output.
///
/// Sets up a non-blocking rolling file appender that rotates daily.
/// Log level is controlled by the RUST_LOG environment variable (defaults to "info").
///
/// # Errors
/// - If the log directory cannot be determined or created
/// - If the subscriber initialization fails
pub fn init_logging() -> Result<(), anyhow::Error> {
    let log_dir = log_dir()?;

    if let Err(e) = cleanup_old_logs(&log_dir) {
        eprintln!("Warning: Failed to cleanup old logs: {e}");
    }

    let file_appender = rolling::daily(&log_dir, "tandem.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    APPENDER_GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("Logging already initialized"))?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_ansi(false),
        )
        .init();

    tracing::debug!("Logging initialized. Log directory: {}", log_dir.display());
    Ok(())
}

/// Determines the log directory, following XDG Base Directory Specification.
///
/// Prefers XDG_STATE_HOME if set, otherwise uses ~/.local/state/tandem.
///
/// # Errors
/// - If home directory cannot be determined
/// - If log directory cannot be created
pub fn log_dir() -> Result<PathBuf, anyhow::Error> {
    let log_dir = if let Ok(xdg_state) = std::env::var("XDG_STATE_HOME") {
        PathBuf::from(xdg_state).join("tandem")
    } else {
        let home = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
        home.join(".local/state/tandem")
    };

    std::fs::create_dir_all(&log_dir)?;

    Ok(log_dir)
}

/// Removes rotated log files older than the retention window.
///
/// Rotated files are named `tandem.log.YYYY-MM-DD`; the date suffix is the
/// sort key, so retention doesn't depend on filesystem timestamps.
fn cleanup_old_logs(log_dir: &Path) -> Result<(), anyhow::Error> {
    let mut dated_logs: Vec<(PathBuf, chrono::NaiveDate)> = std::fs::read_dir(log_dir)?
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            let file_name = path.file_name()?.to_str()?.to_string();
            let date_suffix = file_name.strip_prefix("tandem.log.")?;
            let date = chrono::NaiveDate::parse_from_str(date_suffix, "%Y-%m-%d").ok()?;
            Some((path, date))
        })
        .collect();

    // Newest first, delete everything past the retention count
    dated_logs.sort_by(|a, b| b.1.cmp(&a.1));

    for (path, _) in dated_logs.iter().skip(MAX_LOG_DAYS) {
        if let Err(e) = std::fs::remove_file(path) {
            tracing::warn!("Failed to delete old log file {}: {e}", path.display());
        }
    }

    Ok(())
}
