//! Logging configuration for pgbrowse.
//!
//! The terminal belongs to the UI, so log output goes to a file.

use std::fs::{self, File};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Initializes file logging.
///
/// Location: `~/.local/state/pgbrowse/pgbrowse.log` on Linux (XDG state
/// directory), or the platform config directory elsewhere. The filter comes
/// from `RUST_LOG` and defaults to `info`.
pub fn init_file_logging() {
    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("Warning: Could not create log directory: {e}");
            return;
        }
    }

    // Truncated on each run
    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file: {e}");
            return;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .init();
}

/// Returns the path for the log file.
pub fn get_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        return state_dir.join("pgbrowse").join("pgbrowse.log");
    }

    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("pgbrowse").join("pgbrowse.log");
    }

    std::env::temp_dir().join("pgbrowse.log")
}
