//! File logging for the cronos binary.
//!
//! Logs go to `<root>/logs/cronos.log.<date>` so the interactive terminal stays
//! clean. `RUST_LOG` controls the filter; `CRONOS_DEBUG_LOG=1` forces debug.

use std::env;
use std::path::Path;

use fs_err as fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "cronos.log";

/// Installs the global subscriber. The returned guard must live until exit so
/// buffered lines are flushed; `None` means logging is disabled.
pub fn init(logs_dir: &Path) -> Option<WorkerGuard> {
    if let Err(err) = fs::create_dir_all(logs_dir) {
        eprintln!("cronos: logging disabled: {}", err);
        return None;
    }

    let appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let result = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .try_init();

    match result {
        Ok(()) => Some(guard),
        Err(_) => None,
    }
}

fn env_filter() -> EnvFilter {
    let debug_enabled = env::var("CRONOS_DEBUG_LOG")
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false);
    if debug_enabled {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}
