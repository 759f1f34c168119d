//! File logging
//!
//! The terminal belongs to the UI, so log output goes to a file under the
//! user's local data directory instead of stdout/stderr.

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Directory that receives `audioloader.log`
pub fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("audioloader").join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("audioloader").join("logs"))
}

/// Install the global subscriber. Keep the returned guard alive for the
/// lifetime of the process or buffered lines are lost.
pub fn init() -> WorkerGuard {
    let file_appender = tracing_appender::rolling::never(log_dir(), "audioloader.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("audioloader=info"));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .init();

    guard
}
