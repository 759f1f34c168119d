//! Download engine module

pub mod engine;
pub mod progress;

// Re-export for convenience
pub use engine::{DownloadEngine, DownloadJob};
pub use progress::{DownloadState, ProgressReporter};
