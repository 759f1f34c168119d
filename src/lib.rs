//! audioloader library

pub mod downloader;
pub mod extractor;
pub mod tui;
pub mod utils;

// Re-export main types for easier use
pub use downloader::{DownloadEngine, DownloadJob, DownloadState, ProgressReporter};
pub use extractor::{Extractor, StreamVariant, VideoRef, YtDlpExtractor};
pub use tui::{App, Command, Message};
pub use utils::{AppError, ConfigStore, Preferences};
