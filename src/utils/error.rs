//! Error handling for audioloader

use thiserror::Error;

/// Main error type for audioloader
#[derive(Debug, Error)]
pub enum AppError {
    #[error("yt-dlp not found. Please install yt-dlp")]
    YtDlpNotFound,

    /// The input could not be recognized as a video reference
    #[error("Not a video URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to extract video info: {0}")]
    ExtractionError(String),

    #[error("No audio streams available for {0}")]
    NoAudioStreams(String),

    #[error("Download failed: {0}")]
    DownloadError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    ConfigError(String),
}

impl AppError {
    /// Whether this error should be shown to the user as a plain "nothing found"
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::InvalidUrl(_) | AppError::NoAudioStreams(_))
    }
}
