use crate::extractor::models::VideoRef;
use anyhow::Result;
use async_trait::async_trait;

/// Core trait for video lookup backends
///
/// This trait isolates the application from the specific resolution method
/// (yt-dlp, a native client, a fake in tests).
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Returns a unique identifier for this extractor (e.g., "ytdlp")
    fn id(&self) -> &'static str;

    /// Checks if this extractor can handle the given URL
    fn supports(&self, url: &str) -> bool;

    /// Resolve a URL into video metadata and its audio-only streams.
    ///
    /// Input that is not a video reference must fail with
    /// [`AppError::InvalidUrl`](crate::utils::AppError::InvalidUrl) so callers can
    /// treat it as "nothing found" rather than a failure.
    async fn resolve(&self, url: &str) -> Result<VideoRef>;
}
