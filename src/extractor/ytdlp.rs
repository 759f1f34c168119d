//! yt-dlp wrapper for video lookup
//!
//! Metadata and stream URLs come from `yt-dlp --dump-json`. The binary is
//! searched on PATH first, then in a few common installation directories.

use crate::extractor::models::{VideoInfo, VideoRef};
use crate::extractor::traits::Extractor;
use crate::extractor::video_id::parse_video_id;
use crate::utils::error::AppError;
use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command as AsyncCommand;
use tracing::{debug, error, info, warn};

/// Video extractor backed by the yt-dlp executable
pub struct YtDlpExtractor {
    ytdlp_path: Option<PathBuf>,
}

impl YtDlpExtractor {
    /// Locate yt-dlp. A missing binary is not fatal here: the app still
    /// starts and every lookup reports [`AppError::YtDlpNotFound`].
    pub fn new() -> Self {
        let ytdlp_path = find_ytdlp();
        match &ytdlp_path {
            Some(path) => info!("Found yt-dlp at: {}", path.display()),
            None => warn!("yt-dlp not found; lookups will fail until it is installed"),
        }
        Self { ytdlp_path }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            ytdlp_path: Some(path.into()),
        }
    }
}

impl Default for YtDlpExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Extractor for YtDlpExtractor {
    fn id(&self) -> &'static str {
        "ytdlp"
    }

    fn supports(&self, url: &str) -> bool {
        parse_video_id(url).is_ok()
    }

    async fn resolve(&self, url: &str) -> Result<VideoRef> {
        let video_id = parse_video_id(url)?;
        let ytdlp = self.ytdlp_path.as_ref().ok_or(AppError::YtDlpNotFound)?;

        debug!("Extracting video info for {} ({})", video_id, url);

        let output = AsyncCommand::new(ytdlp)
            .arg("--dump-json")
            .arg("--no-download")
            .arg("--no-warnings")
            .arg("--no-playlist")
            // Everything after this is a URL, never an option
            .arg("--")
            .arg(url.trim())
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            let error_msg = String::from_utf8_lossy(&output.stderr);
            error!("yt-dlp extraction failed: {}", error_msg.trim());
            return Err(AppError::ExtractionError(error_msg.trim().to_string()).into());
        }

        let json_str = String::from_utf8(output.stdout)?;
        Ok(parse_dump_json(&json_str)?)
    }
}

/// Map one `--dump-json` document to a [`VideoRef`]
pub fn parse_dump_json(json: &str) -> Result<VideoRef, AppError> {
    let info: VideoInfo = serde_json::from_str(json)?;
    VideoRef::from_info(info)
}

// ============================================================
// yt-dlp Detection Functions
// ============================================================

/// Find yt-dlp binary, PATH first, then common installation paths
pub fn find_ytdlp() -> Option<PathBuf> {
    if let Ok(path) = which::which("yt-dlp") {
        debug!("Using system yt-dlp: {:?}", path);
        return Some(path);
    }

    find_in_common_paths()
}

/// Find yt-dlp in common installation paths
fn find_in_common_paths() -> Option<PathBuf> {
    let common_paths = [
        // macOS Homebrew (Apple Silicon)
        "/opt/homebrew/bin/yt-dlp",
        // macOS Homebrew (Intel)
        "/usr/local/bin/yt-dlp",
        // System
        "/usr/bin/yt-dlp",
        // User local (pipx, pip --user)
        "~/.local/bin/yt-dlp",
    ];

    for path_str in common_paths {
        let expanded = match path_str.strip_prefix("~/") {
            Some(rest) => match dirs::home_dir() {
                Some(home) => home.join(rest),
                None => continue,
            },
            None => PathBuf::from(path_str),
        };

        if expanded.is_file() && is_executable(&expanded) {
            debug!("Using yt-dlp from common path: {:?}", expanded);
            return Some(expanded);
        }
    }

    None
}

/// Check if a file is executable
fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        std::fs::metadata(path)
            .map(|m| m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }

    #[cfg(not(unix))]
    {
        path.exists()
    }
}

// ============================================================
// Tests
// ============================================================
