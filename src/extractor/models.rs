//! Data structures for video information

use crate::utils::error::AppError;
use serde::{Deserialize, Serialize};

/// Video information as reported by `yt-dlp --dump-json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoInfo {
    pub id: String,
    pub title: String,
    #[serde(default, rename = "webpage_url")]
    pub url: String,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub formats: Vec<Format>,
}

/// A single format entry from `yt-dlp`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Format {
    pub format_id: String,
    #[serde(default)]
    pub ext: String,
    #[serde(default)]
    pub filesize: Option<u64>,
    #[serde(default)]
    pub filesize_approx: Option<u64>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub vcodec: Option<String>,
    #[serde(default)]
    pub acodec: Option<String>,
    #[serde(default)]
    pub abr: Option<f32>, // Audio bitrate
    #[serde(default)]
    pub format_note: Option<String>,
}

impl Format {
    /// True for formats that carry audio and no video
    pub fn is_audio_only(&self) -> bool {
        let no_video = self.vcodec.as_deref() == Some("none");
        let has_audio = matches!(self.acodec.as_deref(), Some(codec) if codec != "none");
        no_video && has_audio
    }
}

/// A successfully resolved video
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRef {
    pub id: String,
    pub title: String,
    pub author: String,
    /// Length in seconds
    pub duration: Option<u64>,
    pub url: String,
    /// Audio-only renditions, in resolution order
    pub streams: Vec<StreamVariant>,
}

impl VideoRef {
    /// Build a `VideoRef` from raw extractor output, keeping only audio-only formats
    pub fn from_info(info: VideoInfo) -> Result<Self, AppError> {
        let streams: Vec<StreamVariant> = info
            .formats
            .iter()
            .filter(|f| f.is_audio_only() && !f.url.is_empty())
            .map(StreamVariant::from_format)
            .collect();

        if streams.is_empty() {
            return Err(AppError::NoAudioStreams(info.id));
        }

        let author = info
            .channel
            .or(info.uploader)
            .unwrap_or_else(|| "Unknown".to_string());

        Ok(Self {
            id: info.id,
            title: info.title,
            author,
            duration: info.duration.map(|d| d.round() as u64),
            url: info.url,
            streams,
        })
    }

    /// Short description shown above the stream picker
    pub fn summary(&self) -> String {
        let length = self
            .duration
            .map(format_duration)
            .unwrap_or_else(|| "unknown".to_string());
        format!(
            "Title:   {}\nChannel: {}\nLength:  {}",
            self.title, self.author, length
        )
    }
}

/// One downloadable audio rendition
#[derive(Debug, Clone, PartialEq)]
pub struct StreamVariant {
    pub format_id: String,
    pub ext: String,
    /// Size in bytes, 0 when the extractor did not report one
    pub size: u64,
    pub label: String,
    /// Direct media URL
    pub url: String,
}

impl StreamVariant {
    pub fn from_format(format: &Format) -> Self {
        let size = format.filesize.or(format.filesize_approx).unwrap_or(0);
        let codec = format.acodec.as_deref().unwrap_or("unknown");

        let quality = match (format.abr, format.format_note.as_deref()) {
            (Some(abr), _) => format!("{:.0}kbps", abr),
            (None, Some(note)) => note.to_string(),
            (None, None) => format!("format {}", format.format_id),
        };

        let label = format!(
            "{} {} ({}) - {}",
            quality,
            format.ext,
            codec,
            format_bytes(size)
        );

        Self {
            format_id: format.format_id.clone(),
            ext: format.ext.clone(),
            size,
            label,
            url: format.url.clone(),
        }
    }
}

/// Format seconds as `M:SS` or `H:MM:SS`
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Human readable byte count
pub fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;

    if bytes == 0 {
        "size unknown".to_string()
    } else if (bytes as f64) < KIB {
        format!("{} B", bytes)
    } else if (bytes as f64) < MIB {
        format!("{:.1} KiB", bytes as f64 / KIB)
    } else {
        format!("{:.1} MiB", bytes as f64 / MIB)
    }
}
