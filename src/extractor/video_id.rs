//! Recognition of video references in user input

use crate::utils::error::AppError;
use regex::Regex;
use std::sync::LazyLock;

static VIDEO_ID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?:youtube\.com|youtube-nocookie\.com)/(?:watch\?(?:[^#]*&)?v=|embed/|shorts/|live/|v/)([0-9A-Za-z_-]{11})(?:[^0-9A-Za-z_-]|$)",
        r"youtu\.be/([0-9A-Za-z_-]{11})(?:[^0-9A-Za-z_-]|$)",
        r"^([0-9A-Za-z_-]{11})$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("video id pattern is valid"))
    .collect()
});

/// Extract the 11-character video id from a URL or bare id.
///
/// Returns [`AppError::InvalidUrl`] when nothing recognizable is found.
pub fn parse_video_id(input: &str) -> Result<String, AppError> {
    let input = input.trim();
    VIDEO_ID_PATTERNS
        .iter()
        .find_map(|re| re.captures(input))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| AppError::InvalidUrl(input.to_string()))
}
