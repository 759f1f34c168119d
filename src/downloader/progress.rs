//! Progress tracking for downloads

/// Turns "bytes remaining" reports into forward-only advances.
///
/// The transfer layer only knows how much is left; the gauge wants to be
/// advanced by a delta. `advanced` never decreases and never exceeds `total`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressReporter {
    total: u64,
    advanced: u64,
}

impl ProgressReporter {
    /// Create a new progress tracker
    pub fn new(total: u64) -> Self {
        Self { total, advanced: 0 }
    }

    /// Start over for a newly selected stream
    pub fn reset(&mut self, total: u64) {
        self.total = total;
        self.advanced = 0;
    }

    /// Apply a report of `remaining` bytes and return how far to advance
    pub fn report(&mut self, remaining: u64) -> u64 {
        let target = self.total.saturating_sub(remaining);
        let delta = target.saturating_sub(self.advanced);
        self.advanced += delta;
        delta
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn advanced(&self) -> u64 {
        self.advanced
    }

    /// Get progress ratio (0.0 to 1.0)
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.advanced as f64 / self.total as f64
    }
}

/// State of the download control
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DownloadState {
    #[default]
    Idle,
    Downloading,
    Done,
    /// `None` when the trigger fired without a stream selected
    Error(Option<String>),
}

impl DownloadState {
    /// Text shown on the download button
    pub fn label(&self) -> String {
        match self {
            DownloadState::Idle => "Download".to_string(),
            DownloadState::Downloading => "Downloading...".to_string(),
            DownloadState::Done => "Done".to_string(),
            DownloadState::Error(None) => "Error. Click to retry".to_string(),
            DownloadState::Error(Some(reason)) => format!("Error: {}. Click to retry", reason),
        }
    }
}
