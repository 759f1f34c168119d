//! Progress bar component

use crate::downloader::ProgressReporter;
use crate::extractor::models::format_bytes;
use crate::tui::theme;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Gauge};
use ratatui::Frame;

/// Draw the download gauge for the current stream
pub fn progress_bar(frame: &mut Frame, area: Rect, progress: &ProgressReporter) {
    let ratio = progress.percentage().clamp(0.0, 1.0);

    let style = if ratio >= 1.0 {
        Style::default().fg(theme::SUCCESS)
    } else {
        Style::default().fg(theme::ACCENT)
    };

    let gauge = Gauge::default()
        .block(Block::bordered().border_style(theme::border(false)))
        .gauge_style(style)
        .ratio(ratio)
        .label(progress_label(progress));

    frame.render_widget(gauge, area);
}

/// Text drawn over the gauge
pub fn progress_label(progress: &ProgressReporter) -> String {
    if progress.total() == 0 {
        return "size unknown".to_string();
    }
    format!(
        "{:.0}%  {} / {}",
        progress.percentage() * 100.0,
        amount(progress.advanced()),
        amount(progress.total())
    )
}

fn amount(bytes: u64) -> String {
    if bytes == 0 {
        "0 B".to_string()
    } else {
        format_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_halfway() {
        let mut progress = ProgressReporter::new(2048);
        progress.report(1024);
        assert_eq!(progress_label(&progress), "50%  1.0 KiB / 2.0 KiB");
    }

    #[test]
    fn test_label_at_start() {
        assert_eq!(progress_label(&ProgressReporter::new(2048)), "0%  0 B / 2.0 KiB");
    }

    #[test]
    fn test_label_unknown_size() {
        assert_eq!(progress_label(&ProgressReporter::new(0)), "size unknown");
    }
}
