//! Download control

use crate::downloader::{DownloadJob, DownloadState};
use crate::extractor::StreamVariant;
use crate::tui::theme;
use crate::tui::worker::{Policy, Ticket, WorkerSlot};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;
use std::path::PathBuf;
use tracing::{error, info};

/// Outcome of pressing the download button
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    /// A transfer should start with this ticket
    Start(Ticket, DownloadJob),
    /// No stream selected; the control now shows a retryable error
    NoStream,
    /// A transfer is already running for this control
    Busy,
}

/// Owns the selected stream and destination, and the state of the transfer
#[derive(Debug)]
pub struct DownloadControl {
    stream: Option<StreamVariant>,
    pub destination: PathBuf,
    state: DownloadState,
    slot: WorkerSlot,
    pub visible: bool,
}

impl DownloadControl {
    pub fn new(destination: PathBuf) -> Self {
        Self {
            stream: None,
            destination,
            state: DownloadState::Idle,
            slot: WorkerSlot::new("download", Policy::Suppress),
            visible: true,
        }
    }

    pub fn stream(&self) -> Option<&StreamVariant> {
        self.stream.as_ref()
    }

    pub fn state(&self) -> &DownloadState {
        &self.state
    }

    pub fn label(&self) -> String {
        self.state.label()
    }

    /// Retarget the control. Progress of a transfer still running for the
    /// previous stream is ignored from now on.
    pub fn set_stream(&mut self, stream: StreamVariant) {
        if self.slot.is_busy() {
            self.slot.invalidate();
        }
        self.stream = Some(stream);
        self.state = DownloadState::Idle;
    }

    pub fn clear_stream(&mut self) {
        if self.slot.is_busy() {
            self.slot.invalidate();
        }
        self.stream = None;
        self.state = DownloadState::Idle;
    }

    pub fn trigger(&mut self, title: &str) -> Trigger {
        let Some(stream) = self.stream.clone() else {
            self.state = DownloadState::Error(None);
            return Trigger::NoStream;
        };

        let Some(ticket) = self.slot.begin() else {
            return Trigger::Busy;
        };

        self.state = DownloadState::Downloading;
        Trigger::Start(
            ticket,
            DownloadJob {
                stream,
                title: title.to_string(),
                destination: self.destination.clone(),
            },
        )
    }

    /// Whether progress for `ticket` belongs to the current stream
    pub fn accepts_progress(&self, ticket: Ticket) -> bool {
        self.slot.is_current(ticket)
    }

    /// Record the end of a transfer; returns whether it was the current one
    pub fn finish(&mut self, ticket: Ticket, result: &Result<PathBuf, String>) -> bool {
        if !self.slot.finish(ticket) {
            return false;
        }
        self.state = match result {
            Ok(path) => {
                info!("Download complete: {:?}", path);
                DownloadState::Done
            }
            Err(reason) => {
                error!("Download failed: {}", reason);
                DownloadState::Error(Some(reason.clone()))
            }
        };
        true
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let color = match self.state {
            DownloadState::Idle => theme::TEXT_PRIMARY,
            DownloadState::Downloading => theme::WARNING,
            DownloadState::Done => theme::SUCCESS,
            DownloadState::Error(_) => theme::DANGER,
        };

        let button = Paragraph::new(self.label())
            .style(Style::default().fg(color))
            .alignment(Alignment::Center)
            .block(Block::bordered().border_style(theme::border(focused)));

        frame.render_widget(button, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(id: &str) -> StreamVariant {
        StreamVariant {
            format_id: id.into(),
            ext: "m4a".into(),
            size: 100,
            label: id.into(),
            url: format!("https://m/{}", id),
        }
    }

    #[test]
    fn test_trigger_without_stream() {
        let mut control = DownloadControl::new(PathBuf::from("/tmp"));
        assert_eq!(control.trigger("t"), Trigger::NoStream);
        assert_eq!(control.label(), "Error. Click to retry");

        // Still retryable once a stream exists
        control.set_stream(variant("140"));
        assert!(matches!(control.trigger("t"), Trigger::Start(..)));
    }

    #[test]
    fn test_second_trigger_is_suppressed() {
        let mut control = DownloadControl::new(PathBuf::from("/tmp"));
        control.set_stream(variant("140"));

        let Trigger::Start(ticket, job) = control.trigger("Song") else {
            panic!("expected a transfer");
        };
        assert_eq!(job.destination, PathBuf::from("/tmp"));
        assert_eq!(control.label(), "Downloading...");
        assert_eq!(control.trigger("Song"), Trigger::Busy);

        assert!(control.finish(ticket, &Ok(PathBuf::from("/tmp/Song.m4a"))));
        assert_eq!(control.label(), "Done");
        assert!(matches!(control.trigger("Song"), Trigger::Start(..)));
    }

    #[test]
    fn test_failure_is_retryable() {
        let mut control = DownloadControl::new(PathBuf::from("/tmp"));
        control.set_stream(variant("140"));
        let Trigger::Start(ticket, _) = control.trigger("Song") else {
            panic!("expected a transfer");
        };

        control.finish(ticket, &Err("disk full".to_string()));
        assert_eq!(control.label(), "Error: disk full. Click to retry");
        assert!(matches!(control.trigger("Song"), Trigger::Start(..)));
    }

    #[test]
    fn test_reselect_during_transfer_ignores_old_progress() {
        let mut control = DownloadControl::new(PathBuf::from("/tmp"));
        control.set_stream(variant("139"));
        let Trigger::Start(ticket, _) = control.trigger("Song") else {
            panic!("expected a transfer");
        };

        control.set_stream(variant("140"));
        assert!(!control.accepts_progress(ticket));
        assert_eq!(control.label(), "Download");

        // The old transfer still holds the control until it ends
        assert_eq!(control.trigger("Song"), Trigger::Busy);
        assert!(!control.finish(ticket, &Ok(PathBuf::from("/tmp/Song.m4a"))));
        assert_eq!(control.label(), "Download");
        assert!(matches!(control.trigger("Song"), Trigger::Start(..)));
    }
}
