//! Application messages and the background work they can request

use crate::downloader::DownloadJob;
use crate::extractor::{StreamVariant, VideoRef};
use crate::tui::worker::Ticket;
use std::path::PathBuf;

/// Application messages
#[derive(Debug, Clone)]
pub enum Message {
    // Input events
    UrlChanged(String),
    Paste(String),

    // Lookup events
    LookupFinished {
        ticket: Ticket,
        result: Result<VideoRef, String>,
    },

    // Stream picker
    StreamSelected(StreamVariant),

    // Download events
    DownloadPressed,
    DownloadProgress {
        ticket: Ticket,
        remaining: u64,
    },
    DownloadFinished {
        ticket: Ticket,
        result: Result<PathBuf, String>,
    },

    // Download location
    PathSelected(PathBuf),
    DirListed {
        path: PathBuf,
        children: Vec<PathBuf>,
    },
    TreeToggled(bool),
    SetDefaultPressed,
    DefaultSaved {
        ticket: Ticket,
        result: Result<PathBuf, String>,
    },

    // System
    Quit,
}

/// Background work requested by [`App::update`](crate::tui::App::update)
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    None,
    Lookup { ticket: Ticket, url: String },
    Download { ticket: Ticket, job: DownloadJob },
    SaveDefault { ticket: Ticket, path: PathBuf },
    ListDir { path: PathBuf },
    Quit,
}

