//! audioloader - download the audio track of a video from the terminal
//!
//! Paste a video URL, pick one of its audio-only streams and a destination
//! directory, and watch the transfer progress.

use anyhow::Result;

fn main() -> Result<()> {
    audioloader::tui::run()
}
