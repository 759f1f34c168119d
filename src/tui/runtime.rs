//! Terminal setup and the main event loop
//!
//! The main thread owns [`App`] and the terminal. Background work runs on a
//! tokio runtime; its results come back over a channel that is drained once
//! per tick, before the next frame is drawn.

use crate::downloader::DownloadEngine;
use crate::extractor::YtDlpExtractor;
use crate::tui::app::App;
use crate::tui::executor::Executor;
use crate::tui::message::{Command, Message};
use crate::tui::view;
use crate::utils::config::ConfigStore;
use crate::utils::logging;
use anyhow::{Context, Result};
use ratatui::crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste, Event};
use ratatui::crossterm::execute;
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{error, info};

const TICK: Duration = Duration::from_millis(100);

/// Start the application and block until the user quits
pub fn run() -> Result<()> {
    let _log_guard = logging::init();
    info!("audioloader v{} starting", env!("CARGO_PKG_VERSION"));

    let config = ConfigStore::default();
    info!("Using config file {:?}", config.path());
    let preferences = config.load();
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));

    let runtime = Runtime::new().context("Failed to create tokio runtime")?;
    let (tx, rx) = mpsc::unbounded_channel();

    let executor = Executor::new(
        runtime.handle().clone(),
        Arc::new(YtDlpExtractor::new()),
        Arc::new(DownloadEngine::new()?),
        config,
        tx,
    );
    let mut app = App::new(&preferences, home);
    executor.dispatch(app.init());

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        default_hook(info);
    }));

    let mut terminal = ratatui::init();
    if let Err(e) = execute!(std::io::stdout(), EnableBracketedPaste) {
        error!("Bracketed paste unavailable: {}", e);
    }

    let result = event_loop(&mut terminal, &mut app, &executor, rx);

    let _ = execute!(std::io::stdout(), DisableBracketedPaste);
    ratatui::restore();

    // Transfers still running are abandoned on quit
    runtime.shutdown_background();
    info!("audioloader stopped");
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    executor: &Executor,
    mut rx: UnboundedReceiver<Message>,
) -> Result<()> {
    loop {
        while let Ok(message) = rx.try_recv() {
            let command = app.update(message);
            executor.dispatch(command);
        }

        terminal
            .draw(|frame| view::draw(frame, app))
            .context("Failed to draw terminal frame")?;

        if event::poll(TICK).context("Failed to poll for terminal events")? {
            let command = match event::read().context("Failed to read terminal event")? {
                Event::Key(key) => app.handle_key(key),
                Event::Paste(text) => app.update(Message::Paste(text)),
                _ => Command::None,
            };
            executor.dispatch(command);
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}
