//! Runs [`Command`]s on the tokio runtime and reports back as [`Message`]s

use crate::downloader::{DownloadEngine, DownloadJob};
use crate::extractor::Extractor;
use crate::tui::components::directory_picker::list_dirs;
use crate::tui::message::{Command, Message};
use crate::tui::worker::Ticket;
use crate::utils::config::ConfigStore;
use crate::utils::error::AppError;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, warn};

/// Background side of the application.
///
/// Tasks never touch UI state; each one ends by sending exactly one result
/// message carrying the ticket it was started with.
#[derive(Clone)]
pub struct Executor {
    handle: Handle,
    extractor: Arc<dyn Extractor>,
    engine: Arc<DownloadEngine>,
    config: ConfigStore,
    tx: UnboundedSender<Message>,
}

impl Executor {
    pub fn new(
        handle: Handle,
        extractor: Arc<dyn Extractor>,
        engine: Arc<DownloadEngine>,
        config: ConfigStore,
        tx: UnboundedSender<Message>,
    ) -> Self {
        Self {
            handle,
            extractor,
            engine,
            config,
            tx,
        }
    }

    pub fn dispatch(&self, command: Command) {
        match command {
            Command::None | Command::Quit => {}
            Command::Lookup { ticket, url } => self.spawn_lookup(ticket, url),
            Command::Download { ticket, job } => self.spawn_download(ticket, job),
            Command::SaveDefault { ticket, path } => self.spawn_save(ticket, path),
            Command::ListDir { path } => self.spawn_list(path),
        }
    }

    fn spawn_lookup(&self, ticket: Ticket, url: String) {
        let extractor = Arc::clone(&self.extractor);
        let tx = self.tx.clone();

        self.handle.spawn(async move {
            if !extractor.supports(&url) {
                debug!("{} does not handle {}", extractor.id(), url);
                send(&tx, Message::LookupFinished {
                    ticket,
                    result: Err(format!("Unsupported URL: {}", url)),
                });
                return;
            }

            let result = extractor.resolve(&url).await.map_err(|e| {
                let quiet = e
                    .downcast_ref::<AppError>()
                    .is_some_and(AppError::is_not_found);
                if quiet {
                    debug!("Nothing found for {}: {}", url, e);
                } else {
                    warn!("Lookup of {} failed: {:#}", url, e);
                }
                format!("{:#}", e)
            });

            send(&tx, Message::LookupFinished { ticket, result });
        });
    }

    fn spawn_download(&self, ticket: Ticket, job: DownloadJob) {
        let engine = Arc::clone(&self.engine);
        let tx = self.tx.clone();

        self.handle.spawn(async move {
            let progress_tx = tx.clone();
            let result = engine
                .download(&job, move |remaining| {
                    send(&progress_tx, Message::DownloadProgress { ticket, remaining });
                })
                .await
                .map_err(|e| {
                    error!("Transfer of {} failed: {:#}", job.stream.format_id, e);
                    format!("{:#}", e)
                });

            send(&tx, Message::DownloadFinished { ticket, result });
        });
    }

    fn spawn_save(&self, ticket: Ticket, path: PathBuf) {
        let config = self.config.clone();
        let tx = self.tx.clone();

        self.handle.spawn_blocking(move || {
            let result = config
                .save_download_location(&path)
                .map(|()| path)
                .map_err(|e| {
                    warn!("Saving default location failed: {:#}", e);
                    format!("{:#}", e)
                });

            send(&tx, Message::DefaultSaved { ticket, result });
        });
    }

    fn spawn_list(&self, path: PathBuf) {
        let tx = self.tx.clone();

        self.handle.spawn_blocking(move || {
            let children = list_dirs(&path);
            send(&tx, Message::DirListed { path, children });
        });
    }
}

fn send(tx: &UnboundedSender<Message>, message: Message) {
    if tx.send(message).is_err() {
        debug!("UI has shut down, dropping result");
    }
}
