//! Application state and message routing

use crate::downloader::ProgressReporter;
use crate::extractor::VideoRef;
use crate::tui::clipboard;
use crate::tui::components::{DirectoryPicker, DownloadControl, StreamPicker, Trigger, UrlInput};
use crate::tui::message::{Command, Message};
use crate::tui::worker::{Policy, WorkerSlot};
use crate::utils::config::Preferences;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Widget that receives keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Url,
    Results,
    Streams,
    Download,
    Switch,
    SetDefault,
    Tree,
}

/// Main application state
pub struct App {
    pub(crate) url_input: UrlInput,
    pub(crate) summary: String,
    video: Option<VideoRef>,
    pub(crate) stream_picker: StreamPicker,
    pub(crate) download: DownloadControl,
    pub(crate) progress: ProgressReporter,
    pub(crate) progress_visible: bool,
    pub(crate) location: DirectoryPicker,
    pub(crate) focus: Focus,
    pub(crate) status_message: String,
    lookup_slot: WorkerSlot,
    should_quit: bool,
}

impl App {
    pub fn new(preferences: &Preferences, home: PathBuf) -> Self {
        let location = DirectoryPicker::new(home, preferences.download_location.clone());
        let download = DownloadControl::new(location.selected_path().to_path_buf());

        Self {
            url_input: UrlInput::default(),
            summary: String::new(),
            video: None,
            stream_picker: StreamPicker::default(),
            download,
            progress: ProgressReporter::default(),
            progress_visible: false,
            location,
            focus: Focus::Url,
            status_message: String::new(),
            lookup_slot: WorkerSlot::new("lookup", Policy::Supersede),
            should_quit: false,
        }
    }

    /// Work to start before the first frame
    pub fn init(&mut self) -> Command {
        list_dir(self.location.start())
    }

    pub fn video(&self) -> Option<&VideoRef> {
        self.video.as_ref()
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn progress(&self) -> &ProgressReporter {
        &self.progress
    }

    pub fn download(&self) -> &DownloadControl {
        &self.download
    }

    pub fn location(&self) -> &DirectoryPicker {
        &self.location
    }

    pub fn stream_picker(&self) -> &StreamPicker {
        &self.stream_picker
    }

    pub fn progress_visible(&self) -> bool {
        self.progress_visible
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn update(&mut self, message: Message) -> Command {
        match message {
            Message::UrlChanged(url) => {
                let url = url.trim().to_string();
                if url.is_empty() {
                    // Any lookup still running is now irrelevant
                    self.lookup_slot.invalidate();
                    self.show_not_found();
                    return Command::None;
                }

                self.summary = "Searching...".to_string();
                match self.lookup_slot.begin() {
                    Some(ticket) => Command::Lookup { ticket, url },
                    None => Command::None,
                }
            }

            Message::Paste(text) => {
                self.url_input.insert_str(&text);
                let value = self.url_input.value().to_string();
                self.update(Message::UrlChanged(value))
            }

            Message::LookupFinished { ticket, result } => {
                if !self.lookup_slot.finish(ticket) {
                    return Command::None;
                }

                match result {
                    Ok(video) => {
                        info!("Found {} audio streams for {}", video.streams.len(), video.id);
                        self.summary = video.summary();
                        let first = self.stream_picker.set_options(video.streams.clone());
                        self.video = Some(video);

                        match first {
                            Some(stream) => {
                                self.set_results_visible(true);
                                self.update(Message::StreamSelected(stream))
                            }
                            None => {
                                self.show_not_found();
                                Command::None
                            }
                        }
                    }
                    Err(reason) => {
                        debug!("Lookup ended without a video: {}", reason);
                        self.show_not_found();
                        Command::None
                    }
                }
            }

            Message::StreamSelected(stream) => {
                debug!("Selected stream {} ({} bytes)", stream.format_id, stream.size);
                self.progress.reset(stream.size);
                self.download.set_stream(stream);
                Command::None
            }

            Message::DownloadPressed => {
                let title = self.video.as_ref().map(|v| v.title.clone()).unwrap_or_default();
                match self.download.trigger(&title) {
                    Trigger::Start(ticket, job) => {
                        self.progress.reset(job.stream.size);
                        self.status_message =
                            format!("Downloading to {}", job.output_path().display());
                        Command::Download { ticket, job }
                    }
                    Trigger::NoStream => Command::None,
                    Trigger::Busy => {
                        self.status_message = "A download is already running".to_string();
                        Command::None
                    }
                }
            }

            Message::DownloadProgress { ticket, remaining } => {
                if self.download.accepts_progress(ticket) {
                    self.progress.report(remaining);
                }
                Command::None
            }

            Message::DownloadFinished { ticket, result } => {
                if self.download.finish(ticket, &result) {
                    self.status_message = match &result {
                        Ok(path) => format!("Saved {}", path.display()),
                        Err(_) => String::new(),
                    };
                }
                Command::None
            }

            Message::PathSelected(path) => {
                debug!("Destination set to {:?}", path);
                self.download.destination = path;
                Command::None
            }

            Message::DirListed { path, children } => {
                list_dir(self.location.children_listed(&path, children))
            }

            Message::TreeToggled(show) => {
                self.location.set_tree_visible(show);
                if !show {
                    self.focus = Focus::Results;
                }
                Command::None
            }

            Message::SetDefaultPressed => match self.location.begin_save() {
                Some((ticket, path)) => Command::SaveDefault { ticket, path },
                None => Command::None,
            },

            Message::DefaultSaved { ticket, result } => {
                if self.location.finish_save(ticket, &result) {
                    self.status_message = match result {
                        Ok(path) => format!("Default location set to {}", path.display()),
                        Err(reason) => format!("Could not save default: {}", reason),
                    };
                }
                Command::None
            }

            Message::Quit => {
                self.should_quit = true;
                Command::Quit
            }
        }
    }

    /// Translate a key press into messages for the focused widget
    pub fn handle_key(&mut self, key: KeyEvent) -> Command {
        if key.kind != KeyEventKind::Press {
            return Command::None;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return self.update(Message::Quit),
            KeyCode::Char('c') if ctrl => return self.update(Message::Quit),
            KeyCode::Char('v') if ctrl => {
                return match clipboard::get_clipboard_content() {
                    Ok(text) => self.update(Message::Paste(text)),
                    Err(e) => {
                        warn!("{}", e);
                        self.status_message = e;
                        Command::None
                    }
                };
            }
            KeyCode::Tab => {
                self.cycle_focus(true);
                return Command::None;
            }
            KeyCode::BackTab => {
                self.cycle_focus(false);
                return Command::None;
            }
            _ => {}
        }

        let pressed = matches!(key.code, KeyCode::Enter | KeyCode::Char(' '));
        match self.focus {
            Focus::Url => {
                if self.url_input.handle_key(key) {
                    let value = self.url_input.value().to_string();
                    self.update(Message::UrlChanged(value))
                } else {
                    Command::None
                }
            }
            Focus::Results => Command::None,
            Focus::Streams => {
                let selected = match key.code {
                    KeyCode::Up => self.stream_picker.select_previous(),
                    KeyCode::Down => self.stream_picker.select_next(),
                    _ => None,
                };
                match selected {
                    Some(stream) => self.update(Message::StreamSelected(stream)),
                    None => Command::None,
                }
            }
            Focus::Download if pressed => self.update(Message::DownloadPressed),
            Focus::Switch if pressed => {
                let show = !self.location.tree_visible();
                self.update(Message::TreeToggled(show))
            }
            Focus::SetDefault if pressed => self.update(Message::SetDefaultPressed),
            Focus::Tree => {
                let selected = match key.code {
                    KeyCode::Up => self.location.move_up(),
                    KeyCode::Down => self.location.move_down(),
                    KeyCode::Left => self.location.collapse(),
                    KeyCode::Right => return list_dir(self.location.expand()),
                    KeyCode::Enter => return list_dir(self.location.toggle()),
                    _ => None,
                };
                match selected {
                    Some(path) => self.update(Message::PathSelected(path)),
                    None => Command::None,
                }
            }
            _ => Command::None,
        }
    }

    fn set_results_visible(&mut self, visible: bool) {
        self.stream_picker.visible = visible;
        self.download.visible = visible;
        self.progress_visible = visible;
        if !self.focus_order().contains(&self.focus) {
            self.focus = Focus::Url;
        }
    }

    fn show_not_found(&mut self) {
        self.video = None;
        self.summary.clear();
        self.stream_picker.clear();
        self.download.clear_stream();
        self.progress.reset(0);
        self.set_results_visible(false);
    }

    fn focus_order(&self) -> Vec<Focus> {
        let mut order = vec![Focus::Url, Focus::Results];
        if self.stream_picker.visible && !self.stream_picker.streams().is_empty() {
            order.push(Focus::Streams);
        }
        if self.download.visible {
            order.push(Focus::Download);
        }
        order.push(Focus::Switch);
        order.push(Focus::SetDefault);
        if self.location.tree_visible() {
            order.push(Focus::Tree);
        }
        order
    }

    fn cycle_focus(&mut self, forward: bool) {
        let order = self.focus_order();
        let len = order.len();
        let pos = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (pos + 1) % len
        } else {
            (pos + len - 1) % len
        };
        self.focus = order[next];
    }
}

fn list_dir(request: Option<PathBuf>) -> Command {
    match request {
        Some(path) => Command::ListDir { path },
        None => Command::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::DownloadState;
    use crate::extractor::StreamVariant;
    use crate::tui::components::directory_picker::list_dirs;
    use tempfile::{tempdir, TempDir};

    fn variant(id: &str, size: u64) -> StreamVariant {
        StreamVariant {
            format_id: id.into(),
            ext: "m4a".into(),
            size,
            label: format!("stream {}", id),
            url: format!("https://media.example/{}", id),
        }
    }

    fn video() -> VideoRef {
        VideoRef {
            id: "dQw4w9WgXcQ".into(),
            title: "Never Gonna Give You Up".into(),
            author: "Rick Astley".into(),
            duration: Some(213),
            url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".into(),
            streams: vec![variant("139", 1_000), variant("140", 3_000)],
        }
    }

    fn app() -> (App, TempDir) {
        let home = tempdir().unwrap();
        std::fs::create_dir_all(home.path().join("Music")).unwrap();
        let prefs = Preferences {
            download_location: home.path().to_path_buf(),
        };
        let mut app = App::new(&prefs, home.path().to_path_buf());
        let command = app.init();
        list_now(&mut app, command);
        (app, home)
    }

    /// Answer directory listings in place of the executor
    fn list_now(app: &mut App, mut command: Command) {
        while let Command::ListDir { path } = command {
            let children = list_dirs(&path);
            command = app.update(Message::DirListed { path, children });
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    /// Type a URL and complete its lookup with `result`
    fn lookup(app: &mut App, result: Result<VideoRef, String>) -> Command {
        let url = "https://youtu.be/dQw4w9WgXcQ".to_string();
        let Command::Lookup { ticket, .. } = app.update(Message::UrlChanged(url)) else {
            panic!("expected a lookup");
        };
        app.update(Message::LookupFinished { ticket, result })
    }

    #[test]
    fn test_startup_state() {
        let (app, home) = app();
        assert_eq!(app.focus(), Focus::Url);
        assert!(!app.stream_picker().visible);
        assert!(!app.progress_visible());
        assert_eq!(app.download().destination, home.path());
        assert_eq!(app.location().selected_path(), home.path());
    }

    #[test]
    fn test_empty_url_hides_results() {
        let (mut app, _home) = app();
        lookup(&mut app, Ok(video()));
        assert!(app.video().is_some());

        assert_eq!(app.update(Message::UrlChanged(String::new())), Command::None);
        assert!(app.video().is_none());
        assert_eq!(app.summary(), "");
        assert!(!app.stream_picker().visible);
        assert!(!app.download().visible);
        assert!(!app.progress_visible());
    }

    #[test]
    fn test_url_starts_lookup() {
        let (mut app, _home) = app();
        let command = app.update(Message::UrlChanged("  https://youtu.be/dQw4w9WgXcQ ".into()));
        assert!(matches!(command, Command::Lookup { ref url, .. } if url == "https://youtu.be/dQw4w9WgXcQ"));
        assert_eq!(app.summary(), "Searching...");
    }

    #[test]
    fn test_successful_lookup_selects_first_stream() {
        let (mut app, _home) = app();
        lookup(&mut app, Ok(video()));

        assert!(app.stream_picker().visible);
        assert!(app.download().visible);
        assert!(app.progress_visible());
        assert!(app.summary().contains("Never Gonna Give You Up"));
        assert_eq!(app.download().stream().unwrap().format_id, "139");
        assert_eq!(app.progress().total(), 1_000);
        assert_eq!(app.progress().advanced(), 0);
    }

    #[test]
    fn test_failed_lookup_matches_empty_state() {
        let (mut app, _home) = app();
        lookup(&mut app, Err("not a video".into()));

        assert!(app.video().is_none());
        assert_eq!(app.summary(), "");
        assert!(!app.stream_picker().visible);
        assert!(!app.download().visible);
        assert_eq!(app.status_message(), "");
    }

    #[test]
    fn test_stale_lookup_is_dropped() {
        let (mut app, _home) = app();
        let Command::Lookup { ticket: old, .. } = app.update(Message::UrlChanged("a".into())) else {
            panic!("expected a lookup");
        };
        let Command::Lookup { ticket: new, .. } = app.update(Message::UrlChanged("ab".into())) else {
            panic!("expected a lookup");
        };

        app.update(Message::LookupFinished { ticket: old, result: Ok(video()) });
        assert!(app.video().is_none());
        assert_eq!(app.summary(), "Searching...");

        app.update(Message::LookupFinished { ticket: new, result: Err("nope".into()) });
        assert!(app.video().is_none());
        assert_eq!(app.summary(), "");
    }

    #[test]
    fn test_stream_selection_resets_progress() {
        let (mut app, _home) = app();
        lookup(&mut app, Ok(video()));
        let Command::Download { ticket, .. } = app.update(Message::DownloadPressed) else {
            panic!("expected a download");
        };
        app.update(Message::DownloadProgress { ticket, remaining: 400 });
        assert_eq!(app.progress().advanced(), 600);

        app.update(Message::StreamSelected(variant("140", 3_000)));
        assert_eq!(app.progress().total(), 3_000);
        assert_eq!(app.progress().advanced(), 0);
        assert_eq!(app.download().label(), "Download");

        // Progress from the transfer of the previous stream no longer counts
        app.update(Message::DownloadProgress { ticket, remaining: 0 });
        assert_eq!(app.progress().advanced(), 0);
    }

    #[test]
    fn test_download_without_stream() {
        let (mut app, _home) = app();
        assert_eq!(app.update(Message::DownloadPressed), Command::None);
        assert_eq!(app.download().label(), "Error. Click to retry");
    }

    #[test]
    fn test_second_download_press_is_ignored() {
        let (mut app, _home) = app();
        lookup(&mut app, Ok(video()));

        let Command::Download { ticket, job } = app.update(Message::DownloadPressed) else {
            panic!("expected a download");
        };
        assert_eq!(job.stream.format_id, "139");
        assert_eq!(app.update(Message::DownloadPressed), Command::None);

        app.update(Message::DownloadFinished {
            ticket,
            result: Ok(job.output_path()),
        });
        assert_eq!(app.download().state(), &DownloadState::Done);
        assert!(app.status_message().starts_with("Saved"));
    }

    #[test]
    fn test_transfer_failure_is_retryable() {
        let (mut app, _home) = app();
        lookup(&mut app, Ok(video()));
        let Command::Download { ticket, .. } = app.update(Message::DownloadPressed) else {
            panic!("expected a download");
        };

        app.update(Message::DownloadFinished {
            ticket,
            result: Err("HTTP 403 Forbidden".into()),
        });
        assert_eq!(app.download().label(), "Error: HTTP 403 Forbidden. Click to retry");
        assert!(matches!(app.update(Message::DownloadPressed), Command::Download { .. }));
    }

    #[test]
    fn test_path_selection_retargets_download() {
        let (mut app, home) = app();
        lookup(&mut app, Ok(video()));
        app.focus = Focus::Tree;

        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.download().destination, home.path().join("Music"));

        let Command::Download { job, .. } = app.update(Message::DownloadPressed) else {
            panic!("expected a download");
        };
        assert_eq!(job.destination, home.path().join("Music"));
    }

    #[test]
    fn test_tree_toggle_keeps_selection() {
        let (mut app, home) = app();
        app.focus = Focus::Tree;
        app.handle_key(key(KeyCode::Down));

        app.focus = Focus::Switch;
        app.handle_key(key(KeyCode::Enter));
        assert!(!app.location().tree_visible());
        assert_eq!(app.focus(), Focus::Results);
        assert_eq!(app.location().selected_path(), home.path().join("Music"));

        app.update(Message::TreeToggled(true));
        assert!(app.location().tree_visible());
        assert_eq!(app.location().selected_path(), home.path().join("Music"));
    }

    #[test]
    fn test_set_default_is_exclusive() {
        let (mut app, home) = app();
        let Command::SaveDefault { ticket, path } = app.update(Message::SetDefaultPressed) else {
            panic!("expected a save");
        };
        assert_eq!(path, home.path());
        assert_eq!(app.update(Message::SetDefaultPressed), Command::None);

        app.update(Message::DefaultSaved { ticket, result: Ok(path.clone()) });
        assert_eq!(
            app.status_message(),
            format!("Default location set to {}", path.display())
        );
    }

    #[test]
    fn test_focus_cycles_visible_controls() {
        let (mut app, _home) = app();
        let mut seen = vec![app.focus()];
        for _ in 0..5 {
            app.handle_key(key(KeyCode::Tab));
            seen.push(app.focus());
        }
        // Download starts visible, the stream list does not
        assert_eq!(
            seen,
            vec![
                Focus::Url,
                Focus::Results,
                Focus::Download,
                Focus::Switch,
                Focus::SetDefault,
                Focus::Tree
            ]
        );

        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus(), Focus::Url);
        app.handle_key(key(KeyCode::BackTab));
        assert_eq!(app.focus(), Focus::Tree);
    }

    #[test]
    fn test_typing_triggers_lookup() {
        let (mut app, _home) = app();
        let command = app.handle_key(key(KeyCode::Char('x')));
        assert!(matches!(command, Command::Lookup { ref url, .. } if url == "x"));

        let command = app.handle_key(key(KeyCode::Backspace));
        assert_eq!(command, Command::None);
        assert_eq!(app.summary(), "");
    }

    #[test]
    fn test_tree_expansion_is_requested_not_read() {
        let (mut app, home) = app();
        std::fs::create_dir(home.path().join("Music/Live")).unwrap();
        app.focus = Focus::Tree;
        app.handle_key(key(KeyCode::Down));

        let command = app.handle_key(key(KeyCode::Right));
        assert_eq!(
            command,
            Command::ListDir {
                path: home.path().join("Music")
            }
        );
        assert!(!app
            .location()
            .visible_paths()
            .contains(&home.path().join("Music/Live").as_path()));

        list_now(&mut app, command);
        assert!(app
            .location()
            .visible_paths()
            .contains(&home.path().join("Music/Live").as_path()));
    }

    #[test]
    fn test_escape_quits() {
        let (mut app, _home) = app();
        assert_eq!(app.handle_key(key(KeyCode::Esc)), Command::Quit);
        assert!(app.should_quit());
    }
}
