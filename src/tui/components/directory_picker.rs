//! Download location picker
//!
//! A lazily expanded tree of directories rooted at the home directory. Hidden
//! entries and files are never shown. Moving the highlight changes the
//! selected path; the switch only hides the tree and never touches the
//! selection.
//!
//! The picker never reads the filesystem itself. Expanding a node returns the
//! directory to list; the listing comes back through [`DirectoryPicker::children_listed`].

use crate::tui::theme;
use crate::tui::worker::{Policy, Ticket, WorkerSlot};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, ListState, Paragraph};
use ratatui::Frame;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Keep only visible directories
pub fn filter_paths<I>(paths: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    paths
        .into_iter()
        .filter(|p| !is_hidden(p) && p.is_dir())
        .collect()
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

/// Sorted, filtered subdirectories of `path`
pub fn list_dirs(path: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot list {:?}: {}", path, e);
            return Vec::new();
        }
    };

    let mut dirs = filter_paths(entries.flatten().map(|entry| entry.path()));
    dirs.sort_by_key(|p| {
        p.file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    });
    dirs
}

#[derive(Debug, Clone)]
struct DirNode {
    path: PathBuf,
    name: String,
    depth: usize,
    expanded: bool,
    /// Listing requested, not yet arrived
    loading: bool,
}

impl DirNode {
    fn new(path: PathBuf, depth: usize) -> Self {
        let name = if depth == 0 {
            path.display().to_string()
        } else {
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string())
        };
        Self {
            path,
            name,
            depth,
            expanded: false,
            loading: false,
        }
    }
}

/// Which part of the location panel has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationPart {
    Switch,
    SetDefault,
    Tree,
}

#[derive(Debug)]
pub struct DirectoryPicker {
    nodes: Vec<DirNode>,
    state: ListState,
    selected_path: PathBuf,
    default_path: PathBuf,
    tree_visible: bool,
    save_slot: WorkerSlot,
    /// Stored default still being uncovered level by level
    pending_reveal: Option<PathBuf>,
}

impl DirectoryPicker {
    /// Tree under `root`. `default_location` is revealed once the listings
    /// along its path have arrived, starting from [`start`](Self::start).
    pub fn new(root: PathBuf, default_location: PathBuf) -> Self {
        let pending_reveal = default_location
            .starts_with(&root)
            .then(|| default_location.clone());
        let mut picker = Self {
            nodes: vec![DirNode::new(root, 0)],
            state: ListState::default(),
            selected_path: default_location.clone(),
            default_path: default_location.clone(),
            tree_visible: true,
            save_slot: WorkerSlot::new("save-default", Policy::Suppress),
            pending_reveal,
        };
        picker.state.select(Some(0));
        picker
    }

    /// Directory to list first
    pub fn start(&mut self) -> Option<PathBuf> {
        self.expand_at(0)
    }

    /// Insert the subdirectories of `parent`. Returns the next directory to
    /// list while the stored default is still being revealed.
    pub fn children_listed(&mut self, parent: &Path, children: Vec<PathBuf>) -> Option<PathBuf> {
        let Some(idx) = self.nodes.iter().position(|n| n.loading && n.path == parent) else {
            debug!("Listing of {:?} no longer wanted", parent);
            return None;
        };

        let depth = self.nodes[idx].depth;
        let count = children.len();
        self.nodes[idx].loading = false;
        self.nodes[idx].expanded = true;
        let tail = self.nodes.split_off(idx + 1);
        self.nodes
            .extend(children.into_iter().map(|p| DirNode::new(p, depth + 1)));
        self.nodes.extend(tail);
        debug!("Expanded {:?}: {} entries", parent, count);

        if let Some(selected) = self.state.selected() {
            if selected > idx {
                self.state.select(Some(selected + count));
            }
        }

        self.continue_reveal()
    }

    pub fn selected_path(&self) -> &Path {
        &self.selected_path
    }

    pub fn default_path(&self) -> &Path {
        &self.default_path
    }

    pub fn tree_visible(&self) -> bool {
        self.tree_visible
    }

    pub fn set_tree_visible(&mut self, show: bool) {
        self.tree_visible = show;
    }

    pub fn switch_label(&self) -> &'static str {
        if self.tree_visible {
            "Hide:"
        } else {
            "Explore:"
        }
    }

    pub fn banner(&self) -> String {
        format!("Current Location: {}", self.selected_path.display())
    }

    pub fn highlighted(&self) -> Option<&Path> {
        self.state
            .selected()
            .and_then(|i| self.nodes.get(i))
            .map(|n| n.path.as_path())
    }

    /// Paths currently shown in the tree, top to bottom
    pub fn visible_paths(&self) -> Vec<&Path> {
        self.nodes.iter().map(|n| n.path.as_path()).collect()
    }

    pub fn move_down(&mut self) -> Option<PathBuf> {
        let next = self.state.selected().map_or(0, |i| i + 1);
        if next >= self.nodes.len() {
            return None;
        }
        self.highlight(next)
    }

    pub fn move_up(&mut self) -> Option<PathBuf> {
        let prev = self.state.selected()?.checked_sub(1)?;
        self.highlight(prev)
    }

    /// Expand the highlighted directory; returns the directory to list
    pub fn expand(&mut self) -> Option<PathBuf> {
        let idx = self.state.selected()?;
        self.expand_at(idx)
    }

    /// Collapse the highlighted directory, or move to its parent when it is
    /// already collapsed
    pub fn collapse(&mut self) -> Option<PathBuf> {
        let idx = self.state.selected()?;
        if self.nodes[idx].expanded {
            self.collapse_at(idx);
            return None;
        }

        let depth = self.nodes[idx].depth;
        let parent = self.nodes[..idx].iter().rposition(|n| n.depth < depth)?;
        self.highlight(parent)
    }

    /// Expand or collapse the highlighted directory
    pub fn toggle(&mut self) -> Option<PathBuf> {
        let idx = self.state.selected()?;
        if self.nodes[idx].expanded {
            self.collapse_at(idx);
            None
        } else {
            self.expand_at(idx)
        }
    }

    /// Ticket and path for persisting the current selection as the default
    pub fn begin_save(&mut self) -> Option<(Ticket, PathBuf)> {
        let ticket = self.save_slot.begin()?;
        Some((ticket, self.selected_path.clone()))
    }

    pub fn finish_save(&mut self, ticket: Ticket, result: &Result<PathBuf, String>) -> bool {
        if !self.save_slot.finish(ticket) {
            return false;
        }
        if let Ok(path) = result {
            self.default_path = path.clone();
        }
        true
    }

    fn highlight(&mut self, idx: usize) -> Option<PathBuf> {
        if self.state.selected() == Some(idx) {
            return None;
        }
        // The user took over; stop steering the highlight
        self.pending_reveal = None;
        self.state.select(Some(idx));
        self.selected_path = self.nodes[idx].path.clone();
        Some(self.selected_path.clone())
    }

    fn expand_at(&mut self, idx: usize) -> Option<PathBuf> {
        let node = &mut self.nodes[idx];
        if node.expanded || node.loading {
            return None;
        }
        node.loading = true;
        Some(node.path.clone())
    }

    fn collapse_at(&mut self, idx: usize) {
        let depth = self.nodes[idx].depth;
        let end = self.nodes[idx + 1..]
            .iter()
            .position(|n| n.depth <= depth)
            .map_or(self.nodes.len(), |p| idx + 1 + p);
        self.nodes.drain(idx + 1..end);
        self.nodes[idx].expanded = false;
    }

    /// Walk towards the pending default through what is already listed.
    /// Highlights it without emitting a selection once it is visible.
    fn continue_reveal(&mut self) -> Option<PathBuf> {
        let target = self.pending_reveal.clone()?;
        let Ok(relative) = target.strip_prefix(&self.nodes[0].path) else {
            self.pending_reveal = None;
            return None;
        };

        let mut idx = 0;
        for component in relative.components() {
            if !self.nodes[idx].expanded {
                return self.expand_at(idx);
            }
            let wanted = self.nodes[idx].path.join(component);
            let depth = self.nodes[idx].depth + 1;
            let found = self.nodes[idx + 1..]
                .iter()
                .take_while(|n| n.depth >= depth)
                .position(|n| n.depth == depth && n.path == wanted);
            match found {
                Some(offset) => idx += 1 + offset,
                None => break,
            }
        }

        self.pending_reveal = None;
        self.state.select(Some(idx));
        None
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: Option<LocationPart>) {
        let block = Block::bordered()
            .title(" Download location ")
            .border_style(theme::border(focused.is_some()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [banner_area, controls_area, tree_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .areas(inner);

        frame.render_widget(
            Paragraph::new(self.banner()).style(Style::default().fg(theme::TEXT_PRIMARY)),
            banner_area,
        );

        let [switch_area, default_area, _] = Layout::horizontal([
            Constraint::Length(16),
            Constraint::Length(18),
            Constraint::Min(0),
        ])
        .areas(controls_area);

        let switch_mark = if self.tree_visible { "[on] " } else { "[off]" };
        frame.render_widget(
            Paragraph::new(format!("{} {}", self.switch_label(), switch_mark)).block(
                Block::bordered().border_style(theme::border(focused == Some(LocationPart::Switch))),
            ),
            switch_area,
        );
        frame.render_widget(
            Paragraph::new("Set as default").block(
                Block::bordered()
                    .border_style(theme::border(focused == Some(LocationPart::SetDefault))),
            ),
            default_area,
        );

        if !self.tree_visible {
            return;
        }

        let items: Vec<ListItem> = self
            .nodes
            .iter()
            .map(|node| {
                let marker = if node.loading {
                    "… "
                } else if node.expanded {
                    "▾ "
                } else {
                    "▸ "
                };
                let mut spans = vec![
                    Span::raw("  ".repeat(node.depth)),
                    Span::styled(marker, Style::default().fg(theme::TEXT_SECONDARY)),
                    Span::raw(node.name.clone()),
                ];
                if node.path == self.default_path {
                    spans.push(Span::styled(" (default)", Style::default().fg(theme::SUCCESS)));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let tree = List::new(items)
            .block(
                Block::bordered().border_style(theme::border(focused == Some(LocationPart::Tree))),
            )
            .highlight_style(theme::list_highlight());

        frame.render_stateful_widget(tree, tree_area, &mut self.state);
    }
}
