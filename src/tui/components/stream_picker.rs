//! Stream picker component

use crate::extractor::StreamVariant;
use crate::tui::theme;
use ratatui::layout::Rect;
use ratatui::widgets::{Block, List, ListItem, ListState};
use ratatui::Frame;

/// Selectable list of audio streams.
///
/// Every change of selection hands the chosen variant back to the caller,
/// which routes it as [`Message::StreamSelected`](crate::tui::Message::StreamSelected).
#[derive(Debug, Default)]
pub struct StreamPicker {
    streams: Vec<StreamVariant>,
    state: ListState,
    pub visible: bool,
}

impl StreamPicker {
    /// Replace the options. Returns the first variant, which becomes selected.
    pub fn set_options(&mut self, streams: Vec<StreamVariant>) -> Option<StreamVariant> {
        self.streams = streams;
        if self.streams.is_empty() {
            self.state.select(None);
            None
        } else {
            self.state.select(Some(0));
            self.streams.first().cloned()
        }
    }

    pub fn clear(&mut self) {
        self.streams.clear();
        self.state.select(None);
    }

    pub fn streams(&self) -> &[StreamVariant] {
        &self.streams
    }

    pub fn selected(&self) -> Option<&StreamVariant> {
        self.state.selected().and_then(|i| self.streams.get(i))
    }

    /// Move the selection down; returns the new variant if it changed
    pub fn select_next(&mut self) -> Option<StreamVariant> {
        let next = match self.state.selected() {
            Some(i) if i + 1 < self.streams.len() => i + 1,
            _ => return None,
        };
        self.state.select(Some(next));
        self.selected().cloned()
    }

    /// Move the selection up; returns the new variant if it changed
    pub fn select_previous(&mut self) -> Option<StreamVariant> {
        let prev = match self.state.selected() {
            Some(i) if i > 0 => i - 1,
            _ => return None,
        };
        self.state.select(Some(prev));
        self.selected().cloned()
    }

    /// Rows needed to show every option plus borders, capped
    pub fn height(&self) -> u16 {
        (self.streams.len().min(8) as u16) + 2
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let title = match self.selected() {
            Some(stream) => format!(" Audio: {} ", stream.label),
            None => " Audio ".to_string(),
        };

        let items: Vec<ListItem> = self
            .streams
            .iter()
            .map(|s| ListItem::new(s.label.clone()))
            .collect();

        let list = List::new(items)
            .block(Block::bordered().title(title).border_style(theme::border(focused)))
            .highlight_style(theme::list_highlight())
            .highlight_symbol("> ");

        frame.render_stateful_widget(list, area, &mut self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(id: &str, size: u64) -> StreamVariant {
        StreamVariant {
            format_id: id.into(),
            ext: "m4a".into(),
            size,
            label: format!("stream {}", id),
            url: format!("https://m/{}", id),
        }
    }

    #[test]
    fn test_set_options_selects_first() {
        let mut picker = StreamPicker::default();
        let first = picker.set_options(vec![variant("139", 10), variant("140", 20)]);
        assert_eq!(first.unwrap().format_id, "139");
        assert_eq!(picker.selected().unwrap().format_id, "139");
    }

    #[test]
    fn test_empty_options_select_nothing() {
        let mut picker = StreamPicker::default();
        assert!(picker.set_options(Vec::new()).is_none());
        assert!(picker.selected().is_none());
        assert!(picker.select_next().is_none());
    }

    #[test]
    fn test_navigation_emits_only_on_change() {
        let mut picker = StreamPicker::default();
        picker.set_options(vec![variant("139", 10), variant("140", 20)]);

        assert!(picker.select_previous().is_none());
        assert_eq!(picker.select_next().unwrap().format_id, "140");
        assert!(picker.select_next().is_none());
        assert_eq!(picker.select_previous().unwrap().format_id, "139");
    }
}
