//! URL input component

use crate::tui::theme;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Position, Rect};
use ratatui::text::Span;
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

/// Single-line text field holding the video URL
#[derive(Debug, Clone, Default)]
pub struct UrlInput {
    value: String,
    /// Cursor position in chars
    cursor: usize,
}

impl UrlInput {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert(&mut self, c: char) {
        let idx = byte_index(&self.value, self.cursor);
        self.value.insert(idx, c);
        self.cursor += 1;
    }

    /// Insert pasted text at the cursor; line breaks are dropped
    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars().filter(|c| !c.is_control()) {
            self.insert(c);
        }
    }

    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let idx = byte_index(&self.value, self.cursor);
        self.value.remove(idx);
        true
    }

    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.value.chars().count() {
            return false;
        }
        let idx = byte_index(&self.value, self.cursor);
        self.value.remove(idx);
        true
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.value.is_empty();
        self.value.clear();
        self.cursor = 0;
        changed
    }

    /// Apply an editing key. Returns true when the text changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('u') if ctrl => self.clear(),
            KeyCode::Char(c) if !ctrl => {
                self.insert(c);
                true
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                false
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.value.chars().count());
                false
            }
            KeyCode::Home => {
                self.cursor = 0;
                false
            }
            KeyCode::End => {
                self.cursor = self.value.chars().count();
                false
            }
            _ => false,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let block = Block::bordered()
            .title(" URL ")
            .border_style(theme::border(focused));
        let width = area.width.saturating_sub(2) as usize;

        let offset = self.cursor.saturating_sub(width.saturating_sub(1));
        let content = if self.value.is_empty() {
            Span::styled("youtube URL", theme::placeholder())
        } else {
            Span::raw(self.value.chars().skip(offset).take(width).collect::<String>())
        };

        frame.render_widget(Paragraph::new(content).block(block), area);

        if focused {
            let x = area.x + 1 + (self.cursor - offset) as u16;
            frame.set_cursor_position(Position::new(x, area.y + 1));
        }
    }
}

fn byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}
