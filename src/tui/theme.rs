//! Colors and styles for the terminal UI

use ratatui::style::{Color, Modifier, Style};

// Primary colors
pub const INDIGO_500: Color = Color::Rgb(99, 102, 241); // Primary actions
pub const PURPLE_500: Color = Color::Rgb(139, 92, 246); // Accent

// Status colors
pub const EMERALD_500: Color = Color::Rgb(16, 185, 129); // Success state
pub const RED_500: Color = Color::Rgb(239, 68, 68); // Danger state
pub const AMBER_500: Color = Color::Rgb(245, 158, 11); // In progress

// Gray scale for text and borders
pub const GRAY_200: Color = Color::Rgb(229, 231, 235);
pub const GRAY_500: Color = Color::Rgb(107, 114, 128);

pub const ACCENT: Color = INDIGO_500;
pub const SUCCESS: Color = EMERALD_500;
pub const DANGER: Color = RED_500;
pub const WARNING: Color = AMBER_500;
pub const TEXT_PRIMARY: Color = GRAY_200;
pub const TEXT_SECONDARY: Color = GRAY_500;

/// Border style for a widget, highlighted when it has focus
pub fn border(focused: bool) -> Style {
    if focused {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_SECONDARY)
    }
}

/// Highlight style for the selected row of a list
pub fn list_highlight() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(PURPLE_500)
        .add_modifier(Modifier::BOLD)
}

pub fn placeholder() -> Style {
    Style::default()
        .fg(TEXT_SECONDARY)
        .add_modifier(Modifier::ITALIC)
}
