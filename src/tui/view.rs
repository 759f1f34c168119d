//! Screen layout

use crate::tui::app::{App, Focus};
use crate::tui::components::{progress_bar, LocationPart};
use crate::tui::theme;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};
use ratatui::Frame;

const HELP: &str = "Tab focus  ↑↓ select  Enter press  Ctrl+V paste  Esc quit";

pub fn draw(frame: &mut Frame, app: &mut App) {
    let [url_area, body_area, status_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    app.url_input.render(frame, url_area, app.focus == Focus::Url);

    let [results_area, location_area] =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
            .areas(body_area);

    draw_results(frame, app, results_area);

    let location_focus = match app.focus {
        Focus::Switch => Some(LocationPart::Switch),
        Focus::SetDefault => Some(LocationPart::SetDefault),
        Focus::Tree => Some(LocationPart::Tree),
        _ => None,
    };
    app.location.render(frame, location_area, location_focus);

    draw_status(frame, app, status_area);
}

fn draw_results(frame: &mut Frame, app: &mut App, area: Rect) {
    let mut constraints = vec![Constraint::Length(5)];
    if app.stream_picker.visible {
        constraints.push(Constraint::Length(app.stream_picker.height()));
    }
    if app.download.visible {
        constraints.push(Constraint::Length(3));
    }
    if app.progress_visible {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Min(0));

    let areas = Layout::vertical(constraints).split(area);
    let mut slots = areas.iter().copied();

    if let Some(summary_area) = slots.next() {
        let summary = Paragraph::new(app.summary.as_str())
            .style(Style::default().fg(theme::TEXT_PRIMARY))
            .wrap(Wrap { trim: false })
            .block(
                Block::bordered()
                    .title(" Video ")
                    .border_style(theme::border(app.focus == Focus::Results)),
            );
        frame.render_widget(summary, summary_area);
    }

    if app.stream_picker.visible {
        if let Some(picker_area) = slots.next() {
            let focused = app.focus == Focus::Streams;
            app.stream_picker.render(frame, picker_area, focused);
        }
    }

    if app.download.visible {
        if let Some(button_area) = slots.next() {
            app.download
                .render(frame, button_area, app.focus == Focus::Download);
        }
    }

    if app.progress_visible {
        if let Some(gauge_area) = slots.next() {
            progress_bar(frame, gauge_area, &app.progress);
        }
    }
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let line = if app.status_message.is_empty() {
        Line::from(Span::styled(HELP, Style::default().fg(theme::TEXT_SECONDARY)))
    } else {
        Line::from(vec![
            Span::styled(app.status_message.as_str(), Style::default().fg(theme::WARNING)),
            Span::raw("  "),
            Span::styled(HELP, Style::default().fg(theme::TEXT_SECONDARY)),
        ])
    };
    frame.render_widget(Paragraph::new(line), area);
}
