// src/ui/widgets/input.rs

use crate::app::{App, AppState};
use ratatui::{prelude::*, widgets::{Block, Borders, Paragraph}};
use rust_i18n::t;

/// Renders the target input box, with the last validation error underneath.
pub fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let input_block = Block::default().borders(Borders::ALL).title(t!("input.title").to_string());

    let mut lines = vec![Line::from(app.input.as_str()).style(Style::default().fg(Color::Yellow))];
    if let Some(err) = &app.input_error {
        lines.push(Line::from(err.as_str()).style(Style::default().fg(Color::Red)));
    }
    frame.render_widget(Paragraph::new(lines).block(input_block), area);

    if let AppState::Idle = app.state {
        frame.set_cursor_position((area.x + app.input.chars().count() as u16 + 1, area.y + 1));
    }
}
