// src/ui/widgets/disclaimer_popup.rs

use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use rust_i18n::t;

/// Renders the authorisation notice on top of the rest of the UI.
///
/// Probing sends attack payloads to the target, so the user has to
/// acknowledge it before the input box becomes active.
pub fn render_disclaimer_popup(frame: &mut Frame, area: Rect) {
    let disclaimer_text = Text::from(vec![
        Line::from(Span::from(t!("disclaimer.heading").to_string()).bold().yellow()),
        Line::from(""),
        Line::from(t!("disclaimer.purpose").to_string()),
        Line::from(""),
        Line::from(t!("disclaimer.warning").to_string()),
        Line::from(""),
        Line::from(t!("disclaimer.agree").to_string()),
        Line::from(t!("disclaimer.rule_1").to_string()),
        Line::from(t!("disclaimer.rule_2").to_string()),
        Line::from(t!("disclaimer.rule_3").to_string()),
        Line::from(""),
        Line::from(Span::from(t!("disclaimer.continue").to_string()).bold()),
    ]);

    let block = Block::default()
        .title(t!("disclaimer.title").to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let popup_area = centered_rect(70, 80, area);

    let popup = Paragraph::new(disclaimer_text)
        .block(block)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);

    // Clear first so the background doesn't bleed through.
    frame.render_widget(Clear, popup_area);
    frame.render_widget(popup, popup_area);
}

/// A rectangle centered in `r`, sized as a percentage of it.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let [_, middle, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(r);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(middle);
    center
}
