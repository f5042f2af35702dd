// src/ui/widgets/footer.rs

use crate::app::{App, AppState, ExportStatus};
use ratatui::{
    prelude::*,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};
use rust_i18n::t;

fn key(label: &str) -> Span<'static> {
    Span::styled(format!("[{}]", label), Style::new().bold().fg(Color::Yellow))
}

/// Renders the footer widget, which displays available actions.
pub fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let line = match app.state {
        AppState::Disclaimer => Line::from(vec![
            key("Enter"),
            Span::raw(format!(" {}  ", t!("footer.accept"))),
            key("Q"),
            Span::raw(format!(" {}", t!("footer.quit"))),
        ]),
        AppState::Idle => Line::from(vec![
            key("Enter"),
            Span::raw(format!(" {}  ", t!("footer.scan"))),
            key("Q"),
            Span::raw(format!(" {}", t!("footer.quit"))),
        ]),
        AppState::Scanning => Line::from(vec![
            Span::raw(format!("{}  ", t!("footer.scanning"))),
            key("Q"),
            Span::raw(format!(" {}", t!("footer.quit"))),
        ]),
        AppState::Finished => {
            let mut spans = vec![
                key("N"),
                Span::raw(format!(" {}  ", t!("footer.new_scan"))),
                key("E"),
                Span::raw(format!(" {}  ", t!("footer.export"))),
                key("↑↓"),
                Span::raw(format!(" {}  ", t!("footer.navigate"))),
                key("Q"),
                Span::raw(format!(" {}", t!("footer.quit"))),
            ];
            match &app.export_status {
                ExportStatus::Idle => {}
                ExportStatus::Success(dir) => spans.push(Span::styled(
                    format!("  {} {}", t!("footer.exported"), dir),
                    Style::default().fg(Color::Green),
                )),
                ExportStatus::Error(e) => spans.push(Span::styled(
                    format!("  {} {}", t!("footer.export_failed"), e),
                    Style::default().fg(Color::Red),
                )),
            }
            Line::from(spans)
        }
    };

    let footer = Paragraph::new(line).alignment(Alignment::Center);
    frame.render_widget(footer, area);
}
