// src/ui/widgets/summary.rs

use crate::app::{App, AppState};
use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, Gauge, Paragraph},
};
use rust_i18n::t;

/// Rating label and colour for a security score.
fn rating(score: u8) -> (String, Color) {
    match score {
        90..=100 => (t!("summary.rating.excellent").to_string(), Color::Green),
        75..=89 => (t!("summary.rating.good").to_string(), Color::Cyan),
        50..=74 => (t!("summary.rating.fair").to_string(), Color::Yellow),
        _ => (t!("summary.rating.poor").to_string(), Color::Red),
    }
}

/// Renders the score, severity counts, advanced signals and crawl statistics
/// once a scan has finished.
pub fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let summary_container = Block::default().borders(Borders::ALL).title(t!("summary.title").to_string());
    frame.render_widget(summary_container, area);

    let [score_area, gauge_area, _, issues_area, _, signals_area, _, crawl_area] = Layout::vertical([
        Constraint::Length(2), // Score & rating
        Constraint::Length(1), // Gauge
        Constraint::Length(1),
        Constraint::Length(5), // Issues by severity
        Constraint::Length(1),
        Constraint::Length(5), // Advanced signals
        Constraint::Length(1),
        Constraint::Min(0),    // Crawl statistics
    ])
    .margin(1)
    .areas(area);

    let (AppState::Finished, Some(report)) = (&app.state, &app.scan_report) else {
        return;
    };

    // --- Score ---
    let score = app.summary.score;
    let (rating_text, rating_color) = rating(score);
    let score_text = Text::from(vec![
        Line::from(Span::from(t!("summary.score").to_string()).bold()),
        Line::from(format!("{}/100 ({})", score, rating_text)).style(Style::default().fg(rating_color)),
    ]);
    frame.render_widget(Paragraph::new(score_text).alignment(Alignment::Center), score_area);

    let gauge = Gauge::default()
        .percent(score as u16)
        .label("")
        .gauge_style(Style::default().fg(rating_color));
    frame.render_widget(gauge, gauge_area);

    // --- Issues ---
    let counts = &app.summary.counts;
    let count_line = |label: &str, n: usize, color: Color| {
        Line::from(vec![
            Span::raw(format!("{:<10}", label)),
            Span::styled(n.to_string(), Style::default().fg(color)),
        ])
    };
    let issues = Paragraph::new(vec![
        count_line("Critical", counts.critical, Color::Magenta),
        count_line("High", counts.high, Color::Red),
        count_line("Medium", counts.medium, Color::Yellow),
        count_line("Low", counts.low, Color::Cyan),
    ])
    .block(Block::default().title(Span::from(t!("summary.issues").to_string()).bold()));
    frame.render_widget(issues, issues_area);

    // --- Advanced signals ---
    let signals = &report.advanced_analysis.signals;
    let ports = if signals.open_ports.is_empty() {
        t!("summary.none").to_string()
    } else {
        signals
            .open_ports
            .iter()
            .map(|p| format!("{} ({})", p.port, p.service))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let (tls_icon, tls_style) = if signals.ssl_check.valid {
        ("✓", Style::default().fg(Color::Green))
    } else {
        ("✗", Style::default().fg(Color::Red))
    };
    let signal_lines = vec![
        Line::from(format!("{}: {}", t!("summary.ports"), ports)),
        Line::from(vec![
            Span::styled(format!("{} ", tls_icon), tls_style),
            Span::raw(format!("TLS: {}", signals.ssl_check.issuer)),
        ]),
        Line::from(format!("{}: {}", t!("summary.expires"), signals.ssl_check.expiration)),
        Line::from(format!("{}: {}", t!("summary.server"), signals.server_info.server)),
    ];
    let signals_block = Block::default().title(Span::from(t!("summary.signals").to_string()).bold());
    frame.render_widget(Paragraph::new(signal_lines).block(signals_block), signals_area);

    // --- Crawl ---
    let crawl_lines = vec![
        Line::from(format!("{}: {}", t!("summary.urls"), report.crawled_urls.len())),
        Line::from(format!("{}: {}", t!("summary.forms"), report.forms_found.len())),
        Line::from(format!("{}: {:.2}s", t!("summary.duration"), report.scan_duration_seconds)),
        Line::from(format!("{}: {}", t!("summary.workers"), report.performance.threads_used)),
    ];
    let crawl_block = Block::default().title(Span::from(t!("summary.crawl").to_string()).bold());
    frame.render_widget(Paragraph::new(crawl_lines).block(crawl_block), crawl_area);
}
