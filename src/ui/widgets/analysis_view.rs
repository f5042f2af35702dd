// src/ui/widgets/analysis_view.rs

use crate::app::{App, AppState, SPINNER_CHARS};
use crate::core::knowledge_base;
use crate::core::models::Severity;
use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap},
};
use rust_i18n::t;

fn severity_style(severity: Severity) -> Style {
    match severity {
        Severity::Critical => Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        Severity::High => Style::default().fg(Color::Red),
        Severity::Medium => Style::default().fg(Color::Yellow),
        Severity::Low => Style::default().fg(Color::Cyan),
    }
}

pub fn render_analysis_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let main_block = Block::default()
        .borders(Borders::ALL)
        .title(t!("analysis.title").to_string());

    match app.state {
        AppState::Finished => {}
        AppState::Scanning => {
            let inner = main_block.inner(area);
            frame.render_widget(main_block, area);
            render_progress(frame, app, inner);
            return;
        }
        _ => {
            let p = Paragraph::new(t!("analysis.placeholder").to_string())
                .alignment(Alignment::Center)
                .block(main_block);
            frame.render_widget(p, area);
            return;
        }
    }

    let inner_area = main_block.inner(area);
    frame.render_widget(main_block, area);

    let reachable = app.scan_report.as_ref().is_none_or(|r| r.target_reachable);
    let [warning_area, list_area, detail_area] = Layout::vertical([
        Constraint::Length(if reachable { 0 } else { 1 }),
        Constraint::Percentage(40),
        Constraint::Min(0),
    ])
    .areas(inner_area);

    if !reachable {
        let warning = Paragraph::new(t!("analysis.unreachable").to_string())
            .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));
        frame.render_widget(warning, warning_area);
    }

    let items: Vec<ListItem> = app
        .findings()
        .iter()
        .map(|f| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("[{}] ", f.severity), severity_style(f.severity)),
                Span::raw(f.kind.to_string()),
                Span::styled(format!("  {}", f.url), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let findings_list = List::new(items)
        .highlight_style(Style::new().bg(Color::DarkGray).add_modifier(Modifier::BOLD));
    frame.render_stateful_widget(findings_list, list_area, &mut app.findings_list_state);

    let detail_block = Block::default()
        .borders(Borders::TOP)
        .title(t!("analysis.details").to_string());

    let selected = app
        .findings_list_state
        .selected()
        .and_then(|i| app.findings().get(i));

    let Some(finding) = selected else {
        render_placeholder_details(frame, app, detail_block, detail_area);
        return;
    };

    let detail = knowledge_base::get_finding_detail(finding);
    let text = vec![
        Line::from(vec![
            Span::styled(detail.title, severity_style(finding.severity).add_modifier(Modifier::BOLD)),
            Span::styled(format!("  ({})", detail.category), Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(format!("URL: {}", finding.url)),
        Line::from(format!("Payload: {}", finding.payload)),
        Line::from(finding.description.as_str()),
        Line::from(""),
        Line::from(Span::from(t!("analysis.what").to_string()).yellow().bold()),
        Line::from(detail.description),
        Line::from(""),
        Line::from(Span::from(t!("analysis.fix").to_string()).yellow().bold()),
        Line::from(detail.remediation),
    ];
    let p = Paragraph::new(text).wrap(Wrap { trim: true }).block(detail_block);
    frame.render_widget(p, detail_area);
}

fn render_progress(frame: &mut Frame, app: &App, area: Rect) {
    let [status_area, gauge_area, _] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(area);

    let spinner_char = SPINNER_CHARS[app.spinner_frame];
    let status = Paragraph::new(Line::from(vec![
        Span::styled(format!("{} ", spinner_char), Style::default().fg(Color::Cyan)),
        Span::raw(format!("{} {}", t!("analysis.scanning"), app.input)),
        Span::styled(format!("  [{}]", app.progress.phase), Style::default().fg(Color::DarkGray)),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(status, status_area);

    let gauge = Gauge::default()
        .percent(app.progress.percent())
        .label(format!("{}/{}", app.progress.completed, app.progress.total))
        .gauge_style(Style::default().fg(Color::Cyan));
    frame.render_widget(gauge, gauge_area);
}

fn render_placeholder_details(frame: &mut Frame, app: &App, block: Block, area: Rect) {
    let placeholder_text = if app.summary.counts.total() == 0 {
        Text::from(vec![
            Line::from(""),
            Line::from(Span::from(t!("analysis.clean_heading").to_string()).bold().fg(Color::Green)),
            Line::from(""),
            Line::from(t!("analysis.clean_body").to_string()),
        ])
    } else {
        Text::from(t!("analysis.select").to_string())
    };

    let p = Paragraph::new(placeholder_text).alignment(Alignment::Center).block(block);
    frame.render_widget(p, area);
}
