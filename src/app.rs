// src/app.rs

use crate::core::config::ScanConfig;
use crate::core::models::{Finding, ScanProgress, ScanReport};
use crate::core::scoring::SeverityCounts;
use ratatui::widgets::ListState;

pub const SPINNER_CHARS: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub enum ExportStatus {
    Idle,
    Success(String),
    Error(String),
}

pub enum AppState {
    Disclaimer,
    Idle,
    Scanning,
    Finished,
}

#[derive(Debug, Default)]
pub struct ScanSummary {
    pub score: u8,
    pub counts: SeverityCounts,
}

pub struct App {
    pub should_quit: bool,
    pub state: AppState,
    pub input: String,
    pub input_error: Option<String>,
    pub config: ScanConfig,
    pub scan_report: Option<ScanReport>,
    pub progress: ScanProgress,
    pub summary: ScanSummary,
    pub findings_list_state: ListState,
    pub export_status: ExportStatus,
    pub spinner_frame: usize,
}

impl App {
    pub fn new(config: ScanConfig) -> Self {
        Self {
            should_quit: false,
            state: AppState::Disclaimer,
            input: String::new(),
            input_error: None,
            config,
            scan_report: None,
            progress: ScanProgress::default(),
            summary: ScanSummary::default(),
            findings_list_state: ListState::default(),
            export_status: ExportStatus::Idle,
            spinner_frame: 0,
        }
    }

    pub fn findings(&self) -> &[Finding] {
        self.scan_report
            .as_ref()
            .map(|r| r.vulnerabilities.as_slice())
            .unwrap_or_default()
    }

    pub fn select_previous(&mut self) {
        if self.findings().is_empty() {
            return;
        }
        let index = match self.findings_list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.findings_list_state.select(Some(index));
    }

    pub fn select_next(&mut self) {
        let len = self.findings().len();
        if len == 0 {
            return;
        }
        let index = match self.findings_list_state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        self.findings_list_state.select(Some(index));
    }

    pub fn start_scan(&mut self) {
        self.state = AppState::Scanning;
        self.input_error = None;
        self.progress = ScanProgress::default();
    }

    /// Stores a finished report; findings are shown most severe first.
    pub fn finish_scan(&mut self, mut report: ScanReport) {
        report.vulnerabilities.sort_by(|a, b| b.severity.cmp(&a.severity));
        self.summary = ScanSummary {
            score: report.advanced_analysis.security_score,
            counts: SeverityCounts::from_findings(&report.vulnerabilities),
        };
        self.scan_report = Some(report);
        self.state = AppState::Finished;
    }

    pub fn on_tick(&mut self) {
        if let AppState::Scanning = self.state {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_CHARS.len();
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn reset(&mut self) {
        self.state = AppState::Idle;
        self.input = String::new();
        self.input_error = None;
        self.scan_report = None;
        self.progress = ScanProgress::default();
        self.summary = ScanSummary::default();
        self.findings_list_state = ListState::default();
        self.export_status = ExportStatus::Idle;
        self.spinner_frame = 0;
    }
}
