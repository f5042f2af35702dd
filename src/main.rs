// src/main.rs

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
    },
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use color_eyre::eyre::Result;
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{error, info};

mod app;
mod core;
mod logging;
mod ui;

rust_i18n::i18n!("locales", fallback = "en");

use app::{App, AppState, ExportStatus};
use crate::core::config::ScanConfig;
use crate::core::fetcher::HttpFetcher;
use crate::core::models::{ScanProgress, ScanReport};
use crate::core::target::Target;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    logging::initialize_logging()?;
    info!(version = env!("CARGO_PKG_VERSION"), "Starting up.");
    select_locale();

    // --- Setup ---
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    enable_raw_mode()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    let mut app = App::new(ScanConfig::from_env());
    let (tx, mut rx) = mpsc::channel::<ScanReport>(1);
    let (progress_tx, progress_rx) = watch::channel(ScanProgress::default());

    let result = run(&mut terminal, &mut app, &tx, &mut rx, progress_tx, progress_rx).await;

    // --- Restore Terminal ---
    stdout().execute(LeaveAlternateScreen)?;
    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;
    result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    tx: &mpsc::Sender<ScanReport>,
    rx: &mut mpsc::Receiver<ScanReport>,
    progress_tx: watch::Sender<ScanProgress>,
    progress_rx: watch::Receiver<ScanProgress>,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        if event::poll(Duration::from_millis(100))? {
            handle_events(app, tx, &progress_tx)?;
        }

        app.on_tick();
        if let AppState::Scanning = app.state {
            app.progress = *progress_rx.borrow();
        }

        if let Ok(report) = rx.try_recv() {
            app.finish_scan(report);
        }
    }
    Ok(())
}

/// Picks the UI language from `LANG`, falling back to English.
fn select_locale() {
    let lang = std::env::var("LANG").unwrap_or_default();
    let code = lang.split(['_', '.']).next().unwrap_or("en");
    if rust_i18n::available_locales!().contains(&code) {
        rust_i18n::set_locale(code);
    }
}

/// Single event handler, dispatching on the current state.
fn handle_events(
    app: &mut App,
    tx: &mpsc::Sender<ScanReport>,
    progress_tx: &watch::Sender<ScanProgress>,
) -> Result<()> {
    if let Event::Key(key) = event::read()? {
        if key.kind == KeyEventKind::Press {
            match app.state {
                AppState::Disclaimer => match key.code {
                    KeyCode::Enter => app.state = AppState::Idle,
                    KeyCode::Char('q') => app.quit(),
                    _ => {}
                },
                AppState::Idle => handle_idle_input(app, key.code, tx, progress_tx),
                AppState::Finished => handle_finished_input(app, key.code),
                AppState::Scanning => {
                    if key.code == KeyCode::Char('q') { app.quit(); }
                }
            }
        }
    }
    Ok(())
}

/// Handles input while the user is typing a target.
fn handle_idle_input(
    app: &mut App,
    key_code: KeyCode,
    tx: &mpsc::Sender<ScanReport>,
    progress_tx: &watch::Sender<ScanProgress>,
) {
    match key_code {
        KeyCode::Char('q') if app.input.is_empty() => app.quit(),
        KeyCode::Char(c) => app.input.push(c),
        KeyCode::Backspace => { app.input.pop(); },
        KeyCode::Esc => app.quit(),
        KeyCode::Enter => {
            let target = match Target::parse(&app.input) {
                Ok(target) => target,
                Err(e) => {
                    app.input_error = Some(e.to_string());
                    return;
                }
            };
            let fetcher = match HttpFetcher::new(&app.config.user_agent) {
                Ok(fetcher) => fetcher,
                Err(e) => {
                    error!(error = %e, "Failed to build HTTP client.");
                    app.input_error = Some(e.to_string());
                    return;
                }
            };

            app.start_scan();
            progress_tx.send_replace(ScanProgress::default());
            let tx_clone = tx.clone();
            let progress = progress_tx.clone();
            let config = app.config.clone();

            tokio::spawn(async move {
                let report = core::scanner::run_full_scan(&fetcher, &target, &config, Some(&progress)).await;
                let _ = tx_clone.send(report).await;
            });
        }
        _ => {}
    }
}

/// Handles input while a report is displayed.
fn handle_finished_input(app: &mut App, key_code: KeyCode) {
    match key_code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('n') => app.reset(),
        KeyCode::Char('e') => export(app),
        KeyCode::Up => app.select_previous(),
        KeyCode::Down => app.select_next(),
        _ => {}
    }
}

fn export(app: &mut App) {
    let Some(report) = &app.scan_report else {
        return;
    };
    app.export_status = match core::report::export_report(report, &logging::get_reports_dir()) {
        Ok(dir) => ExportStatus::Success(dir.display().to_string()),
        Err(e) => {
            error!(error = ?e, "Report export failed.");
            ExportStatus::Error(e.to_string())
        }
    };
}
