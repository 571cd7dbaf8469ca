// src/main.rs

use color_eyre::eyre::{Result, WrapErr};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info};
use vanguard_phish::config::Settings;
use vanguard_phish::core::scanner::{run_full_scan, ScanContext};
use vanguard_phish::logging;

mod app;
mod ui;

use app::{App, AppState};

type ScanOutcome = Result<vanguard_phish::core::models::RiskAssessment, String>;

fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv::dotenv().ok();
    // Before the runtime starts, so the local UTC offset can still be read.
    logging::initialize_logging()?;

    let settings = Settings::from_env().wrap_err("invalid configuration")?;
    let ctx = Arc::new(ScanContext::new(settings)?);

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;

    // `vanguard-phish <url>` prints one assessment as JSON instead of opening the UI.
    if let Some(url) = std::env::args().nth(1) {
        return runtime.block_on(run_once(&url, &ctx));
    }
    runtime.block_on(run_tui(ctx))
}

async fn run_once(url: &str, ctx: &ScanContext) -> Result<()> {
    let assessment = run_full_scan(url, ctx).await?;
    println!("{}", serde_json::to_string_pretty(&assessment)?);
    Ok(())
}

async fn run_tui(ctx: Arc<ScanContext>) -> Result<()> {
    // --- Setup ---
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    enable_raw_mode()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    let mut app = App::new();
    let (tx, mut rx) = mpsc::channel(1);

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&mut app, frame))?;

        if event::poll(Duration::from_millis(100))? {
            handle_events(&mut app, &tx, &ctx)?;
        }

        if let Ok(outcome) = rx.try_recv() {
            app.finish_scan(outcome);
        }
        app.on_tick();
    }

    // --- Restore Terminal ---
    stdout().execute(LeaveAlternateScreen)?;
    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;
    Ok(())
}

fn handle_events(app: &mut App, tx: &mpsc::Sender<ScanOutcome>, ctx: &Arc<ScanContext>) -> Result<()> {
    if let Event::Key(key) = event::read()? {
        if key.kind == KeyEventKind::Press {
            match app.state {
                AppState::Idle => handle_idle_input(app, key.code, tx, ctx),
                AppState::Finished => handle_finished_input(app, key.code),
                AppState::Scanning => {
                    if key.code == KeyCode::Char('q') {
                        app.quit();
                    }
                }
            }
        }
    }
    Ok(())
}

fn handle_idle_input(app: &mut App, key_code: KeyCode, tx: &mpsc::Sender<ScanOutcome>, ctx: &Arc<ScanContext>) {
    match key_code {
        KeyCode::Esc => app.quit(),
        KeyCode::Char(c) => app.input.push(c),
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Enter => {
            if app.input.trim().is_empty() {
                return;
            }
            app.state = AppState::Scanning;
            let tx_clone = tx.clone();
            let ctx = Arc::clone(ctx);
            let raw_input = app.input.clone();
            info!(input = %raw_input, "Scan requested.");

            tokio::spawn(async move {
                let outcome = run_full_scan(&raw_input, &ctx).await.map_err(|e| e.to_string());
                if tx_clone.send(outcome).await.is_err() {
                    error!("UI closed before the assessment finished.");
                }
            });
        }
        _ => {}
    }
}

fn handle_finished_input(app: &mut App, key_code: KeyCode) {
    match key_code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('n') => app.reset(),
        KeyCode::Up => app.scroll_up(),
        KeyCode::Down => app.scroll_down(),
        _ => {}
    }
}
