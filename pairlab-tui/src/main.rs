//! Terminal dashboard for comparing two stocks.
//!
//! Left: ticker pickers, date range, Analyze. Right: correlation header,
//! overlaid price chart, summary statistics. Fetches run on a worker thread
//! so the terminal keeps redrawing.
//!
//! Usage: `pairlab-tui [--config <path>]`

mod app;
mod input;
mod persistence;
mod theme;
mod ui;
mod worker;

use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use pairlab_runner::{build_provider, logging, AppConfig};

use crate::app::AppState;
use crate::worker::WorkerCommand;

fn main() -> Result<()> {
    let config_path = config_arg(std::env::args().skip(1))?;
    let config = AppConfig::load_or_default(config_path.as_deref())
        .context("failed to load configuration")?;

    let app_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pairlab");
    let state_path = app_dir.join("state.json");
    let log_path = dirs::data_local_dir()
        .unwrap_or_else(|| app_dir.clone())
        .join("pairlab")
        .join("pairlab-tui.log");

    logging::init_file(&config.log_level, &log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;
    tracing::info!(source = ?config.provider.source, "starting dashboard");

    let provider = build_provider(&config.provider).context("failed to build price provider")?;

    install_panic_restore();

    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let worker_handle =
        worker::spawn_worker(provider, cmd_rx, resp_tx).context("failed to spawn worker")?;

    let today = chrono::Local::now().date_naive();
    let mut app = AppState::new(&config, today, cmd_tx.clone(), resp_rx)?;
    persistence::apply(&mut app, persistence::load(&state_path));

    let mut terminal = enter_terminal()?;
    let outcome = run_app(&mut terminal, &mut app);

    if let Err(e) = persistence::save(&state_path, &persistence::extract(&app)) {
        tracing::warn!(error = %e, "failed to save dashboard state");
    }
    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let _ = worker_handle.join();

    leave_terminal(&mut terminal)?;
    tracing::info!("dashboard closed");
    outcome
}

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

/// Raw mode and the alternate screen must be undone even when we panic.
fn install_panic_restore() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        previous(info);
    }));
}

fn enter_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    terminal.clear()?;
    Ok(terminal)
}

fn leave_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// `--config <path>` is the only flag.
fn config_arg(mut args: impl Iterator<Item = String>) -> Result<Option<PathBuf>> {
    match args.next().as_deref() {
        None => Ok(None),
        Some("--config") => args
            .next()
            .map(|p| Some(PathBuf::from(p)))
            .context("--config needs a path"),
        Some(other) => anyhow::bail!("unknown argument '{other}' (usage: pairlab-tui [--config <path>])"),
    }
}

/// Redraw, apply finished analyses, then wait up to one tick for a key.
fn run_app(terminal: &mut Tui, app: &mut AppState) -> Result<()> {
    const TICK: Duration = Duration::from_millis(50);

    while app.running {
        terminal.draw(|f| ui::draw(f, app))?;

        let finished: Vec<_> = app.worker_rx.try_iter().collect();
        for response in finished {
            app.handle_worker_response(response);
        }

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }
    }
    Ok(())
}
