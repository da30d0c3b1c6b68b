//! synctable demo - two editable grids in the terminal.
//!
//! Every change is logged as JSON to the log file (see `--debug`).

use std::io::{self, Stdout};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use heck::ToTitleCase;
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info, warn};

use synctable::app::App;
use synctable::config::Config;
use synctable::events::{Event, EventHandler};
use synctable::grid::Schema;
use synctable::ui::{init_theme, load_theme};
use synctable::{logging, AppError};

/// Editable grid demo.
#[derive(Debug, Parser)]
#[command(name = "synctable", version, about)]
struct Cli {
    /// Load the table schema from a TOML file instead of the demo tables.
    #[arg(long, value_name = "FILE")]
    schema: Option<PathBuf>,

    /// Log at debug level.
    #[arg(long)]
    debug: bool,

    /// Read settings from this file instead of the default config path.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// Restores the terminal when dropped, including on early return.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Best effort: try every step even if one fails.
        if let Err(e) = disable_raw_mode() {
            warn!(error = %e, "Failed to disable raw mode");
        }
        if let Err(e) = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        ) {
            warn!(error = %e, "Failed to leave alternate screen");
        }
        if let Err(e) = self.terminal.show_cursor() {
            warn!(error = %e, "Failed to show cursor");
        }
    }
}

/// Table name for a schema file: `shipment_lines.toml` is "Shipment Lines".
fn table_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_title_case())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "Table".to_string())
}

fn build_app(cli: &Cli, config: Config) -> Result<App, AppError> {
    match &cli.schema {
        Some(path) => {
            let schema = Schema::load(path)?;
            info!(path = %path.display(), columns = schema.len(), "Loaded schema");
            Ok(App::with_tables(config.settings, vec![(table_name(path), schema)]))
        }
        None => Ok(App::demo(config.settings)?),
    }
}

/// Tell the user why startup failed and hand the error on.
fn report(e: AppError) -> anyhow::Error {
    error!(error = %e, "Failed to start");
    match e.suggested_action() {
        Some(action) => eprintln!("{}\n{}", e.user_message(), action),
        None => eprintln!("{}", e.user_message()),
    }
    e.into()
}

fn load_config(cli: &Cli) -> Result<Config, AppError> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

fn run(guard: &mut TerminalGuard, app: &mut App, events: &EventHandler) -> anyhow::Result<()> {
    let size = guard.terminal.size()?;
    app.update(Event::Resize(size.width, size.height));

    while !app.should_quit() {
        guard.terminal.draw(|frame| app.view(frame))?;
        let event = events.next().context("failed to read terminal event")?;
        app.update(event);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, fallback) = match load_config(&cli) {
        Ok(config) => (config, None),
        Err(e) if !e.is_critical() => (Config::default(), Some(e)),
        Err(e) => return Err(report(e)),
    };

    logging::init(cli.debug, config.settings.log_filter.as_deref())?;
    if let Some(e) = fallback {
        warn!(error = %e, "Using default settings");
    }
    init_theme(load_theme(&config.settings.theme));

    let events = EventHandler::with_tick_rate(config.settings.tick_rate_ms);
    let mut app = build_app(&cli, config).map_err(report)?;

    let mut guard =
        TerminalGuard::enter().map_err(|e| report(AppError::terminal(e.to_string())))?;
    let result = run(&mut guard, &mut app, &events);
    drop(guard);

    if let Err(e) = &result {
        error!(error = %e, "Application error");
    }
    logging::shutdown();
    result
}
