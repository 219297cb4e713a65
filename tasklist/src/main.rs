//! `Tasklist`: terminal task list backed by a REST task service.
//!
//! Configuration via CLI flags, environment variables, or config file
//! (`~/.config/tasklist/config.toml`).
//!
//! ```bash
//! # Against a local tasklist-server
//! cargo run --bin tasklist
//!
//! # Against another deployment
//! cargo run --bin tasklist -- --base-url https://tasks.example.com/api
//! TASKLIST_API_URL=http://10.0.0.5:8000 cargo run --bin tasklist
//! ```

use std::io;
use std::path::Path;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing_appender::non_blocking::WorkerGuard;

use tasklist::app::App;
use tasklist::config::{CliArgs, ClientConfig};
use tasklist::sync::{self, SyncError, SyncHandle};
use tasklist::ui;

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            ClientConfig::from_cli(&cli)
        }
    };

    // Logs go to a file; ratatui owns stdout.
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    let api = match config.to_api() {
        Ok(api) => api,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!(base_url = %api.base_url(), "tasklist starting");

    let handle = sync::spawn_store(api, config.command_capacity);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &handle, &config);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    handle.shutdown().await;
    tracing::info!("tasklist exiting");
    result
}

/// Initialize file-based logging.
///
/// Returns a [`WorkerGuard`] that must be held until shutdown so buffered
/// log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("tasklist.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Main application loop.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    handle: &SyncHandle,
    config: &ClientConfig,
) -> io::Result<()> {
    let mut app = App::new().with_timestamp_format(&config.timestamp_format);
    let mut state_rx = handle.state();
    app.apply_state(state_rx.borrow_and_update().clone());

    loop {
        // Step 1: Pick up the latest store snapshot.
        if state_rx.has_changed().unwrap_or(false) {
            app.apply_state(state_rx.borrow_and_update().clone());
        }

        // Step 2: Draw the UI frame.
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Step 3: Poll for terminal input events.
        if event::poll(config.poll_timeout)?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if let Some(command) = app.handle_key_event(key) {
                match handle.send(command) {
                    Ok(()) => {}
                    Err(SyncError::Busy) => app.set_notice(SyncError::Busy.to_string()),
                    Err(SyncError::Closed) => {
                        tracing::error!("store command loop is gone");
                        app.set_notice(SyncError::Closed.to_string());
                    }
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
