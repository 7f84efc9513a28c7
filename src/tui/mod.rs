//! Terminal front end.

mod app;
mod input;
mod ui;

pub use app::App;
pub use input::{Target, hit_test, move_cursor};
pub use ui::{LOADING_TEXT, RESET_LABEL, ScreenLayout, draw, face_label, grid_cells};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument};

use crate::config::AppConfig;
use crate::runtime::GameRuntime;
use crate::tile_source::HttpTileSource;

/// Runs the game in the terminal until the user quits.
pub async fn run_tui(config: AppConfig) -> Result<()> {
    // Log to a file so output does not tear the screen
    let log_file = std::fs::File::create(config.log_file())?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,concentration=debug")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init();

    info!(endpoint = %config.endpoint(), "Starting concentration");

    let source = Arc::new(HttpTileSource::new(config.endpoint(), config.expected_tiles()));
    let runtime = GameRuntime::new(source, config.commit_delay(), *config.seed());
    let mut app = App::new(runtime, *config.columns());

    enable_raw_mode()?;
    let mut terminal = match enter_screen(io::stdout()) {
        Ok(terminal) => terminal,
        Err(e) => {
            error!(error = %e, "Failed to set up terminal");
            let _ = disable_raw_mode();
            let _ = leave_screen(&mut io::stdout());
            return Err(e.into());
        }
    };

    app.start();
    let res = run_app(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    leave_screen(terminal.backend_mut())?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    res
}

/// Switches `out` to the alternate screen with mouse capture and wraps it
/// in a terminal.
pub fn enter_screen<W: Write>(mut out: W) -> io::Result<Terminal<CrosstermBackend<W>>> {
    execute!(out, EnterAlternateScreen, EnableMouseCapture)?;
    Terminal::new(CrosstermBackend::new(out))
}

/// Leaves the alternate screen and releases the mouse.
pub fn leave_screen<W: Write>(out: &mut W) -> io::Result<()> {
    execute!(out, LeaveAlternateScreen, DisableMouseCapture)
}

#[instrument(skip_all)]
async fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.tick();
        terminal.draw(|f| app.draw(f))?;

        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        if app.should_quit() {
            return Ok(());
        }

        // Let fetch and commit tasks make progress
        tokio::task::yield_now().await;
    }
}
