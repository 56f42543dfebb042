//! Terminal front-end for the estimator.
//!
//! Keys and mouse clicks select options; a horizontal mouse drag is treated
//! as a touch swipe.

mod render;
mod screen;

pub use screen::Screen;

use std::io::{Stdout, stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, info};

use estimator_core::Catalog;

use crate::config::AppConfig;
use crate::logging;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs the interactive wizard until the user quits.
///
/// Stdout logging is muted while the terminal is in raw mode; file logging
/// keeps running.
pub fn run(
    catalog: Catalog,
    config: &AppConfig,
) -> Result<()> {
    let _mute = logging::mute_stdout()?;
    debug!("initializing terminal");

    enable_raw_mode().context("Failed to enable raw mode")?;
    crossterm::execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout());
    let result = Terminal::new(backend)
        .context("Failed to create terminal")
        .and_then(|mut terminal| event_loop(&mut terminal, Screen::new(catalog, config)));

    // Always attempt cleanup, even if the loop failed.
    logging::log_task_error("terminal restore", restore_terminal());
    result
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    crossterm::execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture)
        .context("Failed to leave alternate screen")?;
    Ok(())
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    mut screen: Screen,
) -> Result<()> {
    info!("starting estimator ui");

    loop {
        terminal
            .draw(|f| render::draw(f, &mut screen))
            .context("Failed to draw")?;

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) => screen.handle_key(key),
                Event::Mouse(mouse) => screen.handle_mouse(mouse),
                Event::FocusLost | Event::Resize(_, _) => screen.cancel_gesture(),
                _ => {}
            }
        }

        if screen.should_quit() {
            info!("estimator ui closed");
            return Ok(());
        }
    }
}
