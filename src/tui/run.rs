//! TUI main loop.
//!
//! This module provides the entry point for running the interactive scan
//! screen. It handles terminal setup, the event loop, and cleanup on
//! exit.
//!
//! # Event Loop
//!
//! The loop owns the [`App`] (and with it the live scan session) and
//! processes discrete events one at a time, so the session never sees
//! overlapping calls:
//! 1. Drain lookup completions from the worker channel
//! 2. Render the current state
//! 3. Poll the keyboard with a timeout and apply the resulting action
//! 4. Dispatch any lookup request the action produced to a worker thread
//!
//! # Terminal Management
//!
//! Raw mode and the alternate screen are entered on startup and always
//! reverted on exit, including on panic.

use std::io::{self, Stdout};
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use thiserror::Error;

use crate::link::LinkOpener;
use crate::store::AllowListStore;

use super::app::App;
use super::events::EventHandler;
use super::ui::render;
use super::worker::{self, SessionEvent};

/// Frame rate limit: ~60 FPS.
const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Event poll timeout: matches the frame duration for responsive updates.
const POLL_TIMEOUT: Duration = Duration::from_millis(16);

/// Error type for TUI operations.
#[derive(Debug, Error)]
pub enum TuiError {
    /// I/O error from terminal operations.
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),

    /// Event handling error.
    #[error("event error: {0}")]
    Event(#[from] super::events::EventError),
}

/// Result type for TUI operations.
pub type TuiResult<T> = Result<T, TuiError>;

/// Type alias for the terminal backend.
type Terminal = ratatui::Terminal<CrosstermBackend<Stdout>>;

/// Run the interactive scan screen.
///
/// Takes over the terminal until the operator quits or the shutdown flag
/// is raised. Lookups triggered by scans run on worker threads created
/// here; their completions are applied between frames.
///
/// # Errors
///
/// Returns [`TuiError::Io`] for terminal I/O errors and
/// [`TuiError::Event`] for event handling errors. The terminal is
/// restored in every case.
pub fn run_tui(
    app: &mut App,
    store: Arc<dyn AllowListStore>,
    opener: &dyn LinkOpener,
    shutdown_flag: Option<Arc<AtomicBool>>,
) -> TuiResult<()> {
    // Restore the terminal before the panic message is printed.
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let result = run_tui_inner(app, store, opener, shutdown_flag);

    let _ = panic::take_hook();

    result
}

fn run_tui_inner(
    app: &mut App,
    store: Arc<dyn AllowListStore>,
    opener: &dyn LinkOpener,
    shutdown_flag: Option<Arc<AtomicBool>>,
) -> TuiResult<()> {
    let mut terminal = setup_terminal()?;

    let event_handler = EventHandler::new();
    let (completion_tx, completion_rx) = mpsc::channel::<SessionEvent>();

    let mut last_render = Instant::now();

    loop {
        if let Some(ref flag) = shutdown_flag {
            if flag.load(Ordering::SeqCst) {
                log::info!("shutdown signal received, exiting TUI");
                break;
            }
        }

        if app.should_quit() {
            log::debug!("app requested quit");
            break;
        }

        // Completions first, so a resolved lookup is visible in the very
        // next frame.
        while let Ok(SessionEvent::LookupDone { generation, result }) = completion_rx.try_recv() {
            app.apply_completion(generation, result);
        }

        terminal.draw(|frame| render(frame, app))?;

        if let Some(action) = event_handler.poll(POLL_TIMEOUT, app.session().phase())? {
            if let Some(request) = app.handle_action(action, opener) {
                app.lookup_issued(request.generation);
                worker::spawn_lookup(Arc::clone(&store), request, completion_tx.clone());
            }
        }

        let elapsed = last_render.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
        last_render = Instant::now();
    }

    restore_terminal()?;

    log::info!("TUI exited normally");
    Ok(())
}

/// Set up the terminal for TUI mode.
fn setup_terminal() -> TuiResult<Terminal> {
    log::debug!("setting up terminal for TUI");

    terminal::enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;

    Ok(terminal)
}

/// Restore the terminal to its original state.
fn restore_terminal() -> TuiResult<()> {
    let _ = terminal::disable_raw_mode();

    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen, cursor::Show);

    log::debug!("terminal restored");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tui_error_display() {
        let io_err = io::Error::other("test error");
        let tui_err = TuiError::Io(io_err);
        assert!(format!("{}", tui_err).contains("terminal I/O error"));
    }

    #[test]
    fn test_frame_duration_matches_poll_timeout() {
        // Keeps rendering responsive while a lookup is outstanding.
        assert_eq!(FRAME_DURATION, POLL_TIMEOUT);
    }
}
