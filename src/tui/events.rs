//! TUI event handling with crossterm.
//!
//! # Overview
//!
//! Translates keyboard input into [`Action`]s. The capture surface is a
//! wedge-mode scanner or the operator's keyboard, so translation depends
//! on the session phase:
//! - `Idle`: printable characters feed the code buffer, Enter submits,
//!   Esc quits
//! - busy phases: `r`/Esc reset, `o` opens the result, `q` quits
//!
//! Ctrl+C always quits, regardless of phase.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use thiserror::Error;

use crate::session::Phase;

use super::app::Action;

/// Error type for event handling.
#[derive(Debug, Error)]
pub enum EventError {
    /// I/O error while polling or reading terminal events.
    #[error("event I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Polls the terminal for key events and translates them to actions.
#[derive(Debug, Default, Clone, Copy)]
pub struct EventHandler;

impl EventHandler {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Poll for the next action, waiting at most `timeout`.
    ///
    /// Returns `Ok(None)` when no event arrived in time or the event does
    /// not map to an action in the current phase.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Io`] when the terminal cannot be read.
    pub fn poll(&self, timeout: Duration, phase: Phase) -> Result<Option<Action>, EventError> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        match event::read()? {
            Event::Key(key) => Ok(translate_key(key, phase)),
            _ => Ok(None),
        }
    }
}

/// Translate a key event into an action for the given phase.
///
/// Only key presses are translated; repeats and releases are ignored so
/// Windows terminals do not double-type scanner input.
#[must_use]
pub fn translate_key(key: KeyEvent, phase: Phase) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    if phase.accepts_decode() {
        // The buffer is live: every printable character is potential code
        // payload, including letters that double as command keys elsewhere.
        match key.code {
            KeyCode::Char(c) => Some(Action::InputChar(c)),
            KeyCode::Backspace => Some(Action::Backspace),
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Esc => Some(Action::Quit),
            _ => None,
        }
    } else {
        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Esc => Some(Action::Reset),
            KeyCode::Char('o') | KeyCode::Char('O') => Some(Action::OpenResult),
            KeyCode::Char('q') | KeyCode::Char('Q') => Some(Action::Quit),
            // Mirrors dismissing the result alert on the original screen.
            KeyCode::Enter if phase.is_resolved() => Some(Action::Reset),
            _ => None,
        }
    }
}
