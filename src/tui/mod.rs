//! Terminal User Interface module.
//!
//! The interactive scan screen, built on ratatui with the crossterm
//! backend.
//!
//! # Architecture
//!
//! The TUI follows a unidirectional data flow:
//! 1. Key events are captured from the terminal (crossterm)
//! 2. Events are translated to Actions, phase-aware ([`events`])
//! 3. Actions modify the [`App`] state, which owns the scan session
//! 4. The UI renders from the current state ([`ui`])
//!
//! Lookup completions enter the same loop as messages from the worker
//! thread ([`worker`]), so the session only ever sees one event at a
//! time.

pub mod app;
pub mod events;
pub mod run;
pub mod theme;
pub mod ui;
pub mod worker;

// Re-export commonly used types
pub use app::{Action, App, Notice, NoticeKind};
pub use events::{translate_key, EventError, EventHandler};
pub use run::{run_tui, TuiError, TuiResult};
pub use theme::Theme;
pub use ui::render;
pub use worker::{spawn_lookup, SessionEvent};
