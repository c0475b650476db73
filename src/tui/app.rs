//! TUI application state management.
//!
//! # Overview
//!
//! The [`App`] struct is the state container for the interactive screen.
//! It owns the live [`ScanSession`] plus the purely presentational bits
//! around it:
//! - the input buffer the capture surface (a wedge scanner or the
//!   operator's keyboard) is typing into
//! - the inline notice line shown in the result modal (open-link reports)
//! - the color theme and the quit latch
//!
//! # Architecture
//!
//! The app is accessed only from the main thread. Key events are
//! translated to [`Action`]s by the events module; actions are applied
//! here; rendering reads the state and never mutates it. The only output
//! an action can produce is a [`LookupRequest`], which the run loop hands
//! to the lookup worker.

use crate::link::LinkOpener;
use crate::session::{LookupRequest, ScanSession};
use crate::store::{Snapshot, StoreError};

use super::theme::Theme;

/// User action triggered by keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Append a character to the code input buffer.
    InputChar(char),
    /// Remove the last character from the input buffer.
    Backspace,
    /// Submit the input buffer as a decode event.
    Submit,
    /// Reset the session and clear the input buffer.
    Reset,
    /// Open the validated code as a link.
    OpenResult,
    /// Quit the application.
    Quit,
}

/// Severity of the inline notice shown in the result modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A transient one-line notice (open-link success or failure).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

/// TUI application state.
///
/// # Thread Safety
///
/// Not thread-safe; the run loop owns it and applies events one at a
/// time. Lookup completions cross threads as messages and are applied
/// here via [`App::apply_completion`].
#[derive(Debug)]
pub struct App {
    session: ScanSession,
    input: String,
    notice: Option<Notice>,
    theme: Theme,
    should_quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Create an app with a fresh idle session and the default theme.
    #[must_use]
    pub fn new() -> Self {
        Self::with_theme(Theme::default())
    }

    /// Create an app with the given theme.
    #[must_use]
    pub fn with_theme(theme: Theme) -> Self {
        Self {
            session: ScanSession::new(),
            input: String::new(),
            notice: None,
            theme,
            should_quit: false,
        }
    }

    // ==================== Accessors ====================

    /// The scan session's observable state.
    #[must_use]
    pub fn session(&self) -> &ScanSession {
        &self.session
    }

    /// The code input buffer.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The inline notice, if one is showing.
    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// The active color theme.
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Whether the run loop should exit.
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    // ==================== Action Handling ====================

    /// Apply a user action.
    ///
    /// Returns a [`LookupRequest`] when the action produced an accepted
    /// decode event; the caller must dispatch it and acknowledge with
    /// [`ScanSession::lookup_issued`].
    pub fn handle_action(
        &mut self,
        action: Action,
        opener: &dyn LinkOpener,
    ) -> Option<LookupRequest> {
        log::trace!("handling action {:?} in {:?}", action, self.session.phase());

        match action {
            Action::InputChar(c) => {
                if self.session.phase().accepts_decode() {
                    self.input.push(c);
                } else {
                    // Scanner kept typing mid-validation; the burst is dropped
                    // just like the decode event itself would be.
                    log::trace!("ignoring input while busy");
                }
                None
            }
            Action::Backspace => {
                self.input.pop();
                None
            }
            Action::Submit => {
                let code = std::mem::take(&mut self.input);
                self.session.on_decode(&code)
            }
            Action::Reset => {
                self.reset();
                None
            }
            Action::OpenResult => {
                self.open_result(opener);
                None
            }
            Action::Quit => {
                self.should_quit = true;
                None
            }
        }
    }

    /// Acknowledge that a lookup request was handed to the worker.
    pub fn lookup_issued(&mut self, generation: u64) {
        self.session.lookup_issued(generation);
    }

    /// Apply a lookup completion from the worker.
    ///
    /// Stale completions are discarded by the session; `false` means
    /// nothing changed.
    pub fn apply_completion(
        &mut self,
        generation: u64,
        result: Result<Snapshot, StoreError>,
    ) -> bool {
        self.session.on_lookup_complete(generation, result)
    }

    /// Reset the session, the input buffer, and any notice.
    pub fn reset(&mut self) {
        self.session.reset();
        self.input.clear();
        self.notice = None;
    }

    fn open_result(&mut self, opener: &dyn LinkOpener) {
        match self.session.open_result(opener) {
            Ok(()) => {
                self.notice = Some(Notice {
                    kind: NoticeKind::Info,
                    text: "Opened link in the system browser".to_string(),
                });
            }
            Err(err) => {
                log::debug!("open-result rejected: {}", err);
                self.notice = Some(Notice {
                    kind: NoticeKind::Error,
                    text: err.to_string(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::OpenError;
    use crate::session::Phase;

    /// Opener stub: everything is openable, nothing actually launches.
    struct YesOpener;

    impl LinkOpener for YesOpener {
        fn can_open(&self, _target: &str) -> bool {
            true
        }
        fn open(&self, _target: &str) -> Result<(), OpenError> {
            Ok(())
        }
    }

    /// Opener stub: nothing is openable.
    struct NoOpener;

    impl LinkOpener for NoOpener {
        fn can_open(&self, _target: &str) -> bool {
            false
        }
        fn open(&self, _target: &str) -> Result<(), OpenError> {
            panic!("open must not be invoked when can_open is false");
        }
    }

    fn type_code(app: &mut App, code: &str) -> Option<LookupRequest> {
        for c in code.chars() {
            app.handle_action(Action::InputChar(c), &YesOpener);
        }
        app.handle_action(Action::Submit, &YesOpener)
    }

    #[test]
    fn test_typing_fills_input_buffer() {
        let mut app = App::new();
        app.handle_action(Action::InputChar('A'), &YesOpener);
        app.handle_action(Action::InputChar('B'), &YesOpener);
        assert_eq!(app.input(), "AB");

        app.handle_action(Action::Backspace, &YesOpener);
        assert_eq!(app.input(), "A");
    }

    #[test]
    fn test_submit_emits_decode_and_clears_buffer() {
        let mut app = App::new();
        let request = type_code(&mut app, "BAG-20250001").unwrap();

        assert_eq!(request.code, "BAG-20250001");
        assert_eq!(app.input(), "");
        assert_eq!(app.session().phase(), Phase::Scanning);
    }

    #[test]
    fn test_submit_empty_buffer_is_noop() {
        let mut app = App::new();
        assert!(app.handle_action(Action::Submit, &YesOpener).is_none());
        assert_eq!(app.session().phase(), Phase::Idle);
    }

    #[test]
    fn test_input_ignored_while_busy() {
        let mut app = App::new();
        let request = type_code(&mut app, "A").unwrap();
        app.lookup_issued(request.generation);

        app.handle_action(Action::InputChar('X'), &YesOpener);
        assert_eq!(app.input(), "");

        // Submit while busy is discarded too.
        assert!(app.handle_action(Action::Submit, &YesOpener).is_none());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut app = App::new();
        let request = type_code(&mut app, "A").unwrap();
        app.lookup_issued(request.generation);
        app.apply_completion(request.generation, Ok(Snapshot::empty()));
        app.handle_action(Action::OpenResult, &YesOpener);
        assert!(app.notice().is_some());

        app.handle_action(Action::Reset, &YesOpener);
        assert_eq!(app.session().phase(), Phase::Idle);
        assert!(app.session().last_code().is_none());
        assert!(app.notice().is_none());
        assert_eq!(app.input(), "");
    }

    #[test]
    fn test_open_result_on_valid_code_sets_info_notice() {
        let mut app = App::new();
        let request = type_code(&mut app, "https://example.com").unwrap();
        app.lookup_issued(request.generation);
        app.apply_completion(
            request.generation,
            Ok(["https://example.com"].into_iter().collect()),
        );

        app.handle_action(Action::OpenResult, &YesOpener);
        let notice = app.notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Info);
    }

    #[test]
    fn test_open_result_not_openable_sets_error_notice_keeps_phase() {
        let mut app = App::new();
        let request = type_code(&mut app, "not-a-url").unwrap();
        app.lookup_issued(request.generation);
        app.apply_completion(request.generation, Ok(["not-a-url"].into_iter().collect()));
        assert_eq!(app.session().verdict(), Some(true));

        app.handle_action(Action::OpenResult, &NoOpener);
        let notice = app.notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert!(notice.text.contains("not an openable link"));
        assert_eq!(app.session().phase(), Phase::Resolved);
    }

    #[test]
    fn test_open_result_without_result_sets_error_notice() {
        let mut app = App::new();
        app.handle_action(Action::OpenResult, &YesOpener);
        assert_eq!(app.notice().unwrap().kind, NoticeKind::Error);
    }

    #[test]
    fn test_quit_latches() {
        let mut app = App::new();
        assert!(!app.should_quit());
        app.handle_action(Action::Quit, &YesOpener);
        assert!(app.should_quit());
    }

    #[test]
    fn test_stale_completion_leaves_app_unchanged() {
        let mut app = App::new();
        let request = type_code(&mut app, "A").unwrap();
        app.lookup_issued(request.generation);
        app.reset();

        assert!(!app.apply_completion(request.generation, Ok(Snapshot::empty())));
        assert_eq!(app.session().phase(), Phase::Idle);
    }
}
