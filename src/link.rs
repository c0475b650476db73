//! Link-opening capability.
//!
//! A scanned code that turned out valid may itself be a URL (tickets and
//! badges often encode one). Opening it is delegated to an external
//! capability modeled by [`LinkOpener`]: a syntax-only `can_open` probe and
//! an `open` dispatch. The session core calls both only under its own
//! guard, and a failed probe is reported to the user without ever invoking
//! the opener.

use std::process::Command;

use thiserror::Error;

/// Failure modes of the open-result command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OpenError {
    /// There is no valid scan result to open.
    #[error("no valid scan result to open")]
    NoResult,

    /// The scanned code is not a syntactically openable link.
    #[error("not an openable link: {0}")]
    NotOpenable(String),

    /// The platform opener could not be launched.
    #[error("failed to launch link handler: {0}")]
    Launch(String),
}

/// External capability for opening a scanned code as a link.
pub trait LinkOpener {
    /// Syntax-only probe: could `target` be handed to the opener at all?
    /// Must not touch the network.
    fn can_open(&self, target: &str) -> bool;

    /// Dispatch `target` to the platform's link handler.
    ///
    /// # Errors
    ///
    /// Returns [`OpenError::Launch`] when the handler cannot be spawned.
    fn open(&self, target: &str) -> Result<(), OpenError>;
}

/// Opener backed by the operating system's default URL handler.
///
/// `can_open` accepts http/https URLs with a non-empty host and no
/// whitespace or quoting characters. The check is deliberately strict:
/// anything it rejects is never passed to a child process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl SystemOpener {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl LinkOpener for SystemOpener {
    fn can_open(&self, target: &str) -> bool {
        is_http_url(target)
    }

    fn open(&self, target: &str) -> Result<(), OpenError> {
        log::info!("opening link: {}", target);

        let result = open_command(target).spawn();
        match result {
            Ok(_) => Ok(()),
            Err(e) => Err(OpenError::Launch(e.to_string())),
        }
    }
}

/// Check that `target` is an http or https URL with a host part.
fn is_http_url(target: &str) -> bool {
    let rest = match target
        .strip_prefix("https://")
        .or_else(|| target.strip_prefix("http://"))
    {
        Some(rest) => rest,
        None => return false,
    };

    if target.chars().any(|c| c.is_whitespace() || c == '"' || c == '\'') {
        return false;
    }

    let host = rest.split(['/', '?', '#']).next().unwrap_or("");
    !host.is_empty()
}

#[cfg(target_os = "macos")]
fn open_command(target: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(target);
    cmd
}

#[cfg(windows)]
fn open_command(target: &str) -> Command {
    // `start` is a cmd builtin; the empty string is the window title slot.
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", ""]).arg(target);
    cmd
}

#[cfg(not(any(target_os = "macos", windows)))]
fn open_command(target: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(target);
    cmd
}
