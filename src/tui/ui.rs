//! TUI layout and rendering with ratatui.
//!
//! # Overview
//!
//! Renders the single scan screen:
//! - Header with title and phase tag
//! - Content area: code entry box while idle, progress panel while a
//!   lookup is outstanding, verdict banner once resolved
//! - Footer with the key hints available in the current phase
//! - Result modal overlaid on the banner, with the inline open-link notice
//!
//! Rendering is pure: everything here reads the [`App`] and draws; no
//! state changes happen in this module.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::session::Phase;

use super::app::{App, NoticeKind};

/// Render the TUI based on current application state.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    render_content(frame, app, chunks[1]);
    render_footer(frame, app, chunks[2]);

    if app.session().phase().is_resolved() {
        render_result_dialog(frame, app, area);
    }
}

/// Render the header with title and phase tag.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let tag = match app.session().phase() {
        Phase::Idle => "Ready to Scan",
        Phase::Scanning | Phase::Validating => "Validating...",
        Phase::Resolved => "Result",
    };

    let header = Paragraph::new(format!("scangate - Gate Check Scanner [{}]", tag))
        .style(
            Style::default()
                .fg(app.theme().primary)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme().primary)),
        );

    frame.render_widget(header, area);
}

/// Render the main content area based on current phase.
fn render_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.session().phase() {
        Phase::Idle => render_entry_content(frame, app, area),
        Phase::Scanning | Phase::Validating => render_validating_content(frame, app, area),
        Phase::Resolved => render_verdict_banner(frame, app, area),
    }
}

/// Render the code entry box shown while idle.
fn render_entry_content(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(1), // Prompt
            Constraint::Length(3), // Entry box
            Constraint::Min(0),    // Hint
        ])
        .split(area);

    let prompt = Paragraph::new("Scan a code, or type it and press Enter")
        .style(Style::default().fg(app.theme().normal))
        .alignment(Alignment::Center);
    frame.render_widget(prompt, chunks[0]);

    let entry = Paragraph::new(format!("{}_", app.input()))
        .style(Style::default().fg(app.theme().normal))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Code")
                .border_style(Style::default().fg(app.theme().dim)),
        );
    frame.render_widget(entry, chunks[1]);

    let hint = Paragraph::new("Wedge scanners type here automatically.")
        .style(Style::default().fg(app.theme().dim))
        .alignment(Alignment::Center);
    frame.render_widget(hint, chunks[2]);
}

/// Render the in-flight panel shown while the lookup is outstanding.
fn render_validating_content(frame: &mut Frame, app: &App, area: Rect) {
    let code = app.session().last_code().unwrap_or_default();

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Checking allow-list...",
            Style::default()
                .fg(app.theme().primary)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(truncate_code(code, area.width.saturating_sub(4) as usize)),
        Line::from(""),
        Line::from(Span::styled(
            "Further scans are ignored until this one resolves.",
            Style::default().fg(app.theme().dim),
        )),
    ];

    let panel = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(panel, area);
}

/// Render the full-area verdict banner behind the result modal.
fn render_verdict_banner(frame: &mut Frame, app: &App, area: Rect) {
    let (label, color) = verdict_banner(app);

    let banner = Paragraph::new(Line::from(Span::styled(
        label,
        Style::default()
            .fg(app.theme().inverted_fg)
            .bg(color)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(banner, area);
}

/// Banner label and color for the resolved outcome.
fn verdict_banner(app: &App) -> (&'static str, ratatui::style::Color) {
    match (app.session().verdict(), app.session().failure()) {
        (Some(true), _) => (" VALID ", app.theme().success),
        (Some(false), _) => (" INVALID ", app.theme().danger),
        (None, Some(_)) => (" CHECK FAILED ", app.theme().danger),
        // Unreachable for a resolved session; render something sane anyway.
        (None, None) => (" ... ", app.theme().dim),
    }
}

/// Render the footer with the key hints for the current phase.
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let mut commands: Vec<(&str, &str)> = match app.session().phase() {
        Phase::Idle => vec![("Enter", "validate"), ("Esc", "quit")],
        Phase::Scanning | Phase::Validating => vec![("r", "reset"), ("q", "quit")],
        Phase::Resolved => vec![("r", "rescan"), ("q", "quit")],
    };

    if app.session().can_open_result() {
        commands.insert(1, ("o", "open link"));
    }

    let spans: Vec<Span> = commands
        .iter()
        .flat_map(|(key, desc)| {
            vec![
                Span::styled(
                    format!("[{}]", key),
                    Style::default()
                        .fg(app.theme().primary)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!(" {}  ", desc), Style::default().fg(app.theme().normal)),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme().dim)),
        );

    frame.render_widget(footer, area);
}

/// Render the result modal over the banner.
fn render_result_dialog(frame: &mut Frame, app: &App, area: Rect) {
    let dialog_area = centered_rect(60, 50, area);
    frame.render_widget(Clear, dialog_area);

    let session = app.session();
    let code = truncate_code(session.last_code().unwrap_or_default(), 48);

    let (title, title_color, message) = match (session.verdict(), session.failure()) {
        (Some(true), _) => (
            "Code Accepted",
            app.theme().success,
            "The code is on the allow-list.".to_string(),
        ),
        (Some(false), _) => (
            "Code Rejected",
            app.theme().danger,
            "The code is invalid or was not found.".to_string(),
        ),
        (None, Some(failure)) => ("Check Failed", app.theme().danger, failure.to_string()),
        (None, None) => ("Result", app.theme().dim, String::new()),
    };

    let mut lines = vec![
        Line::from(Span::styled(
            title,
            Style::default().fg(title_color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(code),
        Line::from(""),
        Line::from(message),
    ];

    if let Some(notice) = app.notice() {
        let color = match notice.kind {
            NoticeKind::Info => app.theme().success,
            NoticeKind::Error => app.theme().danger,
        };
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            notice.text.clone(),
            Style::default().fg(color),
        )));
    }

    lines.push(Line::from(""));
    let hints = if session.can_open_result() {
        "[r] Rescan    [o] Open Link    [q] Quit"
    } else {
        "[r] Rescan    [q] Quit"
    };
    lines.push(Line::from(Span::styled(
        hints,
        Style::default().fg(app.theme().primary),
    )));

    let dialog = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(title_color)),
        );

    frame.render_widget(dialog, dialog_area);
}

/// Compute a centered rectangle occupying the given percentages of `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Truncate a code for display, keeping the tail visible.
///
/// Codes tend to differ at the end (serial suffixes), so the front is
/// elided first.
#[must_use]
pub fn truncate_code(code: &str, max_width: usize) -> String {
    let count = code.chars().count();
    if count <= max_width {
        return code.to_string();
    }
    if max_width <= 3 {
        return "...".chars().take(max_width).collect();
    }

    let keep = max_width - 3;
    let tail: String = code.chars().skip(count - keep).collect();
    format!("...{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_code_short_is_unchanged() {
        assert_eq!(truncate_code("BAG-1", 10), "BAG-1");
        assert_eq!(truncate_code("", 10), "");
    }

    #[test]
    fn test_truncate_code_keeps_tail() {
        let truncated = truncate_code("BAG-20250001-EXTRA-LONG", 10);
        assert_eq!(truncated.chars().count(), 10);
        assert!(truncated.starts_with("..."));
        assert!(truncated.ends_with("LONG"));
    }

    #[test]
    fn test_truncate_code_tiny_width() {
        assert_eq!(truncate_code("ABCDEF", 3), "...");
        assert_eq!(truncate_code("ABCDEF", 2), "..");
    }

    #[test]
    fn test_centered_rect_is_contained() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = centered_rect(60, 50, area);
        assert!(rect.width <= 60);
        assert!(rect.height <= 20);
        assert!(rect.x >= 20);
        assert!(rect.y >= 10);
    }
}
