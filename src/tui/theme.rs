//! TUI color palette.

use ratatui::style::Color;

/// A collection of colors used for TUI components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub primary: Color,
    pub danger: Color,
    pub success: Color,
    pub dim: Color,
    pub normal: Color,
    pub inverted_fg: Color,
}

impl Theme {
    /// High-contrast dark theme (default).
    #[must_use]
    pub fn dark() -> Self {
        Self {
            primary: Color::Cyan,
            danger: Color::Red,
            success: Color::Green,
            dim: Color::DarkGray,
            normal: Color::White,
            inverted_fg: Color::Black,
        }
    }

    /// High-contrast light theme.
    #[must_use]
    pub fn light() -> Self {
        Self {
            primary: Color::Blue,
            danger: Color::Red,
            success: Color::Green,
            dim: Color::Gray,
            normal: Color::Black,
            inverted_fg: Color::White,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
