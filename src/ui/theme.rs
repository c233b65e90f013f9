//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::config::ThemeChoice;
use crate::data::Role;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Row and bar color for tanks.
    pub tank: Color,
    /// Row and bar color for healers.
    pub healer: Color,
    /// Row and bar color for everyone else.
    pub dps: Color,
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for feed failures.
    pub error: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for panel titles.
    pub title: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            tank: Color::Indexed(81),
            healer: Color::Indexed(41),
            dps: Color::Indexed(203),
            highlight: Color::Cyan,
            error: Color::Red,
            border: Color::Indexed(248),
            title: Style::default().add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            tank: Color::Indexed(25),
            healer: Color::Indexed(28),
            dps: Color::Indexed(160),
            highlight: Color::Blue,
            error: Color::Red,
            border: Color::DarkGray,
            title: Style::default().add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Resolve a configured choice into a theme.
    pub fn from_choice(choice: ThemeChoice) -> Self {
        match choice {
            ThemeChoice::Auto => Self::auto_detect(),
            ThemeChoice::Dark => Self::dark(),
            ThemeChoice::Light => Self::light(),
        }
    }

    /// Get the display color for a role
    pub fn role_color(&self, role: Role) -> Color {
        match role {
            Role::Tank => self.tank,
            Role::Healer => self.healer,
            Role::Dps => self.dps,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
