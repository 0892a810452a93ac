//! Theme and Colors
//!
//! 256-color palette indices, so the robot looks the same in every terminal
//! theme. The raw indices are exported for plain stderr output, which goes
//! through crossterm rather than ratatui.

use crossterm::style::Stylize;
use ratatui::style::{Color, Style};

// ============================================================================
// Palette indices
// ============================================================================

/// Robot body - pink
pub const ROBOT_INDEX: u8 = 205;

/// Status line - grey
pub const TEXT_INDEX: u8 = 240;

/// Success messages - green
pub const DONE_INDEX: u8 = 42;

/// Error messages - red
pub const ERROR_INDEX: u8 = 196;

// ============================================================================
// Colors
// ============================================================================

/// Robot animation color
pub const ROBOT: Color = Color::Indexed(ROBOT_INDEX);

/// Status text color
pub const TEXT: Color = Color::Indexed(TEXT_INDEX);

/// Success color
pub const DONE: Color = Color::Indexed(DONE_INDEX);

/// Error color
pub const ERROR: Color = Color::Indexed(ERROR_INDEX);

// ============================================================================
// Styles
// ============================================================================

/// Style for robot frames
#[must_use]
pub fn robot_style() -> Style {
    Style::default().fg(ROBOT)
}

/// Style for the status line
#[must_use]
pub fn text_style() -> Style {
    Style::default().fg(TEXT)
}

// ============================================================================
// Plain output
// ============================================================================

/// `text` in palette color `index` when `styled`, unchanged otherwise
#[must_use]
pub fn paint(text: &str, index: u8, styled: bool) -> String {
    if styled {
        text.with(crossterm::style::Color::AnsiValue(index)).to_string()
    } else {
        text.to_string()
    }
}
