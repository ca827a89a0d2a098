use ratatui::style::{Color, Style};

/// Color theme for tack.
///
/// Text and chrome use the terminal's default foreground. Color is reserved
/// for the controls (add, delete) and for drag and edit feedback.
pub struct Theme;

impl Theme {
    pub const FG: Color = Color::Reset;
    pub const DIM: Color = Color::DarkGray;

    // List
    pub const LIST_TITLE: Color = Color::Reset;
    pub const LIST_BORDER: Color = Color::Reset;

    // Card
    pub const CARD_BORDER: Color = Color::Reset;
    pub const CARD_TEXT: Color = Color::Reset;
    pub const EDIT_BORDER: Color = Color::Yellow;

    // Controls
    pub const ADD: Color = Color::Green;
    pub const DELETE: Color = Color::Red;

    // Drag feedback
    pub const DROP_TARGET: Color = Color::Cyan;
    pub const DRAG_PREVIEW: Color = Color::Cyan;

    // Status bar
    pub const STATUS_ERROR: Color = Color::Red;

    pub fn dim_style() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn status_style() -> Style {
        Style::default().fg(Self::FG)
    }
}
