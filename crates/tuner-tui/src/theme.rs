//! Color palette and style constants for the tuner TUI.

use ratatui::style::{Color, Modifier, Style};

// ── Color palette ─────────────────────────────────────────────────────────────

pub const C_ACCENT: Color = Color::Rgb(255, 95, 95);
pub const C_PLAYING: Color = Color::Rgb(80, 200, 120);
pub const C_MUTED: Color = Color::Rgb(72, 72, 88);
pub const C_SEPARATOR: Color = Color::Rgb(40, 40, 52);
pub const C_SECONDARY: Color = Color::Rgb(115, 115, 138);
pub const C_PRIMARY: Color = Color::Rgb(210, 210, 225);
pub const C_SELECTION_BG: Color = Color::Rgb(28, 28, 40);

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_default() -> Style {
    Style::default().fg(C_PRIMARY)
}

pub fn style_secondary() -> Style {
    Style::default().fg(C_SECONDARY)
}

pub fn style_muted() -> Style {
    Style::default().fg(C_MUTED)
}

pub fn style_separator() -> Style {
    Style::default().fg(C_SEPARATOR)
}

pub fn style_playing() -> Style {
    Style::default().fg(C_PLAYING)
}

/// Cursor row: accent on the selection background, full width.
pub fn style_cursor() -> Style {
    Style::default()
        .fg(C_ACCENT)
        .bg(C_SELECTION_BG)
        .add_modifier(Modifier::BOLD)
}
