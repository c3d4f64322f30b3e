//! Action enum — user intents produced from key presses.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // ── Playback ─────────────────────────────────────────────────────────────
    PlaySelected,
    Stop,
    Mute,
    TogglePause,
    VolumeUp,
    VolumeDown,

    // ── Navigation ───────────────────────────────────────────────────────────
    SelectUp,
    SelectDown,

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
}

/// Key bindings.  Unbound keys map to `None`.
pub fn action_for_key(key: KeyEvent) -> Option<Action> {
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return None;
    }
    let action = match key.code {
        KeyCode::Esc => Action::Quit,
        KeyCode::Enter => Action::PlaySelected,
        KeyCode::Char('q') => Action::Stop,
        KeyCode::Char('m') => Action::Mute,
        KeyCode::Char('p') => Action::TogglePause,
        KeyCode::Char('+') => Action::VolumeUp,
        KeyCode::Char('-') => Action::VolumeDown,
        KeyCode::Char('j') | KeyCode::Down => Action::SelectDown,
        KeyCode::Char('k') | KeyCode::Up => Action::SelectUp,
        _ => return None,
    };
    Some(action)
}

/// Footer text shown before the player has said anything.
pub const KEYS_HELP: &str =
    "Ready (Esc: Quit app | Enter: Play | q: Stop | m: Mute | p: Pause | +: Louder | -: Quieter | k/↑ : Up | j/↓: Down)";
