//! Terminal mode guard.
//!
//! Raw mode and the alternate screen are entered together and undone in
//! `Drop`, so every exit from `main` after setup (early `?`, error from the
//! loop, panic unwinding) leaves the shell usable.

use std::io::{self, Write};

use ratatui::crossterm::{
    cursor, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::debug;

pub struct TerminalGuard<W: Write> {
    out: W,
}

impl<W: Write> TerminalGuard<W> {
    /// Enable raw mode, switch to the alternate screen and hide the cursor.
    pub fn enter(out: W) -> io::Result<Self> {
        enable_raw_mode()?;
        // From here on, dropping the guard restores whatever was changed.
        let mut guard = Self { out };
        execute!(guard.out, EnterAlternateScreen, cursor::Hide)?;
        Ok(guard)
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            debug!("terminal: disable raw mode failed: {}", e);
        }
        if let Err(e) = execute!(self.out, LeaveAlternateScreen, cursor::Show) {
            debug!("terminal: restore failed: {}", e);
        }
    }
}
