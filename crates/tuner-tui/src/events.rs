//! Event pipeline — producers feeding the main loop.
//!
//! - Input producer: a dedicated thread blocking on `crossterm::event::read()`.
//! - Status producer: reads the output of each player session, one session
//!   after another, for the whole run.
//!
//! Both send `AppMessage` into the same channel; the main loop is the only
//! consumer.

use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::player::{CloseReason, OutputHandle};

/// Footer text shown when a player's output ends.
pub const PLAYBACK_STOPPED: &str = "Playing stopped";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMessage {
    Key(KeyEvent),
    Resize(u16, u16),
    /// Ctrl-C from the terminal.
    Interrupt,
    TerminalError(String),
    /// One line of player output.
    Status(String),
}

/// Map a raw terminal event onto the pipeline.  Events the UI does not use
/// (mouse, focus, paste, key releases) are dropped.
pub fn translate_event(ev: Event) -> Option<AppMessage> {
    match ev {
        Event::Key(key) if key.kind == KeyEventKind::Release => None,
        Event::Key(key)
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            Some(AppMessage::Interrupt)
        }
        Event::Key(key) => Some(AppMessage::Key(key)),
        Event::Resize(w, h) => Some(AppMessage::Resize(w, h)),
        _ => None,
    }
}

/// Start the terminal input producer on its own thread.  It runs until the
/// terminal reports an error or the main loop drops its receiver; a thread
/// still parked in `read()` at exit is reclaimed with the process.
pub fn spawn_input_producer(tx: mpsc::Sender<AppMessage>) -> std::io::Result<()> {
    std::thread::Builder::new()
        .name("tuner-input".to_string())
        .spawn(move || loop {
            match event::read() {
                Ok(ev) => {
                    let Some(msg) = translate_event(ev) else {
                        continue;
                    };
                    if tx.blocking_send(msg).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("input: terminal read failed: {}", e);
                    let _ = tx.blocking_send(AppMessage::TerminalError(e.to_string()));
                    break;
                }
            }
        })?;
    Ok(())
}

/// Strip the line terminator; for carriage-return progress output keep the
/// newest segment.
pub fn clean_status_line(raw: &str) -> String {
    raw.trim_end_matches(['\r', '\n'])
        .rsplit('\r')
        .map(str::trim_end)
        .find(|segment| !segment.is_empty())
        .unwrap_or("")
        .to_string()
}

/// How one session's output stream ended.
enum SessionEnd {
    /// EOF or a read failure.
    Eof,
    /// The player closed the session.
    Closed(CloseReason),
    /// The main loop is gone.
    Disconnected,
}

/// Forward player output to the main loop, one session at a time.
///
/// A session ends with one `PLAYBACK_STOPPED` status, whether the stream hit
/// EOF, failed, or was closed by the player.  A session closed for a station
/// switch ends silently, so the footer keeps the new station's text.
pub async fn status_producer(
    mut pipes: mpsc::UnboundedReceiver<OutputHandle>,
    tx: mpsc::Sender<AppMessage>,
) {
    while let Some(handle) = pipes.recv().await {
        debug!("status: new player output");
        match forward_session(handle, &tx).await {
            SessionEnd::Disconnected => return,
            SessionEnd::Closed(CloseReason::Switched) => {
                debug!("status: station switched");
                continue;
            }
            SessionEnd::Closed(CloseReason::Stopped) | SessionEnd::Eof => {}
        }
        if tx
            .send(AppMessage::Status(PLAYBACK_STOPPED.to_string()))
            .await
            .is_err()
        {
            return;
        }
    }
    debug!("status: pipe channel closed");
}

async fn forward_session(handle: OutputHandle, tx: &mpsc::Sender<AppMessage>) -> SessionEnd {
    let OutputHandle { reader, mut closed } = handle;
    let mut reader = BufReader::new(reader);
    // Raw bytes: stream titles are often Latin-1, not UTF-8.
    let mut line = Vec::new();
    loop {
        line.clear();
        let read = tokio::select! {
            biased;
            reason = &mut closed => {
                // A dropped sender means the player itself went away.
                return SessionEnd::Closed(reason.unwrap_or(CloseReason::Stopped));
            }
            r = reader.read_until(b'\n', &mut line) => r,
        };
        match read {
            Ok(0) => return SessionEnd::Eof,
            Ok(_) => {
                let status = clean_status_line(&String::from_utf8_lossy(&line));
                if status.is_empty() {
                    continue;
                }
                if tx.send(AppMessage::Status(status)).await.is_err() {
                    return SessionEnd::Disconnected;
                }
            }
            Err(e) => {
                debug!("status: read failed: {}", e);
                return SessionEnd::Eof;
            }
        }
    }
}
