//! App — the main control loop.
//!
//! Architecture:
//! - `App` owns the `Dj` (selection + player), the cursor and the footer text.
//! - Producers (events.rs) feed one `tokio::mpsc` channel of `AppMessage`.
//! - The loop handles one message per wake-up, then redraws if needed.
//! - Nothing else mutates state, so nothing is locked.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::action::{action_for_key, Action, KEYS_HELP};
use crate::core::Dj;
use crate::events::AppMessage;
use crate::player::Player;
use crate::ui::View;

pub struct App<P: Player> {
    dj: Dj<P>,
    /// Highlighted row; independent of the playing station.
    cursor: usize,
    status: String,
    should_quit: bool,
}

impl<P: Player> App<P> {
    pub fn new(dj: Dj<P>) -> Self {
        Self {
            dj,
            cursor: 0,
            status: KEYS_HELP.to_string(),
            should_quit: false,
        }
    }

    pub fn view(&self) -> View<'_> {
        View {
            catalog: self.dj.catalog(),
            cursor: self.cursor,
            playing: self.dj.current_station(),
            status: &self.status,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    /// Consume messages until quit, interrupt, terminal error, or until every
    /// producer is gone.  Playback is stopped on the way out in all cases, and
    /// the player process has exited by the time this returns.
    pub async fn run<D>(mut self, mut rx: mpsc::Receiver<AppMessage>, mut draw: D) -> anyhow::Result<()>
    where
        D: FnMut(&View) -> anyhow::Result<()>,
    {
        let result = self.event_loop(&mut rx, &mut draw).await;
        self.dj.shutdown().await;
        result
    }

    async fn event_loop<D>(&mut self, rx: &mut mpsc::Receiver<AppMessage>, draw: &mut D) -> anyhow::Result<()>
    where
        D: FnMut(&View) -> anyhow::Result<()>,
    {
        draw(&self.view())?;
        while let Some(msg) = rx.recv().await {
            let redraw = self.handle_message(msg)?;
            if self.should_quit {
                info!("app: quitting");
                return Ok(());
            }
            if redraw {
                draw(&self.view())?;
            }
        }
        debug!("app: all producers gone");
        Ok(())
    }

    /// Apply one message.  Returns whether the screen needs redrawing.
    fn handle_message(&mut self, msg: AppMessage) -> anyhow::Result<bool> {
        match msg {
            AppMessage::Key(key) => match action_for_key(key) {
                Some(action) => self.apply_action(action),
                None => Ok(false),
            },
            AppMessage::Status(line) => {
                self.status = line;
                Ok(true)
            }
            AppMessage::Resize(w, h) => {
                debug!("app: resize {}x{}", w, h);
                Ok(true)
            }
            AppMessage::Interrupt => {
                self.should_quit = true;
                Ok(false)
            }
            AppMessage::TerminalError(e) => {
                warn!("app: terminal error: {}", e);
                anyhow::bail!("terminal error: {e}")
            }
        }
    }

    fn apply_action(&mut self, action: Action) -> anyhow::Result<bool> {
        match action {
            Action::Quit => {
                self.should_quit = true;
                Ok(false)
            }
            Action::PlaySelected => {
                let before = self.dj.current_station();
                self.dj.play(self.cursor)?;
                if self.dj.current_station() == before {
                    return Ok(false);
                }
                if let Some(station) = self.dj.current() {
                    self.status = format!("Tuning in to {}", station.name);
                }
                Ok(true)
            }
            Action::Stop => {
                self.dj.stop();
                Ok(true)
            }
            Action::Mute => {
                self.dj.mute();
                Ok(false)
            }
            Action::TogglePause => {
                self.dj.pause();
                Ok(false)
            }
            Action::VolumeUp => {
                self.dj.turnup();
                Ok(false)
            }
            Action::VolumeDown => {
                self.dj.turndown();
                Ok(false)
            }
            Action::SelectUp => Ok(self.move_cursor_up()),
            Action::SelectDown => Ok(self.move_cursor_down()),
        }
    }

    fn move_cursor_up(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    fn move_cursor_down(&mut self) -> bool {
        if self.cursor + 1 >= self.dj.catalog().len() {
            return false;
        }
        self.cursor += 1;
        true
    }
}
