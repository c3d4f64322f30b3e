/// External player driver.
///
/// Architecture:
///
/// ```text
///   ExternalPlayer::play()
///         │
///         ├── control_writer  ← receives control bytes via mpsc → child stdin
///         └── OutputHandle    → pipe channel → status producer (events.rs)
/// ```
///
/// One child process per `play()`.  `close()` sends the quit byte, drops the
/// stdin side, signals the status producer to stop reading and hands the
/// child to a reaper task.
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use tuner_proto::config::PlayerConfig;
use tuner_proto::station::is_playlist_locator;

// ── control bytes ─────────────────────────────────────────────────────────────

pub const CTRL_QUIT: u8 = b'q';
pub const CTRL_MUTE: u8 = b'm';
pub const CTRL_PAUSE: u8 = b'p';
pub const CTRL_VOLUME_UP: u8 = b'*';
pub const CTRL_VOLUME_DOWN: u8 = b'/';

/// How long a closed player gets to exit on its own before it is killed.
const QUIT_GRACE: Duration = Duration::from_secs(2);

#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    #[error("failed to start {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },
    #[error("player {0} pipe unavailable")]
    Pipe(&'static str),
}

/// Capability set of a playback backend.
pub trait Player {
    /// Start streaming `locator`.  No-op when already playing.
    fn play(&mut self, locator: &str) -> Result<(), PlayerError>;
    fn mute(&mut self);
    fn pause(&mut self);
    fn inc_volume(&mut self);
    fn dec_volume(&mut self);
    /// Stop the current stream.  No-op when not playing.
    fn close(&mut self);
    /// Replace the current stream with `locator`.
    fn switch_to(&mut self, locator: &str) -> Result<(), PlayerError> {
        self.close();
        self.play(locator)
    }
    /// Locator of the running stream, `None` when idle.
    fn active_locator(&self) -> Option<&str>;
    /// Resolve once every closed session's process has exited.
    async fn wait_closed(&mut self);

    fn is_playing(&self) -> bool {
        self.active_locator().is_some()
    }
}

/// Why a session was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Stopped,
    /// Another station takes over right after.
    Switched,
}

/// A freshly opened player output stream, passed to the status producer.
///
/// `closed` resolves when the owning session is closed, so the reader stops
/// even if the child keeps its stdout open for a while.
pub struct OutputHandle {
    pub reader: Box<dyn AsyncRead + Send + Unpin>,
    pub closed: oneshot::Receiver<CloseReason>,
}

struct Session {
    locator: String,
    child: Child,
    control_tx: mpsc::UnboundedSender<u8>,
    closed_tx: oneshot::Sender<CloseReason>,
}

/// Drives one external player binary (mplayer by default) over its stdio.
pub struct ExternalPlayer {
    binary: PathBuf,
    config: PlayerConfig,
    pipe_tx: mpsc::UnboundedSender<OutputHandle>,
    session: Option<Session>,
    /// Reapers of closed sessions that may still be running.
    reapers: Vec<JoinHandle<()>>,
}

impl ExternalPlayer {
    pub fn new(
        binary: PathBuf,
        config: PlayerConfig,
        pipe_tx: mpsc::UnboundedSender<OutputHandle>,
    ) -> Self {
        Self {
            binary,
            config,
            pipe_tx,
            session: None,
            reapers: Vec::new(),
        }
    }

    /// Fire the session's close signal, tell the player to quit and hand it
    /// to a reaper.  The signal goes out before `q`, so the status reader
    /// learns the reason before the player's output can hit EOF.
    fn retire(&mut self, session: Session, reason: CloseReason) {
        info!("player: closing {}", session.locator);
        let Session {
            child,
            control_tx,
            closed_tx,
            ..
        } = session;
        let _ = closed_tx.send(reason);
        let _ = control_tx.send(CTRL_QUIT);
        // Dropping the sender lets the writer drain `q` and then close stdin.
        drop(control_tx);
        self.reapers.retain(|reaper| !reaper.is_finished());
        self.reapers.push(tokio::spawn(reap(child)));
    }

    fn send_control(&self, byte: u8) {
        if let Some(session) = &self.session {
            // The child may have exited on its own; the byte is advisory.
            if session.control_tx.send(byte).is_err() {
                debug!("player: control byte {:?} dropped", byte as char);
            }
        }
    }
}

/// Arguments for one invocation: configured args, the playlist flag for
/// `.m3u`/`.pls` locators, then the locator itself.
pub fn player_args(config: &PlayerConfig, locator: &str) -> Vec<String> {
    let mut args = config.args.clone();
    if is_playlist_locator(locator) && !config.playlist_flag.is_empty() {
        args.push(config.playlist_flag.clone());
    }
    args.push(locator.to_string());
    args
}

impl Player for ExternalPlayer {
    fn play(&mut self, locator: &str) -> Result<(), PlayerError> {
        if self.session.is_some() {
            return Ok(());
        }

        let args = player_args(&self.config, locator);
        info!("player: spawning {} {:?}", self.binary.display(), args);
        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| PlayerError::Spawn {
                binary: self.binary.display().to_string(),
                source,
            })?;
        debug!("player: spawned pid {:?}", child.id());

        let stdin = child.stdin.take().ok_or(PlayerError::Pipe("stdin"))?;
        let stdout = child.stdout.take().ok_or(PlayerError::Pipe("stdout"))?;

        let (control_tx, control_rx) = mpsc::unbounded_channel();
        tokio::spawn(control_writer(stdin, control_rx));

        let (closed_tx, closed_rx) = oneshot::channel();
        let handle = OutputHandle {
            reader: Box::new(stdout),
            closed: closed_rx,
        };
        if self.pipe_tx.send(handle).is_err() {
            warn!("player: status reader gone, output will not be shown");
        }

        self.session = Some(Session {
            locator: locator.to_string(),
            child,
            control_tx,
            closed_tx,
        });
        Ok(())
    }

    fn mute(&mut self) {
        self.send_control(CTRL_MUTE);
    }

    fn pause(&mut self) {
        self.send_control(CTRL_PAUSE);
    }

    fn inc_volume(&mut self) {
        self.send_control(CTRL_VOLUME_UP);
    }

    fn dec_volume(&mut self) {
        self.send_control(CTRL_VOLUME_DOWN);
    }

    fn close(&mut self) {
        if let Some(session) = self.session.take() {
            self.retire(session, CloseReason::Stopped);
        }
    }

    fn switch_to(&mut self, locator: &str) -> Result<(), PlayerError> {
        if let Some(session) = self.session.take() {
            self.retire(session, CloseReason::Switched);
        }
        self.play(locator)
    }

    fn active_locator(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.locator.as_str())
    }

    async fn wait_closed(&mut self) {
        for reaper in self.reapers.drain(..) {
            if let Err(e) = reaper.await {
                warn!("player: reaper failed: {}", e);
            }
        }
    }
}

impl Drop for ExternalPlayer {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            let _ = session.control_tx.send(CTRL_QUIT);
            // kill_on_drop reclaims the child.
        }
    }
}

// ── writer task ───────────────────────────────────────────────────────────────

async fn control_writer(mut stdin: ChildStdin, mut rx: mpsc::UnboundedReceiver<u8>) {
    while let Some(byte) = rx.recv().await {
        if let Err(e) = stdin.write_all(&[byte]).await {
            debug!("player writer: write failed: {}", e);
            break;
        }
        if let Err(e) = stdin.flush().await {
            debug!("player writer: flush failed: {}", e);
            break;
        }
    }
}

// ── reaper ────────────────────────────────────────────────────────────────────

async fn reap(mut child: Child) {
    match tokio::time::timeout(QUIT_GRACE, child.wait()).await {
        Ok(Ok(status)) => debug!("player: exited with {}", status),
        Ok(Err(e)) => warn!("player: wait failed: {}", e),
        Err(_) => {
            warn!("player: still running after quit, killing");
            if let Err(e) = child.kill().await {
                warn!("player: kill failed: {}", e);
            }
        }
    }
}

// ── test double ───────────────────────────────────────────────────────────────

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        Play(String),
        Mute,
        Pause,
        IncVolume,
        DecVolume,
        Close,
        WaitClosed,
    }

    /// Records every call that reaches the backend instead of spawning
    /// anything.  No-op rules mirror `ExternalPlayer`, so a call that would
    /// not touch a real process is not recorded.
    #[derive(Clone, Default)]
    pub struct RecordingPlayer {
        pub calls: Arc<Mutex<Vec<Call>>>,
        playing: Option<String>,
        fail_next_play: bool,
    }

    impl RecordingPlayer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing() -> Self {
            Self {
                fail_next_play: true,
                ..Self::default()
            }
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl Player for RecordingPlayer {
        fn play(&mut self, locator: &str) -> Result<(), PlayerError> {
            if self.playing.is_some() {
                return Ok(());
            }
            if self.fail_next_play {
                self.fail_next_play = false;
                return Err(PlayerError::Spawn {
                    binary: "fake".to_string(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                });
            }
            self.record(Call::Play(locator.to_string()));
            self.playing = Some(locator.to_string());
            Ok(())
        }

        fn mute(&mut self) {
            if self.playing.is_some() {
                self.record(Call::Mute);
            }
        }

        fn pause(&mut self) {
            if self.playing.is_some() {
                self.record(Call::Pause);
            }
        }

        fn inc_volume(&mut self) {
            if self.playing.is_some() {
                self.record(Call::IncVolume);
            }
        }

        fn dec_volume(&mut self) {
            if self.playing.is_some() {
                self.record(Call::DecVolume);
            }
        }

        fn close(&mut self) {
            if self.playing.take().is_some() {
                self.record(Call::Close);
            }
        }

        fn active_locator(&self) -> Option<&str> {
            self.playing.as_deref()
        }

        async fn wait_closed(&mut self) {
            self.record(Call::WaitClosed);
        }
    }
}
