mod action;
mod app;
mod core;
mod events;
mod player;
mod terminal;
mod theme;
mod ui;

use std::io;

use anyhow::Context;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use tuner_proto::catalog::load_catalog;
use tuner_proto::config::Config;
use tuner_proto::platform;

use crate::app::App;
use crate::core::Dj;
use crate::events::AppMessage;
use crate::player::ExternalPlayer;
use crate::terminal::TerminalGuard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("tuner.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // RUST_LOG overrides; the terminal belongs to the UI, so logs go to a file.
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    eprintln!("tuner log: {}", log_path.display());
    tracing::info!("tuner starting…");

    // ── Load config + stations ───────────────────────────────────────────────
    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("config: {} unreadable ({}), using defaults", Config::config_path().display(), e);
        Config::default()
    });

    let catalog = load_catalog(&config.stations.file)?;
    if catalog.is_empty() {
        anyhow::bail!("no stations in {}", config.stations.file.display());
    }

    let binary = platform::find_player_binary(&config.player.binary)
        .with_context(|| format!("player binary '{}' not found", config.player.binary))?;
    tracing::info!("using player {}", binary.display());

    // ── Pipeline channels ────────────────────────────────────────────────────
    let (tx, rx) = mpsc::channel::<AppMessage>(1024);
    let (pipe_tx, pipe_rx) = mpsc::unbounded_channel();
    tokio::spawn(events::status_producer(pipe_rx, tx.clone()));

    let player = ExternalPlayer::new(binary, config.player.clone(), pipe_tx);
    let app = App::new(Dj::new(player, catalog));

    // ── Terminal ─────────────────────────────────────────────────────────────
    let guard = TerminalGuard::enter(io::stdout()).context("failed to set up terminal")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    events::spawn_input_producer(tx).context("failed to start input thread")?;

    let result = app
        .run(rx, |view| {
            terminal.draw(|f| ui::render(f.area(), f.buffer_mut(), view))?;
            Ok(())
        })
        .await;

    // ── Teardown ─────────────────────────────────────────────────────────────
    drop(terminal);
    drop(guard);

    tracing::info!("tuner exiting");
    result
}
