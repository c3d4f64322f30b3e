/// Dj — owner of the station selection and the single player.
///
/// Only the main loop calls into `Dj`, so there is no locking: the selection
/// and the player session change together inside one `&mut self` call.
/// Switching stations goes through `Player::switch_to`: close, then play,
/// with the old stream marked as switched rather than stopped.  Two
/// stations are never active at once.
use tracing::{debug, info};

use tuner_proto::catalog::StationCatalog;
use tuner_proto::station::Station;

use crate::player::{Player, PlayerError};

pub struct Dj<P: Player> {
    player: P,
    catalog: StationCatalog,
    /// Index of the playing station; `None` when nothing is selected.
    current_station: Option<usize>,
}

impl<P: Player> Dj<P> {
    pub fn new(player: P, catalog: StationCatalog) -> Self {
        Self {
            player,
            catalog,
            current_station: None,
        }
    }

    pub fn catalog(&self) -> &StationCatalog {
        &self.catalog
    }

    pub fn current_station(&self) -> Option<usize> {
        self.current_station
    }

    pub fn current(&self) -> Option<&Station> {
        self.current_station.and_then(|idx| self.catalog.get(idx))
    }

    #[cfg(test)]
    pub fn player(&self) -> &P {
        &self.player
    }

    /// Play station `idx`.  Out-of-range indices and the already-playing
    /// station are ignored.
    pub fn play(&mut self, idx: usize) -> Result<(), PlayerError> {
        if self.current_station == Some(idx) {
            return Ok(());
        }
        let Some(station) = self.catalog.get(idx) else {
            debug!("dj: station {} out of range", idx);
            return Ok(());
        };

        info!("dj: playing '{}'", station.name);
        if self.current_station.take().is_some() {
            self.player.switch_to(&station.url)?;
        } else {
            self.player.play(&station.url)?;
        }
        debug_assert_eq!(self.player.active_locator(), Some(station.url.as_str()));
        self.current_station = Some(idx);
        Ok(())
    }

    pub fn stop(&mut self) {
        if self.current_station.take().is_some() {
            info!("dj: stopping");
            self.player.close();
        }
    }

    /// Stop playback and wait until the player process has exited.
    pub async fn shutdown(&mut self) {
        self.stop();
        self.player.wait_closed().await;
    }

    pub fn mute(&mut self) {
        if self.current_station.is_some() {
            self.player.mute();
        }
    }

    pub fn pause(&mut self) {
        if self.current_station.is_some() {
            self.player.pause();
        }
    }

    pub fn turnup(&mut self) {
        if self.current_station.is_some() {
            self.player.inc_volume();
        }
    }

    pub fn turndown(&mut self) {
        if self.current_station.is_some() {
            self.player.dec_volume();
        }
    }
}
