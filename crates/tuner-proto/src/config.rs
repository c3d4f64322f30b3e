use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::platform;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub stations: StationsConfig,
}

/// How the external player is invoked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Binary name (looked up on PATH) or path.
    #[serde(default = "default_binary")]
    pub binary: String,
    /// Arguments placed before the stream locator.
    #[serde(default = "default_args")]
    pub args: Vec<String>,
    /// Flag inserted before `.m3u` / `.pls` locators.
    #[serde(default = "default_playlist_flag")]
    pub playlist_flag: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationsConfig {
    /// Plain-text `name,url` station list.
    /// Defaults to `~/.config/tuner/stations`.
    #[serde(default = "default_stations_file")]
    pub file: PathBuf,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            args: default_args(),
            playlist_flag: default_playlist_flag(),
        }
    }
}

impl Default for StationsConfig {
    fn default() -> Self {
        Self {
            file: default_stations_file(),
        }
    }
}

fn default_binary() -> String {
    "mplayer".to_string()
}

fn default_args() -> Vec<String> {
    vec!["-quiet".to_string()]
}

fn default_playlist_flag() -> String {
    "-playlist".to_string()
}

fn default_stations_file() -> PathBuf {
    platform::config_dir().join("stations")
}

impl Config {
    /// Read the config file if present.  Nothing is written back.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.stations.file = platform::expand_home(&config.stations.file);
        Ok(config)
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}
