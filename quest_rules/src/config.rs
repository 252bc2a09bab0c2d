//! Game configuration, read from an optional TOML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::entities::{MapPointId, DEFAULT_PLAYER_HEALTH};

/// Item that unlocks the first option of three-option events.
pub const DEFAULT_FLAG_ITEM: &str = "Flashlight";

pub const DEFAULT_DEATH_MESSAGE: &str = "You have died. Parcel B will never be delivered.";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Pixel dimensions used to frame the map view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Visible window, width and height.
    pub viewport: (i32, i32),
    /// Full background map, width and height.
    pub background: (i32, i32),
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            viewport: (800, 500),
            background: (2800, 1800),
        }
    }
}

/// Everything the game needs to start a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub default_health: i32,
    pub start_point: MapPointId,
    pub flag_item: String,
    /// Shown on death when the fatal option has no message of its own.
    pub default_death_message: String,
    /// How long the death scene stays up before the game exits.
    pub death_dwell_ms: u64,
    /// How long the win scene stays up before the game exits.
    pub win_dwell_ms: u64,
    pub map_points_path: PathBuf,
    pub events_path: PathBuf,
    pub log_path: PathBuf,
    pub view: ViewConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            default_health: DEFAULT_PLAYER_HEALTH,
            start_point: MapPointId(0),
            flag_item: DEFAULT_FLAG_ITEM.to_string(),
            default_death_message: DEFAULT_DEATH_MESSAGE.to_string(),
            death_dwell_ms: 10_000,
            win_dwell_ms: 6_000,
            map_points_path: PathBuf::from("data/map_points.json"),
            events_path: PathBuf::from("data/events.json"),
            log_path: PathBuf::from("beetle_quest.log"),
            view: ViewConfig::default(),
        }
    }
}

impl GameConfig {
    /// Parse a config from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Load a config file. Relative paths inside it are resolved against the
    /// file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(base) = path.parent() {
            config.rebase_paths(base);
        }
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) if path.exists() => Self::load(path),
            Some(path) => {
                info!(path = %path.display(), "config file not found, using defaults");
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_health <= 0 {
            return Err(ConfigError::Invalid(format!(
                "default_health must be positive, got {}",
                self.default_health
            )));
        }
        let (width, height) = self.view.viewport;
        if width <= 0 || height <= 0 {
            return Err(ConfigError::Invalid(format!(
                "view.viewport must be positive, got {width}x{height}"
            )));
        }
        Ok(())
    }

    pub fn death_dwell(&self) -> Duration {
        Duration::from_millis(self.death_dwell_ms)
    }

    pub fn win_dwell(&self) -> Duration {
        Duration::from_millis(self.win_dwell_ms)
    }

    fn rebase_paths(&mut self, base: &Path) {
        for path in [
            &mut self.map_points_path,
            &mut self.events_path,
            &mut self.log_path,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}
