/// Player configuration
use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix (`TUNEBOX__PLAYBACK__INITIAL_VOLUME=0.5`)
const ENV_PREFIX: &str = "TUNEBOX";

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct PlayerConfig {
    #[serde(default)]
    pub playback: PlaybackSettings,

    #[serde(default)]
    pub favorites: FavoriteSettings,

    #[serde(default)]
    pub session: SessionSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlaybackSettings {
    /// Volume applied to the first resource (0.0-1.0)
    #[serde(default = "default_initial_volume")]
    pub initial_volume: f64,

    /// Start playing as soon as a track is selected
    #[serde(default)]
    pub autoplay_on_select: bool,

    /// Move to the next track when the current one ends
    #[serde(default)]
    pub auto_advance: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct FavoriteSettings {
    /// Re-query the store after a failed favorite/unfavorite
    #[serde(default)]
    pub reconcile_on_failure: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SessionSettings {
    /// Capacity of the command and media event channels
    #[serde(default = "default_command_buffer")]
    pub command_buffer: usize,
}

fn default_initial_volume() -> f64 {
    1.0
}

fn default_command_buffer() -> usize {
    64
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            initial_volume: default_initial_volume(),
            autoplay_on_select: false,
            auto_advance: false,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            command_buffer: default_command_buffer(),
        }
    }
}

impl PlayerConfig {
    /// Load configuration from an optional file and the environment
    ///
    /// Environment variables use the `TUNEBOX__` prefix and `__` between
    /// nested keys, e.g. `TUNEBOX__FAVORITES__RECONCILE_ON_FAILURE=true`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = ::config::Config::builder();

        if let Some(path) = path {
            settings = settings.add_source(::config::File::from(path));
        }

        settings = settings.add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let volume = self.playback.initial_volume;
        if !(0.0..=1.0).contains(&volume) {
            return Err(PlaybackError::Config(format!(
                "playback.initial_volume must be within 0.0..=1.0, got {volume}"
            )));
        }

        if self.session.command_buffer == 0 {
            return Err(PlaybackError::Config(
                "session.command_buffer must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
