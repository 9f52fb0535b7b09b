//! Error types for playback management

use thiserror::Error;
use tunebox_core::{CoreError, TrackId};

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Track is not part of the current filtered view
    #[error("Track not found in current view: {0}")]
    NotFound(TrackId),

    /// Media resource could not be created for a track
    #[error("Media error: {0}")]
    Media(String),

    /// Track store error
    #[error("Store error: {0}")]
    Store(#[from] CoreError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The player session has shut down
    #[error("Player session closed")]
    SessionClosed,
}

impl From<::config::ConfigError> for PlaybackError {
    fn from(err: ::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
