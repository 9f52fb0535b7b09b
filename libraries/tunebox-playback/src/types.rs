//! Core types for playback management

use serde::{Deserialize, Serialize};

/// Playback engine state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No resource attached
    Idle,

    /// Resource attached, paused at the start
    Loaded,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,
}

/// Favorite flag of the selected track as known locally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FavoriteStatus {
    /// Query pending (or no track selected); must not be shown as "not favorited"
    Unknown,

    /// Track is a favorite
    Favorite,

    /// Track is not a favorite
    NotFavorite,
}

impl From<bool> for FavoriteStatus {
    fn from(is_favorite: bool) -> Self {
        if is_favorite {
            Self::Favorite
        } else {
            Self::NotFavorite
        }
    }
}
