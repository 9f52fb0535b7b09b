//! Player Events
//!
//! Event-based communication for UI synchronization.
//! Events are queued at every transition and drained by the host:
//! - Selection changes (track changed / cleared)
//! - Engine state changes (loaded/playing/paused/idle)
//! - Position updates (forwarded resource progress)
//! - Favorite status changes of the selected track

use crate::types::{FavoriteStatus, PlaybackState};
use serde::{Deserialize, Serialize};
use tunebox_core::TrackId;

/// Events emitted by the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// A track became the current selection
    TrackChanged {
        /// ID of the new (current) track
        track_id: TrackId,
        /// ID of the previous track (if any)
        previous_track_id: Option<TrackId>,
    },

    /// Selection was cleared (track removed from the view, or filtered out)
    SelectionCleared {
        /// ID of the track that was selected
        previous_track_id: TrackId,
    },

    /// Engine state changed
    StateChanged {
        /// The new playback state
        state: PlaybackState,
    },

    /// Position update from the media resource
    PositionUpdate {
        /// Current playback position in seconds
        current_time: f64,
        /// Track duration in seconds, `None` while unknown
        duration: Option<f64>,
    },

    /// Volume changed
    VolumeChanged {
        /// New volume level (0.0-1.0)
        volume: f64,
        /// Whether audio is muted
        is_muted: bool,
    },

    /// Favorite status of the selected track changed
    FavoriteChanged {
        /// Selected track
        track_id: TrackId,
        /// New status
        status: FavoriteStatus,
    },

    /// Favorites-only filter toggled
    FilterChanged {
        /// Whether only favorites are shown
        favorites_only: bool,
    },

    /// Track list replaced by a store fetch
    LibraryChanged {
        /// Number of tracks in the filtered view
        length: usize,
    },

    /// Track reached its end
    TrackFinished {
        /// ID of the finished track
        track_id: TrackId,
    },

    /// Error reported by the resource or the store
    Error {
        /// Error message
        message: String,
    },
}
