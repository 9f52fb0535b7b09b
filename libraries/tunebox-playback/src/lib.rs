//! Tunebox - Playback and Playlist Navigation
//!
//! Platform-agnostic player core for the Tunebox music library.
//!
//! This crate provides:
//! - Playback engine driving a single media resource (load, play, pause, seek)
//! - Volume control (clamped 0.0-1.0, mute toggle)
//! - Playlist navigation with wraparound and a favorites-only filter
//! - Favorite synchronisation with stale-reply protection
//! - `m:ss` time formatting
//! - An async session wiring everything to a [`TrackStore`](tunebox_core::TrackStore)
//!
//! # Architecture
//!
//! The state machines are sans-IO: they never await and never touch the
//! platform directly.
//! - Audio playback is provided through [`MediaBackend`] / [`MediaResource`]
//! - Remote favorite calls are returned as [`FavoriteRequest`]s to execute
//! - Every transition is queued as a [`PlayerEvent`]
//!
//! [`spawn_session`] runs the view model in a tokio task for hosts that want
//! the calls executed for them.
//!
//! # Example: Navigation
//!
//! ```rust
//! use tunebox_core::{Track, TrackId};
//! use tunebox_playback::PlaylistController;
//!
//! let mut playlist = PlaylistController::new();
//! playlist.set_tracks(vec![
//!     Track::new(TrackId::new("a"), "Intro", "https://cdn/a.mp3"),
//!     Track::new(TrackId::new("b"), "Outro", "https://cdn/b.mp3").with_favorite(true),
//! ]);
//!
//! assert_eq!(playlist.next().unwrap().title, "Intro");
//! assert_eq!(playlist.next().unwrap().title, "Outro");
//! assert_eq!(playlist.next().unwrap().title, "Intro"); // wraps around
//!
//! // Only "b" is a favorite
//! playlist.set_filter(true);
//! assert_eq!(playlist.len(), 1);
//! ```
//!
//! # Example: Time labels
//!
//! ```rust
//! use tunebox_playback::{format_progress, format_time};
//!
//! assert_eq!(format_time(65.0), "1:05");
//! assert_eq!(format_progress(65.0, Some(3599.0)), "1:05 / 59:59");
//! assert_eq!(format_progress(65.0, None), "1:05");
//! ```

pub mod config;
mod engine;
mod error;
pub mod events;
mod favorites;
pub mod media;
mod player;
mod playlist;
mod session;
mod time;
pub mod types;
mod volume;

// Public exports
pub use config::PlayerConfig;
pub use engine::{MediaUpdate, PlaybackEngine};
pub use error::{PlaybackError, Result};
pub use events::PlayerEvent;
pub use favorites::{
    FavoriteAction, FavoriteReply, FavoriteRequest, FavoriteSync, RequestToken, Resolution,
};
pub use media::{MediaBackend, MediaEvent, MediaEventKind, MediaResource, ResourceToken};
pub use player::{PlayerSnapshot, PlayerViewModel};
pub use playlist::{PlaylistController, SelectionUpdate};
pub use session::{spawn_session, PlayerCommand, SessionHandle};
pub use time::{format_progress, format_time};
pub use types::{FavoriteStatus, PlaybackState};
pub use volume::{Volume, VolumeLevel};
