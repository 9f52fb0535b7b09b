//! Player view model - composes playlist, engine and favorites
//!
//! Single owner of every piece of player state. All transitions go through
//! this type, so invariants spanning components hold in one place:
//! - no selection ⇒ engine `Idle`, favorite `Unknown`
//! - every selection change reloads the engine and re-queries the favorite
//!
//! Remote favorite calls are not executed here: they are queued as
//! [`FavoriteRequest`]s for the host to run, and their replies come back
//! through [`PlayerViewModel::resolve_favorite`].

use crate::{
    config::PlayerConfig,
    engine::{MediaUpdate, PlaybackEngine},
    error::Result,
    events::PlayerEvent,
    favorites::{FavoriteReply, FavoriteRequest, FavoriteSync, RequestToken, Resolution},
    media::{MediaBackend, MediaEvent},
    playlist::{PlaylistController, SelectionUpdate},
    time::format_progress,
    types::{FavoriteStatus, PlaybackState},
    volume::VolumeLevel,
};
use serde::Serialize;
use tracing::{debug, info};
use tunebox_core::{Track, TrackId};

/// Render-ready player state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    /// Selected track
    pub track: Option<Track>,
    /// Engine state
    pub state: PlaybackState,
    /// Whether playback is running
    pub is_playing: bool,
    /// Position in seconds
    pub current_time: f64,
    /// Duration in seconds, `None` while unknown
    pub duration: Option<f64>,
    /// `m:ss / m:ss` label
    pub time_label: String,
    /// Volume level (0.0-1.0), independent of mute
    pub volume: f64,
    /// Whether audio is muted
    pub is_muted: bool,
    /// Speaker icon level
    pub volume_level: VolumeLevel,
    /// Favorite status of the selected track
    pub favorite: FavoriteStatus,
    /// Whether `next()` would select something
    pub can_go_next: bool,
    /// Whether `previous()` would select something
    pub can_go_previous: bool,
    /// Whether only favorites are listed
    pub favorites_only: bool,
    /// Whether the first store fetch has arrived
    pub library_loaded: bool,
}

/// Player view model
pub struct PlayerViewModel {
    config: PlayerConfig,
    playlist: PlaylistController,
    engine: PlaybackEngine,
    favorites: FavoriteSync,

    pending_requests: Vec<FavoriteRequest>,
    pending_events: Vec<PlayerEvent>,
}

impl PlayerViewModel {
    /// Create a player with an empty, not yet loaded library
    pub fn new(config: PlayerConfig, backend: Box<dyn MediaBackend>) -> Self {
        let engine = PlaybackEngine::new(backend, config.playback.initial_volume);
        let favorites = FavoriteSync::new(config.favorites.reconcile_on_failure);

        Self {
            config,
            playlist: PlaylistController::new(),
            engine,
            favorites,
            pending_requests: Vec::new(),
            pending_events: Vec::new(),
        }
    }

    // ===== Library =====

    /// Replace the track list with a fresh store fetch
    pub fn set_tracks(&mut self, tracks: Vec<Track>) {
        let update = self.playlist.set_tracks(tracks);
        self.record(PlayerEvent::LibraryChanged {
            length: self.playlist.len(),
        });
        self.apply_selection_update(update);
    }

    /// Enable or disable the favorites-only filter
    pub fn set_filter(&mut self, favorites_only: bool) {
        if self.playlist.favorites_only() == favorites_only {
            return;
        }
        let update = self.playlist.set_filter(favorites_only);
        self.record(PlayerEvent::FilterChanged { favorites_only });
        self.apply_selection_update(update);
    }

    /// Flip the favorites-only filter
    pub fn toggle_filter(&mut self) {
        self.set_filter(!self.playlist.favorites_only());
    }

    fn apply_selection_update(&mut self, update: SelectionUpdate) {
        if let SelectionUpdate::Cleared(previous_track_id) = update {
            info!(track_id = %previous_track_id, "Selection cleared; stopping playback");
            self.engine.unload();
            let request = self.favorites.track_changed(None);
            self.queue_request(request);
            self.record(PlayerEvent::SelectionCleared { previous_track_id });
        }
    }

    // ===== Navigation =====

    /// Select a track of the current filtered view
    pub fn select(&mut self, id: &TrackId) -> Result<()> {
        let previous = self.playlist.selected_id().cloned();
        let track = self.playlist.select(id)?;
        self.on_track_selected(track, previous);
        Ok(())
    }

    /// Advance with wraparound; no-op on an empty view
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) {
        let previous = self.playlist.selected_id().cloned();
        if let Some(track) = self.playlist.next() {
            self.on_track_selected(track, previous);
        }
    }

    /// Go back with wraparound; no-op on an empty view
    pub fn previous(&mut self) {
        let previous = self.playlist.selected_id().cloned();
        if let Some(track) = self.playlist.previous() {
            self.on_track_selected(track, previous);
        }
    }

    fn on_track_selected(&mut self, track: Track, previous_track_id: Option<TrackId>) {
        debug!(track_id = %track.id, title = %track.title, "Track selected");

        let loaded = self.engine.load(&track.audio_url).is_ok();
        if loaded && self.config.playback.autoplay_on_select {
            self.engine.play();
        }

        let request = self.favorites.track_changed(Some(&track.id));
        self.queue_request(request);
        self.record(PlayerEvent::TrackChanged {
            track_id: track.id,
            previous_track_id,
        });
    }

    // ===== Transport =====

    /// Start or resume playback
    pub fn play(&mut self) {
        self.engine.play();
        self.collect_events();
    }

    /// Pause playback
    pub fn pause(&mut self) {
        self.engine.pause();
        self.collect_events();
    }

    /// Toggle play/pause
    pub fn toggle_play(&mut self) {
        self.engine.toggle();
        self.collect_events();
    }

    /// Seek to `seconds`; invalid targets are ignored
    pub fn seek(&mut self, seconds: f64) {
        self.engine.seek(seconds);
        self.collect_events();
    }

    /// Set volume, clamped to `[0, 1]`
    pub fn set_volume(&mut self, level: f64) {
        self.engine.set_volume(level);
        self.collect_events();
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.engine.toggle_mute();
        self.collect_events();
    }

    /// Apply a notification from the media resource
    pub fn handle_media_event(&mut self, event: MediaEvent) {
        match self.engine.handle_media_event(event) {
            MediaUpdate::Ended => {
                if let Some(track_id) = self.playlist.selected_id().cloned() {
                    self.record(PlayerEvent::TrackFinished { track_id });
                }
                if self.config.playback.auto_advance && !self.playlist.is_empty() {
                    self.next();
                    self.engine.play();
                }
            }
            MediaUpdate::Ignored | MediaUpdate::Progress | MediaUpdate::Failed => {}
        }
        self.collect_events();
    }

    // ===== Favorites =====

    /// Flip the selected track's favorite flag optimistically
    pub fn toggle_favorite(&mut self) {
        let request = self.favorites.toggle();
        self.queue_request(request);
        self.collect_events();
    }

    /// Apply a store reply to a previously queued request
    pub fn resolve_favorite(&mut self, token: RequestToken, reply: FavoriteReply) -> Resolution {
        let resolution = self.favorites.resolve(token, reply);
        match &resolution {
            Resolution::MutationFailed { error, retry } => {
                self.record(PlayerEvent::Error {
                    message: format!("Failed to update favorite: {error}"),
                });
                self.queue_request(retry.clone());
            }
            Resolution::QueryFailed(error) => {
                self.record(PlayerEvent::Error {
                    message: format!("Failed to load favorite: {error}"),
                });
            }
            Resolution::Stale
            | Resolution::Applied(_)
            | Resolution::Superseded
            | Resolution::Confirmed => {}
        }
        self.collect_events();
        resolution
    }

    fn queue_request(&mut self, request: Option<FavoriteRequest>) {
        if let Some(request) = request {
            self.pending_requests.push(request);
        }
    }

    /// Take favorite requests the host must execute
    pub fn take_requests(&mut self) -> Vec<FavoriteRequest> {
        std::mem::take(&mut self.pending_requests)
    }

    // ===== Observation =====

    /// Take all queued events, in the order they happened
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        self.collect_events();
        std::mem::take(&mut self.pending_events)
    }

    /// Queue an event after everything the components emitted so far
    fn record(&mut self, event: PlayerEvent) {
        self.collect_events();
        self.pending_events.push(event);
    }

    // Selection touches the engine before favorites, so that order holds here
    fn collect_events(&mut self) {
        self.pending_events.extend(self.engine.drain_events());
        self.pending_events.extend(self.favorites.drain_events());
    }

    /// Current render-ready state
    pub fn snapshot(&self) -> PlayerSnapshot {
        let track = self.playlist.selected().cloned();
        let has_tracks = !self.playlist.is_empty();
        let current_time = self.engine.current_time();
        let duration = self.engine.duration();

        PlayerSnapshot {
            state: self.engine.state(),
            is_playing: track.is_some() && self.engine.is_playing(),
            current_time,
            duration,
            time_label: format_progress(current_time, duration),
            volume: self.engine.volume(),
            is_muted: self.engine.is_muted(),
            volume_level: self.engine.volume_level(),
            favorite: if track.is_some() {
                self.favorites.status()
            } else {
                FavoriteStatus::Unknown
            },
            can_go_next: has_tracks,
            can_go_previous: has_tracks,
            favorites_only: self.playlist.favorites_only(),
            library_loaded: self.playlist.is_loaded(),
            track,
        }
    }

    /// Playlist, read-only
    pub fn playlist(&self) -> &PlaylistController {
        &self.playlist
    }

    /// Engine, read-only
    pub fn engine(&self) -> &PlaybackEngine {
        &self.engine
    }
}
