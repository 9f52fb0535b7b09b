//! Playback engine - owns the single media resource
//!
//! Drives one [`MediaResource`] through load/play/pause/seek/volume and keeps
//! the displayed position in sync with the resource's progress notifications.
//!
//! ```text
//! Idle ──load──▶ Loaded ──play──▶ Playing ◀──▶ Paused
//!                  ▲                              │
//!                  └──────────── load ────────────┘
//! ```

use crate::{
    error::Result,
    events::PlayerEvent,
    media::{MediaBackend, MediaEvent, MediaEventKind, MediaResource, ResourceToken},
    types::PlaybackState,
    volume::{Volume, VolumeLevel},
};
use tracing::{debug, warn};

/// Effect of a media notification on the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaUpdate {
    /// Notification came from a replaced resource (or none is attached)
    Ignored,

    /// Position/duration updated
    Progress,

    /// Resource reached its end; playback stopped
    Ended,

    /// Resource failed; playback stopped
    Failed,
}

/// Playback engine
///
/// At most one resource is attached at a time. Attaching a new one
/// invalidates every notification still in flight from the previous one.
pub struct PlaybackEngine {
    backend: Box<dyn MediaBackend>,
    resource: Option<Box<dyn MediaResource>>,
    token: Option<ResourceToken>,
    next_token: u64,

    state: PlaybackState,
    current_time: f64,
    // NaN while unknown
    duration: f64,
    volume: Volume,

    pending_events: Vec<PlayerEvent>,
}

impl PlaybackEngine {
    /// Create an idle engine
    pub fn new(backend: Box<dyn MediaBackend>, initial_volume: f64) -> Self {
        Self {
            backend,
            resource: None,
            token: None,
            next_token: 0,
            state: PlaybackState::Idle,
            current_time: 0.0,
            duration: f64::NAN,
            volume: Volume::new(initial_volume),
            pending_events: Vec::new(),
        }
    }

    // ===== Resource =====

    /// Attach a new resource for `audio_url`
    ///
    /// Replaces any attached resource, resets position to 0 and leaves the
    /// engine `Loaded` (not playing). On failure the engine is left `Idle` and
    /// an error event is queued.
    pub fn load(&mut self, audio_url: &str) -> Result<ResourceToken> {
        self.detach();

        self.next_token += 1;
        let token = ResourceToken(self.next_token);

        match self.backend.open(audio_url, token) {
            Ok(mut resource) => {
                debug!(url = audio_url, token = token.0, "Attached media resource");
                resource.set_volume(self.volume.effective());
                self.resource = Some(resource);
                self.token = Some(token);
                self.set_state(PlaybackState::Loaded);
                self.emit_position();
                Ok(token)
            }
            Err(e) => {
                warn!(url = audio_url, error = %e, "Failed to open media resource");
                self.set_state(PlaybackState::Idle);
                self.pending_events.push(PlayerEvent::Error {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Detach the resource and return to `Idle`
    pub fn unload(&mut self) {
        self.detach();
        self.set_state(PlaybackState::Idle);
        self.emit_position();
    }

    fn detach(&mut self) {
        if let Some(mut old) = self.resource.take() {
            if self.state == PlaybackState::Playing {
                old.pause();
            }
        }
        self.token = None;
        self.current_time = 0.0;
        self.duration = f64::NAN;
    }

    // ===== Transport =====

    /// Request playback start (valid from `Loaded` or `Paused`)
    ///
    /// Start failures arrive later as a `Failed` media notification.
    pub fn play(&mut self) {
        match self.state {
            PlaybackState::Loaded | PlaybackState::Paused => {
                if let Some(resource) = self.resource.as_mut() {
                    resource.play();
                    self.set_state(PlaybackState::Playing);
                }
            }
            PlaybackState::Playing => {}
            PlaybackState::Idle => debug!("play() ignored: no resource attached"),
        }
    }

    /// Pause playback (valid from `Playing`)
    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        if let Some(resource) = self.resource.as_mut() {
            resource.pause();
        }
        self.set_state(PlaybackState::Paused);
    }

    /// Pause if playing, else play
    pub fn toggle(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Reposition playback
    ///
    /// Ignored when `seconds` is non-finite, outside `[0, duration]`, while the
    /// duration is unknown, or with no resource attached. Returns whether the
    /// seek was applied. The new position is reported immediately, without
    /// waiting for the resource to confirm.
    pub fn seek(&mut self, seconds: f64) -> bool {
        let Some(duration) = self.duration() else {
            debug!(target_secs = seconds, "Seek ignored: duration unknown");
            return false;
        };
        if !seconds.is_finite() || !(0.0..=duration).contains(&seconds) {
            debug!(target_secs = seconds, duration, "Seek ignored: invalid target");
            return false;
        }
        let Some(resource) = self.resource.as_mut() else {
            return false;
        };

        resource.set_current_time(seconds);
        self.current_time = seconds;
        self.emit_position();
        true
    }

    // ===== Volume =====

    /// Set volume, clamped to `[0, 1]`
    pub fn set_volume(&mut self, level: f64) {
        if self.volume.set_level(level) {
            self.apply_volume();
        }
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.apply_volume();
    }

    fn apply_volume(&mut self) {
        let effective = self.volume.effective();
        if let Some(resource) = self.resource.as_mut() {
            resource.set_volume(effective);
        }
        self.pending_events.push(PlayerEvent::VolumeChanged {
            volume: self.volume.level(),
            is_muted: self.volume.is_muted(),
        });
    }

    // ===== Resource notifications =====

    /// Apply a notification from the media resource
    pub fn handle_media_event(&mut self, event: MediaEvent) -> MediaUpdate {
        if self.token != Some(event.token) {
            debug!(
                token = event.token.0,
                "Dropping notification from detached resource"
            );
            return MediaUpdate::Ignored;
        }

        match event.kind {
            MediaEventKind::TimeUpdate {
                current_time,
                duration,
            } => {
                if current_time.is_finite() && current_time >= 0.0 {
                    self.current_time = current_time;
                }
                self.duration = if duration.is_finite() && duration >= 0.0 {
                    duration
                } else {
                    f64::NAN
                };
                self.emit_position();
                MediaUpdate::Progress
            }
            MediaEventKind::Ended => {
                self.set_state(PlaybackState::Paused);
                MediaUpdate::Ended
            }
            MediaEventKind::Failed { message } => {
                warn!(error = %message, "Media resource failed");
                let state = if self.current_time > 0.0 {
                    PlaybackState::Paused
                } else {
                    PlaybackState::Loaded
                };
                self.set_state(state);
                self.pending_events.push(PlayerEvent::Error { message });
                MediaUpdate::Failed
            }
        }
    }

    // ===== State Queries =====

    /// Current engine state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Whether playback has been requested and not stopped
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Playback position in seconds (always finite, ≥ 0)
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Duration in seconds, `None` while unknown
    pub fn duration(&self) -> Option<f64> {
        self.duration.is_finite().then_some(self.duration)
    }

    /// Volume level (0.0-1.0), independent of mute
    pub fn volume(&self) -> f64 {
        self.volume.level()
    }

    /// Volume currently applied to the resource
    pub fn effective_volume(&self) -> f64 {
        self.volume.effective()
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    /// Display level of the applied volume
    pub fn volume_level(&self) -> VolumeLevel {
        self.volume.display_level()
    }

    /// Token of the attached resource
    pub fn resource_token(&self) -> Option<ResourceToken> {
        self.token
    }

    // ===== Events =====

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            self.state = state;
            self.pending_events.push(PlayerEvent::StateChanged { state });
        }
    }

    fn emit_position(&mut self) {
        self.pending_events.push(PlayerEvent::PositionUpdate {
            current_time: self.current_time,
            duration: self.duration(),
        });
    }
}
