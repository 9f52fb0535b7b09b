//! Platform-provided media resource
//!
//! Abstracts the audio element (browser `<audio>`, desktop decoder, ...) so the
//! engine can drive it without knowing the platform.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Identity of one attached resource
///
/// The engine hands a fresh token to every resource it opens. Resources tag
/// their notifications with it so that late notifications from a replaced
/// resource can be recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceToken(pub u64);

/// Notification emitted asynchronously by a media resource
#[derive(Debug, Clone, PartialEq)]
pub struct MediaEvent {
    /// Resource that emitted the notification
    pub token: ResourceToken,

    /// What happened
    pub kind: MediaEventKind,
}

/// Kinds of resource notifications
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEventKind {
    /// Periodic time update
    ///
    /// `duration` may be NaN or infinite until metadata has loaded.
    TimeUpdate {
        /// Playback position in seconds
        current_time: f64,
        /// Total duration in seconds
        duration: f64,
    },

    /// Playback reached the end of the resource
    Ended,

    /// Playback failed to start or stalled (unsupported source, network, ...)
    Failed {
        /// Platform error description
        message: String,
    },
}

impl MediaEvent {
    /// Time update notification
    pub fn time_update(token: ResourceToken, current_time: f64, duration: f64) -> Self {
        Self {
            token,
            kind: MediaEventKind::TimeUpdate {
                current_time,
                duration,
            },
        }
    }

    /// End-of-track notification
    pub fn ended(token: ResourceToken) -> Self {
        Self {
            token,
            kind: MediaEventKind::Ended,
        }
    }

    /// Failure notification
    pub fn failed(token: ResourceToken, message: impl Into<String>) -> Self {
        Self {
            token,
            kind: MediaEventKind::Failed {
                message: message.into(),
            },
        }
    }
}

/// One attached audio resource
///
/// `play` and `pause` only *request* the transition; completion or failure is
/// reported later through [`MediaEvent`]s.
pub trait MediaResource: Send {
    /// Request playback start
    fn play(&mut self);

    /// Request pause
    fn pause(&mut self);

    /// Reposition playback
    fn set_current_time(&mut self, seconds: f64);

    /// Apply volume (0.0 = silent, 1.0 = full volume)
    fn set_volume(&mut self, volume: f64);
}

/// Factory for media resources
pub trait MediaBackend: Send {
    /// Construct a resource for `url`
    ///
    /// The resource must tag every notification it emits with `token`.
    fn open(&mut self, url: &str, token: ResourceToken) -> Result<Box<dyn MediaResource>>;
}
