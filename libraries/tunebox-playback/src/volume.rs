//! Volume control
//!
//! Linear volume in `[0, 1]`, applied as-is to the media resource.

use serde::{Deserialize, Serialize};

/// Threshold between the `Low` and `High` volume presentation
const LOW_VOLUME_CEILING: f64 = 0.7;

/// Coarse volume level for display (speaker icon)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeLevel {
    /// Nothing audible (level 0 or muted)
    Muted,

    /// Level in (0, 0.7]
    Low,

    /// Level above 0.7
    High,
}

/// Volume controller with mute
#[derive(Debug, Clone)]
pub struct Volume {
    /// Volume level (0.0-1.0)
    level: f64,

    /// Mute state (preserves volume level)
    muted: bool,
}

impl Volume {
    /// Create new volume controller, clamping `level` to `[0, 1]`
    pub fn new(level: f64) -> Self {
        Self {
            level: Self::sanitize(level).unwrap_or(1.0),
            muted: false,
        }
    }

    /// Set volume level, clamped to `[0, 1]`
    ///
    /// NaN is ignored. Returns whether the level changed.
    pub fn set_level(&mut self, level: f64) -> bool {
        match Self::sanitize(level) {
            Some(level) if level != self.level => {
                self.level = level;
                true
            }
            _ => false,
        }
    }

    /// Get current volume level (0.0-1.0)
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Toggle mute state (preserves volume level)
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Volume to apply to the resource
    ///
    /// Returns 0.0 if muted, otherwise the level
    pub fn effective(&self) -> f64 {
        if self.muted {
            0.0
        } else {
            self.level
        }
    }

    /// Display level of the effective volume
    pub fn display_level(&self) -> VolumeLevel {
        let effective = self.effective();
        if effective <= 0.0 {
            VolumeLevel::Muted
        } else if effective <= LOW_VOLUME_CEILING {
            VolumeLevel::Low
        } else {
            VolumeLevel::High
        }
    }

    fn sanitize(level: f64) -> Option<f64> {
        if level.is_nan() {
            None
        } else {
            Some(level.clamp(0.0, 1.0))
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(1.0)
    }
}
