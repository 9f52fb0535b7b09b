/// Track domain type
use crate::types::TrackId;
use serde::{Deserialize, Serialize};

/// Playable track as delivered by the track store
///
/// Immutable snapshot: `is_favorite` reflects the store at list-fetch time and
/// is only refreshed by the next fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Display name of the uploading artist
    pub artist_name: String,

    /// URL of the audio resource
    pub audio_url: String,

    /// URL of the cover art, if one was attached after upload
    pub cover_image_url: Option<String>,

    /// Favorite flag at fetch time
    pub is_favorite: bool,
}

impl Track {
    /// Create a track with no artist, cover art or favorite flag
    pub fn new(id: TrackId, title: impl Into<String>, audio_url: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            artist_name: String::new(),
            audio_url: audio_url.into(),
            cover_image_url: None,
            is_favorite: false,
        }
    }

    /// Set the artist name
    #[must_use]
    pub fn with_artist(mut self, artist_name: impl Into<String>) -> Self {
        self.artist_name = artist_name.into();
        self
    }

    /// Set the cover art URL
    #[must_use]
    pub fn with_cover(mut self, cover_image_url: impl Into<String>) -> Self {
        self.cover_image_url = Some(cover_image_url.into());
        self
    }

    /// Set the favorite flag
    #[must_use]
    pub fn with_favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = is_favorite;
        self
    }
}
