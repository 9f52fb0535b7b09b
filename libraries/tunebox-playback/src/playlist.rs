//! Playlist navigation
//!
//! Ordered track list with an optional favorites-only filter and wraparound
//! next/previous over the filtered view.
//!
//! Selection is stored as a track id, never as an index: the position is
//! resolved against the current filtered view whenever it is needed, so a
//! list refresh or filter change can't leave a dangling index behind.

use crate::error::{PlaybackError, Result};
use std::collections::HashMap;
use tracing::debug;
use tunebox_core::{Track, TrackId};

/// Effect of a list or filter change on the selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionUpdate {
    /// Selection (or absence of one) carried over
    Unchanged,

    /// The selected track left the filtered view; nothing is selected now
    Cleared(TrackId),
}

/// Playlist controller
#[derive(Debug, Clone, Default)]
pub struct PlaylistController {
    /// Backing list in store order
    tracks: Vec<Track>,

    /// Track id -> position in `tracks` (first occurrence)
    by_id: HashMap<TrackId, usize>,

    /// Positions in `tracks` that pass the filter, in order, one per id
    view: Vec<usize>,

    /// Whether only favorites are shown
    favorites_only: bool,

    /// Selected track; always a member of `view`
    selected: Option<TrackId>,

    /// Whether a store fetch has been applied yet
    loaded: bool,
}

impl PlaylistController {
    /// Create an empty, not yet loaded playlist
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the backing list
    ///
    /// If the selected track is not part of the new filtered view the
    /// selection is cleared; the caller must stop playback.
    pub fn set_tracks(&mut self, tracks: Vec<Track>) -> SelectionUpdate {
        let mut by_id = HashMap::with_capacity(tracks.len());
        for (i, track) in tracks.iter().enumerate() {
            by_id.entry(track.id.clone()).or_insert(i);
        }

        self.tracks = tracks;
        self.by_id = by_id;
        self.loaded = true;
        self.rebuild_view()
    }

    /// Enable or disable the favorites-only filter
    pub fn set_filter(&mut self, favorites_only: bool) -> SelectionUpdate {
        if self.favorites_only == favorites_only {
            return SelectionUpdate::Unchanged;
        }
        self.favorites_only = favorites_only;
        self.rebuild_view()
    }

    /// Flip the favorites-only filter
    pub fn toggle_filter(&mut self) -> SelectionUpdate {
        self.set_filter(!self.favorites_only)
    }

    fn rebuild_view(&mut self) -> SelectionUpdate {
        let favorites_only = self.favorites_only;
        let by_id = &self.by_id;
        // Later duplicates of an id are left out of the view
        self.view = self
            .tracks
            .iter()
            .enumerate()
            .filter(|(i, t)| by_id.get(&t.id) == Some(i))
            .filter(|(_, t)| !favorites_only || t.is_favorite)
            .map(|(i, _)| i)
            .collect();

        match self.selected.take() {
            Some(id) if self.view_position(&id).is_some() => {
                self.selected = Some(id);
                SelectionUpdate::Unchanged
            }
            Some(id) => {
                debug!(track_id = %id, "Selected track left the view");
                SelectionUpdate::Cleared(id)
            }
            None => SelectionUpdate::Unchanged,
        }
    }

    /// Select a track of the current filtered view
    pub fn select(&mut self, id: &TrackId) -> Result<Track> {
        let position = self
            .view_position(id)
            .ok_or_else(|| PlaybackError::NotFound(id.clone()))?;
        Ok(self.select_position(position))
    }

    /// Advance with wraparound
    ///
    /// Selects the first track when nothing is selected. No-op on an empty view.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<Track> {
        let len = self.view.len();
        if len == 0 {
            return None;
        }
        let position = match self.selected_index() {
            Some(i) => (i + 1) % len,
            None => 0,
        };
        Some(self.select_position(position))
    }

    /// Go back with wraparound
    ///
    /// Selects the last track when nothing is selected. No-op on an empty view.
    pub fn previous(&mut self) -> Option<Track> {
        let len = self.view.len();
        if len == 0 {
            return None;
        }
        let position = match self.selected_index() {
            Some(i) => (i + len - 1) % len,
            None => len - 1,
        };
        Some(self.select_position(position))
    }

    /// Drop the selection
    pub fn clear_selection(&mut self) -> Option<TrackId> {
        self.selected.take()
    }

    fn select_position(&mut self, position: usize) -> Track {
        let track = self.tracks[self.view[position]].clone();
        self.selected = Some(track.id.clone());
        track
    }

    fn view_position(&self, id: &TrackId) -> Option<usize> {
        let index = *self.by_id.get(id)?;
        self.view.iter().position(|&i| i == index)
    }

    // ===== Queries =====

    /// Selected track
    pub fn selected(&self) -> Option<&Track> {
        let index = *self.by_id.get(self.selected.as_ref()?)?;
        self.tracks.get(index)
    }

    /// Selected track id
    pub fn selected_id(&self) -> Option<&TrackId> {
        self.selected.as_ref()
    }

    /// Position of the selection within the filtered view
    pub fn selected_index(&self) -> Option<usize> {
        self.view_position(self.selected.as_ref()?)
    }

    /// Filtered view, in store order
    pub fn filtered(&self) -> impl Iterator<Item = &Track> + '_ {
        self.view.iter().map(|&i| &self.tracks[i])
    }

    /// Length of the filtered view
    pub fn len(&self) -> usize {
        self.view.len()
    }

    /// Whether the filtered view is empty
    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    /// Whether only favorites are shown
    pub fn favorites_only(&self) -> bool {
        self.favorites_only
    }

    /// Whether a store fetch has been applied
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}
