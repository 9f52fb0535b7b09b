//! Track store trait
//!
//! The remote data store owns persistence and query mechanics. The playback
//! layer only consumes these four operations.

use crate::error::Result;
use crate::types::{Track, TrackId};
use async_trait::async_trait;

/// Remote store of tracks and per-track favorite flags
///
/// Calls may resolve in any order relative to each other; callers are
/// responsible for discarding results that no longer apply.
#[async_trait]
pub trait TrackStore: Send + Sync {
    /// Fetch the full ordered track list
    ///
    /// Each call is a complete replacement of the previous result.
    async fn list(&self) -> Result<Vec<Track>>;

    /// Query the current favorite flag of a track
    async fn get_favorite(&self, id: &TrackId) -> Result<bool>;

    /// Mark a track as favorite
    async fn favorite(&self, id: &TrackId) -> Result<()>;

    /// Clear the favorite mark of a track
    async fn unfavorite(&self, id: &TrackId) -> Result<()>;
}
