//! Tunebox Core
//!
//! Domain types and collaborator traits for the Tunebox music library.
//!
//! This crate provides the building blocks shared by the playback layer and
//! whatever hosts it (browser shell, desktop shell, tests):
//! - **Domain Types**: `Track`, `TrackId`
//! - **Core Traits**: `TrackStore` (remote track list and favorite flags)
//! - **Error Handling**: Unified `CoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use tunebox_core::{Track, TrackId};
//!
//! let track = Track::new(TrackId::new("song-1"), "Blue in Green", "https://cdn.example/1.mp3")
//!     .with_artist("Miles Davis")
//!     .with_favorite(true);
//!
//! assert_eq!(track.id.as_str(), "song-1");
//! assert!(track.is_favorite);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use store::TrackStore;
pub use types::{Track, TrackId};
