//! TrackStore trait tests
//!
//! Exercises the trait through a trait object the way the playback session
//! holds it.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tunebox_core::{CoreError, Result, Track, TrackId, TrackStore};

/// Minimal in-memory store keeping favorite marks in a set
struct MemoryStore {
    tracks: Vec<Track>,
    favorites: Mutex<HashSet<TrackId>>,
}

impl MemoryStore {
    fn new(tracks: Vec<Track>) -> Self {
        let favorites = tracks
            .iter()
            .filter(|t| t.is_favorite)
            .map(|t| t.id.clone())
            .collect();
        Self {
            tracks,
            favorites: Mutex::new(favorites),
        }
    }

    fn ensure_known(&self, id: &TrackId) -> Result<()> {
        if self.tracks.iter().any(|t| &t.id == id) {
            Ok(())
        } else {
            Err(CoreError::not_found("Track", id.as_str()))
        }
    }
}

#[async_trait]
impl TrackStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Track>> {
        let favorites = self.favorites.lock().unwrap();
        Ok(self
            .tracks
            .iter()
            .cloned()
            .map(|t| {
                let fav = favorites.contains(&t.id);
                t.with_favorite(fav)
            })
            .collect())
    }

    async fn get_favorite(&self, id: &TrackId) -> Result<bool> {
        self.ensure_known(id)?;
        Ok(self.favorites.lock().unwrap().contains(id))
    }

    async fn favorite(&self, id: &TrackId) -> Result<()> {
        self.ensure_known(id)?;
        self.favorites.lock().unwrap().insert(id.clone());
        Ok(())
    }

    async fn unfavorite(&self, id: &TrackId) -> Result<()> {
        self.ensure_known(id)?;
        self.favorites.lock().unwrap().remove(id);
        Ok(())
    }
}

fn library() -> Vec<Track> {
    vec![
        Track::new(TrackId::new("a"), "Alpha", "https://cdn/a.mp3"),
        Track::new(TrackId::new("b"), "Bravo", "https://cdn/b.mp3").with_favorite(true),
    ]
}

#[tokio::test]
async fn favorite_round_trip_is_visible_in_next_list() {
    let store: Arc<dyn TrackStore> = Arc::new(MemoryStore::new(library()));
    let a = TrackId::new("a");

    assert!(!store.get_favorite(&a).await.unwrap());
    store.favorite(&a).await.unwrap();
    assert!(store.get_favorite(&a).await.unwrap());

    let listed = store.list().await.unwrap();
    assert!(listed.iter().all(|t| t.is_favorite));

    store.unfavorite(&a).await.unwrap();
    let listed = store.list().await.unwrap();
    assert_eq!(
        listed.iter().filter(|t| t.is_favorite).count(),
        1,
        "only the seeded favorite remains"
    );
}

#[tokio::test]
async fn unknown_track_is_not_found() {
    let store: Arc<dyn TrackStore> = Arc::new(MemoryStore::new(library()));
    let err = store.get_favorite(&TrackId::new("zz")).await.unwrap_err();

    assert_eq!(err, CoreError::not_found("Track", "zz"));
}

#[tokio::test]
async fn list_preserves_store_order() {
    let store = MemoryStore::new(library());
    let ids: Vec<_> = store
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.id.to_string())
        .collect();

    assert_eq!(ids, vec!["a", "b"]);
}
