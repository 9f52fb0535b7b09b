//! Shared fakes for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tunebox_core::{CoreError, Track, TrackId, TrackStore};
use tunebox_playback::{MediaBackend, MediaResource, PlaybackError, ResourceToken, Result};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn track(id: &str, favorite: bool) -> Track {
    Track::new(TrackId::new(id), id.to_uppercase(), format!("https://cdn/{id}.mp3"))
        .with_artist("Test Artist")
        .with_favorite(favorite)
}

pub fn id(s: &str) -> TrackId {
    TrackId::new(s)
}

// ===== Media =====

#[derive(Debug, Clone, PartialEq)]
pub enum MediaCall {
    Open(String),
    Play,
    Pause,
    Seek(f64),
    Volume(f64),
}

#[derive(Debug, Default)]
struct Recorded {
    calls: Vec<(ResourceToken, MediaCall)>,
    last_token: Option<ResourceToken>,
}

/// Media backend recording every call per resource
#[derive(Clone, Default)]
pub struct FakeBackend {
    recorded: Arc<Mutex<Recorded>>,
    broken_urls: Arc<Mutex<HashSet<String>>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `open` fail for `url`
    pub fn break_url(&self, url: &str) {
        self.broken_urls.lock().unwrap().insert(url.to_string());
    }

    pub fn calls(&self) -> Vec<(ResourceToken, MediaCall)> {
        self.recorded.lock().unwrap().calls.clone()
    }

    pub fn last_token(&self) -> Option<ResourceToken> {
        self.recorded.lock().unwrap().last_token
    }

    pub fn opened_urls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|(_, call)| match call {
                MediaCall::Open(url) => Some(url),
                _ => None,
            })
            .collect()
    }
}

struct FakeResource {
    token: ResourceToken,
    recorded: Arc<Mutex<Recorded>>,
}

impl FakeResource {
    fn record(&self, call: MediaCall) {
        self.recorded.lock().unwrap().calls.push((self.token, call));
    }
}

impl MediaResource for FakeResource {
    fn play(&mut self) {
        self.record(MediaCall::Play);
    }

    fn pause(&mut self) {
        self.record(MediaCall::Pause);
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.record(MediaCall::Seek(seconds));
    }

    fn set_volume(&mut self, volume: f64) {
        self.record(MediaCall::Volume(volume));
    }
}

impl MediaBackend for FakeBackend {
    fn open(&mut self, url: &str, token: ResourceToken) -> Result<Box<dyn MediaResource>> {
        if self.broken_urls.lock().unwrap().contains(url) {
            return Err(PlaybackError::Media(format!("unsupported source: {url}")));
        }

        let mut recorded = self.recorded.lock().unwrap();
        recorded.calls.push((token, MediaCall::Open(url.to_string())));
        recorded.last_token = Some(token);
        drop(recorded);

        Ok(Box::new(FakeResource {
            token,
            recorded: Arc::clone(&self.recorded),
        }))
    }
}

// ===== Store =====

/// In-memory track store with optional per-track latency
pub struct MemoryStore {
    tracks: Vec<Track>,
    favorites: Mutex<HashSet<TrackId>>,
    delays: Mutex<HashMap<TrackId, Duration>>,
    failing_mutations: Mutex<bool>,
    mutation_delay: Mutex<Option<Duration>>,
    list_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new(tracks: Vec<Track>) -> Arc<Self> {
        let favorites = tracks
            .iter()
            .filter(|t| t.is_favorite)
            .map(|t| t.id.clone())
            .collect();
        Arc::new(Self {
            tracks,
            favorites: Mutex::new(favorites),
            delays: Mutex::new(HashMap::new()),
            failing_mutations: Mutex::new(false),
            mutation_delay: Mutex::new(None),
            list_calls: AtomicUsize::new(0),
        })
    }

    /// Delay favorite queries for `id`
    pub fn delay_queries(&self, id: &TrackId, delay: Duration) {
        self.delays.lock().unwrap().insert(id.clone(), delay);
    }

    /// Make favorite/unfavorite fail
    pub fn fail_mutations(&self, fail: bool) {
        *self.failing_mutations.lock().unwrap() = fail;
    }

    /// Delay favorite/unfavorite acknowledgements
    pub fn delay_mutations(&self, delay: Duration) {
        *self.mutation_delay.lock().unwrap() = Some(delay);
    }

    pub fn is_favorite(&self, id: &TrackId) -> bool {
        self.favorites.lock().unwrap().contains(id)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    async fn check_mutation(&self, id: &TrackId) -> tunebox_core::Result<()> {
        let delay = *self.mutation_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if *self.failing_mutations.lock().unwrap() {
            return Err(CoreError::network("connection reset"));
        }
        if self.tracks.iter().any(|t| &t.id == id) {
            Ok(())
        } else {
            Err(CoreError::not_found("Track", id.as_str()))
        }
    }
}

#[async_trait]
impl TrackStore for MemoryStore {
    async fn list(&self) -> tunebox_core::Result<Vec<Track>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let favorites = self.favorites.lock().unwrap().clone();
        Ok(self
            .tracks
            .iter()
            .cloned()
            .map(|t| {
                let is_favorite = favorites.contains(&t.id);
                t.with_favorite(is_favorite)
            })
            .collect())
    }

    async fn get_favorite(&self, id: &TrackId) -> tunebox_core::Result<bool> {
        let delay = self.delays.lock().unwrap().get(id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.is_favorite(id))
    }

    async fn favorite(&self, id: &TrackId) -> tunebox_core::Result<()> {
        self.check_mutation(id).await?;
        self.favorites.lock().unwrap().insert(id.clone());
        Ok(())
    }

    async fn unfavorite(&self, id: &TrackId) -> tunebox_core::Result<()> {
        self.check_mutation(id).await?;
        self.favorites.lock().unwrap().remove(id);
        Ok(())
    }
}
