//! Async player session
//!
//! Runs a [`PlayerViewModel`] inside one tokio task. Commands from the UI and
//! notifications from the media platform arrive over mpsc channels; store
//! calls run in their own tasks and report back to the loop, which is the
//! only place state is mutated.

use crate::{
    config::PlayerConfig,
    error::{PlaybackError, Result},
    events::PlayerEvent,
    favorites::{FavoriteAction, FavoriteReply, FavoriteRequest, RequestToken},
    media::{MediaBackend, MediaEvent},
    player::{PlayerSnapshot, PlayerViewModel},
};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use tunebox_core::{Track, TrackId, TrackStore};

/// Commands accepted by a running session
#[derive(Debug)]
pub enum PlayerCommand {
    /// Re-fetch the track list
    Refresh,
    /// Select a track by id
    Select {
        /// Track to select
        track_id: TrackId,
        /// Receives `NotFound` if the track is not in the current view
        reply: oneshot::Sender<Result<()>>,
    },
    /// Advance with wraparound
    Next,
    /// Go back with wraparound
    Previous,
    /// Start or resume playback
    Play,
    /// Pause playback
    Pause,
    /// Toggle play/pause
    TogglePlay,
    /// Seek to a position in seconds
    Seek(f64),
    /// Set volume (0.0-1.0)
    SetVolume(f64),
    /// Toggle mute state
    ToggleMute,
    /// Flip the selected track's favorite flag
    ToggleFavorite,
    /// Enable or disable the favorites-only filter
    SetFilter(bool),
    /// Flip the favorites-only filter
    ToggleFilter,
    /// Stop the session loop
    Shutdown,
}

/// Results of store calls, fed back into the loop
enum StoreReply {
    Tracks {
        seq: u64,
        result: tunebox_core::Result<Vec<Track>>,
    },
    Favorite {
        token: RequestToken,
        reply: FavoriteReply,
    },
}

/// Handle to a running session
///
/// Cheap to clone. Every helper fails with [`PlaybackError::SessionClosed`]
/// once the session has stopped.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<PlayerCommand>,
    media: mpsc::Sender<MediaEvent>,
    snapshots: watch::Receiver<PlayerSnapshot>,
    events: broadcast::Sender<PlayerEvent>,
}

impl SessionHandle {
    /// Send a raw command
    pub async fn send(&self, command: PlayerCommand) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| PlaybackError::SessionClosed)
    }

    /// Select a track; fails with `NotFound` if it is not in the current view
    pub async fn select(&self, track_id: TrackId) -> Result<()> {
        let (reply, response) = oneshot::channel();
        self.send(PlayerCommand::Select { track_id, reply }).await?;
        response.await.map_err(|_| PlaybackError::SessionClosed)?
    }

    /// Advance to the next track
    #[allow(clippy::should_implement_trait)]
    pub async fn next(&self) -> Result<()> {
        self.send(PlayerCommand::Next).await
    }

    /// Go back to the previous track
    pub async fn previous(&self) -> Result<()> {
        self.send(PlayerCommand::Previous).await
    }

    /// Start or resume playback
    pub async fn play(&self) -> Result<()> {
        self.send(PlayerCommand::Play).await
    }

    /// Pause playback
    pub async fn pause(&self) -> Result<()> {
        self.send(PlayerCommand::Pause).await
    }

    /// Toggle play/pause
    pub async fn toggle_play(&self) -> Result<()> {
        self.send(PlayerCommand::TogglePlay).await
    }

    /// Seek to `seconds`; invalid targets are ignored
    pub async fn seek(&self, seconds: f64) -> Result<()> {
        self.send(PlayerCommand::Seek(seconds)).await
    }

    /// Set volume, clamped to `[0, 1]`
    pub async fn set_volume(&self, level: f64) -> Result<()> {
        self.send(PlayerCommand::SetVolume(level)).await
    }

    /// Toggle mute state
    pub async fn toggle_mute(&self) -> Result<()> {
        self.send(PlayerCommand::ToggleMute).await
    }

    /// Flip the selected track's favorite flag
    pub async fn toggle_favorite(&self) -> Result<()> {
        self.send(PlayerCommand::ToggleFavorite).await
    }

    /// Enable or disable the favorites-only filter
    pub async fn set_filter(&self, favorites_only: bool) -> Result<()> {
        self.send(PlayerCommand::SetFilter(favorites_only)).await
    }

    /// Flip the favorites-only filter
    pub async fn toggle_filter(&self) -> Result<()> {
        self.send(PlayerCommand::ToggleFilter).await
    }

    /// Re-fetch the track list
    pub async fn refresh(&self) -> Result<()> {
        self.send(PlayerCommand::Refresh).await
    }

    /// Stop the session
    pub async fn shutdown(&self) -> Result<()> {
        self.send(PlayerCommand::Shutdown).await
    }

    /// Sender for media notifications, handed to the platform resource
    pub fn media_sender(&self) -> mpsc::Sender<MediaEvent> {
        self.media.clone()
    }

    /// Latest snapshot, updated after every handled message
    pub fn snapshots(&self) -> watch::Receiver<PlayerSnapshot> {
        self.snapshots.clone()
    }

    /// Snapshot at this instant
    pub fn snapshot(&self) -> PlayerSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Subscribe to player events
    pub fn events(&self) -> broadcast::Receiver<PlayerEvent> {
        self.events.subscribe()
    }
}

/// Start a session task
///
/// The task fetches the track list immediately and runs until
/// [`SessionHandle::shutdown`] or until every handle is dropped.
pub fn spawn_session<S>(
    config: PlayerConfig,
    backend: Box<dyn MediaBackend>,
    store: Arc<S>,
) -> Result<(SessionHandle, JoinHandle<()>)>
where
    S: TrackStore + 'static,
{
    config.validate()?;
    let buffer = config.session.command_buffer;

    let (command_tx, command_rx) = mpsc::channel(buffer);
    let (media_tx, media_rx) = mpsc::channel(buffer);
    let (reply_tx, reply_rx) = mpsc::channel(buffer);
    let (event_tx, _) = broadcast::channel(buffer);

    let player = PlayerViewModel::new(config, backend);
    let (snapshot_tx, snapshot_rx) = watch::channel(player.snapshot());

    let session = Session {
        player,
        store,
        replies: reply_tx,
        snapshots: snapshot_tx,
        events: event_tx.clone(),
        refresh_seq: 0,
        applied_seq: 0,
    };

    let task = tokio::spawn(session.run(command_rx, media_rx, reply_rx));

    let handle = SessionHandle {
        commands: command_tx,
        media: media_tx,
        snapshots: snapshot_rx,
        events: event_tx,
    };
    Ok((handle, task))
}

struct Session<S> {
    player: PlayerViewModel,
    store: Arc<S>,
    replies: mpsc::Sender<StoreReply>,
    snapshots: watch::Sender<PlayerSnapshot>,
    events: broadcast::Sender<PlayerEvent>,

    // Sequence of the latest issued list fetch
    refresh_seq: u64,
    // Sequence of the latest applied list fetch
    applied_seq: u64,
}

impl<S: TrackStore + 'static> Session<S> {
    async fn run(
        mut self,
        mut commands: mpsc::Receiver<PlayerCommand>,
        mut media: mpsc::Receiver<MediaEvent>,
        mut replies: mpsc::Receiver<StoreReply>,
    ) {
        info!("Player session started");
        self.refresh();

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(PlayerCommand::Shutdown) | None => break,
                    Some(command) => self.handle_command(command),
                },
                Some(event) = media.recv() => self.player.handle_media_event(event),
                Some(reply) = replies.recv() => self.handle_reply(reply),
            }

            self.dispatch_requests();
            self.publish();
        }

        info!("Player session stopped");
    }

    fn handle_command(&mut self, command: PlayerCommand) {
        debug!(?command, "Handling player command");
        match command {
            PlayerCommand::Refresh => self.refresh(),
            PlayerCommand::Select { track_id, reply } => {
                let result = self.player.select(&track_id);
                if reply.send(result).is_err() {
                    debug!(track_id = %track_id, "Select caller went away");
                }
            }
            PlayerCommand::Next => self.player.next(),
            PlayerCommand::Previous => self.player.previous(),
            PlayerCommand::Play => self.player.play(),
            PlayerCommand::Pause => self.player.pause(),
            PlayerCommand::TogglePlay => self.player.toggle_play(),
            PlayerCommand::Seek(seconds) => self.player.seek(seconds),
            PlayerCommand::SetVolume(level) => self.player.set_volume(level),
            PlayerCommand::ToggleMute => self.player.toggle_mute(),
            PlayerCommand::ToggleFavorite => self.player.toggle_favorite(),
            PlayerCommand::SetFilter(favorites_only) => self.player.set_filter(favorites_only),
            PlayerCommand::ToggleFilter => self.player.toggle_filter(),
            PlayerCommand::Shutdown => {}
        }
    }

    fn handle_reply(&mut self, reply: StoreReply) {
        match reply {
            StoreReply::Tracks { seq, result } => {
                if seq <= self.applied_seq {
                    debug!(seq, applied = self.applied_seq, "Discarding outdated track list");
                    return;
                }
                match result {
                    Ok(tracks) => {
                        self.applied_seq = seq;
                        debug!(seq, count = tracks.len(), "Applying track list");
                        self.player.set_tracks(tracks);
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to fetch track list");
                        self.emit(PlayerEvent::Error {
                            message: format!("Failed to load tracks: {e}"),
                        });
                    }
                }
            }
            StoreReply::Favorite { token, reply } => {
                // The list is refreshed even when the selection has moved on
                let acknowledged = matches!(reply, FavoriteReply::Mutation(Ok(())));
                let resolution = self.player.resolve_favorite(token, reply);
                if acknowledged {
                    debug!(?resolution, "Favorite mutation acknowledged; refreshing tracks");
                    self.refresh();
                }
            }
        }
    }

    fn refresh(&mut self) {
        self.refresh_seq += 1;
        let seq = self.refresh_seq;
        let store = Arc::clone(&self.store);
        let replies = self.replies.clone();

        tokio::spawn(async move {
            let result = store.list().await;
            if replies.send(StoreReply::Tracks { seq, result }).await.is_err() {
                debug!(seq, "Session closed before track list arrived");
            }
        });
    }

    fn dispatch_requests(&mut self) {
        for request in self.player.take_requests() {
            let store = Arc::clone(&self.store);
            let replies = self.replies.clone();

            tokio::spawn(async move {
                let FavoriteRequest {
                    token,
                    track_id,
                    action,
                } = request;
                let reply = match action {
                    FavoriteAction::Query => FavoriteReply::Query(store.get_favorite(&track_id).await),
                    FavoriteAction::Favorite => FavoriteReply::Mutation(store.favorite(&track_id).await),
                    FavoriteAction::Unfavorite => {
                        FavoriteReply::Mutation(store.unfavorite(&track_id).await)
                    }
                };
                if replies.send(StoreReply::Favorite { token, reply }).await.is_err() {
                    debug!(track_id = %track_id, "Session closed before favorite reply arrived");
                }
            });
        }
    }

    fn publish(&mut self) {
        for event in self.player.drain_events() {
            self.emit(event);
        }

        let snapshot = self.player.snapshot();
        self.snapshots.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }

    fn emit(&self, event: PlayerEvent) {
        // Fails only when nobody subscribed
        let _ = self.events.send(event);
    }
}
