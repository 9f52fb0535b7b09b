//! Favorite flag synchronisation for the selected track
//!
//! Tracks the remote favorite flag of the *current* track only. Remote calls
//! are issued by the host; this module only decides which calls to make and
//! whether their results still apply when they come back.
//!
//! Every request carries a [`RequestToken`]. The generation part changes on
//! every track change, so a reply for a previous track is discarded on
//! arrival instead of overwriting the new track's state. Within one
//! generation, the sequence part orders queries against mutations: a query
//! issued before the latest optimistic toggle can't undo it.

use crate::events::PlayerEvent;
use crate::types::FavoriteStatus;
use tracing::{debug, warn};
use tunebox_core::{CoreError, TrackId};

/// Identity of one outgoing favorite request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken {
    generation: u64,
    seq: u64,
}

impl RequestToken {
    /// Selection generation the request belongs to
    pub fn generation(self) -> u64 {
        self.generation
    }
}

/// Remote operation to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteAction {
    /// `getFavorite(track)`
    Query,
    /// `favorite(track)`
    Favorite,
    /// `unfavorite(track)`
    Unfavorite,
}

/// Request for the host to execute against the track store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteRequest {
    /// Token to hand back with the reply
    pub token: RequestToken,
    /// Track the request is about
    pub track_id: TrackId,
    /// Operation
    pub action: FavoriteAction,
}

/// Store reply to a [`FavoriteRequest`]
#[derive(Debug, Clone, PartialEq)]
pub enum FavoriteReply {
    /// Reply to a `Query`
    Query(tunebox_core::Result<bool>),
    /// Reply to `Favorite` / `Unfavorite`
    Mutation(tunebox_core::Result<()>),
}

/// What happened to a reply
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Reply belongs to a previous selection; discarded
    Stale,

    /// Query result applied
    Applied(FavoriteStatus),

    /// Query was issued before a later toggle; discarded
    Superseded,

    /// Mutation acknowledged by the store
    Confirmed,

    /// Query failed; status left as it was
    QueryFailed(CoreError),

    /// Mutation failed; optimistic value kept
    MutationFailed {
        /// Store error
        error: CoreError,
        /// Follow-up query when reconciliation is enabled
        retry: Option<FavoriteRequest>,
    },
}

/// Favorite state of the current selection
#[derive(Debug, Clone)]
pub struct FavoriteSync {
    track_id: Option<TrackId>,
    status: FavoriteStatus,

    generation: u64,
    next_seq: u64,

    // Sequence number of the latest toggle in this generation (0 = none)
    last_mutation_seq: u64,

    reconcile_on_failure: bool,
    pending_events: Vec<PlayerEvent>,
}

impl FavoriteSync {
    /// Create with no track selected
    ///
    /// With `reconcile_on_failure`, a failed mutation is followed by a fresh
    /// query instead of leaving the optimistic value in place.
    pub fn new(reconcile_on_failure: bool) -> Self {
        Self {
            track_id: None,
            status: FavoriteStatus::Unknown,
            generation: 0,
            next_seq: 0,
            last_mutation_seq: 0,
            reconcile_on_failure,
            pending_events: Vec::new(),
        }
    }

    /// Switch to a new selection
    ///
    /// Invalidates every request still in flight and returns the query for
    /// the new track.
    pub fn track_changed(&mut self, track_id: Option<&TrackId>) -> Option<FavoriteRequest> {
        self.generation += 1;
        self.last_mutation_seq = 0;
        self.status = FavoriteStatus::Unknown;
        self.track_id = track_id.cloned();

        let track_id = self.track_id.clone()?;
        self.pending_events.push(PlayerEvent::FavoriteChanged {
            track_id,
            status: FavoriteStatus::Unknown,
        });
        self.request(FavoriteAction::Query)
    }

    /// Flip the favorite flag optimistically
    ///
    /// Returns the mutation to send. Ignored while the status is unknown or
    /// nothing is selected.
    pub fn toggle(&mut self) -> Option<FavoriteRequest> {
        let action = match self.status {
            FavoriteStatus::Favorite => FavoriteAction::Unfavorite,
            FavoriteStatus::NotFavorite => FavoriteAction::Favorite,
            FavoriteStatus::Unknown => {
                debug!("Favorite toggle ignored: status unknown");
                return None;
            }
        };

        let request = self.request(action)?;
        self.last_mutation_seq = request.token.seq;
        self.set_status(FavoriteStatus::from(action == FavoriteAction::Favorite));
        Some(request)
    }

    /// Apply a store reply
    pub fn resolve(&mut self, token: RequestToken, reply: FavoriteReply) -> Resolution {
        if token.generation != self.generation {
            debug!(
                generation = token.generation,
                current = self.generation,
                "Discarding favorite reply for previous selection"
            );
            return Resolution::Stale;
        }

        match reply {
            FavoriteReply::Query(_) if token.seq < self.last_mutation_seq => {
                debug!("Discarding favorite query issued before latest toggle");
                Resolution::Superseded
            }
            FavoriteReply::Query(Ok(is_favorite)) => {
                let status = FavoriteStatus::from(is_favorite);
                self.set_status(status);
                Resolution::Applied(status)
            }
            FavoriteReply::Query(Err(error)) => {
                warn!(error = %error, "Favorite query failed");
                Resolution::QueryFailed(error)
            }
            FavoriteReply::Mutation(Ok(())) => Resolution::Confirmed,
            FavoriteReply::Mutation(Err(error)) => {
                warn!(error = %error, "Favorite update failed; keeping local value");
                let retry = if self.reconcile_on_failure && token.seq == self.last_mutation_seq {
                    self.request(FavoriteAction::Query)
                } else {
                    None
                };
                Resolution::MutationFailed { error, retry }
            }
        }
    }

    fn request(&mut self, action: FavoriteAction) -> Option<FavoriteRequest> {
        let track_id = self.track_id.clone()?;
        self.next_seq += 1;
        Some(FavoriteRequest {
            token: RequestToken {
                generation: self.generation,
                seq: self.next_seq,
            },
            track_id,
            action,
        })
    }

    fn set_status(&mut self, status: FavoriteStatus) {
        if self.status == status {
            return;
        }
        self.status = status;
        if let Some(track_id) = self.track_id.clone() {
            self.pending_events
                .push(PlayerEvent::FavoriteChanged { track_id, status });
        }
    }

    /// Status for the current track
    pub fn status(&self) -> FavoriteStatus {
        self.status
    }

    /// Track the status refers to
    pub fn track_id(&self) -> Option<&TrackId> {
        self.track_id.as_ref()
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }
}

impl Default for FavoriteSync {
    fn default() -> Self {
        Self::new(false)
    }
}
