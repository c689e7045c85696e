//! Feed accumulator sessions
//!
//! The feed is the only view whose state outlives a single request: manual
//! refreshes merge new posts into what the visitor already sees. Each visitor's
//! feed lives in a [`FeedSession`] keyed by an opaque id (carried in a cookie).
//! A session is dropped when the visitor opens another page or goes idle, and
//! any refresh still in flight for it is abandoned.

use moka::future::Cache;
use moka::notification::RemovalCause;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use super::{abandon_pair, AbandonHandle, AbandonSignal, ViewModel, ViewPhase};
use crate::models::FeedItem;

const MAX_FEED_SESSIONS: u64 = 10_000;

pub struct FeedSession {
    id: Uuid,
    model: Mutex<ViewModel<Vec<FeedItem>>>,
    refreshing: AtomicBool,
    abandon: AbandonHandle,
    signal: AbandonSignal,
}

/// Point-in-time copy of a feed session for rendering
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    pub id: Uuid,
    pub phase: ViewPhase,
    pub items: Vec<FeedItem>,
    pub failure: Option<String>,
    pub refreshing: bool,
}

/// Held while a refresh runs; clears the `is_refreshing` flag on drop
pub struct RefreshGuard<'a> {
    session: &'a FeedSession,
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.session.refreshing.store(false, Ordering::Release);
    }
}

impl Default for FeedSession {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedSession {
    pub fn new() -> Self {
        let (abandon, signal) = abandon_pair();
        Self {
            id: Uuid::new_v4(),
            model: Mutex::new(ViewModel::new()),
            refreshing: AtomicBool::new(false),
            abandon,
            signal,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn signal(&self) -> AbandonSignal {
        self.signal.clone()
    }

    pub fn abandon(&self) {
        self.abandon.abandon();
    }

    pub fn is_abandoned(&self) -> bool {
        self.signal.is_abandoned()
    }

    /// Claim the refresh flag. `None` means a refresh is already running.
    pub fn try_begin_refresh(&self) -> Option<RefreshGuard<'_>> {
        self.refreshing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RefreshGuard { session: self })
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::Acquire)
    }

    /// Run `f` against the view-model under the session lock
    pub async fn update<R>(&self, f: impl FnOnce(&mut ViewModel<Vec<FeedItem>>) -> R) -> R {
        let mut model = self.model.lock().await;
        f(&mut model)
    }

    pub async fn snapshot(&self) -> FeedSnapshot {
        let model = self.model.lock().await;
        FeedSnapshot {
            id: self.id,
            phase: model.phase(),
            items: model.data().cloned().unwrap_or_default(),
            failure: model.failure().map(str::to_string),
            refreshing: self.is_refreshing(),
        }
    }
}

/// Live feed sessions, expired after a period without access
#[derive(Clone)]
pub struct FeedSessions {
    sessions: Cache<Uuid, Arc<FeedSession>>,
}

impl FeedSessions {
    pub fn new(idle: Duration) -> Self {
        let sessions = Cache::builder()
            .max_capacity(MAX_FEED_SESSIONS)
            .time_to_idle(idle)
            .eviction_listener(|id: Arc<Uuid>, session: Arc<FeedSession>, cause: RemovalCause| {
                debug!(session_id = %id, ?cause, "Feed session removed");
                session.abandon();
            })
            .build();

        Self { sessions }
    }

    /// Start a fresh, empty feed session
    pub async fn open(&self) -> Arc<FeedSession> {
        let session = Arc::new(FeedSession::new());
        self.sessions.insert(session.id(), session.clone()).await;
        debug!(session_id = %session.id(), "Feed session opened");
        session
    }

    pub async fn get(&self, id: &Uuid) -> Option<Arc<FeedSession>> {
        self.sessions.get(id).await
    }

    /// Drop a session and abandon anything still computing for it
    pub async fn discard(&self, id: &Uuid) {
        if let Some(session) = self.sessions.remove(id).await {
            session.abandon();
            debug!(session_id = %id, "Feed session discarded");
        }
    }
}
