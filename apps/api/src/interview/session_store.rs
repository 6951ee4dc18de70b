//! Session Store: process-wide map of session id to turn history and keyword set.
//!
//! Sessions are created lazily on first reference and expire after sitting idle for
//! the configured TTL. Each session carries a FIFO turn lock so one conversation is
//! processed strictly in order while different sessions run in parallel.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::keywords::{KeywordSet, MAX_CANDIDATES};
use crate::models::session::{SessionSnapshot, Turn};

const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// One interview conversation.
pub struct Session {
    id: String,
    created_at: DateTime<Utc>,
    state: Mutex<SessionState>,
    /// Held for the whole compose -> predict -> append cycle. tokio's mutex is fair,
    /// so queued turns run in arrival order.
    turn_lock: tokio::sync::Mutex<()>,
}

struct SessionState {
    turns: Vec<Turn>,
    keywords: KeywordSet,
    last_active: Instant,
}

impl Session {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            created_at: Utc::now(),
            state: Mutex::new(SessionState {
                turns: Vec::new(),
                keywords: KeywordSet::default(),
                last_active: Instant::now(),
            }),
            turn_lock: tokio::sync::Mutex::new(()),
        }
    }

    // Critical sections never panic mid-update, so a poisoned lock still holds
    // consistent data.
    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Waits for this session's turn slot.
    pub async fn lock_turns(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.turn_lock.lock().await
    }

    pub fn history(&self) -> Vec<Turn> {
        self.state().turns.clone()
    }

    pub fn keywords(&self) -> KeywordSet {
        self.state().keywords.clone()
    }

    pub fn append_turn(&self, turn: Turn) {
        let mut state = self.state();
        state.turns.push(turn);
        state.last_active = Instant::now();
    }

    pub fn replace_keywords(&self, keywords: KeywordSet) {
        let mut state = self.state();
        state.keywords = keywords;
        state.last_active = Instant::now();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state();
        SessionSnapshot {
            session_id: self.id.clone(),
            keywords: state.keywords.clone(),
            turns: state.turns.clone(),
            created_at: self.created_at,
        }
    }

    fn touch(&self) {
        self.state().last_active = Instant::now();
    }

    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.duration_since(self.state().last_active) >= ttl
    }

    fn has_turn_in_flight(&self) -> bool {
        self.turn_lock.try_lock().is_err()
    }
}

/// Shared session store. Clone freely (it's an Arc inside).
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    sessions: DashMap<String, Arc<Session>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                sessions: DashMap::new(),
                ttl,
            }),
        }
    }

    /// Returns the session for `id`, creating it on first reference.
    /// Referencing a session counts as activity for expiry purposes.
    pub fn get_or_create(&self, id: &str) -> Arc<Session> {
        let session = self
            .inner
            .sessions
            .entry(id.to_string())
            .or_insert_with(|| {
                info!("Session created: {id}");
                Arc::new(Session::new(id))
            })
            .value()
            .clone();
        session.touch();
        session
    }

    pub fn get(&self, id: &str) -> Option<Arc<Session>> {
        self.inner.sessions.get(id).map(|entry| entry.value().clone())
    }

    // The orchestrator appends through the `Session` it holds for the whole turn.
    #[allow(dead_code)]
    pub fn append_turn(&self, id: &str, turn: Turn) {
        self.get_or_create(id).append_turn(turn);
    }

    /// Replaces the keyword set of `id` with the normalized form of `keywords`
    /// and returns what was stored.
    pub fn set_keywords<I, S>(&self, id: &str, keywords: I) -> KeywordSet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = KeywordSet::normalized(keywords, MAX_CANDIDATES);
        self.get_or_create(id).replace_keywords(keywords.clone());
        info!("Keywords set for session {id}: [{}]", keywords.joined());
        keywords
    }

    /// Stored keywords for `id`; empty when the session is unknown or has none.
    pub fn get_keywords(&self, id: &str) -> KeywordSet {
        self.get(id).map(|s| s.keywords()).unwrap_or_default()
    }

    pub fn delete(&self, id: &str) -> bool {
        let removed = self.inner.sessions.remove(id).is_some();
        if removed {
            info!("Session deleted: {id}");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.inner.sessions.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.inner.sessions.is_empty()
    }

    /// Drops sessions idle for at least the TTL. Sessions with a turn in flight are kept.
    /// Returns the number of sessions removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let ttl = self.inner.ttl;
        let before = self.inner.sessions.len();
        self.inner
            .sessions
            .retain(|_, session| session.has_turn_in_flight() || !session.is_expired(now, ttl));
        before.saturating_sub(self.inner.sessions.len())
    }

    /// Spawns a background task that calls `purge_expired` every `interval`.
    /// A zero interval is raised to `MIN_SWEEP_INTERVAL`.
    pub fn spawn_sweeper(&self, interval: Duration) -> JoinHandle<()> {
        let interval = if interval.is_zero() {
            warn!("Session sweep interval is zero; using {MIN_SWEEP_INTERVAL:?}");
            MIN_SWEEP_INTERVAL
        } else {
            interval
        };
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let purged = store.purge_expired();
                if purged > 0 {
                    info!("Expired {purged} idle sessions ({} remaining)", store.len());
                } else {
                    debug!("Session sweep: {} active sessions", store.len());
                }
            }
        })
    }
}
