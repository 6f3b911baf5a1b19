//! In-memory session store.
//!
//! A concurrent map from session key to `Arc<Mutex<Session>>`. Callers hold
//! the session mutex across a whole respond cycle, so all operations against
//! one session serialize; distinct sessions proceed in parallel. Nothing is
//! persisted: session memory is volatile by design.
//!
//! The map is bounded two ways: `evict_idle` sweeps sessions that have not
//! been touched within a deadline, and reaching `max_sessions` evicts the
//! least-recently-used entry before a new one is created. Sessions whose
//! mutex is currently held are in use and never evicted.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use {dashmap::DashMap, tokio::sync::Mutex, tracing::debug};

use crate::history::History;

/// Default bound on concurrently retained sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 1024;

/// One conversation's state.
#[derive(Debug)]
pub struct Session {
    pub history: History,
    last_used: Instant,
}

impl Session {
    fn new() -> Self {
        Self {
            history: History::default(),
            last_used: Instant::now(),
        }
    }

    /// Mark the session as just used. Call on every access.
    pub fn touch(&mut self) {
        self.last_used = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_used.elapsed()
    }
}

/// Process-wide map of live sessions.
pub struct SessionStore {
    sessions: DashMap<String, Arc<Mutex<Session>>>,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Look up a session, creating an empty one for unseen keys.
    ///
    /// Lookups are idempotent: repeated calls with the same key return the
    /// same logical session until it is evicted.
    pub fn get_or_create(&self, key: &str) -> Arc<Mutex<Session>> {
        if !self.sessions.contains_key(key) && self.sessions.len() >= self.max_sessions {
            self.evict_lru();
        }
        self.sessions
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(Session::new())))
            .clone()
    }

    /// Drop sessions idle longer than `max_idle`. Returns how many were
    /// removed.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut removed = 0;
        self.sessions.retain(|key, session| {
            match session.try_lock() {
                Ok(guard) if guard.idle_for() > max_idle => {
                    debug!(session_key = %key, "evicting idle session");
                    removed += 1;
                    false
                },
                // In use or recently used: keep.
                _ => true,
            }
        });
        removed
    }

    /// Evict the least-recently-used session to make room for a new one.
    fn evict_lru(&self) {
        let mut oldest: Option<(String, Instant)> = None;
        for entry in self.sessions.iter() {
            if let Ok(guard) = entry.value().try_lock() {
                let is_older = oldest
                    .as_ref()
                    .is_none_or(|(_, last)| guard.last_used < *last);
                if is_older {
                    oldest = Some((entry.key().clone(), guard.last_used));
                }
            }
        }
        if let Some((key, _)) = oldest {
            debug!(session_key = %key, "evicting least-recently-used session");
            self.sessions.remove(&key);
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SESSIONS)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::history::Turn};

    #[tokio::test]
    async fn append_and_read_back_in_order() {
        let store = SessionStore::default();
        let session = store.get_or_create("main");

        {
            let mut session = session.lock().await;
            session.history.push(Turn::user("hello"));
            session.history.push(Turn::assistant("hi"));
            session.history.push(Turn::user("how are you?"));
        }

        let session = store.get_or_create("main");
        let session = session.lock().await;
        let turns = session.history.turns();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0].content, "hello");
        assert_eq!(turns[1].content, "hi");
        assert_eq!(turns[2].content, "how are you?");
    }

    #[tokio::test]
    async fn get_or_create_is_idempotent() {
        let store = SessionStore::default();
        let first = store.get_or_create("abc");
        let second = store.get_or_create("abc");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn distinct_keys_get_distinct_sessions() {
        let store = SessionStore::default();
        let a = store.get_or_create("a");
        store.get_or_create("b");

        a.lock().await.history.push(Turn::user("only in a"));

        let b = store.get_or_create("b");
        assert!(b.lock().await.history.is_empty());
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn evict_idle_removes_stale_sessions() {
        let store = SessionStore::default();
        store.get_or_create("stale");

        // Zero deadline: everything not in use counts as idle.
        let removed = store.evict_idle(Duration::ZERO);
        assert_eq!(removed, 1);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn evict_idle_keeps_sessions_in_use() {
        let store = SessionStore::default();
        let session = store.get_or_create("busy");
        let _guard = session.lock().await;

        let removed = store.evict_idle(Duration::ZERO);
        assert_eq!(removed, 0);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn evict_idle_keeps_recent_sessions() {
        let store = SessionStore::default();
        store.get_or_create("fresh");

        let removed = store.evict_idle(Duration::from_secs(3600));
        assert_eq!(removed, 0);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn capacity_bound_evicts_lru() {
        let store = SessionStore::new(2);
        let first = store.get_or_create("first");
        // Make "first" the most recently used of the two.
        tokio::time::sleep(Duration::from_millis(5)).await;
        store.get_or_create("second");
        tokio::time::sleep(Duration::from_millis(5)).await;
        first.lock().await.touch();

        store.get_or_create("third");
        assert_eq!(store.len(), 2);
        assert!(store.sessions.contains_key("first"));
        assert!(store.sessions.contains_key("third"));
        assert!(!store.sessions.contains_key("second"));
    }
}
