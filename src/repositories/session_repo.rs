use chrono::{DateTime, Duration, Utc};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::{SessionSettings, MAX_SESSION_TTL_SECONDS};
use crate::models::QueryHistory;

/// Per-login state: who is signed in and what they have asked.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    pub history: QueryHistory,
}

impl Session {
    fn new(username: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            created_at: now,
            last_seen_at: now,
            history: QueryHistory::new(),
        }
    }
}

/// Config validation rejects larger values; saturate instead of panicking if one slips through.
fn session_ttl(seconds: u64) -> Duration {
    let seconds = i64::try_from(seconds.min(MAX_SESSION_TTL_SECONDS)).unwrap_or(i64::MAX / 1000);
    Duration::seconds(seconds)
}

/// In-memory session map. Least recently used sessions are evicted once
/// `max_sessions` is reached; idle sessions expire after `ttl_seconds`.
#[derive(Clone)]
pub struct SessionRepo {
    sessions: Arc<Mutex<LruCache<Uuid, Session>>>,
    ttl: Duration,
}

impl SessionRepo {
    pub fn new(settings: &SessionSettings) -> Self {
        let capacity = NonZeroUsize::new(settings.max_sessions.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            sessions: Arc::new(Mutex::new(LruCache::new(capacity))),
            ttl: session_ttl(settings.ttl_seconds),
        }
    }

    pub async fn create(&self, username: &str) -> Session {
        let session = Session::new(username.to_string());
        let mut sessions = self.sessions.lock().await;
        if let Some((evicted, _)) = sessions.push(session.id, session.clone()) {
            if evicted != session.id {
                tracing::debug!(session_id = %evicted, "evicted least recently used session");
            }
        }
        session
    }

    /// Looks up a live session and refreshes its idle timer.
    pub async fn touch(&self, id: &Uuid) -> Option<Session> {
        self.with_session(id, |session| session.clone()).await
    }

    /// Runs `f` against a live session. Expired sessions are removed and yield `None`.
    pub async fn with_session<F, R>(&self, id: &Uuid, f: F) -> Option<R>
    where
        F: FnOnce(&mut Session) -> R,
    {
        let mut sessions = self.sessions.lock().await;
        let now = Utc::now();

        let expired = match sessions.get(id) {
            Some(session) => now - session.last_seen_at > self.ttl,
            None => return None,
        };
        if expired {
            sessions.pop(id);
            tracing::debug!(session_id = %id, "session expired");
            return None;
        }

        let session = sessions.get_mut(id)?;
        session.last_seen_at = now;
        Some(f(session))
    }

    pub async fn record_query(&self, id: &Uuid, query: &str) -> bool {
        self.with_session(id, |session| session.history.record(query))
            .await
            .is_some()
    }

    pub async fn recent_queries(&self, id: &Uuid, n: usize) -> Option<(Vec<String>, usize)> {
        self.with_session(id, |session| (session.history.recent(n), session.history.len()))
            .await
    }

    /// Ends a session, dropping its history.
    pub async fn remove(&self, id: &Uuid) -> bool {
        self.sessions.lock().await.pop(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
