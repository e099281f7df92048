//! In-memory session store.
//!
//! Sessions map an opaque random token to the authenticated user. They are not
//! persisted: restarting the service logs everybody out. A session lives for the
//! store's TTL; expired sessions stop resolving at once and are swept out of the map
//! whenever a new session is opened.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Owner of every row the caller touches
    pub user_id: i64,
    /// Login name, echoed by `/api/me`
    pub username: String,
    /// When the session was opened
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// True once `ttl` has elapsed since the session was opened.
    #[must_use]
    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now - self.created_at >= ttl
    }
}

/// Token → session map shared by all request handlers.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Duration,
}

impl SessionStore {
    /// Empty store whose sessions expire after `ttl`.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Opens a session for the user and returns its token.
    pub async fn create(&self, user_id: i64, username: &str) -> String {
        self.purge_expired().await;

        let token = Uuid::new_v4().simple().to_string();
        let session = Session {
            user_id,
            username: username.to_string(),
            created_at: Utc::now(),
        };
        self.sessions.write().await.insert(token.clone(), session);
        token
    }

    /// Looks up the live session behind a token.
    pub async fn get(&self, token: &str) -> Option<Session> {
        let now = Utc::now();
        self.sessions
            .read()
            .await
            .get(token)
            .filter(|session| !session.is_expired(self.ttl, now))
            .cloned()
    }

    /// Ends a session. Returns whether the token was known.
    pub async fn remove(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    /// Drops every expired session and returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(self.ttl, now));
        let removed = before - sessions.len();
        if removed > 0 {
            debug!(removed, remaining = sessions.len(), "expired sessions purged");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[tokio::test]
    async fn test_session_lifecycle() {
        let store = SessionStore::with_ttl(Duration::hours(1));

        let token = store.create(7, "ana").await;
        let session = store.get(&token).await.unwrap();
        assert_eq!(session.user_id, 7);
        assert_eq!(session.username, "ana");

        assert!(store.remove(&token).await);
        assert!(store.get(&token).await.is_none());
        assert!(!store.remove(&token).await);
    }

    #[tokio::test]
    async fn test_tokens_are_unique() {
        let store = SessionStore::with_ttl(Duration::hours(1));
        let first = store.create(1, "ana").await;
        let second = store.create(1, "ana").await;
        assert_ne!(first, second);
        assert!(store.get(&first).await.is_some());
        assert!(store.get(&second).await.is_some());
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let store = SessionStore::with_ttl(Duration::hours(1));
        assert!(store.get("deadbeef").await.is_none());
    }

    #[tokio::test]
    async fn test_expired_sessions_stop_resolving_and_are_swept() {
        let store = SessionStore::with_ttl(Duration::zero());

        let first = store.create(1, "ana").await;
        assert!(store.get(&first).await.is_none());

        // Opening another session sweeps the expired one
        let second = store.create(1, "ana").await;
        assert!(!store.remove(&first).await);

        assert_eq!(store.purge_expired().await, 1);
        assert!(!store.remove(&second).await);
    }

    #[test]
    fn test_is_expired() {
        let opened = Utc::now();
        let session = Session {
            user_id: 1,
            username: "ana".to_string(),
            created_at: opened,
        };
        let ttl = Duration::hours(2);
        assert!(!session.is_expired(ttl, opened + Duration::minutes(119)));
        assert!(session.is_expired(ttl, opened + Duration::hours(2)));
    }
}
