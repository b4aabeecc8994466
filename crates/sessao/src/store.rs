// Session store
//
// *O Consultório* (The Office) - Keyed in-memory sessions with last-touched
// timestamps

use crate::error::{Error, Result};
use crate::model::{Author, Colleague, Message, Session, SessionStatus};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

/// Shared session store; clones share the same sessions
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    /// Active sessions: session_id -> session
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new session for a colleague
    pub async fn create(&self, colleague: Colleague) -> Session {
        let id = Uuid::new_v4().to_string();
        let session = Session::new(id.clone(), colleague, Utc::now());

        let mut sessions = self.sessions.write().await;
        sessions.insert(id.clone(), session.clone());
        info!("Session created: {} (active: {})", id, sessions.len());
        session
    }

    /// Snapshot of a session, refreshing its last activity
    pub async fn get(&self, id: &str) -> Option<Session> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(id)?;
        session.last_activity = Utc::now();
        Some(session.clone())
    }

    /// Snapshot of a session without touching it
    pub async fn peek(&self, id: &str) -> Option<Session> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Refresh the last activity of a session
    pub async fn touch(&self, id: &str) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        session.last_activity = Utc::now();
        Ok(())
    }

    /// Append a turn to an active session
    pub async fn append_message(
        &self,
        id: &str,
        author: Author,
        content: impl Into<String>,
    ) -> Result<Session> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        if !session.is_active() {
            return Err(Error::Finished(id.to_string()));
        }

        let now = Utc::now();
        session.history.push(Message {
            author,
            content: content.into(),
            timestamp: now,
        });
        session.last_activity = now;
        debug!("Session {}: {} messages", id, session.history.len());
        Ok(session.clone())
    }

    /// Record discussed topics on a session
    pub async fn record_topics<I, S>(&self, id: &str, topics: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        session.add_topics(topics);
        Ok(())
    }

    /// Close a session with an optional summary.
    ///
    /// Finishing twice keeps the first summary.
    pub async fn finish(&self, id: &str, summary: Option<String>) -> Result<Session> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        if session.is_active() {
            session.status = SessionStatus::Finished;
            session.summary = Some(summary.unwrap_or_else(|| DEFAULT_SUMMARY.to_string()));
            info!("Session finished: {} ({} messages)", id, session.history.len());
        }
        session.last_activity = Utc::now();
        Ok(session.clone())
    }

    /// Remove sessions idle for longer than `ttl`; returns how many
    pub async fn expire_older_than(&self, ttl: std::time::Duration) -> usize {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        let cutoff = Utc::now()
            .checked_sub_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        self.expire_idle_since(cutoff).await
    }

    /// Remove sessions whose last activity is before `cutoff`
    pub async fn expire_idle_since(&self, cutoff: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.last_activity >= cutoff);
        let expired = before - sessions.len();
        if expired > 0 {
            info!("Expired {} idle sessions (active: {})", expired, sessions.len());
        }
        expired
    }

    /// Number of stored sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether the store holds no sessions
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Number of sessions still accepting messages
    pub async fn active_count(&self) -> usize {
        self.sessions
            .read()
            .await
            .values()
            .filter(|s| s.is_active())
            .count()
    }

    #[cfg(test)]
    pub(crate) async fn set_last_activity(&self, id: &str, at: DateTime<Utc>) {
        if let Some(session) = self.sessions.write().await.get_mut(id) {
            session.last_activity = at;
        }
    }
}

/// Summary stored when a session is closed without one
pub const DEFAULT_SUMMARY: &str = "Discussão finalizada";
