//! In-process session store

use super::{SessionStore, StoreError};
use crate::dialog::SessionState;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Default bound on the number of distinct sessions kept in memory
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Session snapshots held for the life of the process
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionState>>,
    max_sessions: usize,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_SESSIONS)
    }

    /// Refuse to admit new sessions beyond `max_sessions`
    pub fn with_capacity(max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, session_id: &str) -> Result<Option<SessionState>, StoreError> {
        Ok(self.sessions.read().await.get(session_id).cloned())
    }

    async fn save(&self, session_id: &str, state: &SessionState) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().await;
        if !sessions.contains_key(session_id) && sessions.len() >= self.max_sessions {
            return Err(StoreError::CapacityReached(self.max_sessions));
        }
        sessions.insert(session_id.to_string(), state.clone());
        Ok(())
    }
}
