//! Session storage
//!
//! Snapshots are loaded and saved whole. Turns for one session are
//! serialized with [`SessionLocks`]; different sessions never contend.

mod locks;
pub mod memory;

pub use locks::SessionLocks;
pub use memory::InMemorySessionStore;

use crate::dialog::SessionState;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Session capacity reached ({0} sessions)")]
    CapacityReached(usize),
    #[error("Session store unavailable: {0}")]
    #[allow(dead_code)] // Raised by external backends and test doubles
    Unavailable(String),
}

/// Storage for session snapshots
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stored snapshot, if the session has been seen before
    async fn get(&self, session_id: &str) -> Result<Option<SessionState>, StoreError>;

    /// Stored snapshot, or a fresh one for an unknown session
    async fn load(&self, session_id: &str) -> Result<SessionState, StoreError> {
        Ok(self.get(session_id).await?.unwrap_or_default())
    }

    async fn save(&self, session_id: &str, state: &SessionState) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    async fn get(&self, session_id: &str) -> Result<Option<SessionState>, StoreError> {
        (**self).get(session_id).await
    }

    async fn load(&self, session_id: &str) -> Result<SessionState, StoreError> {
        (**self).load(session_id).await
    }

    async fn save(&self, session_id: &str, state: &SessionState) -> Result<(), StoreError> {
        (**self).save(session_id, state).await
    }
}
