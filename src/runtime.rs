//! Dialog runtime
//!
//! Owns the slot chain and the session store, and runs one turn at a time
//! per session: lock → load → transition → save → unlock.

#[cfg(test)]
pub mod testing;

use crate::dialog::{transition, SessionState, SlotChain};
use crate::options::OptionError;
use crate::store::{InMemorySessionStore, SessionLocks, SessionStore, StoreError};
use std::time::Instant;
use thiserror::Error;

/// Type alias for the runtime the server uses
pub type ProductionRuntime = DialogRuntime<InMemorySessionStore>;

/// Failure of a whole turn. The session is left as it was before the turn.
#[derive(Debug, Error)]
pub enum DialogError {
    #[error("Option lookup failed: {0}")]
    Options(#[from] OptionError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct DialogRuntime<S: SessionStore> {
    chain: SlotChain,
    store: S,
    locks: SessionLocks,
}

impl<S: SessionStore> DialogRuntime<S> {
    pub fn new(chain: SlotChain, store: S) -> Self {
        Self {
            chain,
            store,
            locks: SessionLocks::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Feed one utterance to a session and return the reply
    pub async fn process_turn(
        &self,
        session_id: &str,
        utterance: &str,
    ) -> Result<String, DialogError> {
        let _guard = self.locks.acquire(session_id).await;
        let start = Instant::now();

        let state = self.store.load(session_id).await?;
        let outcome = match transition(&state, &self.chain, utterance).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(
                    session_id,
                    error = %e,
                    kind = ?e.kind,
                    "Turn aborted, session left unchanged"
                );
                return Err(e.into());
            }
        };
        self.store.save(session_id, &outcome.state).await?;

        tracing::info!(
            session_id,
            cursor = outcome.state.cursor,
            slot = outcome.state.current_slot().unwrap_or_default(),
            completed = outcome.state.completed,
            duration_ms = %start.elapsed().as_millis(),
            "Turn processed"
        );

        Ok(outcome.reply)
    }

    /// Current snapshot of a session, without creating it
    pub async fn snapshot(&self, session_id: &str) -> Result<Option<SessionState>, DialogError> {
        Ok(self.store.get(session_id).await?)
    }
}
