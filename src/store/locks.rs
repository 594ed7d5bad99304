//! Per-session mutual exclusion

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OwnedMutexGuard;

type LockMap = Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>;

/// Hands out one async mutex per session id
///
/// The guard is held across the whole load → transition → save sequence,
/// including option lookups, so turns of one session never interleave.
/// Entries only live while a turn holds or waits for them.
#[derive(Default)]
pub struct SessionLocks {
    locks: Arc<LockMap>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `session_id`
    pub async fn acquire(&self, session_id: &str) -> SessionGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(session_id.to_string()).or_default())
        };
        SessionGuard {
            session_id: session_id.to_string(),
            locks: Arc::clone(&self.locks),
            guard: Some(lock.lock_owned().await),
        }
    }

    /// Number of sessions with a turn in flight or queued
    #[cfg(test)]
    pub fn tracked(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Exclusive access to one session. Dropping it releases the session and
/// forgets the lock once nobody else is waiting on it.
pub struct SessionGuard {
    session_id: String,
    locks: Arc<LockMap>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        // Release first so our own handle no longer counts
        drop(self.guard.take());

        // Handles are only cloned under the map lock, so a count of one
        // means the map holds the last reference.
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if locks
            .get(&self.session_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.session_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_session_is_serialized() {
        let locks = SessionLocks::new();
        let _held = locks.acquire("thread-1").await;

        let blocked = tokio::time::timeout(Duration::from_millis(50), locks.acquire("thread-1")).await;
        assert!(blocked.is_err(), "second acquire should wait");
    }

    #[tokio::test]
    async fn test_different_sessions_do_not_contend() {
        let locks = SessionLocks::new();
        let _held = locks.acquire("thread-1").await;

        let other = tokio::time::timeout(Duration::from_millis(50), locks.acquire("thread-2")).await;
        assert!(other.is_ok());
    }

    #[tokio::test]
    async fn test_lock_is_released_on_drop() {
        let locks = SessionLocks::new();
        drop(locks.acquire("thread-1").await);

        let again = tokio::time::timeout(Duration::from_millis(50), locks.acquire("thread-1")).await;
        assert!(again.is_ok());
    }

    #[tokio::test]
    async fn test_released_sessions_are_forgotten() {
        let locks = SessionLocks::new();
        for i in 0..100 {
            drop(locks.acquire(&format!("thread-{i}")).await);
        }
        assert_eq!(locks.tracked(), 0);
    }

    #[tokio::test]
    async fn test_entry_survives_while_a_waiter_is_queued() {
        let locks = Arc::new(SessionLocks::new());
        let held = locks.acquire("thread-1").await;

        let waiter = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.acquire("thread-1").await;
            })
        };
        // let the waiter register on the shared mutex
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(held);
        assert_eq!(locks.tracked(), 1, "queued waiter keeps the entry");

        waiter.await.unwrap();
        assert_eq!(locks.tracked(), 0);
    }
}
