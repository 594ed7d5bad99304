//! Test doubles for the runtime
//!
//! These stand in for a flaky upstream directory and an instrumented store.

use crate::dialog::SessionState;
use crate::options::{HospitalDirectory, OptionError, OptionProvider};
use crate::store::{InMemorySessionStore, SessionStore, StoreError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

// ============================================================================
// Switchable Option Provider
// ============================================================================

/// Reference directory that can be told to fail every lookup
pub struct SwitchableProvider {
    inner: HospitalDirectory,
    failing: AtomicBool,
}

impl SwitchableProvider {
    pub fn new() -> Self {
        Self {
            inner: HospitalDirectory::new(),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), OptionError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(OptionError::unavailable("directory offline"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl OptionProvider for SwitchableProvider {
    async fn hospitals(&self) -> Result<Vec<String>, OptionError> {
        self.check()?;
        self.inner.hospitals().await
    }

    async fn specialties(&self, hospital: &str) -> Result<Vec<String>, OptionError> {
        self.check()?;
        self.inner.specialties(hospital).await
    }

    async fn doctors(&self, hospital: &str, specialty: &str) -> Result<Vec<String>, OptionError> {
        self.check()?;
        self.inner.doctors(hospital, specialty).await
    }

    async fn timeslots(
        &self,
        hospital: &str,
        specialty: &str,
        doctor: &str,
    ) -> Result<Vec<String>, OptionError> {
        self.check()?;
        self.inner.timeslots(hospital, specialty, doctor).await
    }
}

// ============================================================================
// Counting Store
// ============================================================================

/// In-memory store that counts saves
pub struct CountingStore {
    inner: InMemorySessionStore,
    saves: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Self {
        Self {
            inner: InMemorySessionStore::new(),
            saves: AtomicUsize::new(0),
        }
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionStore for CountingStore {
    async fn get(&self, session_id: &str) -> Result<Option<SessionState>, StoreError> {
        self.inner.get(session_id).await
    }

    async fn save(&self, session_id: &str, state: &SessionState) -> Result<(), StoreError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save(session_id, state).await
    }
}

// ============================================================================
// Unavailable Store
// ============================================================================

/// Store whose backend is down
pub struct UnavailableStore;

#[async_trait]
impl SessionStore for UnavailableStore {
    async fn get(&self, _session_id: &str) -> Result<Option<SessionState>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn save(&self, _session_id: &str, _state: &SessionState) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_switchable_provider_fails_on_demand() {
        let provider = SwitchableProvider::new();
        assert_eq!(provider.hospitals().await.unwrap().len(), 2);

        provider.set_failing(true);
        let err = provider.specialties("Central Hospital").await.unwrap_err();
        assert_eq!(err.message, "directory offline");
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_load() {
        let err = UnavailableStore.load("thread-1").await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
