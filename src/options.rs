//! Option providers
//!
//! An option provider answers "which choices are valid for the next slot,
//! given what has been chosen so far". The dialog core only ever queries it.

mod directory;
mod error;

pub use directory::HospitalDirectory;
pub use error::{OptionError, OptionErrorKind};

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// Lookups for the four dependent appointment choices
///
/// Every lookup returns an ordered list, possibly empty. Implementations must
/// be deterministic for identical inputs.
#[async_trait]
pub trait OptionProvider: Send + Sync {
    async fn hospitals(&self) -> Result<Vec<String>, OptionError>;

    async fn specialties(&self, hospital: &str) -> Result<Vec<String>, OptionError>;

    async fn doctors(&self, hospital: &str, specialty: &str) -> Result<Vec<String>, OptionError>;

    async fn timeslots(
        &self,
        hospital: &str,
        specialty: &str,
        doctor: &str,
    ) -> Result<Vec<String>, OptionError>;
}

#[async_trait]
impl<T: OptionProvider + ?Sized> OptionProvider for Arc<T> {
    async fn hospitals(&self) -> Result<Vec<String>, OptionError> {
        (**self).hospitals().await
    }

    async fn specialties(&self, hospital: &str) -> Result<Vec<String>, OptionError> {
        (**self).specialties(hospital).await
    }

    async fn doctors(&self, hospital: &str, specialty: &str) -> Result<Vec<String>, OptionError> {
        (**self).doctors(hospital, specialty).await
    }

    async fn timeslots(
        &self,
        hospital: &str,
        specialty: &str,
        doctor: &str,
    ) -> Result<Vec<String>, OptionError> {
        (**self).timeslots(hospital, specialty, doctor).await
    }
}

/// Logging wrapper for option providers
pub struct LoggingProvider {
    inner: Arc<dyn OptionProvider>,
}

impl LoggingProvider {
    pub fn new(inner: Arc<dyn OptionProvider>) -> Self {
        Self { inner }
    }

    fn record(
        lookup: &'static str,
        start: Instant,
        result: &Result<Vec<String>, OptionError>,
    ) {
        let duration = start.elapsed();
        match result {
            Ok(options) => {
                tracing::debug!(
                    lookup,
                    duration_ms = %duration.as_millis(),
                    count = options.len(),
                    "Option lookup completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    lookup,
                    duration_ms = %duration.as_millis(),
                    kind = ?e.kind,
                    error = %e.message,
                    "Option lookup failed"
                );
            }
        }
    }
}

#[async_trait]
impl OptionProvider for LoggingProvider {
    async fn hospitals(&self) -> Result<Vec<String>, OptionError> {
        let start = Instant::now();
        let result = self.inner.hospitals().await;
        Self::record("hospitals", start, &result);
        result
    }

    async fn specialties(&self, hospital: &str) -> Result<Vec<String>, OptionError> {
        let start = Instant::now();
        let result = self.inner.specialties(hospital).await;
        Self::record("specialties", start, &result);
        result
    }

    async fn doctors(&self, hospital: &str, specialty: &str) -> Result<Vec<String>, OptionError> {
        let start = Instant::now();
        let result = self.inner.doctors(hospital, specialty).await;
        Self::record("doctors", start, &result);
        result
    }

    async fn timeslots(
        &self,
        hospital: &str,
        specialty: &str,
        doctor: &str,
    ) -> Result<Vec<String>, OptionError> {
        let start = Instant::now();
        let result = self.inner.timeslots(hospital, specialty, doctor).await;
        Self::record("timeslots", start, &result);
        result
    }
}
