//! Option provider error types

use thiserror::Error;

/// Failure to produce an option list
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct OptionError {
    pub kind: OptionErrorKind,
    pub message: String,
}

impl OptionError {
    pub fn new(kind: OptionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[allow(dead_code)] // Raised by networked providers and test doubles
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(OptionErrorKind::Unavailable, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(OptionErrorKind::Malformed, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(OptionErrorKind::Unknown, message)
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionErrorKind {
    /// Upstream could not be reached or refused to answer
    Unavailable,
    /// Upstream answered with data the dialog cannot use
    Malformed,
    /// Anything else, including lookups for slots the chain does not declare
    Unknown,
}
