//! Error types for medley operations.
//!
//! Every failure is returned as a value from the call that detected it.
//! Nothing here is fatal: a ring, hash or locator stays usable after any
//! individual failed call.

use thiserror::Error;

/// Result type for medley operations.
pub type Result<T> = std::result::Result<T, MedleyError>;

/// Errors that can occur while configuring or querying a locator.
#[derive(Debug, Error)]
pub enum MedleyError {
    /// A lookup ran against a ring, hash or locator with zero members.
    #[error("no services defined in this locator")]
    NoServices,

    /// Configuration referred to a hash algorithm nobody registered.
    #[error("unknown hash algorithm: {0:?}")]
    UnknownAlgorithm(String),

    /// The byte sink used to serialize a key or service failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MedleyError {
    /// Returns true if this error reports an empty ring or locator.
    pub fn is_no_services(&self) -> bool {
        matches!(self, MedleyError::NoServices)
    }

    pub fn unknown_algorithm(name: impl Into<String>) -> Self {
        MedleyError::UnknownAlgorithm(name.into())
    }
}
