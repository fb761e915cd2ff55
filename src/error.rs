//! Error types for the cookie store.

use thiserror::Error;

/// Main error type for cookie operations.
///
/// Most failure modes in this crate degrade silently (mirror-only mode, raw
/// value fallback). Only configuration errors and the typed convenience
/// helpers surface an error to the consumer.
#[derive(Debug, Error)]
pub enum CookieError {
    #[error("No cookie store was provided to this context")]
    MissingStore,

    #[error("Invalid cookie name: {0:?}")]
    InvalidName(String),

    #[error("Invalid {attribute} attribute: {value:?}")]
    InvalidAttribute {
        attribute: &'static str,
        value: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Host cookie store is unavailable")]
    HostUnavailable,

    #[error("Host cookie store error: {0}")]
    Host(String),
}

impl From<serde_json::Error> for CookieError {
    fn from(e: serde_json::Error) -> Self {
        CookieError::Serialization(e.to_string())
    }
}

/// Result type for cookie operations.
pub type Result<T> = std::result::Result<T, CookieError>;
