//! Facade errors.
//!
//! Lookups that can legitimately find nothing return `Option` instead of an
//! error; only the conditions below are failures.

use pc4_store::StoreError;
use thiserror::Error;

/// Errors returned by sessions and the factory.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The store could not be opened: missing, incomplete or unreadable.
    #[error("Store unavailable at {path}: {source}")]
    UnavailableStore {
        /// The location that was opened.
        path: String,
        /// What went wrong while loading.
        #[source]
        source: StoreError,
    },

    /// The session was closed before the call.
    #[error("Session is closed")]
    SessionClosed,

    /// The search request cannot be run.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The configuration could not be read or is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for facade operations.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub(crate) fn unavailable(path: &std::path::Path, source: StoreError) -> Self {
        Self::UnavailableStore {
            path: path.display().to_string(),
            source,
        }
    }
}
