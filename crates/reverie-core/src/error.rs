//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A transition was requested that the scene graph does not allow.
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition {
        /// The scene that was current when the request arrived.
        from: &'static str,
        /// The scene that was requested.
        to: &'static str,
    },

    /// The narrative data is inconsistent (missing track, broken graph, ...).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A media asset could not be loaded.
    #[error("asset error: {0}")]
    Asset(String),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),
}
