//! Reverie player: error types.

use reverie_core::error::DomainError;
use thiserror::Error;

/// Startup and runtime errors for the player.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The narrative rejected a manifest or command.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Terminal or stdin I/O failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The audio output device could not be opened.
    #[error("audio device error: {0}")]
    Audio(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_is_transparent() {
        let err = AppError::from(DomainError::Configuration("bad edge".into()));

        assert_eq!(err.to_string(), DomainError::Configuration("bad edge".into()).to_string());
    }

    #[test]
    fn test_config_error_message() {
        let err = AppError::Config("REVERIE_CONTROL_RATE_HZ must be 1..=1000".into());

        assert_eq!(
            err.to_string(),
            "configuration error: REVERIE_CONTROL_RATE_HZ must be 1..=1000"
        );
    }
}
