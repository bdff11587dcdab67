//! Error types for the application.

use thiserror::Error;
use tokio_util::codec::LinesCodecError;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Relay error: {0}")]
    Relay(#[from] RelayError),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {message}")]
    ParseError { message: String },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

/// An element was asked for a variant it does not hold.
///
/// This is a bug in whatever built the string, never a problem with user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid element access: expected {expected}, found {found}")]
pub struct AccessError {
    pub expected: &'static str,
    pub found: &'static str,
}

impl AccessError {
    pub fn new(expected: &'static str, found: &'static str) -> Self {
        Self { expected, found }
    }
}

/// Errors while reading or writing relayed lines.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Line codec error: {0}")]
    Codec(#[from] LinesCodecError),
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for configuration loading.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for element access.
pub type AccessResult<T> = std::result::Result<T, AccessError>;

/// Result type alias for relay I/O.
pub type RelayResult<T> = std::result::Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_error_message() {
        let err = AccessError::new("Color", "Ascii");
        assert_eq!(
            err.to_string(),
            "Invalid element access: expected Color, found Ascii"
        );
    }

    #[test]
    fn test_app_error_from_config() {
        let err: AppError = ConfigError::ValidationError {
            message: "relay.outputs is empty".to_string(),
        }
        .into();
        assert!(err.to_string().contains("relay.outputs is empty"));
    }
}
