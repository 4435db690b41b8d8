//! Portal error types

use thiserror::Error;

/// Errors raised by the configuration and loading layers
///
/// The ability compiler and the comment tree builder are total and never
/// produce these.
#[derive(Error, Debug)]
pub enum PortalError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Action name that does not match any known action
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// Subject name that does not match any known subject
    #[error("Unknown subject: {0}")]
    UnknownSubject(String),
}

impl PortalError {
    /// Create an invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        PortalError::InvalidConfig(msg.into())
    }
}

/// Result type alias for portal operations
pub type PortalResult<T> = Result<T, PortalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PortalError::UnknownAction("publish".into());
        assert_eq!(err.to_string(), "Unknown action: publish");

        let err = PortalError::invalid_config("max_depth must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: max_depth must be positive"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let portal_err: PortalError = io_err.into();
        assert!(matches!(portal_err, PortalError::Io(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let portal_err: PortalError = json_err.into();
        assert!(matches!(portal_err, PortalError::Serialization(_)));
    }
}
