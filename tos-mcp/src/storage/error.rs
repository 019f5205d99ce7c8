//! Error types for the storage layer.

use thiserror::Error;

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Failure reported by a storage backend.
///
/// Every backend fault collapses into one of these variants, each carrying a
/// human-readable message. Tool handlers render it verbatim after their
/// failure prefix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The service answered with an error code
    #[error("{code}: {message}")]
    Service { code: String, message: String },

    /// Bucket or object does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// The request was rejected before reaching the service
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Network, signing or body streaming failure
    #[error("transport error: {0}")]
    Transport(String),
}

impl StorageError {
    /// Service error from a code and message.
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Service {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Whether the error means the resource is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Parse failure for an HTTP method outside GET, PUT, POST and DELETE.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported HTTP method: {0}")]
pub struct UnsupportedMethod(pub String);

/// Parse failure for an unknown canned ACL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported ACL: {0}")]
pub struct UnsupportedAcl(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            StorageError::service("BucketAlreadyExists", "bucket taken").to_string(),
            "BucketAlreadyExists: bucket taken"
        );
        assert_eq!(StorageError::NotFound("bucket demo".into()).to_string(), "not found: bucket demo");
        assert_eq!(UnsupportedMethod("PATCH".into()).to_string(), "unsupported HTTP method: PATCH");
    }

    #[test]
    fn test_is_not_found() {
        assert!(StorageError::NotFound("x".into()).is_not_found());
        assert!(!StorageError::Transport("x".into()).is_not_found());
    }
}
