//! Error types for the MCP server framework.
//!
//! # Error Hierarchy
//!
//! ```text
//! McpError (top-level)
//! ├── Transport(TransportError)
//! ├── Registry(RegistryError)
//! └── Config(String)
//! ```
//!
//! `ToolError` stays inside a `tools/call`: the dispatcher renders it into
//! the result text and never turns it into a JSON-RPC error. `SchemaError`
//! is produced by argument validation and is folded into
//! [`ToolError::InvalidArguments`] before it reaches the dispatcher.
//!
//! # Examples
//!
//! ```rust
//! use mcp_server::error::{McpError, RegistryError};
//!
//! fn may_fail() -> Result<(), McpError> {
//!     Err(RegistryError::DuplicateTool("echo".to_string()).into())
//! }
//!
//! assert!(may_fail().is_err());
//! ```

use thiserror::Error;

/// Result type alias for MCP operations.
pub type Result<T> = std::result::Result<T, McpError>;

/// Top-level error type for the MCP server framework.
#[derive(Debug, Error)]
pub enum McpError {
    /// Transport-layer error (I/O, connection issues).
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Tool registration error.
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Server configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors raised by a tool while handling one invocation.
///
/// The dispatcher never lets these escape: each one is rendered into the
/// text payload of an ordinary `tools/call` result.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The arguments did not satisfy the tool's parameter schema or could
    /// not be deserialized into its parameter struct.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The tool ran and its backend reported a failure.
    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),

    /// Unexpected internal error.
    #[error("Internal tool error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ToolError {
    /// Creates an [`ToolError::ExecutionFailed`] from anything printable.
    pub fn execution(message: impl std::fmt::Display) -> Self {
        Self::ExecutionFailed(message.to_string())
    }

    /// The bare failure detail, without the variant prefix used by `Display`.
    ///
    /// ```rust
    /// use mcp_server::error::ToolError;
    ///
    /// let error = ToolError::execution("NoSuchBucket: bucket missing");
    /// assert_eq!(error.detail(), "NoSuchBucket: bucket missing");
    /// ```
    pub fn detail(&self) -> String {
        match self {
            Self::InvalidArguments(detail) | Self::ExecutionFailed(detail) => detail.clone(),
            Self::Internal(err) => format!("{err:#}"),
        }
    }
}

impl From<SchemaError> for ToolError {
    fn from(err: SchemaError) -> Self {
        Self::InvalidArguments(err.to_string())
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidArguments(err.to_string())
    }
}

/// Violations found while validating raw arguments against a
/// [`ParameterSchema`](crate::tool::ParameterSchema).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A required parameter was absent or `null`.
    #[error("missing required parameter '{0}'")]
    MissingRequired(String),

    /// A parameter had the wrong JSON type.
    #[error("parameter '{name}' must be {expected}, got {actual}")]
    TypeMismatch {
        /// Parameter name.
        name: String,
        /// Expected JSON Schema type.
        expected: &'static str,
        /// Description of the value that was supplied.
        actual: String,
    },

    /// A parameter's value is outside its enumeration.
    #[error("unsupported value '{value}' for parameter '{name}' (allowed: {allowed})")]
    NotAllowed {
        /// Parameter name.
        name: String,
        /// The rejected value.
        value: String,
        /// Comma-separated allowed values.
        allowed: String,
    },
}

/// Transport-specific errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// I/O error while reading or writing frames.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The transport was closed.
    #[error("Transport closed")]
    Closed,

    /// A message could not be serialized or deserialized.
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    /// The selected transport mode exists by name only.
    #[error("transport {0} not implemented")]
    NotImplemented(String),
}

/// Errors raised while building a [`ToolRegistry`](crate::tool::ToolRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two tools share a name.
    #[error("Tool already registered: {0}")]
    DuplicateTool(String),
}
