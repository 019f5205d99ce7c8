//! JSON-RPC 2.0 error objects and the error codes this server emits.
//!
//! # Standard JSON-RPC Error Codes
//!
//! - `-32700`: Parse error
//! - `-32600`: Invalid Request
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error
//!
//! # Server Error Codes
//!
//! - `-32002`: Server not initialized (a tool request arrived before `initialize`)
//!
//! Tool failures are never reported with these codes; they travel as the
//! text of an ordinary `tools/call` result.
//!
//! ```
//! use mcp_server::protocol::JsonRpcError;
//!
//! let error = JsonRpcError::method_not_found();
//! assert_eq!(error.code, -32601);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Standard JSON-RPC 2.0 error codes
pub mod codes {
    /// Invalid JSON was received by the server
    pub const PARSE_ERROR: i32 = -32700;

    /// The JSON sent is not a valid Request object
    pub const INVALID_REQUEST: i32 = -32600;

    /// The method does not exist / is not available
    pub const METHOD_NOT_FOUND: i32 = -32601;

    /// Invalid method parameter(s)
    pub const INVALID_PARAMS: i32 = -32602;

    /// Internal JSON-RPC error
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// Server-defined error codes (reserved range -32000 to -32099)
pub mod mcp_codes {
    /// A request other than `initialize` or `ping` arrived before the handshake
    pub const SERVER_NOT_INITIALIZED: i32 = -32002;
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcError {
    /// Error code
    pub code: i32,

    /// Short description of the error
    pub message: String,

    /// Additional information about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    /// Creates an error with an arbitrary code.
    pub fn new(code: i32, message: String, data: Option<Value>) -> Self {
        Self {
            code,
            message,
            data,
        }
    }

    /// Invalid JSON was received.
    pub fn parse_error(details: Option<String>) -> Self {
        Self::new(
            codes::PARSE_ERROR,
            "Parse error".to_string(),
            details.map(Value::String),
        )
    }

    /// The request object was not acceptable in the current session state.
    pub fn invalid_request(details: Option<String>) -> Self {
        Self::new(
            codes::INVALID_REQUEST,
            "Invalid Request".to_string(),
            details.map(Value::String),
        )
    }

    /// The method is not served.
    pub fn method_not_found() -> Self {
        Self::new(codes::METHOD_NOT_FOUND, "Method not found".to_string(), None)
    }

    /// The method parameters could not be decoded.
    pub fn invalid_params(details: &str) -> Self {
        Self::new(
            codes::INVALID_PARAMS,
            "Invalid params".to_string(),
            Some(Value::String(details.to_string())),
        )
    }

    /// Something broke inside the server.
    pub fn internal_error(details: Option<String>) -> Self {
        Self::new(
            codes::INTERNAL_ERROR,
            "Internal error".to_string(),
            details.map(Value::String),
        )
    }

    /// A session-scoped request arrived before `initialize`.
    pub fn server_not_initialized() -> Self {
        Self::new(
            mcp_codes::SERVER_NOT_INITIALIZED,
            "Server not initialized".to_string(),
            None,
        )
    }
}

impl std::fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JSON-RPC Error {}: {}", self.code, self.message)?;
        if let Some(data) = &self.data {
            write!(f, " (data: {data})")?;
        }
        Ok(())
    }
}

impl std::error::Error for JsonRpcError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_codes_constants() {
        assert_eq!(codes::PARSE_ERROR, -32700);
        assert_eq!(codes::INVALID_REQUEST, -32600);
        assert_eq!(codes::METHOD_NOT_FOUND, -32601);
        assert_eq!(codes::INVALID_PARAMS, -32602);
        assert_eq!(codes::INTERNAL_ERROR, -32603);
        assert_eq!(mcp_codes::SERVER_NOT_INITIALIZED, -32002);
    }

    #[test]
    fn test_parse_error_data() {
        let error = JsonRpcError::parse_error(None);
        assert_eq!(error.message, "Parse error");
        assert_eq!(error.data, None);

        let error = JsonRpcError::parse_error(Some("Invalid JSON".to_string()));
        assert_eq!(error.data, Some(json!("Invalid JSON")));
    }

    #[test]
    fn test_invalid_params_carries_details() {
        let error = JsonRpcError::invalid_params("missing name");
        assert_eq!(error.code, codes::INVALID_PARAMS);
        assert_eq!(error.data, Some(json!("missing name")));
    }

    #[test]
    fn test_serialization_skips_empty_data() {
        let value = serde_json::to_value(JsonRpcError::method_not_found()).unwrap();
        assert_eq!(value, json!({"code": -32601, "message": "Method not found"}));
    }

    #[test]
    fn test_display() {
        let error = JsonRpcError::internal_error(Some("db".to_string()));
        assert_eq!(error.to_string(), "JSON-RPC Error -32603: Internal error (data: \"db\")");
    }
}
