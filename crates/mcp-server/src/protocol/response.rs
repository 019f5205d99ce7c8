//! JSON-RPC 2.0 response type.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::JsonRpcError;

/// A JSON-RPC 2.0 response carrying either `result` or `error`.
///
/// ```
/// use mcp_server::protocol::JsonRpcResponse;
/// use serde_json::json;
///
/// let response = JsonRpcResponse::success(Some(json!(1)), json!({}));
/// assert!(response.is_success());
///
/// let response = JsonRpcResponse::method_not_found(Some(json!(2)));
/// assert!(response.is_error());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcResponse {
    /// JSON-RPC protocol version, always "2.0"
    pub jsonrpc: String,

    /// Id of the request this answers; null when the request id was unreadable
    pub id: Option<Value>,

    /// Result on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    /// Error on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Successful response.
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Error response.
    pub fn error(id: Option<Value>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Serializes `result` into a success response, or an internal error if
    /// serialization fails.
    pub fn from_serializable<T: Serialize>(id: Option<Value>, result: &T) -> Self {
        match serde_json::to_value(result) {
            Ok(value) => Self::success(id, value),
            Err(e) => Self::internal_error(id, Some(format!("Failed to serialize result: {e}"))),
        }
    }

    /// Method not found.
    pub fn method_not_found(id: Option<Value>) -> Self {
        Self::error(id, JsonRpcError::method_not_found())
    }

    /// Invalid params.
    pub fn invalid_params(id: Option<Value>, details: &str) -> Self {
        Self::error(id, JsonRpcError::invalid_params(details))
    }

    /// Invalid request.
    pub fn invalid_request(id: Option<Value>, details: Option<String>) -> Self {
        Self::error(id, JsonRpcError::invalid_request(details))
    }

    /// Internal error.
    pub fn internal_error(id: Option<Value>, details: Option<String>) -> Self {
        Self::error(id, JsonRpcError::internal_error(details))
    }

    /// Parse error; the id of an unparseable request is unknown.
    pub fn parse_error(details: Option<String>) -> Self {
        Self::error(None, JsonRpcError::parse_error(details))
    }

    /// Server not initialized.
    pub fn server_not_initialized(id: Option<Value>) -> Self {
        Self::error(id, JsonRpcError::server_not_initialized())
    }

    /// Returns true for a response carrying a result.
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.result.is_some()
    }

    /// Returns true for a response carrying an error.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{codes, mcp_codes};
    use serde_json::json;

    #[test]
    fn test_success_response() {
        let response = JsonRpcResponse::success(Some(json!(1)), json!({"message": "Success"}));

        assert_eq!(response.jsonrpc, "2.0");
        assert_eq!(response.result, Some(json!({"message": "Success"})));
        assert!(response.is_success());
        assert!(!response.is_error());
    }

    #[test]
    fn test_error_constructors() {
        let cases = [
            (JsonRpcResponse::method_not_found(Some(json!(1))), codes::METHOD_NOT_FOUND),
            (JsonRpcResponse::invalid_params(Some(json!(1)), "x"), codes::INVALID_PARAMS),
            (JsonRpcResponse::invalid_request(Some(json!(1)), None), codes::INVALID_REQUEST),
            (JsonRpcResponse::internal_error(Some(json!(1)), None), codes::INTERNAL_ERROR),
            (JsonRpcResponse::parse_error(None), codes::PARSE_ERROR),
            (
                JsonRpcResponse::server_not_initialized(Some(json!(1))),
                mcp_codes::SERVER_NOT_INITIALIZED,
            ),
        ];

        for (response, code) in cases {
            assert!(response.is_error());
            assert_eq!(response.error.as_ref().map(|e| e.code), Some(code));
        }
    }

    #[test]
    fn test_parse_error_has_null_id() {
        let response = JsonRpcResponse::parse_error(Some("bad".to_string()));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["id"], Value::Null);
    }

    #[test]
    fn test_from_serializable() {
        #[derive(Serialize)]
        struct Payload {
            ok: bool,
        }

        let response = JsonRpcResponse::from_serializable(Some(json!(3)), &Payload { ok: true });
        assert_eq!(response.result, Some(json!({"ok": true})));
    }
}
