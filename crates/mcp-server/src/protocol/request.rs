//! JSON-RPC 2.0 request type.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A JSON-RPC 2.0 request, or a notification when `id` is absent.
///
/// ```
/// use mcp_server::protocol::JsonRpcRequest;
/// use serde_json::json;
///
/// let request = JsonRpcRequest::new(Some(json!(1)), "tools/list", None);
/// assert!(!request.is_notification());
///
/// let notification = JsonRpcRequest::notification("notifications/initialized", None);
/// assert!(notification.is_notification());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcRequest {
    /// JSON-RPC protocol version (must be "2.0")
    pub jsonrpc: String,

    /// Request identifier (if None, this is a notification)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    /// Method name to invoke
    pub method: String,

    /// Method parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Creates a request.
    pub fn new(id: Option<Value>, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            method: method.into(),
            params,
        }
    }

    /// Creates a notification, a request that expects no response.
    pub fn notification(method: impl Into<String>, params: Option<Value>) -> Self {
        Self::new(None, method, params)
    }

    /// Returns true when the request carries no id.
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}
