//! Decoding of inbound frames.

use serde_json::Value;

use crate::protocol::{JsonRpcRequest, JsonRpcResponse};

/// One inbound frame as read off the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// A request or notification.
    Request(JsonRpcRequest),
    /// A frame that is not a JSON-RPC request, with the error reply it earns.
    Rejected(JsonRpcResponse),
}

impl Frame {
    /// Decodes the text of one frame.
    ///
    /// Text that is not JSON earns a parse error (`-32700`, null id). JSON
    /// that is not a request earns an invalid-request error (`-32600`)
    /// carrying the frame's id when it had a usable one.
    ///
    /// ```
    /// use mcp_server::transport::Frame;
    /// use serde_json::json;
    ///
    /// let Frame::Rejected(reply) = Frame::parse(r#"{"jsonrpc":"2.0","id":7,"method":5}"#) else {
    ///     panic!("expected a rejection");
    /// };
    /// assert_eq!(reply.id, Some(json!(7)));
    /// assert_eq!(reply.error.unwrap().code, -32600);
    /// ```
    pub fn parse(text: &str) -> Self {
        let value: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => return Self::Rejected(JsonRpcResponse::parse_error(Some(e.to_string()))),
        };

        // JSON-RPC ids are strings or numbers; null marks a notification.
        let raw_id = value.get("id");
        let id_valid = raw_id.is_none_or(|id| id.is_null() || id.is_string() || id.is_number());
        let id = raw_id
            .filter(|id| id.is_string() || id.is_number())
            .cloned();

        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) if request.jsonrpc != "2.0" => Self::Rejected(JsonRpcResponse::invalid_request(
                id,
                Some(format!("unsupported jsonrpc version '{}'", request.jsonrpc)),
            )),
            Ok(_) if !id_valid => Self::Rejected(JsonRpcResponse::invalid_request(
                None,
                Some("id must be a string or a number".to_string()),
            )),
            Ok(request) => Self::Request(request),
            Err(e) => Self::Rejected(JsonRpcResponse::invalid_request(id, Some(e.to_string()))),
        }
    }

    /// The request, if this frame carried one.
    pub fn into_request(self) -> Option<JsonRpcRequest> {
        match self {
            Self::Request(request) => Some(request),
            Self::Rejected(_) => None,
        }
    }
}

impl From<JsonRpcRequest> for Frame {
    fn from(request: JsonRpcRequest) -> Self {
        Self::Request(request)
    }
}
