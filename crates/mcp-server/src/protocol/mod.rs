//! MCP Protocol Module
//!
//! JSON-RPC 2.0 framing plus the subset of Model Context Protocol messages a
//! tool server needs: the lifecycle handshake, `ping`, `tools/list` and
//! `tools/call`.
//!
//! # Module Structure
//!
//! - [`request`]: JSON-RPC 2.0 request type
//! - [`response`]: JSON-RPC 2.0 response type with helper constructors
//! - [`error`]: JSON-RPC error object and error codes
//! - [`capabilities`]: Server and client capabilities
//! - [`types`]: MCP message payloads
//!
//! # Examples
//!
//! ```
//! use mcp_server::protocol::{negotiate_version, LATEST_PROTOCOL_VERSION};
//!
//! assert_eq!(negotiate_version("2024-11-05"), "2024-11-05");
//! assert_eq!(negotiate_version("1999-01-01"), LATEST_PROTOCOL_VERSION);
//! ```

pub mod capabilities;
pub mod error;
pub mod request;
pub mod response;
pub mod types;

pub use capabilities::{ClientCapabilities, ServerCapabilities, ToolsCapability};

pub use error::{codes, mcp_codes, JsonRpcError};

pub use request::JsonRpcRequest;

pub use response::JsonRpcResponse;

pub use types::{
    CallToolParams, CallToolResult, ClientInfo, InitializeParams, InitializeResult,
    ListToolsResult, ServerInfo, ToolContent, ToolDefinition,
};

/// Protocol revision answered when the client asks for an unknown one.
pub const LATEST_PROTOCOL_VERSION: &str = "2025-03-26";

/// Protocol revisions this server can speak, oldest first.
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2024-11-05", "2025-03-26", "2025-06-18"];

/// Method names handled by the server.
pub mod methods {
    /// Lifecycle handshake request
    pub const INITIALIZE: &str = "initialize";
    /// Handshake completion notification
    pub const INITIALIZED: &str = "notifications/initialized";
    /// Liveness check
    pub const PING: &str = "ping";
    /// Tool enumeration
    pub const TOOLS_LIST: &str = "tools/list";
    /// Tool invocation
    pub const TOOLS_CALL: &str = "tools/call";
}

/// Echoes the requested revision when supported, otherwise the latest one.
pub fn negotiate_version(requested: &str) -> &'static str {
    SUPPORTED_PROTOCOL_VERSIONS
        .iter()
        .copied()
        .find(|supported| *supported == requested)
        .unwrap_or(LATEST_PROTOCOL_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_negotiate_supported_versions() {
        for version in SUPPORTED_PROTOCOL_VERSIONS {
            assert_eq!(negotiate_version(version), *version);
        }
    }

    #[test]
    fn test_negotiate_unknown_version_falls_back() {
        assert_eq!(negotiate_version(""), LATEST_PROTOCOL_VERSION);
        assert_eq!(negotiate_version("2030-01-01"), LATEST_PROTOCOL_VERSION);
    }

    #[test]
    fn test_full_tool_call_round() {
        let request: JsonRpcRequest = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 4,
            "method": methods::TOOLS_CALL,
            "params": {"name": "echo", "arguments": {"message": "hi"}}
        }))
        .unwrap();

        let params: CallToolParams =
            serde_json::from_value(request.params.clone().unwrap()).unwrap();
        assert_eq!(params.name, "echo");

        let result = CallToolResult {
            content: vec![ToolContent::text("hi")],
            is_error: None,
        };
        let response = JsonRpcResponse::from_serializable(request.id, &result);

        assert_eq!(response.id, Some(json!(4)));
        assert_eq!(response.result.unwrap()["content"][0]["text"], "hi");
    }
}
