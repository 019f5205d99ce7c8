//! Capability negotiation types.
//!
//! The server only advertises the tools capability; client capabilities are
//! accepted and kept opaque.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Capabilities announced in the `initialize` result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ServerCapabilities {
    /// Present when the server serves `tools/list` and `tools/call`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapability>,
}

impl ServerCapabilities {
    /// Capabilities of a server with a fixed tool catalog.
    pub fn static_tools() -> Self {
        Self {
            tools: Some(ToolsCapability {
                list_changed: Some(false),
            }),
        }
    }
}

/// Tools capability.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolsCapability {
    /// Whether the server emits `notifications/tools/list_changed`.
    #[serde(rename = "listChanged", skip_serializing_if = "Option::is_none")]
    pub list_changed: Option<bool>,
}

/// Capabilities sent by the client. Unknown members are retained verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ClientCapabilities {
    /// Every capability object the client announced.
    #[serde(flatten)]
    pub entries: Map<String, Value>,
}

impl ClientCapabilities {
    /// Returns true if the client announced `name`.
    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}
