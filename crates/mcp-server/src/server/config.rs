//! Server configuration.

use crate::protocol::LATEST_PROTOCOL_VERSION;

/// Identity and protocol settings of a server.
///
/// ```
/// use mcp_server::server::ServerConfig;
///
/// let config = ServerConfig::new("tos-mcp", "0.1.0").with_instructions("Object storage tools");
/// assert_eq!(config.name(), "tos-mcp");
/// assert_eq!(config.protocol_version(), "2025-03-26");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub(crate) name: String,
    pub(crate) version: String,
    pub(crate) protocol_version: String,
    pub(crate) instructions: Option<String>,
}

impl ServerConfig {
    /// Config with the latest protocol revision and no instructions.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            protocol_version: LATEST_PROTOCOL_VERSION.to_string(),
            instructions: None,
        }
    }

    /// Sets the protocol revision answered to clients asking for an
    /// unsupported one.
    pub fn with_protocol_version(mut self, protocol_version: impl Into<String>) -> Self {
        self.protocol_version = protocol_version.into();
        self
    }

    /// Sets the usage hints returned by `initialize`.
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Server name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Server version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Fallback protocol revision.
    pub fn protocol_version(&self) -> &str {
        &self.protocol_version
    }

    /// Usage hints.
    pub fn instructions(&self) -> Option<&str> {
        self.instructions.as_deref()
    }
}
