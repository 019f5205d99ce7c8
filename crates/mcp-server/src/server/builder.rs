//! Fluent server builder.

use std::sync::Arc;

use super::{McpServer, ServerConfig};
use crate::error::{McpError, Result};
use crate::tool::{Tool, ToolRegistry};

/// Builder for [`McpServer`].
///
/// ```rust
/// use mcp_server::server::McpServer;
///
/// let server = McpServer::builder()
///     .name("tos-mcp")
///     .version("0.1.0")
///     .build()
///     .unwrap();
///
/// assert_eq!(server.config().name(), "tos-mcp");
/// ```
#[derive(Default)]
pub struct ServerBuilder {
    name: Option<String>,
    version: Option<String>,
    protocol_version: Option<String>,
    instructions: Option<String>,
    tools: Vec<Arc<dyn Tool>>,
}

impl std::fmt::Debug for ServerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerBuilder")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("protocol_version", &self.protocol_version)
            .field("tools", &format!("<{} tools>", self.tools.len()))
            .finish()
    }
}

impl ServerBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Server name (required).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Server version (required).
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Fallback protocol revision.
    pub fn protocol_version(mut self, protocol_version: impl Into<String>) -> Self {
        self.protocol_version = Some(protocol_version.into());
        self
    }

    /// Usage hints returned by `initialize`.
    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Registers a tool.
    pub fn tool<T: Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.push(Arc::new(tool));
        self
    }

    /// Registers several shared tools, keeping their order.
    pub fn tools<I>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Tool>>,
    {
        self.tools.extend(tools);
        self
    }

    /// Builds the server.
    ///
    /// Fails when the name or version is missing or two tools share a name.
    pub fn build(self) -> Result<McpServer> {
        let name = self
            .name
            .ok_or_else(|| McpError::Config("server name is required".to_string()))?;
        let version = self
            .version
            .ok_or_else(|| McpError::Config("server version is required".to_string()))?;

        let mut config = ServerConfig::new(name, version);
        if let Some(protocol_version) = self.protocol_version {
            config = config.with_protocol_version(protocol_version);
        }
        if let Some(instructions) = self.instructions {
            config = config.with_instructions(instructions);
        }

        let registry = ToolRegistry::builder().tools(self.tools).build()?;
        Ok(McpServer::new(config, registry))
    }
}
