//! # MCP Server
//!
//! A small framework for Model Context Protocol servers that expose a fixed
//! catalog of tools over newline-delimited JSON-RPC.
//!
//! Tools declare their arguments with a [`ParameterSchema`](tool::ParameterSchema).
//! The same schema renders the JSON Schema shown by `tools/list` and
//! validates every `tools/call` before the tool runs. The
//! [`Dispatcher`](tool::Dispatcher) never fails a call: unknown tools,
//! rejected arguments and backend errors all come back as a text block in an
//! ordinary result, and the session keeps going.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use mcp_server::prelude::*;
//! use serde_json::{Map, Value};
//!
//! struct PingTool(ToolDescriptor);
//!
//! #[async_trait]
//! impl Tool for PingTool {
//!     fn descriptor(&self) -> &ToolDescriptor {
//!         &self.0
//!     }
//!
//!     async fn execute(&self, _arguments: Map<String, Value>) -> Result<ToolResult, ToolError> {
//!         Ok(ToolResult::text("pong"))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), McpError> {
//!     let server = McpServer::builder()
//!         .name("ping-server")
//!         .version("0.1.0")
//!         .tool(PingTool(ToolDescriptor::new("ping", "Answers pong", ParameterSchema::empty())))
//!         .build()?;
//!
//!     server.serve(StreamTransport::stdio()).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod prelude;
pub mod protocol;
pub mod server;
pub mod tool;
pub mod transport;

pub use error::{McpError, Result, ToolError, TransportError};
pub use protocol::{JsonRpcRequest, JsonRpcResponse};
pub use server::{McpServer, ServerBuilder};
pub use tool::{Tool, ToolResult};
pub use transport::Transport;

/// Latest protocol revision this crate speaks.
pub const PROTOCOL_VERSION: &str = protocol::LATEST_PROTOCOL_VERSION;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
