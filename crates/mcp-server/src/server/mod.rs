//! MCP Server Implementation
//!
//! - **[`McpServer`]**: handles lifecycle and tool requests, serves sessions
//! - **[`ServerBuilder`]**: fluent construction
//! - **[`ServerConfig`]**: name, version, protocol revision, instructions
//! - **[`Session`]** / **[`SessionState`]**: per-connection lifecycle
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │  McpServer::serve(transport)        │
//! │   one Session, one request at a time│
//! ├─────────────────────────────────────┤
//! │  McpServer::handle_request()        │
//! │   initialize / ping / tools/*       │
//! ├─────────────────────────────────────┤
//! │  Dispatcher                         │
//! │   validate → execute → ToolOutcome  │
//! ├─────────────────────────────────────┤
//! │  ToolRegistry (immutable)           │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use mcp_server::server::McpServer;
//! use mcp_server::transport::StreamTransport;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = McpServer::builder().name("demo").version("0.1.0").build()?;
//!     server.serve(StreamTransport::stdio()).await?;
//!     Ok(())
//! }
//! ```

mod builder;
mod config;
mod core;
mod session;

pub use builder::ServerBuilder;
pub use config::ServerConfig;
pub use core::{response_text, McpServer};
pub use session::{Session, SessionState};
