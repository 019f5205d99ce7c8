//! # TOS MCP
//!
//! Model Context Protocol server exposing TOS object storage as tools:
//! bucket and object management, presigned URLs, and image/video processing.
//!
//! ```text
//! MCP client ──stdio──> McpServer ──> Dispatcher ──> tools::* ──> StorageClient
//!                                                                   ├─ TosClient (aws-sdk-s3)
//!                                                                   └─ MemoryStorage
//! ```
//!
//! ## Serving over stdio
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use mcp_server::transport::StreamTransport;
//! use tos_mcp::config::TosConfig;
//! use tos_mcp::storage::TosClient;
//! use tos_mcp::tools::build_server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = TosConfig::from_env()?;
//!     let server = build_server(Arc::new(TosClient::new(&config)))?;
//!     server.serve(StreamTransport::stdio()).await?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod storage;
pub mod tools;

pub use crate::config::{ConfigError, TosConfig};
pub use storage::{MemoryStorage, StorageClient, StorageError, TosClient};
pub use tools::{SERVER_NAME, build_server, default_tools};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
