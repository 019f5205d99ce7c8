//! Convenient re-exports for common use cases.
//!
//! ```rust
//! use mcp_server::prelude::*;
//! ```

// Core types
pub use crate::error::{McpError, RegistryError, SchemaError, ToolError, TransportError};
pub use crate::protocol::{
    CallToolParams, CallToolResult, ClientInfo, InitializeParams, InitializeResult,
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, ServerCapabilities, ServerInfo, ToolContent,
    ToolDefinition,
};

// Tool system
pub use crate::tool::{
    typed_arguments, Dispatcher, FailureKind, ParamType, ParameterSchema, ParameterSpec, Tool,
    ToolDescriptor, ToolFailure, ToolOutcome, ToolRegistry, ToolResult,
};

// Transport
pub use crate::transport::{
    Frame, MockTransport, StdioTransport, StreamTransport, Transport, TransportMode,
};

// Server
pub use crate::server::{McpServer, ServerBuilder, ServerConfig, Session, SessionState};

// External re-exports for convenience
pub use async_trait::async_trait;
