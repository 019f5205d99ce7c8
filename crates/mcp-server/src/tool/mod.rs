//! Tool system for the MCP server.
//!
//! # Overview
//!
//! - [`ParameterSchema`] / [`ParameterSpec`]: declarative argument schemas
//! - [`ToolDescriptor`]: name, description and schema of a tool
//! - [`Tool`]: the trait every tool implements
//! - [`ToolRegistry`]: immutable, ordered tool catalog
//! - [`Dispatcher`]: validates, executes and normalizes tool calls
//! - [`ToolResult`] / [`ToolOutcome`]: what a call produced
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use mcp_server::prelude::*;
//! use serde_json::{json, Map, Value};
//!
//! struct GreetTool {
//!     descriptor: ToolDescriptor,
//! }
//!
//! #[async_trait]
//! impl Tool for GreetTool {
//!     fn descriptor(&self) -> &ToolDescriptor {
//!         &self.descriptor
//!     }
//!
//!     async fn execute(&self, arguments: Map<String, Value>) -> Result<ToolResult, ToolError> {
//!         let name = arguments["name"].as_str().unwrap_or_default();
//!         Ok(ToolResult::text(format!("hello, {name}")))
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let tool = GreetTool {
//!     descriptor: ToolDescriptor::new(
//!         "greet",
//!         "Greets someone",
//!         ParameterSchema::new(vec![ParameterSpec::string("name").default_value("world")]),
//!     ),
//! };
//!
//! let registry = ToolRegistry::builder().tool(tool).build().unwrap();
//! let dispatcher = Dispatcher::new(Arc::new(registry));
//!
//! let result = dispatcher.call("greet", Map::new()).await;
//! assert_eq!(result.first_text(), Some("hello, world"));
//! # });
//! ```

mod descriptor;
mod dispatcher;
mod outcome;
mod registry;
mod result;
mod schema;
mod traits;

pub use descriptor::ToolDescriptor;
pub use dispatcher::Dispatcher;
pub use outcome::{FailureKind, ToolFailure, ToolOutcome};
pub use registry::{ToolRegistry, ToolRegistryBuilder};
pub use result::ToolResult;
pub use schema::{ParamType, ParameterSchema, ParameterSpec};
pub use traits::{typed_arguments, Tool};

pub use crate::protocol::ToolContent;
