//! Tool trait definition.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::descriptor::ToolDescriptor;
use super::result::ToolResult;
use crate::error::ToolError;

/// A callable tool.
///
/// The dispatcher validates raw arguments against
/// [`descriptor().schema()`](ToolDescriptor::schema) before calling
/// [`execute`](Tool::execute), so required parameters are present, typed
/// and defaulted by the time a tool sees them.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use mcp_server::prelude::*;
/// use serde::Deserialize;
/// use serde_json::{Map, Value};
///
/// #[derive(Deserialize)]
/// struct EchoParams {
///     message: String,
/// }
///
/// struct EchoTool {
///     descriptor: ToolDescriptor,
/// }
///
/// impl EchoTool {
///     fn new() -> Self {
///         let schema = ParameterSchema::new(vec![ParameterSpec::string("message").required()]);
///         Self { descriptor: ToolDescriptor::new("echo", "Echo a message", schema) }
///     }
/// }
///
/// #[async_trait]
/// impl Tool for EchoTool {
///     fn descriptor(&self) -> &ToolDescriptor {
///         &self.descriptor
///     }
///
///     async fn execute(&self, arguments: Map<String, Value>) -> Result<ToolResult, ToolError> {
///         let params: EchoParams = typed_arguments(arguments)?;
///         Ok(ToolResult::text(params.message))
///     }
/// }
/// ```
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name, description and parameter schema.
    fn descriptor(&self) -> &ToolDescriptor;

    /// Prefix of every failure message this tool reports.
    fn failure_message(&self) -> &str {
        "tool call failed"
    }

    /// Runs the tool with validated arguments.
    async fn execute(&self, arguments: Map<String, Value>) -> Result<ToolResult, ToolError>;
}

/// Deserializes validated arguments into a tool's parameter struct.
pub fn typed_arguments<T: DeserializeOwned>(arguments: Map<String, Value>) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(arguments)).map_err(ToolError::from)
}
