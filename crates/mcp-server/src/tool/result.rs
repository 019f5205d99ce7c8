//! Tool result types.

use serde::Serialize;

use crate::error::ToolError;
use crate::protocol::{CallToolResult, ToolContent};

/// Successful output of a tool: an ordered sequence of text blocks.
///
/// ```
/// use mcp_server::tool::ToolResult;
/// use serde_json::json;
///
/// let result = ToolResult::json(&json!({"bucket": "桶"})).unwrap();
/// assert_eq!(result.first_text(), Some("{\n  \"bucket\": \"桶\"\n}"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResult {
    content: Vec<ToolContent>,
}

impl ToolResult {
    /// Result made of the given blocks.
    pub fn new(content: Vec<ToolContent>) -> Self {
        Self { content }
    }

    /// Single text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(vec![ToolContent::text(text)])
    }

    /// Single text block holding `value` as pretty-printed JSON.
    ///
    /// Field order follows the value's declaration order and non-ASCII
    /// characters are written literally.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, ToolError> {
        let text = serde_json::to_string_pretty(value)
            .map_err(|e| ToolError::Internal(anyhow::Error::new(e).context("serializing tool output")))?;
        Ok(Self::text(text))
    }

    /// Content blocks.
    pub fn content(&self) -> &[ToolContent] {
        &self.content
    }

    /// Text of the first block.
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(ToolContent::as_text)
    }

    /// Wire form of the result. The error flag is never set.
    pub fn into_call_result(self) -> CallToolResult {
        CallToolResult {
            content: self.content,
            is_error: None,
        }
    }
}

impl From<ToolResult> for CallToolResult {
    fn from(result: ToolResult) -> Self {
        result.into_call_result()
    }
}
