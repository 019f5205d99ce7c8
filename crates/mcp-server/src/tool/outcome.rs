//! Dispatch outcomes.

use std::fmt;

use super::result::ToolResult;

/// Why a dispatch did not produce a tool result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// No tool is registered under the requested name.
    UnknownTool,
    /// The arguments failed schema validation or deserialization.
    InvalidArguments,
    /// The tool ran and failed.
    Execution,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UnknownTool => "unknown_tool",
            Self::InvalidArguments => "invalid_arguments",
            Self::Execution => "execution",
        })
    }
}

/// A failed dispatch with its client-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolFailure {
    /// Failure category
    pub kind: FailureKind,
    /// Message reported to the client
    pub message: String,
}

impl ToolFailure {
    /// Creates a failure.
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Result of dispatching one tool call.
///
/// Tests inspect the variant; the wire always receives a normal result
/// via [`ToolOutcome::into_result`].
///
/// ```
/// use mcp_server::tool::{FailureKind, ToolFailure, ToolOutcome};
///
/// let outcome = ToolOutcome::Failure(ToolFailure::new(FailureKind::UnknownTool, "unknown tool: x"));
/// assert!(outcome.is_failure());
/// assert_eq!(outcome.into_result().first_text(), Some("unknown tool: x"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    /// The tool produced a result.
    Success(ToolResult),
    /// The call failed before or during execution.
    Failure(ToolFailure),
}

impl ToolOutcome {
    /// Returns true for [`ToolOutcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns true for [`ToolOutcome::Failure`].
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// Failure category, if the call failed.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure.kind),
        }
    }

    /// Text of the first block of the rendered result.
    pub fn text(&self) -> &str {
        match self {
            Self::Success(result) => result.first_text().unwrap_or_default(),
            Self::Failure(failure) => &failure.message,
        }
    }

    /// Renders the outcome as a result; failures become one text block.
    pub fn into_result(self) -> ToolResult {
        match self {
            Self::Success(result) => result,
            Self::Failure(failure) => ToolResult::text(failure.message),
        }
    }
}
