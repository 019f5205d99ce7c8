//! Tool dispatcher.
//!
//! Resolves a tool name, validates the raw arguments against the tool's
//! schema, runs it and folds every possible outcome into a [`ToolOutcome`].
//! Nothing escapes: unknown tools, rejected arguments and backend failures
//! all end up as a text block in an ordinary result.

use std::sync::Arc;
use std::time::Instant;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::outcome::{FailureKind, ToolFailure, ToolOutcome};
use super::registry::ToolRegistry;
use super::result::ToolResult;
use crate::error::ToolError;

/// Routes tool calls to registered tools.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
}

impl Dispatcher {
    /// Creates a dispatcher over a registry.
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this dispatcher routes to.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Dispatches one call and reports how it went.
    ///
    /// Failure messages:
    ///
    /// - unknown tool: `unknown tool: <name>`
    /// - rejected arguments: `<failure_message>: invalid arguments: <detail>`
    /// - execution failure: `<failure_message>: <detail>`
    pub async fn dispatch(&self, name: &str, arguments: Map<String, Value>) -> ToolOutcome {
        let started = Instant::now();

        let Some(tool) = self.registry.get(name) else {
            warn!(tool = %name, "Unknown tool requested");
            return ToolOutcome::Failure(ToolFailure::new(
                FailureKind::UnknownTool,
                format!("unknown tool: {name}"),
            ));
        };

        let validated = match tool.descriptor().schema().validate(&arguments) {
            Ok(validated) => validated,
            Err(err) => {
                warn!(tool = %name, error = %err, "Rejected tool arguments");
                return ToolOutcome::Failure(ToolFailure::new(
                    FailureKind::InvalidArguments,
                    format!("{}: invalid arguments: {err}", tool.failure_message()),
                ));
            }
        };

        debug!(tool = %name, "Executing tool");

        let outcome = match tool.execute(validated).await {
            Ok(result) => ToolOutcome::Success(result),
            Err(ToolError::InvalidArguments(detail)) => ToolOutcome::Failure(ToolFailure::new(
                FailureKind::InvalidArguments,
                format!("{}: invalid arguments: {detail}", tool.failure_message()),
            )),
            Err(err) => ToolOutcome::Failure(ToolFailure::new(
                FailureKind::Execution,
                format!("{}: {}", tool.failure_message(), err.detail()),
            )),
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            ToolOutcome::Success(_) => info!(tool = %name, elapsed_ms, "Tool call succeeded"),
            ToolOutcome::Failure(failure) => warn!(
                tool = %name,
                elapsed_ms,
                kind = %failure.kind,
                message = %failure.message,
                "Tool call failed"
            ),
        }

        outcome
    }

    /// Dispatches one call and renders the outcome as a result.
    pub async fn call(&self, name: &str, arguments: Map<String, Value>) -> ToolResult {
        self.dispatch(name, arguments).await.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::{typed_arguments, ParameterSchema, ParameterSpec, Tool, ToolDescriptor};
    use async_trait::async_trait;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct DivideParams {
        dividend: i64,
        divisor: i64,
        #[serde(default)]
        label: Option<String>,
    }

    struct DivideTool {
        descriptor: ToolDescriptor,
    }

    impl DivideTool {
        fn new() -> Self {
            Self {
                descriptor: ToolDescriptor::new(
                    "divide",
                    "Integer division",
                    ParameterSchema::new(vec![
                        ParameterSpec::integer("dividend").required(),
                        ParameterSpec::integer("divisor").default_value(1),
                        ParameterSpec::string("label"),
                    ]),
                ),
            }
        }
    }

    #[async_trait]
    impl Tool for DivideTool {
        fn descriptor(&self) -> &ToolDescriptor {
            &self.descriptor
        }

        fn failure_message(&self) -> &str {
            "failed to divide"
        }

        async fn execute(&self, arguments: Map<String, Value>) -> Result<ToolResult, ToolError> {
            let params: DivideParams = typed_arguments(arguments)?;
            if params.divisor == 0 {
                return Err(ToolError::execution("division by zero"));
            }
            let quotient = params.dividend / params.divisor;
            Ok(match params.label {
                Some(label) => ToolResult::text(format!("{label}={quotient}")),
                None => ToolResult::text(quotient.to_string()),
            })
        }
    }

    fn dispatcher() -> Dispatcher {
        let registry = ToolRegistry::builder().tool(DivideTool::new()).build().unwrap();
        Dispatcher::new(Arc::new(registry))
    }

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn test_dispatch_success_applies_defaults() {
        let outcome = dispatcher().dispatch("divide", args(json!({"dividend": 9}))).await;
        assert!(outcome.is_success());
        assert_eq!(outcome.text(), "9");
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool() {
        let outcome = dispatcher().dispatch("multiply", Map::new()).await;
        assert_eq!(outcome.failure_kind(), Some(FailureKind::UnknownTool));
        assert_eq!(outcome.text(), "unknown tool: multiply");
    }

    #[tokio::test]
    async fn test_dispatch_missing_required_argument() {
        let outcome = dispatcher().dispatch("divide", Map::new()).await;
        assert_eq!(outcome.failure_kind(), Some(FailureKind::InvalidArguments));
        assert_eq!(
            outcome.text(),
            "failed to divide: invalid arguments: missing required parameter 'dividend'"
        );
    }

    #[tokio::test]
    async fn test_dispatch_type_mismatch() {
        let outcome = dispatcher()
            .dispatch("divide", args(json!({"dividend": "nine"})))
            .await;
        assert_eq!(outcome.failure_kind(), Some(FailureKind::InvalidArguments));
        assert!(outcome.text().contains("must be integer"));
    }

    #[tokio::test]
    async fn test_dispatch_execution_failure() {
        let outcome = dispatcher()
            .dispatch("divide", args(json!({"dividend": 1, "divisor": 0})))
            .await;
        assert_eq!(outcome.failure_kind(), Some(FailureKind::Execution));
        assert_eq!(outcome.text(), "failed to divide: division by zero");
    }

    #[tokio::test]
    async fn test_call_renders_failures_as_text() {
        let result = dispatcher().call("nope", Map::new()).await;
        assert_eq!(result.content().len(), 1);
        assert_eq!(result.first_text(), Some("unknown tool: nope"));
    }

    #[tokio::test]
    async fn test_dispatch_passes_optional_arguments() {
        let outcome = dispatcher()
            .dispatch("divide", args(json!({"dividend": 10, "divisor": 5, "label": "q"})))
            .await;
        assert_eq!(outcome.text(), "q=2");
    }
}
