//! Core server implementation.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::session::{Session, SessionState};
use super::{ServerBuilder, ServerConfig};
use crate::error::Result;
use crate::protocol::*;
use crate::tool::{Dispatcher, ToolRegistry};
use crate::transport::{Frame, Transport};

/// A tool-serving MCP server.
///
/// The server itself is immutable; per-connection state lives in a
/// [`Session`], so one server can serve any number of sessions.
#[derive(Debug, Clone)]
pub struct McpServer {
    config: ServerConfig,
    dispatcher: Dispatcher,
}

impl McpServer {
    /// Creates a server over a built registry.
    pub fn new(config: ServerConfig, registry: ToolRegistry) -> Self {
        Self {
            config,
            dispatcher: Dispatcher::new(Arc::new(registry)),
        }
    }

    /// Starts a [`ServerBuilder`].
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// Server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Registered tools.
    pub fn tools(&self) -> &ToolRegistry {
        self.dispatcher.registry()
    }

    /// The dispatcher behind `tools/call`.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Handles one inbound message.
    ///
    /// Returns `None` for notifications, which never get a response.
    pub async fn handle_request(
        &self,
        session: &mut Session,
        request: JsonRpcRequest,
    ) -> Option<JsonRpcResponse> {
        session.record_request();
        let notification = request.is_notification();
        debug!(method = %request.method, state = %session.state(), notification, "Handling message");

        let method = request.method.clone();
        let response = match method.as_str() {
            methods::INITIALIZE => self.handle_initialize(session, request),
            methods::INITIALIZED => {
                session.complete_handshake();
                JsonRpcResponse::success(request.id, json!({}))
            }
            methods::PING => JsonRpcResponse::success(request.id, json!({})),
            methods::TOOLS_LIST | methods::TOOLS_CALL => {
                match session.state() {
                    state if state.accepts_tool_requests() => {}
                    SessionState::Closed => {
                        return (!notification).then(|| {
                            JsonRpcResponse::invalid_request(request.id, Some("session closed".to_string()))
                        });
                    }
                    _ => {
                        warn!(%method, "Request before initialize");
                        return (!notification)
                            .then(|| JsonRpcResponse::server_not_initialized(request.id));
                    }
                }
                if method == methods::TOOLS_LIST {
                    self.handle_tools_list(request)
                } else {
                    self.handle_tools_call(request).await
                }
            }
            other => {
                debug!(method = %other, "Unhandled method");
                JsonRpcResponse::method_not_found(request.id)
            }
        };

        (!notification).then_some(response)
    }

    fn handle_initialize(&self, session: &mut Session, request: JsonRpcRequest) -> JsonRpcResponse {
        if session.state() != SessionState::Uninitialized {
            return JsonRpcResponse::invalid_request(
                request.id,
                Some(format!("initialize received while {}", session.state())),
            );
        }

        let params = match request.params {
            Some(p) => match serde_json::from_value::<InitializeParams>(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::invalid_params(
                        request.id,
                        &format!("Invalid initialize params: {e}"),
                    );
                }
            },
            None => {
                return JsonRpcResponse::invalid_params(request.id, "Initialize params are required");
            }
        };

        let protocol_version = if SUPPORTED_PROTOCOL_VERSIONS.contains(&params.protocol_version.as_str()) {
            params.protocol_version.clone()
        } else {
            self.config.protocol_version.clone()
        };

        info!(
            client = %params.client_info.name,
            client_version = %params.client_info.version,
            requested = %params.protocol_version,
            negotiated = %protocol_version,
            "Client initializing"
        );
        session.begin_handshake(params.client_info, &protocol_version);

        let result = InitializeResult {
            protocol_version,
            capabilities: ServerCapabilities::static_tools(),
            server_info: ServerInfo {
                name: self.config.name.clone(),
                version: self.config.version.clone(),
            },
            instructions: self.config.instructions.clone(),
        };

        JsonRpcResponse::from_serializable(request.id, &result)
    }

    fn handle_tools_list(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let result = ListToolsResult {
            tools: self.tools().list(),
        };
        JsonRpcResponse::from_serializable(request.id, &result)
    }

    async fn handle_tools_call(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let params = match request.params.map(serde_json::from_value::<CallToolParams>) {
            Some(Ok(params)) => params,
            Some(Err(e)) => {
                return JsonRpcResponse::invalid_params(
                    request.id,
                    &format!("Invalid tool call params: {e}"),
                );
            }
            None => {
                return JsonRpcResponse::invalid_params(request.id, "Tool call params are required");
            }
        };

        let result = self
            .dispatcher
            .call(&params.name, params.arguments.unwrap_or_default())
            .await;

        JsonRpcResponse::from_serializable(request.id, &result.into_call_result())
    }

    /// Serves one session until the peer disconnects or a send fails.
    ///
    /// Requests are handled strictly one at a time; each response is
    /// written before the next request is read. A frame that is not a
    /// request is answered with its parse or invalid-request error. The
    /// transport is closed on exit and the finished session is returned.
    pub async fn serve<T: Transport>(&self, mut transport: T) -> Result<Session> {
        let mut session = Session::new();
        info!(server = %self.config.name, tools = self.tools().len(), "MCP server starting");

        let mut failure = None;
        while let Some(frame) = transport.recv().await {
            let response = match frame {
                Frame::Request(request) => match self.handle_request(&mut session, request).await {
                    Some(response) => response,
                    None => continue,
                },
                Frame::Rejected(response) => response,
            };
            if let Err(e) = transport.send(response).await {
                warn!(error = %e, "Failed to send response");
                failure = Some(e);
                break;
            }
        }

        session.close();
        if let Err(e) = transport.close().await {
            debug!(error = %e, "Error while closing transport");
        }
        info!(requests = session.requests_handled(), "MCP server stopped");

        match failure {
            Some(e) => Err(e.into()),
            None => Ok(session),
        }
    }
}

/// Extracts the text of the first content block of a `tools/call` response.
pub fn response_text(response: &JsonRpcResponse) -> Option<&str> {
    response
        .result
        .as_ref()
        .and_then(|result| result.get("content"))
        .and_then(Value::as_array)
        .and_then(|content| content.first())
        .and_then(|block| block.get("text"))
        .and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolError;
    use crate::tool::{ParameterSchema, ParameterSpec, Tool, ToolDescriptor, ToolResult};
    use crate::transport::MockTransport;
    use async_trait::async_trait;
    use serde_json::Map;

    struct ShoutTool {
        descriptor: ToolDescriptor,
    }

    impl ShoutTool {
        fn new() -> Self {
            Self {
                descriptor: ToolDescriptor::new(
                    "shout",
                    "Uppercases a word",
                    ParameterSchema::new(vec![ParameterSpec::string("word").required()]),
                ),
            }
        }
    }

    #[async_trait]
    impl Tool for ShoutTool {
        fn descriptor(&self) -> &ToolDescriptor {
            &self.descriptor
        }

        fn failure_message(&self) -> &str {
            "failed to shout"
        }

        async fn execute(&self, arguments: Map<String, Value>) -> std::result::Result<ToolResult, ToolError> {
            let word = arguments["word"].as_str().unwrap_or_default();
            Ok(ToolResult::text(word.to_uppercase()))
        }
    }

    fn server() -> McpServer {
        McpServer::builder()
            .name("test-server")
            .version("1.0.0")
            .tool(ShoutTool::new())
            .build()
            .unwrap()
    }

    fn initialize(id: i64, version: &str) -> JsonRpcRequest {
        JsonRpcRequest::new(
            Some(json!(id)),
            methods::INITIALIZE,
            Some(json!({
                "protocolVersion": version,
                "capabilities": {},
                "clientInfo": {"name": "test-client", "version": "0.1.0"}
            })),
        )
    }

    fn call(id: i64, name: &str, arguments: Value) -> JsonRpcRequest {
        JsonRpcRequest::new(
            Some(json!(id)),
            methods::TOOLS_CALL,
            Some(json!({"name": name, "arguments": arguments})),
        )
    }

    async fn ready_session(server: &McpServer) -> Session {
        let mut session = Session::new();
        server.handle_request(&mut session, initialize(0, LATEST_PROTOCOL_VERSION)).await;
        server
            .handle_request(&mut session, JsonRpcRequest::notification(methods::INITIALIZED, None))
            .await;
        session
    }

    #[tokio::test]
    async fn test_initialize_moves_to_handshaking() {
        let server = server();
        let mut session = Session::new();

        let response = server
            .handle_request(&mut session, initialize(1, "2024-11-05"))
            .await
            .unwrap();

        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert_eq!(result["serverInfo"]["name"], "test-server");
        assert_eq!(result["capabilities"]["tools"]["listChanged"], false);
        assert_eq!(session.state(), SessionState::Handshaking);
    }

    #[tokio::test]
    async fn test_initialize_unknown_version_gets_latest() {
        let server = server();
        let mut session = Session::new();

        let response = server
            .handle_request(&mut session, initialize(1, "1999-01-01"))
            .await
            .unwrap();
        assert_eq!(response.result.unwrap()["protocolVersion"], LATEST_PROTOCOL_VERSION);
    }

    #[tokio::test]
    async fn test_initialized_notification_has_no_response() {
        let server = server();
        let mut session = Session::new();
        server.handle_request(&mut session, initialize(1, LATEST_PROTOCOL_VERSION)).await;

        let response = server
            .handle_request(&mut session, JsonRpcRequest::notification(methods::INITIALIZED, None))
            .await;

        assert!(response.is_none());
        assert_eq!(session.state(), SessionState::Serving);
    }

    #[tokio::test]
    async fn test_second_initialize_rejected() {
        let server = server();
        let mut session = ready_session(&server).await;

        let response = server
            .handle_request(&mut session, initialize(2, LATEST_PROTOCOL_VERSION))
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, codes::INVALID_REQUEST);
        assert_eq!(session.state(), SessionState::Serving);
    }

    #[tokio::test]
    async fn test_initialize_without_params() {
        let server = server();
        let mut session = Session::new();

        let response = server
            .handle_request(&mut session, JsonRpcRequest::new(Some(json!(1)), methods::INITIALIZE, None))
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, codes::INVALID_PARAMS);
        assert_eq!(session.state(), SessionState::Uninitialized);
    }

    #[tokio::test]
    async fn test_tools_rejected_before_initialize() {
        let server = server();
        let mut session = Session::new();

        let response = server
            .handle_request(&mut session, JsonRpcRequest::new(Some(json!(1)), methods::TOOLS_LIST, None))
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, mcp_codes::SERVER_NOT_INITIALIZED);
    }

    #[tokio::test]
    async fn test_tools_accepted_during_handshake() {
        let server = server();
        let mut session = Session::new();
        server.handle_request(&mut session, initialize(1, LATEST_PROTOCOL_VERSION)).await;

        let response = server
            .handle_request(&mut session, JsonRpcRequest::new(Some(json!(2)), methods::TOOLS_LIST, None))
            .await
            .unwrap();
        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_ping_always_answered() {
        let server = server();
        let mut session = Session::new();

        let response = server
            .handle_request(&mut session, JsonRpcRequest::new(Some(json!(5)), methods::PING, None))
            .await
            .unwrap();
        assert_eq!(response.result, Some(json!({})));
    }

    #[tokio::test]
    async fn test_tools_list() {
        let server = server();
        let mut session = ready_session(&server).await;

        let response = server
            .handle_request(&mut session, JsonRpcRequest::new(Some(json!(1)), methods::TOOLS_LIST, None))
            .await
            .unwrap();

        let tools = &response.result.unwrap()["tools"];
        assert_eq!(tools[0]["name"], "shout");
        assert_eq!(tools[0]["inputSchema"]["required"], json!(["word"]));
    }

    #[tokio::test]
    async fn test_tools_call_success_and_failures_share_shape() {
        let server = server();
        let mut session = ready_session(&server).await;

        let ok = server
            .handle_request(&mut session, call(1, "shout", json!({"word": "hey"})))
            .await
            .unwrap();
        assert_eq!(response_text(&ok), Some("HEY"));
        assert!(ok.result.as_ref().unwrap().get("isError").is_none());

        let unknown = server
            .handle_request(&mut session, call(2, "whisper", json!({})))
            .await
            .unwrap();
        assert!(unknown.is_success());
        assert_eq!(response_text(&unknown), Some("unknown tool: whisper"));

        let invalid = server
            .handle_request(&mut session, call(3, "shout", json!({})))
            .await
            .unwrap();
        assert!(invalid.is_success());
        assert_eq!(
            response_text(&invalid),
            Some("failed to shout: invalid arguments: missing required parameter 'word'")
        );
    }

    #[tokio::test]
    async fn test_tools_call_without_params() {
        let server = server();
        let mut session = ready_session(&server).await;

        let response = server
            .handle_request(&mut session, JsonRpcRequest::new(Some(json!(1)), methods::TOOLS_CALL, None))
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, codes::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let server = server();
        let mut session = ready_session(&server).await;

        let response = server
            .handle_request(&mut session, JsonRpcRequest::new(Some(json!(1)), "resources/list", None))
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, codes::METHOD_NOT_FOUND);

        let response = server
            .handle_request(&mut session, JsonRpcRequest::notification("notifications/cancelled", None))
            .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_serve_answers_in_order_and_closes() {
        let server = server();
        let transport = MockTransport::with_requests([
            initialize(1, LATEST_PROTOCOL_VERSION),
            JsonRpcRequest::notification(methods::INITIALIZED, None),
            call(2, "shout", json!({"word": "a"})),
            call(3, "shout", json!({"word": "b"})),
        ]);
        let observer = transport.clone();

        let session = server.serve(transport).await.unwrap();

        let ids: Vec<_> = observer.responses().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, [Some(json!(1)), Some(json!(2)), Some(json!(3))]);
        assert_eq!(session.state(), SessionState::Closed);
        assert_eq!(session.requests_handled(), 4);
        assert!(observer.is_closed());
    }

    #[tokio::test]
    async fn test_serve_answers_malformed_frames() {
        let server = server();
        let transport = MockTransport::new();
        transport.push_raw(r#"{"jsonrpc":"2.0","id":7,"method":5}"#);
        transport.push_raw("{not json");
        transport.push_request(JsonRpcRequest::new(Some(json!(8)), methods::PING, None));
        let observer = transport.clone();

        server.serve(transport).await.unwrap();

        let responses = observer.responses();
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0].id, Some(json!(7)));
        assert_eq!(responses[0].error.as_ref().map(|e| e.code), Some(codes::INVALID_REQUEST));
        assert_eq!(responses[1].id, None);
        assert_eq!(responses[1].error.as_ref().map(|e| e.code), Some(codes::PARSE_ERROR));
        assert_eq!(responses[2].id, Some(json!(8)));
        assert!(responses[2].is_success());
    }

    #[tokio::test]
    async fn test_serve_stops_on_send_failure() {
        let server = server();
        let transport = MockTransport::with_requests([
            JsonRpcRequest::new(Some(json!(1)), methods::PING, None),
            JsonRpcRequest::new(Some(json!(2)), methods::PING, None),
        ]);
        transport.fail_sends();
        let observer = transport.clone();

        let result = server.serve(transport).await;

        assert!(result.is_err());
        assert_eq!(observer.pending_requests(), 1);
        assert!(observer.is_closed());
    }
}
