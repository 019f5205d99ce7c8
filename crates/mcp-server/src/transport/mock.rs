//! In-memory transport for tests.
//!
//! Frames are queued up front; responses are captured for inspection.
//! Clones share state, so a test can hand one clone to the server and keep
//! another to look at what was sent.
//!
//! ```rust
//! use mcp_server::protocol::{JsonRpcRequest, JsonRpcResponse};
//! use mcp_server::transport::{MockTransport, Transport};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let mut transport = MockTransport::new();
//! transport.push_request(JsonRpcRequest::new(Some(json!(1)), "ping", None));
//!
//! let request = transport.recv().await.and_then(|frame| frame.into_request()).unwrap();
//! transport.send(JsonRpcResponse::success(request.id, json!({}))).await.unwrap();
//!
//! assert_eq!(transport.responses().len(), 1);
//! # });
//! ```

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::TransportError;
use crate::protocol::{JsonRpcRequest, JsonRpcResponse};

use super::Frame;
use super::traits::Transport;

/// Queue-backed transport.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    frames: VecDeque<Frame>,
    responses: Vec<JsonRpcResponse>,
    closed: bool,
    fail_sends: bool,
}

impl MockTransport {
    /// Creates an empty transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport with queued requests.
    pub fn with_requests<I>(requests: I) -> Self
    where
        I: IntoIterator<Item = JsonRpcRequest>,
    {
        let transport = Self::new();
        transport
            .state
            .lock()
            .frames
            .extend(requests.into_iter().map(Frame::Request));
        transport
    }

    /// Queues one request.
    pub fn push_request(&self, request: JsonRpcRequest) {
        self.state.lock().frames.push_back(Frame::Request(request));
    }

    /// Queues the raw text of one frame, decoded as the wire would see it.
    pub fn push_raw(&self, text: &str) {
        self.state.lock().frames.push_back(Frame::parse(text));
    }

    /// Responses sent so far.
    pub fn responses(&self) -> Vec<JsonRpcResponse> {
        self.state.lock().responses.clone()
    }

    /// Frames not yet received.
    pub fn pending_requests(&self) -> usize {
        self.state.lock().frames.len()
    }

    /// Makes every subsequent `send` fail with an I/O error.
    pub fn fail_sends(&self) {
        self.state.lock().fail_sends = true;
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn recv(&mut self) -> Option<Frame> {
        let mut state = self.state.lock();
        if state.closed {
            return None;
        }
        state.frames.pop_front()
    }

    async fn send(&mut self, response: JsonRpcResponse) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(TransportError::Closed);
        }
        if state.fail_sends {
            return Err(TransportError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "mock send failure",
            )));
        }
        state.responses.push(response);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.state.lock().closed = true;
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}
