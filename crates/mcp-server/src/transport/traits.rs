//! Transport trait definitions.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::protocol::JsonRpcResponse;

use super::Frame;

/// Bidirectional JSON-RPC message channel for one session.
///
/// # Implementation Notes
///
/// - `recv()` waits for the next frame and returns `None` once the peer is
///   gone or the transport is closed; frames that are not requests come back
///   as [`Frame::Rejected`] so the session can answer them
/// - `close()` is idempotent
/// - after `close()`, `recv()` returns `None` and `send()` fails with
///   [`TransportError::Closed`]
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use mcp_server::error::TransportError;
/// use mcp_server::protocol::JsonRpcResponse;
/// use mcp_server::transport::{Frame, Transport};
///
/// struct NullTransport {
///     closed: bool,
/// }
///
/// #[async_trait]
/// impl Transport for NullTransport {
///     async fn recv(&mut self) -> Option<Frame> {
///         None
///     }
///
///     async fn send(&mut self, _response: JsonRpcResponse) -> Result<(), TransportError> {
///         if self.closed {
///             return Err(TransportError::Closed);
///         }
///         Ok(())
///     }
///
///     async fn close(&mut self) -> Result<(), TransportError> {
///         self.closed = true;
///         Ok(())
///     }
///
///     fn is_closed(&self) -> bool {
///         self.closed
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send {
    /// Receives the next frame.
    async fn recv(&mut self) -> Option<Frame>;

    /// Sends one response.
    async fn send(&mut self, response: JsonRpcResponse) -> Result<(), TransportError>;

    /// Closes the transport.
    async fn close(&mut self) -> Result<(), TransportError>;

    /// Returns true once the transport is closed.
    fn is_closed(&self) -> bool;
}
