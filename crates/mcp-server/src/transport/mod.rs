//! Transport Layer for MCP Server
//!
//! # Available Transports
//!
//! ## Stream Transport
//!
//! Reads requests line by line from any async reader and writes responses
//! line by line to any async writer. [`StreamTransport::stdio`] binds it to
//! the process pipes, the default mode.
//!
//! ```rust,no_run
//! use mcp_server::transport::{StreamTransport, Transport};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut transport = StreamTransport::stdio();
//!
//!     while let Some(frame) = transport.recv().await {
//!         // Handle request or answer the rejection...
//!         # let _ = frame;
//!     }
//! }
//! ```
//!
//! ## Mock Transport
//!
//! [`MockTransport`] queues requests and captures responses without I/O.
//!
//! ## Network mode
//!
//! [`TransportMode::Sse`] names the server-sent-events mode. It is not
//! implemented; [`TransportMode::ensure_available`] reports
//! [`TransportError::NotImplemented`] so callers fail before serving.

mod frame;
mod mock;
mod stream;
mod traits;

use std::fmt;
use std::str::FromStr;

pub use frame::Frame;
pub use mock::MockTransport;
pub use stream::{StdioTransport, StreamTransport};
pub use traits::Transport;

use crate::error::TransportError;

/// Transport selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportMode {
    /// Newline-delimited JSON over stdin/stdout.
    #[default]
    Stdio,
    /// Server-sent events over HTTP.
    Sse,
}

impl TransportMode {
    /// Every mode, in the order shown to users.
    pub const ALL: [TransportMode; 2] = [TransportMode::Stdio, TransportMode::Sse];

    /// Command-line name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stdio => "stdio",
            Self::Sse => "sse",
        }
    }

    /// Fails for modes that exist by name only.
    pub fn ensure_available(&self) -> Result<(), TransportError> {
        match self {
            Self::Stdio => Ok(()),
            Self::Sse => Err(TransportError::NotImplemented(self.as_str().to_string())),
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stdio" => Ok(Self::Stdio),
            "sse" => Ok(Self::Sse),
            other => Err(TransportError::InvalidMessage(format!(
                "unknown transport '{other}', expected one of: stdio, sse"
            ))),
        }
    }
}
