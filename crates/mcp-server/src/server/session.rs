//! Per-connection session state.

use std::fmt;

use tracing::{debug, warn};

use crate::protocol::ClientInfo;

/// Lifecycle of one session.
///
/// ```text
/// Uninitialized --initialize--> Handshaking --notifications/initialized--> Serving
///       \______________________________\_______________________________\--EOF--> Closed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No `initialize` yet.
    #[default]
    Uninitialized,
    /// `initialize` answered, waiting for `notifications/initialized`.
    Handshaking,
    /// Handshake complete.
    Serving,
    /// The transport is gone.
    Closed,
}

impl SessionState {
    /// Whether `tools/list` and `tools/call` are accepted.
    ///
    /// Some clients issue requests before sending
    /// `notifications/initialized`, so the handshake state already serves.
    pub fn accepts_tool_requests(&self) -> bool {
        matches!(self, Self::Handshaking | Self::Serving)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Uninitialized => "uninitialized",
            Self::Handshaking => "handshaking",
            Self::Serving => "serving",
            Self::Closed => "closed",
        })
    }
}

/// State of one client connection. Owns nothing durable.
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: SessionState,
    client: Option<ClientInfo>,
    protocol_version: Option<String>,
    requests_handled: u64,
}

impl Session {
    /// Fresh, uninitialized session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Client identification from `initialize`.
    pub fn client(&self) -> Option<&ClientInfo> {
        self.client.as_ref()
    }

    /// Negotiated protocol revision.
    pub fn protocol_version(&self) -> Option<&str> {
        self.protocol_version.as_deref()
    }

    /// Number of requests and notifications processed.
    pub fn requests_handled(&self) -> u64 {
        self.requests_handled
    }

    pub(crate) fn record_request(&mut self) {
        self.requests_handled += 1;
    }

    pub(crate) fn begin_handshake(&mut self, client: ClientInfo, protocol_version: &str) {
        debug!(client = %client.name, protocol_version, "Session handshake started");
        self.client = Some(client);
        self.protocol_version = Some(protocol_version.to_string());
        self.state = SessionState::Handshaking;
    }

    pub(crate) fn complete_handshake(&mut self) {
        match self.state {
            SessionState::Handshaking => {
                debug!("Session initialized");
                self.state = SessionState::Serving;
            }
            state => warn!(%state, "Ignoring initialized notification"),
        }
    }

    pub(crate) fn close(&mut self) {
        self.state = SessionState::Closed;
    }
}
