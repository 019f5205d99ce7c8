//! Newline-delimited JSON-RPC over any async byte stream.
//!
//! Each frame is one JSON value on one line. Process pipes are the default
//! carrier ([`StreamTransport::stdio`]), but any reader/writer pair works,
//! which is how the tests drive a session in memory.

use async_trait::async_trait;
use tokio::io::{
    stdin, stdout, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin,
    Stdout,
};
use tracing::{debug, warn};

use crate::error::TransportError;
use crate::protocol::JsonRpcResponse;

use super::Frame;
use super::traits::Transport;

/// Transport over a buffered reader and a writer.
///
/// Blank lines are ignored. Lines that are not JSON-RPC requests are logged
/// and handed back as [`Frame::Rejected`]. End of input closes the transport.
pub struct StreamTransport<R, W> {
    reader: R,
    writer: W,
    closed: bool,
}

/// Transport over the process's stdin and stdout.
pub type StdioTransport = StreamTransport<BufReader<Stdin>, Stdout>;

impl StreamTransport<BufReader<Stdin>, Stdout> {
    /// Transport over the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(stdin()), stdout())
    }
}

impl<R, W> StreamTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Wraps a reader and a writer.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            closed: false,
        }
    }

    /// Returns the underlying reader and writer.
    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

#[async_trait]
impl<R, W> Transport for StreamTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn recv(&mut self) -> Option<Frame> {
        let mut line = String::new();

        loop {
            if self.closed {
                return None;
            }

            line.clear();
            match self.reader.read_line(&mut line).await {
                Ok(0) => {
                    debug!("Input stream reached EOF");
                    self.closed = true;
                    return None;
                }
                Ok(_) => {
                    let frame = line.trim();
                    if frame.is_empty() {
                        continue;
                    }
                    let decoded = Frame::parse(frame);
                    if let Frame::Rejected(reply) = &decoded {
                        let error = reply.error.as_ref().map(|e| e.code);
                        warn!(?error, line = %frame, "Rejecting malformed JSON-RPC frame");
                    }
                    return Some(decoded);
                }
                Err(e) => {
                    warn!(error = %e, "I/O error reading input stream");
                    self.closed = true;
                    return None;
                }
            }
        }
    }

    async fn send(&mut self, response: JsonRpcResponse) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }

        let mut frame = serde_json::to_vec(&response)
            .map_err(|e| TransportError::InvalidMessage(e.to_string()))?;
        frame.push(b'\n');

        self.writer.write_all(&frame).await?;
        self.writer.flush().await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.closed = true;
        self.writer.flush().await?;
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}
