//! Client-facing transport seam.
//!
//! The relay core never touches the WebSocket directly. Each connection
//! gets a [`ClientSink`]: a clonable handle onto an unbounded frame queue
//! drained by a single writer task. One writer per connection is what
//! guarantees per-session FIFO ordering of outbound bytes, no matter how
//! many components (relay loop, dispatcher, heartbeat) are sending.

use tokio::sync::mpsc;

use crate::error::{Result, SshRelayError};
use crate::protocol::ERROR_PREFIX;

/// A frame queued for delivery to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundFrame {
    /// Raw bytes, delivered verbatim.
    Data(Vec<u8>),
    /// Ask the writer task to close the underlying connection.
    Close,
}

/// Send primitive for one client connection.
#[derive(Debug, Clone)]
pub struct ClientSink {
    frames: mpsc::UnboundedSender<OutboundFrame>,
}

impl ClientSink {
    /// Create a sink and the receiver its writer task drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<OutboundFrame>) {
        let (frames, rx) = mpsc::unbounded_channel();
        (Self { frames }, rx)
    }

    /// Queue raw bytes for the client.
    pub fn send(&self, bytes: Vec<u8>) -> Result<()> {
        self.frames
            .send(OutboundFrame::Data(bytes))
            .map_err(|_| SshRelayError::TransportClosed)
    }

    /// Queue an `"ERROR : <message>"` report. Best effort.
    pub fn send_error(&self, message: &str) {
        let _ = self.send(format!("{ERROR_PREFIX}{message}").into_bytes());
    }

    /// Ask the writer task to close the connection. Best effort.
    pub fn close(&self) {
        let _ = self.frames.send(OutboundFrame::Close);
    }
}
