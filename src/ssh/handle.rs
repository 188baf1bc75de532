//! Remote shell capability handles.
//!
//! A connected shell is exposed to the rest of the relay as exactly four
//! operations: write input, resize, liveness check, disconnect — plus a
//! read side ([`ShellOutput`]) handed to the relay loop. The far side
//! ([`ShellEndpoint`]) is driven by the connector's channel task in
//! production; tests drive it directly to stand in for a remote shell.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Notify};

use crate::error::{Result, SshRelayError};
use crate::protocol::Geometry;

/// Depth of the per-session input and output queues.
const QUEUE_DEPTH: usize = 1024;

/// An operation queued towards the remote shell.
///
/// Input writes and resizes share one FIFO queue, so a resize enqueued
/// before a command write reaches the pty first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Bytes for the shell's input stream, flushed on arrival.
    Data(Vec<u8>),
    /// New pty geometry.
    Resize(Geometry),
}

/// Clonable handle to an open remote shell.
#[derive(Debug, Clone)]
pub struct ShellHandle {
    commands: mpsc::Sender<ShellCommand>,
    connected: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
}

impl ShellHandle {
    /// Create a connected handle/output/endpoint triple.
    ///
    /// The connector wires the endpoint to a live SSH channel; test
    /// harnesses keep it and play the remote side themselves.
    pub fn pair() -> (ShellHandle, ShellOutput, ShellEndpoint) {
        let (commands_tx, commands_rx) = mpsc::channel(QUEUE_DEPTH);
        let (chunks_tx, chunks_rx) = mpsc::channel(QUEUE_DEPTH);
        let connected = Arc::new(AtomicBool::new(true));
        let shutdown = Arc::new(Notify::new());

        let handle = ShellHandle {
            commands: commands_tx,
            connected: Arc::clone(&connected),
            shutdown: Arc::clone(&shutdown),
        };
        let output = ShellOutput { chunks: chunks_rx };
        let endpoint = ShellEndpoint {
            commands: commands_rx,
            chunks: chunks_tx,
            connected,
            shutdown,
        };
        (handle, output, endpoint)
    }

    /// Queue bytes for the shell's input stream.
    ///
    /// Blocks when the queue is full; fails once the shell side is gone.
    pub async fn write_input(&self, bytes: Vec<u8>) -> Result<()> {
        self.commands
            .send(ShellCommand::Data(bytes))
            .await
            .map_err(|_| SshRelayError::RelayIo("shell input stream closed".into()))
    }

    /// Queue a pty resize, ordered with any input writes.
    pub async fn resize(&self, geometry: Geometry) -> Result<()> {
        self.commands
            .send(ShellCommand::Resize(geometry))
            .await
            .map_err(|_| SshRelayError::RelayIo("shell input stream closed".into()))
    }

    /// Whether the remote connection is still up.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Tear the remote connection down. Idempotent, callable from any
    /// failure path any number of times.
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
        self.shutdown.notify_one();
    }
}

/// Read side of a shell, owned exclusively by the session's relay task.
#[derive(Debug)]
pub struct ShellOutput {
    chunks: mpsc::Receiver<Vec<u8>>,
}

impl ShellOutput {
    /// Next chunk of shell output; `None` is end-of-stream.
    ///
    /// Blocks indefinitely while the shell is idle — liveness is the
    /// heartbeat's job, not this read's.
    pub async fn read(&mut self) -> Option<Vec<u8>> {
        self.chunks.recv().await
    }
}

/// The shell-facing side of a handle pair.
///
/// Dropping it closes the output stream (end-of-stream for the relay
/// loop) and fails subsequent input writes.
#[derive(Debug)]
pub struct ShellEndpoint {
    commands: mpsc::Receiver<ShellCommand>,
    chunks: mpsc::Sender<Vec<u8>>,
    connected: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
}

impl ShellEndpoint {
    /// Next queued input operation; `None` once every handle is gone.
    pub async fn recv_command(&mut self) -> Option<ShellCommand> {
        self.commands.recv().await
    }

    /// Emit shell output towards the relay loop.
    ///
    /// Returns `false` if the read side has been dropped.
    pub async fn emit(&self, bytes: Vec<u8>) -> bool {
        self.chunks.send(bytes).await.is_ok()
    }

    /// Mark the remote connection as down.
    pub fn mark_disconnected(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    /// Resolves once some handle has requested a disconnect.
    pub async fn disconnect_requested(&self) {
        self.shutdown.notified().await;
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        mpsc::Receiver<ShellCommand>,
        mpsc::Sender<Vec<u8>>,
        Arc<AtomicBool>,
        Arc<Notify>,
    ) {
        (self.commands, self.chunks, self.connected, self.shutdown)
    }
}
