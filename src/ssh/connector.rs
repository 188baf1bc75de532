//! Opens interactive shells on remote hosts over SSH.

use std::sync::Arc;
use std::time::Duration;

use russh::client;
use russh::{ChannelMsg, Disconnect};
use tokio::time::timeout;
use tracing::{debug, trace};

use super::handle::{ShellCommand, ShellEndpoint, ShellHandle, ShellOutput};
use crate::error::{Result, SshRelayError};
use crate::protocol::Geometry;

/// Timeout for the transport-level connection to the target host.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for opening the interactive shell channel.
pub const CHANNEL_OPEN_TIMEOUT: Duration = Duration::from_secs(3);

/// Terminal type requested for the remote pty.
const TERM: &str = "xterm-256color";

/// Everything needed to open a remote shell.
#[derive(Debug, Clone)]
pub struct ConnectParams {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub geometry: Geometry,
}

/// Accepts any host key. The relay sits between trusted endpoints and is
/// told its targets by an already-authenticated client, so host identity
/// is not checked here.
struct InsecureHostVerifier;

impl client::Handler for InsecureHostVerifier {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &russh::keys::PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        Ok(true)
    }
}

/// Connect to `host:port`, authenticate with the password, and open an
/// interactive shell sized to `geometry`.
///
/// The whole transport-connect-plus-auth sequence is bounded by
/// [`CONNECT_TIMEOUT`] and the channel/pty/shell setup by
/// [`CHANNEL_OPEN_TIMEOUT`], so a peer that completes the handshake and
/// then stalls still fails within the deadline instead of parking the
/// connect task.
///
/// On success the returned [`ShellHandle`] accepts input/resizes and the
/// [`ShellOutput`] streams everything the shell prints; a spawned channel
/// task owns the connection until either side goes away. On failure the
/// error carries the underlying message; the caller owns any session
/// teardown.
pub async fn open_shell(params: ConnectParams) -> Result<(ShellHandle, ShellOutput)> {
    open_shell_with_timeouts(params, CONNECT_TIMEOUT, CHANNEL_OPEN_TIMEOUT).await
}

async fn open_shell_with_timeouts(
    params: ConnectParams,
    connect_timeout: Duration,
    channel_timeout: Duration,
) -> Result<(ShellHandle, ShellOutput)> {
    let session = timeout(connect_timeout, connect_and_authenticate(&params))
        .await
        .map_err(|_| {
            SshRelayError::Connection(format!(
                "connect to {}:{} timed out",
                params.host, params.port
            ))
        })??;

    let channel = timeout(channel_timeout, open_shell_channel(&session, params.geometry))
        .await
        .map_err(|_| SshRelayError::Connection("shell channel setup timed out".into()))??;

    debug!(host = %params.host, port = params.port, user = %params.username, "shell channel open");

    let (handle, output, endpoint) = ShellHandle::pair();
    tokio::spawn(channel_task(session, channel, endpoint));

    // nudge the shell so the prompt appears without waiting for input
    let _ = handle.write_input(b"\r".to_vec()).await;

    Ok((handle, output))
}

/// Transport connect and password auth, as one awaitable so a single
/// deadline covers both.
async fn connect_and_authenticate(
    params: &ConnectParams,
) -> Result<client::Handle<InsecureHostVerifier>> {
    let config = Arc::new(client::Config::default());
    let addr = (params.host.as_str(), params.port);

    let mut session = client::connect(config, addr, InsecureHostVerifier)
        .await
        .map_err(|e| SshRelayError::Connection(e.to_string()))?;

    let auth = session
        .authenticate_password(params.username.as_str(), params.password.as_str())
        .await
        .map_err(|e| SshRelayError::Connection(e.to_string()))?;
    if !matches!(auth, client::AuthResult::Success) {
        return Err(SshRelayError::Connection(format!(
            "authentication failed for {}@{}",
            params.username, params.host
        )));
    }

    Ok(session)
}

/// Channel open plus pty and shell requests, as one awaitable so a
/// single deadline covers the whole setup.
async fn open_shell_channel(
    session: &client::Handle<InsecureHostVerifier>,
    g: Geometry,
) -> Result<russh::Channel<client::Msg>> {
    let channel = session
        .channel_open_session()
        .await
        .map_err(|e| SshRelayError::Connection(e.to_string()))?;

    channel
        .request_pty(false, TERM, g.cols, g.rows, g.width, g.height, &[])
        .await
        .map_err(|e| SshRelayError::Connection(e.to_string()))?;
    channel
        .request_shell(false)
        .await
        .map_err(|e| SshRelayError::Connection(e.to_string()))?;

    Ok(channel)
}

/// Owns the SSH connection for one session: forwards channel output to
/// the relay side, applies queued writes and resizes in order, and tears
/// the connection down when any side finishes.
async fn channel_task(
    session: client::Handle<InsecureHostVerifier>,
    mut channel: russh::Channel<client::Msg>,
    endpoint: ShellEndpoint,
) {
    let (mut commands, chunks, connected, shutdown) = endpoint.into_parts();

    loop {
        tokio::select! {
            msg = channel.wait() => match msg {
                Some(ChannelMsg::Data { ref data }) => {
                    if chunks.send(data.to_vec()).await.is_err() {
                        break;
                    }
                }
                Some(ChannelMsg::ExtendedData { ref data, .. }) => {
                    if chunks.send(data.to_vec()).await.is_err() {
                        break;
                    }
                }
                Some(ChannelMsg::ExitStatus { exit_status }) => {
                    debug!(exit_status, "remote shell exited");
                    break;
                }
                Some(ChannelMsg::Eof) | Some(ChannelMsg::Close) | None => break,
                Some(other) => trace!(?other, "ignoring channel message"),
            },
            cmd = commands.recv() => match cmd {
                Some(ShellCommand::Data(bytes)) => {
                    if channel.data(&bytes[..]).await.is_err() {
                        break;
                    }
                }
                Some(ShellCommand::Resize(g)) => {
                    if channel
                        .window_change(g.cols, g.rows, g.width, g.height)
                        .await
                        .is_err()
                    {
                        break;
                    }
                }
                None => break,
            },
            _ = shutdown.notified() => break,
        }
    }

    connected.store(false, std::sync::atomic::Ordering::SeqCst);
    let _ = channel.eof().await;
    let _ = session
        .disconnect(Disconnect::ByApplication, "session closed", "en")
        .await;
    // dropping `chunks` here is end-of-stream for the relay loop
}
