//! Client input path: geometry then command bytes.

use tracing::{debug, warn};

use super::lifecycle;
use crate::protocol::Geometry;
use crate::session::{SessionId, SessionRegistry};
use crate::Result;

/// Forward one command frame to the session's remote shell.
///
/// The geometry is stored (last write wins) and re-asserted on the handle
/// even when unchanged, so a resize always takes effect before the shell
/// interprets the bytes that follow it. Writes for one session reach the
/// shell in exactly the order the frames arrived.
///
/// An empty command string is a complete no-op. A write failure is
/// terminal for the session: the client gets an error report and the
/// session is closed.
pub async fn forward(
    registry: &SessionRegistry,
    id: &SessionId,
    geometry: Geometry,
    command: &str,
) {
    if command.is_empty() {
        return;
    }

    let entry = match registry.get(id) {
        Ok(Some(entry)) => entry,
        _ => return,
    };
    let Some(shell) = entry.shell else {
        debug!(session = %id, "command before connect, dropping");
        return;
    };

    if registry.update(id, |e| e.geometry = geometry).is_err() {
        return;
    }

    let wrote: Result<()> = async {
        shell.resize(geometry).await?;
        shell.write_input(command.as_bytes().to_vec()).await
    }
    .await;

    if let Err(e) = wrote {
        warn!(session = %id, error = %e, "command forwarding failed");
        entry.client.send_error(&e.to_string());
        lifecycle::close(registry, id);
    }
}
