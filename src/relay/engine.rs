//! Per-session output forwarding.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use super::lifecycle;
use crate::session::{SessionId, SessionRegistry};
use crate::ssh::ShellOutput;

/// Start the forwarding task for a session that just went active.
///
/// Exactly one of these runs per session. It drains the shell's output
/// stream chunk by chunk and pushes each one, verbatim and in order,
/// through the session's client sink. The read blocks for as long as the
/// shell is quiet; a stalled remote therefore parks only this task and
/// never the dispatch path or any other session.
///
/// The loop ends on end-of-stream, on a read error surfaced as stream
/// closure, or when the client sink is gone — and in every case closes
/// the session exactly once on its way out.
pub fn spawn(
    registry: Arc<SessionRegistry>,
    id: SessionId,
    mut output: ShellOutput,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let client = match registry.get(&id) {
            Ok(Some(entry)) => entry.client,
            _ => return,
        };

        while let Some(chunk) = output.read().await {
            if client.send(chunk).is_err() {
                debug!(session = %id, "client sink gone, stopping relay");
                break;
            }
        }

        debug!(session = %id, "relay loop finished");
        lifecycle::close(&registry, &id);
    })
}
