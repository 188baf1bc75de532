//! Idempotent session teardown.

use tracing::{info, warn};

use crate::session::{SessionId, SessionRegistry, SessionStatus};

/// Tear down a session: disconnect the remote shell if attached, drop the
/// registry entry, and close the client connection.
///
/// Reachable from every failure path — relay loop termination, command
/// write errors, connect failures, unsupported operations, transport
/// disconnects — as well as from explicit closes, any number of times and
/// concurrently. The registry's remove-if-present is the single guard:
/// the first caller gets the entry and performs cleanup, later callers
/// observe absence and do nothing.
pub fn close(registry: &SessionRegistry, id: &SessionId) {
    let removed = match registry.remove(id) {
        Ok(removed) => removed,
        Err(e) => {
            warn!(session = %id, error = %e, "registry remove failed during close");
            return;
        }
    };

    let Some(mut entry) = removed else {
        // already closed (or never registered)
        return;
    };

    let _ = entry.status.transition_to(SessionStatus::Closed);

    if let Some(shell) = entry.shell.take() {
        shell.disconnect();
    }
    entry.client.close();

    info!(session = %id, "session closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssh::ShellHandle;
    use crate::transport::{ClientSink, OutboundFrame};

    #[tokio::test]
    async fn test_close_disconnects_and_removes() {
        let registry = SessionRegistry::new();
        let id = SessionId::new();
        let (sink, mut frames) = ClientSink::channel();
        registry.register(id, sink).unwrap();

        let (handle, _output, _endpoint) = ShellHandle::pair();
        registry
            .update(&id, |e| e.shell = Some(handle.clone()))
            .unwrap();

        close(&registry, &id);

        assert!(!handle.is_connected());
        assert!(registry.get(&id).unwrap().is_none());
        assert_eq!(frames.recv().await, Some(OutboundFrame::Close));
    }

    #[tokio::test]
    async fn test_close_absent_is_noop() {
        let registry = SessionRegistry::new();
        close(&registry, &SessionId::new());
    }

    #[tokio::test]
    async fn test_repeated_close_sends_one_close_frame() {
        let registry = SessionRegistry::new();
        let id = SessionId::new();
        let (sink, mut frames) = ClientSink::channel();
        registry.register(id, sink).unwrap();

        close(&registry, &id);
        close(&registry, &id);
        close(&registry, &id);

        assert_eq!(frames.recv().await, Some(OutboundFrame::Close));
        assert!(frames.try_recv().is_err());
    }
}
