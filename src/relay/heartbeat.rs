//! Liveness probes for a session's remote connection.

use tracing::debug;

use crate::protocol::HEARTBEAT_ACK;
use crate::session::{SessionId, SessionRegistry};

/// Answer a heartbeat for `id`.
///
/// An absent session draws no reply. A session whose remote handle
/// reports connected gets the fixed acknowledgment string. A session
/// whose remote is down gets nothing — and is also not torn down here;
/// its relay loop's termination is what closes it.
pub fn probe(registry: &SessionRegistry, id: &SessionId) {
    let entry = match registry.get(id) {
        Ok(Some(entry)) => entry,
        _ => return,
    };

    match entry.shell {
        Some(shell) if shell.is_connected() => {
            let _ = entry.client.send(HEARTBEAT_ACK.as_bytes().to_vec());
        }
        _ => debug!(session = %id, "heartbeat with no live remote, ignoring"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssh::ShellHandle;
    use crate::transport::{ClientSink, OutboundFrame};

    #[tokio::test]
    async fn test_ack_on_connected_session() {
        let registry = SessionRegistry::new();
        let id = SessionId::new();
        let (sink, mut frames) = ClientSink::channel();
        registry.register(id, sink).unwrap();

        let (handle, _output, _endpoint) = ShellHandle::pair();
        registry.update(&id, |e| e.shell = Some(handle)).unwrap();

        probe(&registry, &id);

        assert_eq!(
            frames.recv().await,
            Some(OutboundFrame::Data(b"Heartbeat healthy".to_vec()))
        );
    }

    #[tokio::test]
    async fn test_silent_when_remote_down() {
        let registry = SessionRegistry::new();
        let id = SessionId::new();
        let (sink, mut frames) = ClientSink::channel();
        registry.register(id, sink).unwrap();

        let (handle, _output, _endpoint) = ShellHandle::pair();
        handle.disconnect();
        registry.update(&id, |e| e.shell = Some(handle)).unwrap();

        probe(&registry, &id);

        // no ack, and the session stays registered
        assert!(frames.try_recv().is_err());
        assert!(registry.get(&id).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_silent_before_connect() {
        let registry = SessionRegistry::new();
        let id = SessionId::new();
        let (sink, mut frames) = ClientSink::channel();
        registry.register(id, sink).unwrap();

        probe(&registry, &id);
        assert!(frames.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_silent_for_unknown_session() {
        let registry = SessionRegistry::new();
        probe(&registry, &SessionId::new());
    }
}
