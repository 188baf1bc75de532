//! Inbound frame decoding and routing.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{engine, forwarder, heartbeat, lifecycle};
use crate::protocol::TerminalRequest;
use crate::session::{SessionId, SessionRegistry, SessionStatus};
use crate::ssh::{self, ConnectParams};

/// Decodes each inbound frame and routes it to the connect, command, or
/// heartbeat path.
///
/// The dispatch path itself never blocks on remote I/O: the connect
/// sequence (which can take up to its 30 s timeout) runs on its own task,
/// so other frames — and other sessions on the same connection handler —
/// keep flowing while a connect is in flight.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<SessionRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    /// Handle one raw inbound frame for the given session.
    pub async fn dispatch(&self, id: SessionId, raw: &str) {
        let request = match serde_json::from_str::<TerminalRequest>(raw) {
            Ok(request) => request,
            Err(e) => {
                // malformed payloads are dropped; the session is untouched
                warn!(session = %id, error = %e, "discarding malformed frame");
                return;
            }
        };

        match request {
            TerminalRequest::Connect {
                username,
                host,
                port,
                password,
                geometry,
            } => {
                let registry = Arc::clone(&self.registry);
                let params = ConnectParams {
                    host,
                    port,
                    username,
                    password,
                    geometry,
                };
                tokio::spawn(connect_session(registry, id, params));
            }
            TerminalRequest::Command { command, geometry } => {
                forwarder::forward(&self.registry, &id, geometry, &command).await;
            }
            TerminalRequest::Heartbeat => heartbeat::probe(&self.registry, &id),
            TerminalRequest::Unsupported => {
                warn!(session = %id, "unsupported operation, closing session");
                lifecycle::close(&self.registry, &id);
            }
        }
    }
}

/// Drive one connect attempt and hand the result to the relay engine.
async fn connect_session(registry: Arc<SessionRegistry>, id: SessionId, params: ConnectParams) {
    let mut eligible = false;
    let marked = registry.update(&id, |e| {
        if e.status.can_transition_to(SessionStatus::Connecting) {
            let _ = e.status.transition_to(SessionStatus::Connecting);
            e.geometry = params.geometry;
            eligible = true;
        }
    });
    if marked.is_err() {
        // session vanished before the connect task ran
        return;
    }
    if !eligible {
        // a shell is already attached or being attached; keep it
        debug!(session = %id, "duplicate connect ignored");
        return;
    }

    match ssh::open_shell(params).await {
        Ok((handle, output)) => {
            let attached = registry.update(&id, |e| {
                let _ = e.status.transition_to(SessionStatus::Active);
                e.shell = Some(handle.clone());
            });
            if attached.is_err() {
                // closed while connecting: drop the fresh connection too
                handle.disconnect();
                return;
            }

            engine::spawn(registry, id, output);
            info!(session = %id, "remote shell attached");
        }
        Err(e) => {
            warn!(session = %id, error = %e, "connect failed");
            if let Ok(Some(entry)) = registry.get(&id) {
                entry.client.send_error(&e.to_string());
            }
            lifecycle::close(&registry, &id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionStatus;
    use crate::transport::ClientSink;

    type Frames = tokio::sync::mpsc::UnboundedReceiver<crate::transport::OutboundFrame>;

    fn setup() -> (Arc<SessionRegistry>, Dispatcher, SessionId, Frames) {
        let registry = Arc::new(SessionRegistry::new());
        let dispatcher = Dispatcher::new(Arc::clone(&registry));
        let id = SessionId::new();
        let (sink, frames) = ClientSink::channel();
        registry.register(id, sink).unwrap();
        (registry, dispatcher, id, frames)
    }

    #[tokio::test]
    async fn test_malformed_frame_leaves_session_untouched() {
        let (registry, dispatcher, id, _frames) = setup();

        dispatcher.dispatch(id, "{ not json").await;
        dispatcher.dispatch(id, r#"{"command":"ls"}"#).await;

        let entry = registry.get(&id).unwrap().unwrap();
        assert_eq!(entry.status, SessionStatus::Initialized);
    }

    #[tokio::test]
    async fn test_unsupported_operation_closes_session() {
        let (registry, dispatcher, id, _frames) = setup();

        dispatcher.dispatch(id, r#"{"operate":"reboot"}"#).await;

        assert!(registry.get(&id).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_heartbeat_for_unknown_session_is_noop() {
        let registry = Arc::new(SessionRegistry::new());
        let dispatcher = Dispatcher::new(Arc::clone(&registry));

        dispatcher
            .dispatch(SessionId::new(), r#"{"operate":"heartbeat"}"#)
            .await;
    }
}
