//! WebSocket transport adapter.
//!
//! Each accepted socket becomes one session: the adapter assigns the
//! per-connection [`SessionId`] (the registry key), registers the session
//! with a fresh [`ClientSink`], and runs two halves — a writer task that
//! drains the sink's frame queue into the socket, and a read loop that
//! feeds inbound frames to the dispatcher. When the socket goes away, in
//! either direction, the session is closed.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tracing::{debug, info};

use super::handlers::AppState;
use crate::relay::lifecycle;
use crate::session::SessionId;
use crate::transport::{ClientSink, OutboundFrame};

/// WebSocket upgrade handler for `/webssh`.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Drive one client connection for its whole lifetime.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let id = SessionId::new();
    let (sink, mut frames) = ClientSink::channel();
    if state.registry.register(id, sink).is_err() {
        return;
    }
    info!(session = %id, "client connected");

    let (mut ws_sink, mut ws_stream) = socket.split();

    // Sole writer for this connection; shell output stays binary so it
    // reaches the client byte-exact.
    let writer = tokio::spawn(async move {
        while let Some(frame) = frames.recv().await {
            match frame {
                OutboundFrame::Data(bytes) => {
                    if ws_sink.send(Message::Binary(bytes.into())).await.is_err() {
                        break;
                    }
                }
                OutboundFrame::Close => break,
            }
        }
        let _ = ws_sink.close().await;
    });

    while let Some(msg) = ws_stream.next().await {
        match msg {
            Ok(Message::Text(text)) => state.dispatcher.dispatch(id, text.as_str()).await,
            Ok(Message::Binary(data)) => match std::str::from_utf8(&data) {
                Ok(text) => state.dispatcher.dispatch(id, text).await,
                Err(_) => debug!(session = %id, "dropping non-UTF-8 frame"),
            },
            Ok(Message::Close(_)) => break,
            // tungstenite answers pings on its own
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => continue,
            Err(_) => break,
        }
    }

    // client went away: tear the session down
    lifecycle::close(&state.registry, &id);
    let _ = writer.await;
    info!(session = %id, "client disconnected");
}
