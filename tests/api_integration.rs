//! HTTP surface tests, driven through the router with tower's oneshot.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use ssh_relay::api::{create_router, create_router_with_state, AppState};
use ssh_relay::session::SessionId;
use ssh_relay::transport::ClientSink;

#[tokio::test]
async fn health_returns_ok() {
    let router = create_router();

    let response = router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn api_info_reports_version_and_sessions() {
    let state = AppState::new();
    let id = SessionId::new();
    let (sink, _frames) = ClientSink::channel();
    state.registry.register(id, sink).unwrap();

    let router = create_router_with_state(state);
    let response = router
        .oneshot(Request::builder().uri("/api/v1").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let info: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(info["name"], "ssh-relay");
    assert_eq!(info["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(info["status"], "running");
    assert_eq!(info["sessions"], 1);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let router = create_router();

    let response = router
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn websocket_route_rejects_plain_get() {
    let router = create_router();

    // no upgrade headers, so the handshake must fail
    let response = router
        .oneshot(Request::builder().uri("/webssh").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_ne!(response.status(), StatusCode::OK);
}
