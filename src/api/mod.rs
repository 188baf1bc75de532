//! HTTP/WebSocket surface of the relay.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /api/v1` - Relay information (version, live session count)
//! - `WS  /webssh` - Terminal relay endpoint; one session per connection
//!
//! ## Example
//!
//! ```no_run
//! use ssh_relay::api::{serve, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> ssh_relay::Result<()> {
//!     let config = ServerConfig::new("127.0.0.1", 8080);
//!     serve(config).await
//! }
//! ```

pub mod handlers;
pub mod router;
pub mod websocket;

pub use handlers::AppState;
pub use router::{create_router, create_router_with_state, serve, serve_with_state, ServerConfig};
