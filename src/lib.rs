//! # ssh-relay
//!
//! A WebSocket-to-SSH terminal relay. Browser clients open a WebSocket,
//! send a `connect` request naming an SSH host, and from then on drive a
//! remote interactive shell: keystrokes flow down as `command` frames,
//! shell output streams back byte-exact, and `heartbeat` frames keep
//! intermediaries from idling the connection out.
//!
//! ## Architecture
//!
//! - **api** - axum HTTP/WebSocket surface; one session per socket
//! - **protocol** - inbound frame format (`connect` / `command` / `heartbeat`)
//! - **session** - registry of live sessions and their lifecycle states
//! - **ssh** - russh-backed shell connector and per-session channel task
//! - **relay** - dispatcher, output pump, input forwarder, teardown
//!
//! ## Quick Start
//!
//! ```no_run
//! use ssh_relay::api::{serve, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> ssh_relay::Result<()> {
//!     ssh_relay::logging::init();
//!     serve(ServerConfig::new("127.0.0.1", 8080)).await
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod relay;
pub mod session;
pub mod ssh;
pub mod transport;

pub use error::{Result, SshRelayError};
pub use protocol::{Geometry, TerminalRequest};
pub use relay::Dispatcher;
pub use session::{SessionId, SessionRegistry, SessionStatus};
pub use ssh::ShellHandle;
pub use transport::ClientSink;
