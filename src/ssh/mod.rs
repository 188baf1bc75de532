//! SSH connectivity layer.
//!
//! [`connector::open_shell`] turns connect parameters into a live shell;
//! [`ShellHandle`]/[`ShellOutput`] are the narrow capability the rest of
//! the relay sees. Nothing outside this module touches russh types.

mod connector;
mod handle;

pub use connector::{open_shell, ConnectParams, CHANNEL_OPEN_TIMEOUT, CONNECT_TIMEOUT};
pub use handle::{ShellCommand, ShellEndpoint, ShellHandle, ShellOutput};
