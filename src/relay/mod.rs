//! The relay core: dispatching, forwarding, liveness, and teardown.
//!
//! One [`Dispatcher`] routes inbound frames; [`engine`] runs one
//! forwarding task per active session; [`forwarder`], [`heartbeat`], and
//! [`lifecycle`] implement the command, liveness, and teardown paths.

pub mod dispatcher;
pub mod engine;
pub mod forwarder;
pub mod heartbeat;
pub mod lifecycle;

pub use dispatcher::Dispatcher;
