//! Session management module.
//!
//! Types for identifying sessions, tracking their lifecycle status, and
//! storing them in the shared registry.

mod id;
mod registry;
mod status;

pub use id::SessionId;
pub use registry::{SessionEntry, SessionRegistry};
pub use status::SessionStatus;
