//! Session identifier type.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for session ID generation.
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identifier of one client connection and its (optional) remote shell.
///
/// Assigned once when the transport accepts a connection and used as the
/// registry key for the session's whole lifetime. Generated from an
/// atomic counter, unique within a process lifetime, displayed as
/// `term-XXXXXXXX` with X a hexadecimal digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl SessionId {
    /// Create a new unique session ID.
    pub fn new() -> Self {
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw u64 value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Create a SessionId from a raw u64 value.
    ///
    /// This is primarily for testing and deserialization.
    pub fn from_raw(value: u64) -> Self {
        Self(value)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "term-{:08x}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = crate::error::SshRelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix("term-")
            .and_then(|hex| u64::from_str_radix(hex, 16).ok())
            .map(SessionId)
            .ok_or_else(|| crate::error::SshRelayError::SessionNotFound(s.into()))
    }
}
