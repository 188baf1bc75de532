//! Error types for ssh-relay.

use thiserror::Error;

use crate::session::SessionStatus;

/// Main error type for ssh-relay operations.
#[derive(Error, Debug)]
pub enum SshRelayError {
    /// Session with the given ID was not found.
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// Inbound payload could not be decoded.
    #[error("malformed payload: {0}")]
    Protocol(String),

    /// Inbound message carried an operation the relay does not handle.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Remote connect or shell-channel open failed.
    #[error("connection error: {0}")]
    Connection(String),

    /// Read or write against the remote shell failed.
    #[error("relay I/O error: {0}")]
    RelayIo(String),

    /// The client-facing transport is gone.
    #[error("transport closed")]
    TransportClosed,

    /// Invalid session status transition attempted.
    #[error("invalid status transition from {from:?} to {to:?}")]
    InvalidTransition {
        from: SessionStatus,
        to: SessionStatus,
    },

    /// Internal lock was poisoned.
    #[error("internal lock poisoned")]
    LockPoisoned,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for ssh-relay operations.
pub type Result<T> = std::result::Result<T, SshRelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_not_found_display() {
        let err = SshRelayError::SessionNotFound("term-00000001".into());
        assert!(err.to_string().contains("term-00000001"));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_connection_display() {
        let err = SshRelayError::Connection("auth failed".into());
        assert!(err.to_string().contains("connection error"));
        assert!(err.to_string().contains("auth failed"));
    }

    #[test]
    fn test_unsupported_operation_display() {
        let err = SshRelayError::UnsupportedOperation("reboot".into());
        assert!(err.to_string().contains("unsupported operation"));
        assert!(err.to_string().contains("reboot"));
    }

    #[test]
    fn test_invalid_transition_display() {
        let err = SshRelayError::InvalidTransition {
            from: SessionStatus::Closed,
            to: SessionStatus::Active,
        };
        assert!(err.to_string().contains("Closed"));
        assert!(err.to_string().contains("Active"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: SshRelayError = io_err.into();
        assert!(matches!(err, SshRelayError::Io(_)));
        assert!(err.to_string().contains("I/O error"));
    }
}
