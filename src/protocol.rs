//! Wire types for the client-facing message protocol.
//!
//! Inbound frames are JSON objects tagged by an `operate` field. Outbound
//! traffic is mostly raw shell output; the only framed replies are the
//! fixed heartbeat acknowledgment and `"ERROR : <message>"` reports.

use serde::{Deserialize, Serialize};

/// Fixed acknowledgment sent in reply to a heartbeat on a live session.
pub const HEARTBEAT_ACK: &str = "Heartbeat healthy";

/// Prefix of error reports sent to the client.
pub const ERROR_PREFIX: &str = "ERROR : ";

/// Terminal dimensions propagated to the remote pty.
///
/// Last write wins; the current value is re-asserted on the remote handle
/// before every command write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geometry {
    /// Columns.
    pub cols: u32,
    /// Rows.
    pub rows: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            cols: 80,
            rows: 24,
            width: 640,
            height: 480,
        }
    }
}

fn default_port() -> u16 {
    22
}

/// A decoded inbound frame.
///
/// Unknown `operate` values land in [`TerminalRequest::Unsupported`],
/// which the dispatcher treats differently from undecodable JSON: the
/// former closes the session, the latter only drops the frame.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "operate", rename_all = "lowercase")]
pub enum TerminalRequest {
    /// Open a remote shell for this session.
    Connect {
        username: String,
        host: String,
        #[serde(default = "default_port")]
        port: u16,
        password: String,
        #[serde(flatten)]
        geometry: Geometry,
    },
    /// Input bytes for the remote shell, with the geometry to apply first.
    Command {
        #[serde(default)]
        command: String,
        #[serde(flatten)]
        geometry: Geometry,
    },
    /// Liveness probe for this session's remote connection.
    Heartbeat,
    #[serde(other)]
    Unsupported,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_parse() {
        let json = r#"{"operate":"connect","username":"u","host":"127.0.0.1","port":2222,
                       "password":"p","cols":100,"rows":30,"width":800,"height":600}"#;
        let req: TerminalRequest = serde_json::from_str(json).unwrap();
        match req {
            TerminalRequest::Connect {
                username,
                host,
                port,
                password,
                geometry,
            } => {
                assert_eq!(username, "u");
                assert_eq!(host, "127.0.0.1");
                assert_eq!(port, 2222);
                assert_eq!(password, "p");
                assert_eq!(geometry.cols, 100);
                assert_eq!(geometry.rows, 30);
                assert_eq!(geometry.width, 800);
                assert_eq!(geometry.height, 600);
            }
            other => panic!("expected connect, got {other:?}"),
        }
    }

    #[test]
    fn test_connect_defaults() {
        let json = r#"{"operate":"connect","username":"u","host":"h","password":"p"}"#;
        let req: TerminalRequest = serde_json::from_str(json).unwrap();
        match req {
            TerminalRequest::Connect { port, geometry, .. } => {
                assert_eq!(port, 22);
                assert_eq!(geometry, Geometry::default());
            }
            other => panic!("expected connect, got {other:?}"),
        }
    }

    #[test]
    fn test_command_parse() {
        let json = r#"{"operate":"command","command":"ls\n","cols":120,"rows":40}"#;
        let req: TerminalRequest = serde_json::from_str(json).unwrap();
        match req {
            TerminalRequest::Command { command, geometry } => {
                assert_eq!(command, "ls\n");
                assert_eq!(geometry.cols, 120);
                assert_eq!(geometry.rows, 40);
                // pixel fields absent: defaults
                assert_eq!(geometry.width, 640);
                assert_eq!(geometry.height, 480);
            }
            other => panic!("expected command, got {other:?}"),
        }
    }

    #[test]
    fn test_command_may_be_empty() {
        let json = r#"{"operate":"command"}"#;
        let req: TerminalRequest = serde_json::from_str(json).unwrap();
        match req {
            TerminalRequest::Command { command, .. } => assert!(command.is_empty()),
            other => panic!("expected command, got {other:?}"),
        }
    }

    #[test]
    fn test_heartbeat_parse() {
        let req: TerminalRequest = serde_json::from_str(r#"{"operate":"heartbeat"}"#).unwrap();
        assert!(matches!(req, TerminalRequest::Heartbeat));
    }

    #[test]
    fn test_unknown_operation() {
        let req: TerminalRequest = serde_json::from_str(r#"{"operate":"reboot"}"#).unwrap();
        assert!(matches!(req, TerminalRequest::Unsupported));
    }

    #[test]
    fn test_malformed_is_error() {
        assert!(serde_json::from_str::<TerminalRequest>("not json").is_err());
        assert!(serde_json::from_str::<TerminalRequest>(r#"{"command":"ls"}"#).is_err());
    }

    #[test]
    fn test_geometry_default() {
        let g = Geometry::default();
        assert_eq!((g.cols, g.rows, g.width, g.height), (80, 24, 640, 480));
    }
}
