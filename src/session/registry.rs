//! Concurrency-safe session registry.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Instant;

use super::{SessionId, SessionStatus};
use crate::error::SshRelayError;
use crate::protocol::Geometry;
use crate::ssh::ShellHandle;
use crate::transport::ClientSink;
use crate::Result;

/// One relay session: a client connection plus, once connected, its
/// remote shell handle.
#[derive(Debug, Clone)]
pub struct SessionEntry {
    /// Registry key, assigned by the transport layer.
    pub id: SessionId,
    /// Current lifecycle status.
    pub status: SessionStatus,
    /// Current terminal geometry, last write wins.
    pub geometry: Geometry,
    /// Remote shell handle; present only while the session is `Active`.
    pub shell: Option<ShellHandle>,
    /// Send primitive towards the client.
    pub client: ClientSink,
    /// Time the session was registered.
    pub created_at: Instant,
}

impl SessionEntry {
    fn new(id: SessionId, client: ClientSink) -> Self {
        Self {
            id,
            status: SessionStatus::Initialized,
            geometry: Geometry::default(),
            shell: None,
            client,
            created_at: Instant::now(),
        }
    }
}

/// Thread-safe store mapping session IDs to their entries.
///
/// The registry is the only shared mutable state in the relay. It is
/// accessed from the dispatch path, from connect tasks, and from relay
/// tasks; operations on the same ID are linearizable, and `remove` is the
/// single guard for all teardown side effects (first caller wins, later
/// callers observe absence).
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, SessionEntry>>,
}

impl SessionRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Register a session, creating or overwriting the entry for `id`.
    pub fn register(&self, id: SessionId, client: ClientSink) -> Result<()> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| SshRelayError::LockPoisoned)?;

        sessions.insert(id, SessionEntry::new(id, client));
        Ok(())
    }

    /// Get a clone of the entry for `id`.
    pub fn get(&self, id: &SessionId) -> Result<Option<SessionEntry>> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| SshRelayError::LockPoisoned)?;
        Ok(sessions.get(id).cloned())
    }

    /// Update an entry in place under the write lock.
    ///
    /// Returns an error if the session doesn't exist.
    pub fn update<F>(&self, id: &SessionId, f: F) -> Result<()>
    where
        F: FnOnce(&mut SessionEntry),
    {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| SshRelayError::LockPoisoned)?;

        let entry = sessions
            .get_mut(id)
            .ok_or_else(|| SshRelayError::SessionNotFound(id.to_string()))?;

        f(entry);
        Ok(())
    }

    /// Remove the entry for `id`, returning it if present.
    ///
    /// Idempotent: removing an absent ID is not an error.
    pub fn remove(&self, id: &SessionId) -> Result<Option<SessionEntry>> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| SshRelayError::LockPoisoned)?;
        Ok(sessions.remove(id))
    }

    /// Number of live sessions.
    pub fn count(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    /// List all live session IDs.
    pub fn list_ids(&self) -> Result<Vec<SessionId>> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| SshRelayError::LockPoisoned)?;
        Ok(sessions.keys().copied().collect())
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
