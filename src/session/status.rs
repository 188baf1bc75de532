//! Session status state machine.

/// Lifecycle status of a relay session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// Transport connection accepted, no remote shell requested yet.
    #[default]
    Initialized,
    /// A connect is in flight against the remote host.
    Connecting,
    /// Remote shell attached; relay loop running.
    Active,
    /// Torn down. Terminal; the registry entry is gone.
    Closed,
}

impl SessionStatus {
    /// Check whether a transition to `target` is valid.
    ///
    /// Valid transitions:
    /// - Initialized -> Connecting
    /// - Connecting -> Active
    /// - any non-terminal state -> Closed
    pub fn can_transition_to(&self, target: SessionStatus) -> bool {
        use SessionStatus::*;
        matches!(
            (*self, target),
            (Initialized, Connecting)
                | (Connecting, Active)
                | (Initialized, Closed)
                | (Connecting, Closed)
                | (Active, Closed)
        )
    }

    /// Attempt to transition to a new status.
    pub fn transition_to(&mut self, target: SessionStatus) -> crate::Result<()> {
        if self.can_transition_to(target) {
            *self = target;
            Ok(())
        } else {
            Err(crate::error::SshRelayError::InvalidTransition {
                from: *self,
                to: target,
            })
        }
    }

    /// Check if this is the terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Closed)
    }
}
