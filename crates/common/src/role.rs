//! Participant roles in a shared playback session.

use serde::{Deserialize, Serialize};

/// Role of this participant, fixed at session construction and threaded
/// through every component that branches on it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Owns the authoritative playback state and broadcasts it.
    Leader,
    /// Mirrors the leader's state with local drift correction; may send
    /// control requests.
    Follower,
    /// Mirrors like a follower but never transmits anything.
    Observer,
}

impl Role {
    /// Whether this participant's playback state is authoritative.
    pub fn is_leader(self) -> bool {
        matches!(self, Role::Leader)
    }

    /// Whether this participant applies inbound status broadcasts.
    pub fn mirrors(self) -> bool {
        matches!(self, Role::Follower | Role::Observer)
    }

    /// Whether this participant is allowed to send on the control channel.
    pub fn may_transmit(self) -> bool {
        matches!(self, Role::Leader | Role::Follower)
    }
}
