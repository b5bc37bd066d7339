//! `cadence-sync` — Leader/follower state reconciliation over a lossy,
//! best-effort control channel.
//!
//! The leader broadcasts [`StatusSnapshot`]s on every state change and on
//! a fixed cadence; followers fold inbound snapshots by transport
//! timestamp (strictly newer wins) and derive a [`Correction`]: jump on
//! segment mismatch, snap on drift past the threshold, mirror the
//! leader-authoritative flags. No acknowledgement, retry, or ordering is
//! assumed anywhere.

pub mod channel;
pub mod follower;
pub mod leader;
pub mod message;

mod error;

pub use channel::{topics, ControlChannel, Inbound, MemoryChannel, Sent};
pub use error::{SyncError, SyncResult};
pub use follower::{Correction, FollowerReconciler};
pub use leader::LeaderBroadcaster;
pub use message::{ControlRequest, StatusSnapshot};
