//! The realtime control-channel boundary.
//!
//! The conferencing platform provides topic-based, best-effort messaging
//! with a short per-message lifetime. This module only names the topics
//! and the trait; delivery guarantees are whatever the transport gives,
//! which is why the protocol folds by timestamp instead of trusting order.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{SyncError, SyncResult};

/// Topic names on the control channel.
pub mod topics {
    /// Leader → everyone: authoritative status snapshots.
    pub const VIDEO_STATUS: &str = "video_status";
    /// Anyone → leader: pause/play/seek control requests.
    pub const VIDEO_PAUSE: &str = "video_pause";
    /// Anyone → leader: ask for an immediate status broadcast.
    pub const GET_VIDEO_STATUS: &str = "get_video_status";
}

/// Outbound half of the platform's messaging. Fire-and-forget: a send
/// failure is logged by callers and never retried here.
pub trait ControlChannel: Send + Sync {
    fn send(&self, topic: &str, payload: &str, ttl_ms: u64) -> SyncResult<()>;
}

/// One inbound message as delivered by the transport's subscription
/// callback. `timestamp_ms` is transport-assigned and is what the
/// idempotent fold keys on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inbound {
    pub topic: String,
    pub payload: String,
    pub sender_id: String,
    pub timestamp_ms: i64,
}

/// A record of one sent message, for tests and diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sent {
    pub topic: String,
    pub payload: String,
    pub ttl_ms: u64,
}

/// In-memory channel: records sends, optionally fails them. Used by the
/// protocol tests and by hosts that want a loopback session.
#[derive(Clone, Default)]
pub struct MemoryChannel {
    sent: Arc<Mutex<Vec<Sent>>>,
    fail_sends: Arc<Mutex<bool>>,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything sent so far, in order.
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().clone()
    }

    /// Sent payloads on one topic.
    pub fn sent_on(&self, topic: &str) -> Vec<String> {
        self.sent
            .lock()
            .iter()
            .filter(|s| s.topic == topic)
            .map(|s| s.payload.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.sent.lock().clear();
    }

    /// Make subsequent sends fail (transport outage).
    pub fn set_failing(&self, failing: bool) {
        *self.fail_sends.lock() = failing;
    }
}

impl ControlChannel for MemoryChannel {
    fn send(&self, topic: &str, payload: &str, ttl_ms: u64) -> SyncResult<()> {
        if *self.fail_sends.lock() {
            return Err(SyncError::Channel("transport unavailable".into()));
        }
        self.sent.lock().push(Sent {
            topic: topic.to_string(),
            payload: payload.to_string(),
            ttl_ms,
        });
        Ok(())
    }
}
