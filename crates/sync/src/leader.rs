//! Leader-side broadcasting.
//!
//! The leader sends a status snapshot on every state change (advance,
//! pause, resume, seek) and on a fixed cadence regardless of change, so
//! followers recover from any number of lost messages within one period.

use cadence_common::timing;
use tracing::{debug, warn};

use crate::channel::{topics, ControlChannel};
use crate::message::StatusSnapshot;

/// Tracks the periodic broadcast cadence and pushes snapshots out.
#[derive(Debug, Default)]
pub struct LeaderBroadcaster {
    last_broadcast_ms: Option<f64>,
}

impl LeaderBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the periodic cadence calls for a broadcast at `now_ms`
    /// (milliseconds on the session's monotonic timeline).
    pub fn due(&self, now_ms: f64) -> bool {
        match self.last_broadcast_ms {
            None => true,
            Some(last) => now_ms - last >= timing::BROADCAST_INTERVAL_MS,
        }
    }

    /// Broadcast a snapshot now. Best-effort: a transport failure is
    /// logged and the state free-runs until the next attempt.
    pub fn broadcast(
        &mut self,
        channel: &dyn ControlChannel,
        snapshot: &StatusSnapshot,
        now_ms: f64,
    ) {
        self.last_broadcast_ms = Some(now_ms);

        let payload = match snapshot.encode() {
            Ok(payload) => payload,
            Err(error) => {
                warn!(%error, "Status snapshot failed to encode");
                return;
            }
        };

        match channel.send(topics::VIDEO_STATUS, &payload, timing::STATUS_TTL_MS) {
            Ok(()) => debug!(
                segment = snapshot.video_index,
                position_ms = snapshot.current_pos,
                paused = snapshot.is_paused,
                "Status broadcast"
            ),
            Err(error) => warn!(%error, "Status broadcast failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::MemoryChannel;

    fn snapshot(index: u64) -> StatusSnapshot {
        StatusSnapshot {
            video_index: index,
            current_pos: 0,
            is_paused: false,
            is_over: false,
            timer_tick: false,
            timer_tick_pos: 0.0,
            is_showing_coach: false,
        }
    }

    #[test]
    fn first_broadcast_is_always_due() {
        let broadcaster = LeaderBroadcaster::new();
        assert!(broadcaster.due(0.0));
    }

    #[test]
    fn cadence_gates_periodic_broadcasts() {
        let channel = MemoryChannel::new();
        let mut broadcaster = LeaderBroadcaster::new();

        broadcaster.broadcast(&channel, &snapshot(0), 0.0);
        assert!(!broadcaster.due(500.0));
        assert!(broadcaster.due(1000.0));
    }

    #[test]
    fn broadcast_sends_on_status_topic() {
        let channel = MemoryChannel::new();
        let mut broadcaster = LeaderBroadcaster::new();
        broadcaster.broadcast(&channel, &snapshot(3), 10.0);

        let sent = channel.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].topic, topics::VIDEO_STATUS);
        assert_eq!(sent[0].ttl_ms, timing::STATUS_TTL_MS);
        assert!(sent[0].payload.contains("\"videoIndex\":3"));
    }

    #[test]
    fn send_failure_is_swallowed() {
        let channel = MemoryChannel::new();
        channel.set_failing(true);
        let mut broadcaster = LeaderBroadcaster::new();
        broadcaster.broadcast(&channel, &snapshot(0), 0.0);
        // Cadence still advanced; the next attempt waits a full period.
        assert!(!broadcaster.due(500.0));
    }
}
