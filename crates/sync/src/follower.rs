//! Follower-side reconciliation.
//!
//! Followers keep only the highest-timestamp snapshot seen (strictly
//! newer wins; duplicates and reordered messages fold away) and derive a
//! correction: jump on index mismatch, snap on drift past the threshold,
//! and mirror the leader-authoritative booleans verbatim. Message loss is
//! not an error — the local clock free-runs until the next snapshot.

use cadence_common::{timing, TimeCode};
use tracing::{debug, trace};

use crate::message::StatusSnapshot;

/// What the session must do to converge on the leader's state.
#[derive(Clone, Debug, PartialEq)]
pub struct Correction {
    /// Jump directly to this segment, re-running slot assignment for it
    /// (never a sequential walk).
    pub jump_to: Option<usize>,
    /// Snap the local position to this value.
    pub snap_to: Option<TimeCode>,
    /// Leader-authoritative flags, mirrored verbatim.
    pub paused: bool,
    pub timer_active: bool,
    pub coach_mode: bool,
    pub over: bool,
}

/// Idempotent fold of inbound snapshots.
#[derive(Debug, Default)]
pub struct FollowerReconciler {
    last_applied_ms: Option<i64>,
}

impl FollowerReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_applied_ms(&self) -> Option<i64> {
        self.last_applied_ms
    }

    /// Fold one inbound snapshot. Returns `None` for stale, duplicate, or
    /// out-of-order messages (applying the same message twice never
    /// changes state). Otherwise returns the correction to apply.
    pub fn reconcile(
        &mut self,
        snapshot: &StatusSnapshot,
        timestamp_ms: i64,
        local_index: usize,
        local_position: TimeCode,
    ) -> Option<Correction> {
        if let Some(last) = self.last_applied_ms {
            if timestamp_ms <= last {
                trace!(
                    timestamp_ms,
                    last_applied_ms = last,
                    "Dropped stale or duplicate snapshot"
                );
                return None;
            }
        }
        self.last_applied_ms = Some(timestamp_ms);

        let remote_index = snapshot.video_index as usize;
        let remote_position = snapshot.position();

        let jump_to = (remote_index != local_index).then_some(remote_index);
        let snap_to = if jump_to.is_some() {
            // A jump lands on the leader's position within the new segment.
            Some(remote_position)
        } else {
            let drift = local_position.abs_diff(remote_position);
            if drift.as_millis() > timing::DRIFT_THRESHOLD_MS {
                debug!(
                    drift_ms = drift.as_millis(),
                    local_ms = local_position.as_millis(),
                    remote_ms = remote_position.as_millis(),
                    "Drift past threshold, snapping"
                );
                Some(remote_position)
            } else {
                None
            }
        };

        Some(Correction {
            jump_to,
            snap_to,
            paused: snapshot.is_paused,
            timer_active: snapshot.timer_tick,
            coach_mode: snapshot.is_showing_coach,
            over: snapshot.is_over,
        })
    }
}
