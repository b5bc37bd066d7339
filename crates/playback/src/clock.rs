//! Playback position derivation.
//!
//! The clock produces one position per tick from the most authoritative
//! source available: normally the active primary-video element, but once
//! the countdown timer overlay is running, the timer is trusted instead —
//! it directly drives the transition countdown, so a disagreement beyond
//! the drift threshold snaps the clock to the timer-derived value.

use cadence_common::{timing, TimeCode};
use tracing::debug;

/// Sample of the countdown timer overlay's own playback.
#[derive(Copy, Clone, Debug)]
pub struct TimerSample {
    /// The overlay element's own position.
    pub position: TimeCode,
    /// Offset of the overlay's start within the segment (segment duration
    /// minus the timer lead, clamped at zero for short segments).
    pub baseline: TimeCode,
}

impl TimerSample {
    /// Where the timer says the segment position is.
    pub fn segment_position(self) -> TimeCode {
        self.baseline + self.position
    }

    /// Baseline for a segment of the given duration.
    pub fn baseline_for(duration: TimeCode) -> TimeCode {
        let lead = TimeCode::from_millis(timing::TIMER_LEAD_MS);
        if duration > lead {
            duration - lead
        } else {
            TimeCode::ZERO
        }
    }
}

/// Monotonic, correctable position within the current segment.
#[derive(Debug, Default)]
pub struct PlaybackClock {
    position: TimeCode,
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> TimeCode {
        self.position
    }

    /// Reset to the start of a segment (natural advance or seek).
    pub fn reset(&mut self) {
        self.position = TimeCode::ZERO;
    }

    /// Force the position (follower drift snap).
    pub fn set(&mut self, position: TimeCode) {
        self.position = position;
    }

    /// Sample the position sources for one tick. Called only while playing;
    /// the clock is frozen while paused.
    pub fn sample(&mut self, element_position: TimeCode, timer: Option<TimerSample>) -> TimeCode {
        let mut next = element_position;

        if let Some(timer) = timer {
            let timer_position = timer.segment_position();
            let drift = timer_position.abs_diff(next);
            if drift.as_millis() > timing::DRIFT_THRESHOLD_MS {
                debug!(
                    element_ms = next.as_millis(),
                    timer_ms = timer_position.as_millis(),
                    drift_ms = drift.as_millis(),
                    "Clock snapped to timer overlay"
                );
                next = timer_position;
            }
        }

        self.position = next;
        self.position
    }

    /// Whether the sampled position completes a segment of `duration`.
    /// The clock only reports; advancing the segment index is the state
    /// machine's job.
    pub fn is_complete(&self, duration: TimeCode) -> bool {
        self.position.as_millis() >= duration.as_millis()
    }
}
