//! Playback state machine: Idle → Playing ⇄ Paused → Over.

use cadence_common::TimeCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Top-level playback phase. `Over` is terminal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Idle,
    Playing,
    Paused,
    Over,
}

/// Outcome of a natural segment advance.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the next segment.
    Next(usize),
    /// Ran past the last segment; playback is over.
    Finished,
}

/// The playback state snapshot every component reads each tick.
///
/// Mutated only by the state machine methods below on the leader, or by the
/// sync correction logic on followers — never directly by renderers.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PlaybackState {
    pub phase: Phase,
    pub segment_index: usize,
    pub position: TimeCode,
    /// The countdown timer overlay is running.
    pub timer_active: bool,
    /// The next-clip preview window is open (sub-state of Playing; never
    /// blocks the clock).
    pub showing_next_clip_preview: bool,
    /// The coach inset region is visible.
    pub coach_mode_active: bool,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::Over
    }

    /// Begin playback from Idle (or resume from Paused).
    pub fn play(&mut self) {
        if self.phase == Phase::Over {
            return;
        }
        self.phase = Phase::Playing;
        debug!(segment = self.segment_index, position = %self.position, "Playback started");
    }

    /// Pause at the current position. The clock freezes with it.
    pub fn pause(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        self.phase = Phase::Paused;
        debug!(segment = self.segment_index, position = %self.position, "Playback paused");
    }

    /// Natural advance past a completed segment. Increments the index by
    /// exactly one and resets the position; running past the last segment
    /// ends playback instead of indexing out of range.
    pub fn advance(&mut self, segment_count: usize) -> Advance {
        let next = self.segment_index + 1;
        self.position = TimeCode::ZERO;
        self.timer_active = false;
        self.showing_next_clip_preview = false;

        if next >= segment_count {
            self.phase = Phase::Over;
            debug!(segments = segment_count, "Program complete");
            return Advance::Finished;
        }

        self.segment_index = next;
        debug!(segment = next, "Advanced to next segment");
        Advance::Next(next)
    }

    /// Direct jump to a segment (seek request or follower correction).
    pub fn seek_to(&mut self, index: usize, segment_count: usize) {
        if index >= segment_count {
            self.finish();
            return;
        }
        self.segment_index = index;
        self.position = TimeCode::ZERO;
        self.timer_active = false;
        self.showing_next_clip_preview = false;
        debug!(segment = index, "Seeked to segment");
    }

    /// Force the terminal state from anywhere (external session-over
    /// signal, or the natural end of the program).
    pub fn finish(&mut self) {
        if self.phase == Phase::Over {
            return;
        }
        self.phase = Phase::Over;
        self.timer_active = false;
        self.showing_next_clip_preview = false;
        debug!("Playback over");
    }
}
