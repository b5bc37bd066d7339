//! Wire message types.
//!
//! Payload shapes are fixed by the conferencing platform's existing
//! clients and must round-trip byte-compatible JSON:
//!
//! - status broadcast: `{"id":"VideoStatus","videoIndex":…,"currentPos":…,
//!   "isPaused":…,"isOver":…,"timerTick":…,"timerTickPos":…,
//!   "isShowingCoach":…}`
//! - control request: the literal string `Pause` or `Play`, or
//!   `{"id":"Play","videoIndex":…}` for a seek.

use cadence_common::TimeCode;
use cadence_playback::PlaybackState;
use serde::{Deserialize, Serialize};

use crate::error::{SyncError, SyncResult};

/// The leader's authoritative state snapshot, as broadcast on the status
/// topic.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "id", rename = "VideoStatus", rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub video_index: u64,
    /// Position within the segment, integer milliseconds.
    pub current_pos: i64,
    pub is_paused: bool,
    pub is_over: bool,
    /// Countdown timer overlay running.
    pub timer_tick: bool,
    /// The timer overlay's own position, seconds.
    pub timer_tick_pos: f64,
    pub is_showing_coach: bool,
}

impl StatusSnapshot {
    /// Capture the broadcastable view of a playback state.
    pub fn capture(state: &PlaybackState, timer_position: TimeCode) -> Self {
        Self {
            video_index: state.segment_index as u64,
            current_pos: state.position.as_millis().round() as i64,
            is_paused: state.is_paused(),
            is_over: state.is_over(),
            timer_tick: state.timer_active,
            timer_tick_pos: timer_position.as_secs(),
            is_showing_coach: state.coach_mode_active,
        }
    }

    pub fn position(&self) -> TimeCode {
        TimeCode::from_millis(self.current_pos as f64)
    }

    pub fn encode(&self) -> SyncResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn decode(payload: &str) -> SyncResult<Self> {
        Ok(serde_json::from_str(payload)?)
    }
}

/// A control request any participant may send; only the leader acts on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlRequest {
    Pause,
    Play,
    SeekTo { index: usize },
}

/// JSON body of a seek request.
#[derive(Serialize, Deserialize)]
#[serde(tag = "id", rename = "Play", rename_all = "camelCase")]
struct SeekBody {
    video_index: u64,
}

impl ControlRequest {
    /// Encode to the control topic's payload format.
    pub fn encode(&self) -> SyncResult<String> {
        match self {
            ControlRequest::Pause => Ok("Pause".to_string()),
            ControlRequest::Play => Ok("Play".to_string()),
            ControlRequest::SeekTo { index } => Ok(serde_json::to_string(&SeekBody {
                video_index: *index as u64,
            })?),
        }
    }

    /// Decode a control payload: the bare literals first, then the JSON
    /// seek shape.
    pub fn decode(payload: &str) -> SyncResult<Self> {
        match payload.trim() {
            "Pause" => Ok(ControlRequest::Pause),
            "Play" => Ok(ControlRequest::Play),
            other => match serde_json::from_str::<SeekBody>(other) {
                Ok(body) => Ok(ControlRequest::SeekTo {
                    index: body.video_index as usize,
                }),
                Err(_) => Err(SyncError::UnrecognizedPayload {
                    payload: payload.to_string(),
                }),
            },
        }
    }
}
