//! The fixed timing windows that drive overlay visibility.
//!
//! All window edges are compatibility constants shared with the leader UI
//! (see `cadence_common::timing`); the math here only decides whether a
//! window is open at a position and how far into its ramp it is.

use cadence_common::{timing, TimeCode};
use cadence_program::ControlKind;

/// Visibility window with an entry ramp.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Window {
    /// Window opens (ramp begins).
    pub start: TimeCode,
    /// Ramp ends; full opacity from here.
    pub ramp_end: TimeCode,
    /// Window closes.
    pub end: TimeCode,
}

impl Window {
    /// Opacity at `position`: `None` outside the window, ramping linearly
    /// over `[start, ramp_end)`, full inside.
    pub fn opacity_at(&self, position: TimeCode) -> Option<f32> {
        if position < self.start || position >= self.end {
            return None;
        }
        let ramp_len = (self.ramp_end - self.start).as_millis();
        if ramp_len <= 0.0 || position >= self.ramp_end {
            return Some(1.0);
        }
        let progress = (position - self.start).as_millis() / ramp_len;
        Some(progress.clamp(0.0, 1.0) as f32)
    }

    pub fn contains(&self, position: TimeCode) -> bool {
        position >= self.start && position < self.end
    }
}

/// Next-clip preview window for a segment.
///
/// Ordinary kinds announce the upcoming clip at the tail of the segment:
/// the thumbnail enters over one second starting ten seconds before the
/// end and holds until the boundary. Rest screens instead show it early —
/// entering three seconds after the start — and drop it one second before
/// the end so the incoming clip owns the transition.
pub fn preview_window(kind: Option<ControlKind>, duration: TimeCode) -> Window {
    let ramp = TimeCode::from_millis(timing::PREVIEW_RAMP_MS);
    if kind == Some(ControlKind::Rest) {
        let start = TimeCode::from_millis(timing::REST_PREVIEW_START_MS);
        let end = duration - TimeCode::from_millis(timing::REST_PREVIEW_TAIL_MS);
        Window {
            start,
            ramp_end: start + ramp,
            end,
        }
    } else {
        let start = (duration - TimeCode::from_millis(timing::PREVIEW_LEAD_MS))
            .clamp(TimeCode::ZERO, duration);
        Window {
            start,
            ramp_end: start + ramp,
            end: duration,
        }
    }
}

/// Title banner opacity: fades in over the first second, fades out over
/// the last fifteen. Short segments take the dimmer of the two ramps.
pub fn title_opacity(position: TimeCode, duration: TimeCode) -> f32 {
    let fade_in = (position.as_millis() / timing::TITLE_FADE_IN_MS).clamp(0.0, 1.0);
    let remaining = (duration - position).as_millis();
    let fade_out = (remaining / timing::TITLE_FADE_OUT_MS).clamp(0.0, 1.0);
    fade_in.min(fade_out) as f32
}

/// Switching-hint glyph window, centered on the segment midpoint.
pub fn glyph_window(duration: TimeCode) -> Window {
    let half = TimeCode::from_millis(timing::GLYPH_WINDOW_MS / 2.0);
    let mid = TimeCode::from_secs(duration.as_secs() / 2.0);
    let start = (mid - half).clamp(TimeCode::ZERO, duration);
    Window {
        start,
        ramp_end: start,
        end: (mid + half).clamp(TimeCode::ZERO, duration),
    }
}

/// Where the countdown timer overlay starts within a segment.
pub fn timer_start(duration: TimeCode) -> TimeCode {
    (duration - TimeCode::from_millis(timing::TIMER_LEAD_MS)).clamp(TimeCode::ZERO, duration)
}

/// Progress-bar fill fraction.
pub fn progress_fraction(position: TimeCode, duration: TimeCode) -> f32 {
    if duration.as_millis() <= 0.0 {
        return 0.0;
    }
    (position.as_millis() / duration.as_millis()).clamp(0.0, 1.0) as f32
}
