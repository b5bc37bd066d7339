//! Engine configuration and the fixed timing constants.
//!
//! The timing values are compatibility constants shared with the leader UI;
//! they are deliberately named configuration, not derived values.

use serde::{Deserialize, Serialize};

use crate::types::Resolution;

/// Fixed timing constants, all in milliseconds unless noted.
pub mod timing {
    /// Cadence of the compositor/clock tick loop.
    pub const TICK_INTERVAL_MS: f64 = 30.0;

    /// Position disagreement beyond which a correction snaps rather than
    /// free-runs. Applies both to the timer-overlay clock source and to
    /// follower drift against a leader broadcast.
    pub const DRIFT_THRESHOLD_MS: f64 = 500.0;

    /// How far before the segment end the next-clip preview enters.
    pub const PREVIEW_LEAD_MS: f64 = 10_000.0;

    /// Length of the preview fade/slide-in ramp.
    pub const PREVIEW_RAMP_MS: f64 = 1_000.0;

    /// For rest screens the preview enters this far after the segment start
    /// instead, and leaves this long before the end.
    pub const REST_PREVIEW_START_MS: f64 = 3_000.0;
    pub const REST_PREVIEW_TAIL_MS: f64 = 1_000.0;

    /// Title banner fade-in from the segment start.
    pub const TITLE_FADE_IN_MS: f64 = 1_000.0;

    /// Title banner fade-out window before the segment end.
    pub const TITLE_FADE_OUT_MS: f64 = 15_000.0;

    /// How far before the segment end the countdown timer overlay starts.
    pub const TIMER_LEAD_MS: f64 = 10_000.0;

    /// Length of the switching-hint glyph window, centered on the segment
    /// midpoint.
    pub const GLYPH_WINDOW_MS: f64 = 4_000.0;

    /// Leader status broadcast cadence (also sent on every state change).
    pub const BROADCAST_INTERVAL_MS: f64 = 1_000.0;

    /// Transport lifetime for status messages; older copies are dropped by
    /// the channel, not by the protocol.
    pub const STATUS_TTL_MS: u64 = 5_000;

    /// Per-sample gain ramp length in the mixer.
    pub const GAIN_RAMP_MS: f64 = 20.0;
}

/// Top-level engine configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Output raster size of the composed stream.
    pub resolution: Resolution,
    /// Mixer output sample rate in Hz.
    pub sample_rate: u32,
    /// Mixer output channel count (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Initial background-music gain, 0.0..=1.0.
    pub music_gain: f32,
    /// Initial coach/trainer gain, 0.0..=1.0.
    pub trainer_gain: f32,
    /// Radius of the circular switching-glyph mask, as a fraction of the
    /// sprite's smaller dimension.
    pub glyph_mask_radius: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::STREAM,
            sample_rate: 48_000,
            channels: 2,
            music_gain: 0.6,
            trainer_gain: 1.0,
            glyph_mask_radius: 0.45,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_stereo_stream() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.resolution, Resolution::STREAM);
        assert_eq!(cfg.channels, 2);
        assert!(cfg.music_gain <= 1.0 && cfg.music_gain >= 0.0);
    }

    #[test]
    fn drift_threshold_is_half_a_second() {
        assert!((timing::DRIFT_THRESHOLD_MS - 500.0).abs() < f64::EPSILON);
    }
}
