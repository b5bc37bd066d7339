//! Core types with newtype pattern for type safety.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Time code in seconds (f64 precision).
///
/// Playback positions, segment durations, and drift deltas all use this
/// type; the wire protocol converts to integer milliseconds at the boundary.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct TimeCode(pub f64);

impl TimeCode {
    pub const ZERO: Self = Self(0.0);

    pub fn from_secs(secs: f64) -> Self {
        Self(secs)
    }

    pub fn from_millis(millis: f64) -> Self {
        Self(millis / 1000.0)
    }

    pub fn as_secs(self) -> f64 {
        self.0
    }

    pub fn as_millis(self) -> f64 {
        self.0 * 1000.0
    }

    /// Absolute difference between two time codes.
    pub fn abs_diff(self, other: Self) -> Self {
        Self((self.0 - other.0).abs())
    }

    /// Clamp to the `[lo, hi]` range.
    pub fn clamp(self, lo: Self, hi: Self) -> Self {
        Self(self.0.clamp(lo.0, hi.0))
    }
}

impl Add for TimeCode {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for TimeCode {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Display for TimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_secs = self.0;
        let mins = (total_secs / 60.0) as u32;
        let secs = total_secs % 60.0;
        write!(f, "{mins:02}:{secs:06.3}")
    }
}

/// Video/image resolution.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const HD: Self = Self {
        width: 1920,
        height: 1080,
    };
    /// Default outbound-stream size for the shared session view.
    pub const STREAM: Self = Self {
        width: 1280,
        height: 720,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Byte size for RGBA8 pixel data.
    pub fn rgba_byte_size(self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Reference to a loadable media asset (video, image, audio, or a derived
/// raster such as a rendered text line).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaRef(pub String);

impl MediaRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Reference for the raster of one rendered text line.
    ///
    /// Text rasterization happens at the asset boundary; the engine only
    /// decides layout and opacity and keys the raster like any other frame.
    pub fn text_line(line: &str) -> Self {
        Self(format!("text:{line}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timecode_millis_roundtrip() {
        let tc = TimeCode::from_millis(13200.0);
        assert!((tc.as_secs() - 13.2).abs() < 1e-9);
        assert!((tc.as_millis() - 13200.0).abs() < 1e-9);
    }

    #[test]
    fn timecode_abs_diff_is_symmetric() {
        let a = TimeCode::from_secs(12.0);
        let b = TimeCode::from_secs(13.2);
        assert!((a.abs_diff(b).as_millis() - 1200.0).abs() < 1e-9);
        assert!((b.abs_diff(a).as_millis() - 1200.0).abs() < 1e-9);
    }

    #[test]
    fn timecode_display() {
        let tc = TimeCode::from_secs(65.5);
        assert_eq!(tc.to_string(), "01:05.500");
    }

    #[test]
    fn resolution_byte_sizes() {
        assert_eq!(Resolution::STREAM.rgba_byte_size(), 1280 * 720 * 4);
        assert_eq!(Resolution::HD.pixel_count(), 1920 * 1080);
    }

    #[test]
    fn text_line_ref_is_prefixed() {
        let r = MediaRef::text_line("Warm Up");
        assert_eq!(r.as_str(), "text:Warm Up");
    }
}
