//! Scene layer descriptions handed to the compositor.

use cadence_common::MediaRef;
use cadence_program::SwitchingMode;

/// Destination rectangle in output pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// What a layer draws.
#[derive(Clone, Debug, PartialEq)]
pub enum LayerContent {
    /// The current frame of a playing media source.
    Frame(MediaRef),
    /// A static asset raster (thumbnail, glyph, timer, text line).
    Sprite(MediaRef),
    /// A solid RGBA fill (scrims, progress bar, placeholders).
    Solid([u8; 4]),
}

/// One layer of the composed output, bottom-to-top by `z_order`.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneLayer {
    pub content: LayerContent,
    pub rect: Rect,
    /// 0.0 = fully transparent, 1.0 = fully opaque.
    pub opacity: f32,
    /// Circular alpha mask radius as a fraction of the smaller rect
    /// dimension; `None` leaves the layer rectangular.
    pub circle_mask: Option<f32>,
    pub z_order: i32,
}

impl SceneLayer {
    pub fn new(content: LayerContent, rect: Rect, z_order: i32) -> Self {
        Self {
            content,
            rect,
            opacity: 1.0,
            circle_mask: None,
            z_order,
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_circle_mask(mut self, radius_fraction: f32) -> Self {
        self.circle_mask = Some(radius_fraction);
        self
    }
}

/// Built-in overlay asset references. These resolve at the same asset
/// boundary as program media; the engine only names them.
pub mod assets {
    use super::*;

    /// Placeholder shown while the active media is not decodable.
    pub fn load_problem() -> MediaRef {
        MediaRef::new("asset:load-problem")
    }

    /// Circular side-switching hint glyph.
    pub fn glyph(mode: SwitchingMode) -> Option<MediaRef> {
        match mode {
            SwitchingMode::None => None,
            SwitchingMode::LeftRight => Some(MediaRef::new("asset:glyph-left-right")),
            SwitchingMode::Alternate => Some(MediaRef::new("asset:glyph-alternate")),
        }
    }

    /// Countdown timer overlay; stretch segments use the parallel asset.
    pub fn timer(is_stretch: bool) -> MediaRef {
        if is_stretch {
            MediaRef::new("asset:countdown-timer-stretch")
        } else {
            MediaRef::new("asset:countdown-timer")
        }
    }

    /// Segment-boundary transition sting; stretch segments use the
    /// parallel asset.
    pub fn transition(is_stretch: bool) -> MediaRef {
        if is_stretch {
            MediaRef::new("asset:transition-stretch")
        } else {
            MediaRef::new("asset:transition")
        }
    }
}
