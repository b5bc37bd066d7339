//! Circular alpha masks.
//!
//! A mask cuts a circular alpha hole in an otherwise rectangular sprite
//! using a distance-from-center test per pixel. Masks are computed once
//! per sprite geometry and cached, not rebuilt per frame.

use std::collections::HashMap;

use tracing::debug;

/// Precomputed per-pixel alpha multipliers for one sprite geometry.
#[derive(Clone, Debug)]
pub struct AlphaMask {
    pub width: u32,
    pub height: u32,
    /// One multiplier per pixel, 0 = cut, 255 = keep.
    pub alpha: Vec<u8>,
}

impl AlphaMask {
    /// Build a circular mask: pixels within `radius_fraction` of the
    /// smaller dimension (measured from the center) keep their alpha,
    /// everything outside is cut.
    pub fn circle(width: u32, height: u32, radius_fraction: f32) -> Self {
        let cx = width as f32 / 2.0;
        let cy = height as f32 / 2.0;
        let radius = width.min(height) as f32 * radius_fraction;
        let radius_sq = radius * radius;

        let mut alpha = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let inside = dx * dx + dy * dy <= radius_sq;
                alpha.push(if inside { 255 } else { 0 });
            }
        }

        Self {
            width,
            height,
            alpha,
        }
    }

    pub fn at(&self, x: u32, y: u32) -> u8 {
        self.alpha[(y * self.width + x) as usize]
    }
}

/// Cache of circular masks keyed by geometry.
#[derive(Default)]
pub struct MaskCache {
    masks: HashMap<(u32, u32, u32), AlphaMask>,
}

impl MaskCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the mask for this geometry, building it on first use.
    pub fn circle(&mut self, width: u32, height: u32, radius_fraction: f32) -> &AlphaMask {
        // Key the fraction in thousandths so float noise can't fragment
        // the cache.
        let key = (width, height, (radius_fraction * 1000.0).round() as u32);
        self.masks.entry(key).or_insert_with(|| {
            debug!(width, height, radius_fraction, "Building circular mask");
            AlphaMask::circle(width, height, radius_fraction)
        })
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }
}
