//! Raster surfaces and source frames (RGBA8).

use std::collections::HashMap;

use cadence_common::{MediaRef, Resolution};

/// A decoded source raster: the current frame of a media element or a
/// static asset sprite. Producing these is the host's job; the compositor
/// only samples them.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub resolution: Resolution,
    /// RGBA8, `width * height * 4` bytes.
    pub data: Vec<u8>,
}

impl Frame {
    /// A frame filled with one color.
    pub fn filled(resolution: Resolution, color: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(resolution.rgba_byte_size());
        for _ in 0..resolution.pixel_count() {
            data.extend_from_slice(&color);
        }
        Self { resolution, data }
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y * self.resolution.width + x) as usize * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }
}

/// Per-tick map from media reference to its current decoded frame.
pub type FrameStore = HashMap<MediaRef, Frame>;

/// The output raster the composed scene is drawn onto.
#[derive(Clone, Debug)]
pub struct Surface {
    pub resolution: Resolution,
    /// RGBA8, `width * height * 4` bytes.
    pub data: Vec<u8>,
}

impl Surface {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            data: vec![0u8; resolution.rgba_byte_size()],
        }
    }

    /// Fill the whole surface with one color.
    pub fn clear(&mut self, color: [u8; 4]) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&color);
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y * self.resolution.width + x) as usize * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
        let idx = (y * self.resolution.width + x) as usize * 4;
        self.data[idx..idx + 4].copy_from_slice(&color);
    }
}
