//! `cadence-compositor` — CPU raster compositing for the cadence engine.
//!
//! Rasterizes the layers produced by `cadence-scene` into one RGBA8
//! [`Surface`] per tick:
//!
//! 1. **Sample** — frames and sprites are pulled from the per-tick
//!    [`FrameStore`] by media reference
//! 2. **Mask** — circular alpha masks, precomputed once per geometry
//! 3. **Blend** — alpha-over with per-layer opacity, bottom to top
//!
//! A missing source never fails a frame: the base layer degrades to a
//! placeholder fill, overlays are skipped until their pixels arrive.

pub mod blend;
pub mod compositor;
pub mod mask;
pub mod surface;

mod error;

// Re-export primary API
pub use compositor::Compositor;
pub use error::CompositorError;
pub use mask::{AlphaMask, MaskCache};
pub use surface::{Frame, FrameStore, Surface};
