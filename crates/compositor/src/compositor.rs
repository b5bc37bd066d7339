//! Main compositor — rasterizes evaluated scene layers into the output
//! surface.
//!
//! The [`Compositor`] walks the layers bottom-to-top, blending each onto
//! the surface: media frames and sprites are sampled from the per-tick
//! [`FrameStore`], solids are filled directly. A source missing from the
//! store never fails the frame — the base layer degrades to a placeholder
//! fill and overlays are skipped until their pixels arrive.

use cadence_common::Resolution;
use cadence_scene::{LayerContent, SceneLayer};
use tracing::{debug, trace};

use crate::blend::{blit_frame, fill_rect};
use crate::mask::MaskCache;
use crate::surface::{FrameStore, Surface};
use crate::CompositorError;

/// Fill used when a base frame's pixels are not in the store.
const MISSING_MEDIA_FILL: [u8; 4] = [16, 16, 16, 255];

/// CPU compositor targeting one fixed output resolution.
pub struct Compositor {
    resolution: Resolution,
    masks: MaskCache,
}

impl Compositor {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            masks: MaskCache::new(),
        }
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Compose one frame.
    ///
    /// `layers` come pre-sorted from scene evaluation (sorted again here
    /// to be safe), `frames` is the host's per-tick frame store.
    pub fn render(
        &mut self,
        layers: &[SceneLayer],
        frames: &FrameStore,
        surface: &mut Surface,
    ) -> Result<(), CompositorError> {
        if surface.resolution != self.resolution {
            return Err(CompositorError::SurfaceMismatch {
                expected: self.resolution,
                got: surface.resolution,
            });
        }

        surface.clear([0, 0, 0, 255]);

        let mut sorted: Vec<&SceneLayer> = layers.iter().collect();
        sorted.sort_by_key(|l| l.z_order);

        for layer in sorted {
            if layer.opacity <= 0.0 {
                trace!(z = layer.z_order, "Skipping fully transparent layer");
                continue;
            }

            let mask = match layer.circle_mask {
                Some(radius) => {
                    Some(self.masks.circle(layer.rect.width, layer.rect.height, radius))
                }
                None => None,
            };

            match &layer.content {
                LayerContent::Solid(color) => {
                    fill_rect(surface, layer.rect, *color, layer.opacity);
                }
                LayerContent::Frame(media) => match frames.get(media) {
                    Some(frame) => {
                        blit_frame(surface, frame, layer.rect, layer.opacity, mask);
                    }
                    None => {
                        // Not decodable yet: hold a placeholder fill and
                        // poll again next tick.
                        debug!(media = %media, "Frame pixels not available, filling placeholder");
                        fill_rect(surface, layer.rect, MISSING_MEDIA_FILL, layer.opacity);
                    }
                },
                LayerContent::Sprite(media) => match frames.get(media) {
                    Some(frame) => {
                        blit_frame(surface, frame, layer.rect, layer.opacity, mask);
                    }
                    None => {
                        trace!(media = %media, "Sprite raster not available, skipping");
                    }
                },
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_common::MediaRef;
    use cadence_scene::Rect;
    use crate::surface::Frame;

    fn store_with(uri: &str, color: [u8; 4]) -> FrameStore {
        let mut store = FrameStore::new();
        store.insert(
            MediaRef::new(uri),
            Frame::filled(Resolution::new(8, 8), color),
        );
        store
    }

    #[test]
    fn renders_frame_layer_from_store() {
        let mut comp = Compositor::new(Resolution::new(8, 8));
        let mut surface = Surface::new(Resolution::new(8, 8));
        let store = store_with("clip.mp4", [0, 255, 0, 255]);

        let layers = vec![SceneLayer::new(
            LayerContent::Frame(MediaRef::new("clip.mp4")),
            Rect::new(0, 0, 8, 8),
            0,
        )];
        comp.render(&layers, &store, &mut surface).unwrap();
        assert_eq!(surface.pixel(4, 4), [0, 255, 0, 255]);
    }

    #[test]
    fn missing_frame_becomes_placeholder_fill() {
        let mut comp = Compositor::new(Resolution::new(8, 8));
        let mut surface = Surface::new(Resolution::new(8, 8));

        let layers = vec![SceneLayer::new(
            LayerContent::Frame(MediaRef::new("gone.mp4")),
            Rect::new(0, 0, 8, 8),
            0,
        )];
        comp.render(&layers, &FrameStore::new(), &mut surface)
            .unwrap();
        assert_eq!(surface.pixel(0, 0), MISSING_MEDIA_FILL);
    }

    #[test]
    fn missing_sprite_is_skipped() {
        let mut comp = Compositor::new(Resolution::new(8, 8));
        let mut surface = Surface::new(Resolution::new(8, 8));

        let layers = vec![SceneLayer::new(
            LayerContent::Sprite(MediaRef::new("asset:thumb")),
            Rect::new(0, 0, 4, 4),
            30,
        )];
        comp.render(&layers, &FrameStore::new(), &mut surface)
            .unwrap();
        // Background clear shows through untouched.
        assert_eq!(surface.pixel(0, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn layers_composite_in_z_order() {
        let mut comp = Compositor::new(Resolution::new(8, 8));
        let mut surface = Surface::new(Resolution::new(8, 8));

        // Deliberately out of order: the z=10 solid must land on top.
        let layers = vec![
            SceneLayer::new(
                LayerContent::Solid([255, 0, 0, 255]),
                Rect::new(0, 0, 8, 8),
                10,
            ),
            SceneLayer::new(
                LayerContent::Solid([0, 0, 255, 255]),
                Rect::new(0, 0, 8, 8),
                0,
            ),
        ];
        comp.render(&layers, &FrameStore::new(), &mut surface)
            .unwrap();
        assert_eq!(surface.pixel(4, 4), [255, 0, 0, 255]);
    }

    #[test]
    fn circular_mask_applied_to_sprite() {
        let mut comp = Compositor::new(Resolution::new(16, 16));
        let mut surface = Surface::new(Resolution::new(16, 16));
        let store = store_with("asset:glyph", [255, 255, 255, 255]);

        let layers = vec![SceneLayer::new(
            LayerContent::Sprite(MediaRef::new("asset:glyph")),
            Rect::new(0, 0, 16, 16),
            50,
        )
        .with_circle_mask(0.45)];
        comp.render(&layers, &store, &mut surface).unwrap();

        // Center kept, corner cut back to the cleared background.
        assert_eq!(surface.pixel(8, 8)[0], 255);
        assert_eq!(surface.pixel(0, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn mismatched_surface_is_an_error() {
        let mut comp = Compositor::new(Resolution::new(8, 8));
        let mut surface = Surface::new(Resolution::new(4, 4));
        let err = comp
            .render(&[], &FrameStore::new(), &mut surface)
            .unwrap_err();
        assert!(matches!(err, CompositorError::SurfaceMismatch { .. }));
    }

    #[test]
    fn mask_cache_reused_across_renders() {
        let mut comp = Compositor::new(Resolution::new(16, 16));
        let mut surface = Surface::new(Resolution::new(16, 16));
        let store = store_with("asset:glyph", [255, 255, 255, 255]);
        let layers = vec![SceneLayer::new(
            LayerContent::Sprite(MediaRef::new("asset:glyph")),
            Rect::new(0, 0, 16, 16),
            50,
        )
        .with_circle_mask(0.45)];

        comp.render(&layers, &store, &mut surface).unwrap();
        comp.render(&layers, &store, &mut surface).unwrap();
        assert_eq!(comp.masks.len(), 1);
    }
}
