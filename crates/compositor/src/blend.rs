//! CPU alpha-over blending of frames and fills onto a surface.

use cadence_scene::Rect;

use crate::mask::AlphaMask;
use crate::surface::{Frame, Surface};

/// Blend `src` over `dst` with the given source alpha (0..=255).
fn over(dst: [u8; 4], src: [u8; 3], alpha: u8) -> [u8; 4] {
    let a = alpha as u32;
    let inv = 255 - a;
    [
        ((src[0] as u32 * a + dst[0] as u32 * inv) / 255) as u8,
        ((src[1] as u32 * a + dst[1] as u32 * inv) / 255) as u8,
        ((src[2] as u32 * a + dst[2] as u32 * inv) / 255) as u8,
        dst[3].max(alpha),
    ]
}

/// Draw `frame` into `rect` on the surface, scaled nearest-neighbor, with
/// a layer opacity and an optional precomputed alpha mask. Pixels falling
/// outside the surface are clipped.
pub fn blit_frame(
    surface: &mut Surface,
    frame: &Frame,
    rect: Rect,
    opacity: f32,
    mask: Option<&AlphaMask>,
) {
    if rect.width == 0 || rect.height == 0 || opacity <= 0.0 {
        return;
    }
    let opacity = opacity.clamp(0.0, 1.0);

    for oy in 0..rect.height {
        let dy = rect.y + oy as i32;
        if dy < 0 || dy >= surface.resolution.height as i32 {
            continue;
        }
        // Nearest-neighbor source row.
        let sy = (oy as u64 * frame.resolution.height as u64 / rect.height as u64) as u32;

        for ox in 0..rect.width {
            let dx = rect.x + ox as i32;
            if dx < 0 || dx >= surface.resolution.width as i32 {
                continue;
            }
            let sx = (ox as u64 * frame.resolution.width as u64 / rect.width as u64) as u32;

            let src = frame.pixel(sx, sy);
            let mut alpha = (src[3] as f32 * opacity) as u32;
            if let Some(mask) = mask {
                // Mask geometry matches the destination rect.
                let mx = (ox as u64 * mask.width as u64 / rect.width as u64) as u32;
                let my = (oy as u64 * mask.height as u64 / rect.height as u64) as u32;
                alpha = alpha * mask.at(mx, my) as u32 / 255;
            }
            if alpha == 0 {
                continue;
            }

            let dst = surface.pixel(dx as u32, dy as u32);
            let blended = over(dst, [src[0], src[1], src[2]], alpha as u8);
            surface.put_pixel(dx as u32, dy as u32, blended);
        }
    }
}

/// Fill `rect` with a solid color at the given layer opacity.
pub fn fill_rect(surface: &mut Surface, rect: Rect, color: [u8; 4], opacity: f32) {
    if rect.width == 0 || rect.height == 0 || opacity <= 0.0 {
        return;
    }
    let alpha = (color[3] as f32 * opacity.clamp(0.0, 1.0)) as u8;
    if alpha == 0 {
        return;
    }

    for oy in 0..rect.height {
        let dy = rect.y + oy as i32;
        if dy < 0 || dy >= surface.resolution.height as i32 {
            continue;
        }
        for ox in 0..rect.width {
            let dx = rect.x + ox as i32;
            if dx < 0 || dx >= surface.resolution.width as i32 {
                continue;
            }
            let dst = surface.pixel(dx as u32, dy as u32);
            let blended = over(dst, [color[0], color[1], color[2]], alpha);
            surface.put_pixel(dx as u32, dy as u32, blended);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_common::Resolution;

    #[test]
    fn opaque_fill_replaces_pixels() {
        let mut s = Surface::new(Resolution::new(4, 4));
        fill_rect(&mut s, Rect::new(0, 0, 4, 4), [100, 50, 25, 255], 1.0);
        assert_eq!(s.pixel(2, 2), [100, 50, 25, 255]);
    }

    #[test]
    fn half_opacity_fill_blends() {
        let mut s = Surface::new(Resolution::new(2, 2));
        s.clear([0, 0, 0, 255]);
        fill_rect(&mut s, Rect::new(0, 0, 2, 2), [255, 255, 255, 255], 0.5);
        let px = s.pixel(0, 0);
        // 50% white over black lands near mid-gray.
        assert!(px[0] > 120 && px[0] < 132, "got {px:?}");
    }

    #[test]
    fn fill_clips_outside_surface() {
        let mut s = Surface::new(Resolution::new(4, 4));
        fill_rect(&mut s, Rect::new(-2, -2, 4, 4), [255, 0, 0, 255], 1.0);
        assert_eq!(s.pixel(1, 1), [255, 0, 0, 255]);
        assert_eq!(s.pixel(2, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn blit_scales_nearest_neighbor() {
        let mut s = Surface::new(Resolution::new(4, 4));
        // 2x2 source scaled to 4x4: each source pixel covers a 2x2 block.
        let mut f = Frame::filled(Resolution::new(2, 2), [0, 0, 0, 255]);
        f.data[0..4].copy_from_slice(&[255, 0, 0, 255]); // top-left red
        blit_frame(&mut s, &f, Rect::new(0, 0, 4, 4), 1.0, None);
        assert_eq!(s.pixel(0, 0), [255, 0, 0, 255]);
        assert_eq!(s.pixel(1, 1), [255, 0, 0, 255]);
        assert_eq!(s.pixel(2, 2), [0, 0, 0, 255]);
    }

    #[test]
    fn mask_cuts_alpha() {
        use crate::mask::AlphaMask;
        let mut s = Surface::new(Resolution::new(10, 10));
        let f = Frame::filled(Resolution::new(10, 10), [255, 255, 255, 255]);
        let mask = AlphaMask::circle(10, 10, 0.4);
        blit_frame(&mut s, &f, Rect::new(0, 0, 10, 10), 1.0, Some(&mask));
        // Center lands, corner is cut.
        assert_eq!(s.pixel(5, 5)[0], 255);
        assert_eq!(s.pixel(0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn transparent_source_pixels_leave_dst() {
        let mut s = Surface::new(Resolution::new(2, 2));
        s.clear([9, 9, 9, 255]);
        let f = Frame::filled(Resolution::new(2, 2), [255, 255, 255, 0]);
        blit_frame(&mut s, &f, Rect::new(0, 0, 2, 2), 1.0, None);
        assert_eq!(s.pixel(0, 0), [9, 9, 9, 255]);
    }
}
