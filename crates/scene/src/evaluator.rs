//! Core scene evaluation: playback state + segment + tick position in,
//! a z-ordered list of [`SceneLayer`] out.
//!
//! Evaluation is pure — no media access, no clocks. The compositor
//! rasterizes whatever this module describes, pulling pixels from the
//! frame store by reference.

use cadence_common::{MediaRef, Resolution};
use cadence_playback::{PlaybackState, Readiness};
use cadence_program::{Segment, SwitchingMode};

use crate::layer::{assets, LayerContent, Rect, SceneLayer};
use crate::text;
use crate::windows;

/// Estimated horizontal advance per title character, in output pixels.
const TEXT_ADVANCE_PX: u32 = 24;
/// Height of one banner text line.
const TEXT_LINE_HEIGHT_PX: u32 = 44;
/// Horizontal padding inside the banner.
const BANNER_PAD_PX: u32 = 32;
/// Progress bar height along the bottom edge.
const PROGRESS_HEIGHT_PX: u32 = 8;
/// Preview thumbnail slide-in distance.
const PREVIEW_SLIDE_PX: i32 = 64;

/// Background fill for control screens.
const CONTROL_BG: [u8; 4] = [24, 24, 32, 255];
/// Background fill behind the load-problem placeholder.
const PLACEHOLDER_BG: [u8; 4] = [12, 12, 12, 255];
/// Banner scrim color (alpha applied via layer opacity).
const BANNER_SCRIM: [u8; 4] = [0, 0, 0, 160];
/// Progress bar fill.
const PROGRESS_FILL: [u8; 4] = [255, 255, 255, 220];

/// Everything the evaluator needs for one tick.
pub struct SceneInput<'a> {
    pub state: &'a PlaybackState,
    pub segment: &'a Segment,
    /// The segment the preview thumbnail announces, when one exists.
    pub next_segment: Option<&'a Segment>,
    pub resolution: Resolution,
    /// Active primary slot media and its readiness.
    pub primary: Option<(MediaRef, Readiness)>,
    /// Active coach slot media and its readiness.
    pub coach: Option<(MediaRef, Readiness)>,
    /// Circular mask radius for the switching glyph.
    pub glyph_mask_radius: f32,
}

/// Evaluate the scene at the input's position, producing layers sorted by
/// z-order (lower = behind).
pub fn evaluate(input: &SceneInput<'_>) -> Vec<SceneLayer> {
    let mut layers = Vec::new();

    push_base(input, &mut layers);
    push_coach_inset(input, &mut layers);
    push_title_banner(input, &mut layers);
    push_preview(input, &mut layers);
    push_progress(input, &mut layers);
    push_glyph(input, &mut layers);
    push_timer(input, &mut layers);

    layers.sort_by_key(|l| l.z_order);
    layers
}

fn full_rect(resolution: Resolution) -> Rect {
    Rect::new(0, 0, resolution.width, resolution.height)
}

fn centered_rect(resolution: Resolution, width: u32, height: u32) -> Rect {
    Rect::new(
        (resolution.width as i32 - width as i32) / 2,
        (resolution.height as i32 - height as i32) / 2,
        width,
        height,
    )
}

/// Base layer: the playing clip, a control card, or the load-problem
/// placeholder. Never blocks — an unready source renders the placeholder
/// this tick and is polled again on the next.
fn push_base(input: &SceneInput<'_>, layers: &mut Vec<SceneLayer>) {
    let res = input.resolution;

    if input.segment.is_control() {
        layers.push(SceneLayer::new(
            LayerContent::Solid(CONTROL_BG),
            full_rect(res),
            0,
        ));

        if let Some(image) = &input.segment.custom_image {
            let rect = centered_rect(res, res.width / 2, res.height / 2);
            layers.push(SceneLayer::new(LayerContent::Sprite(image.clone()), rect, 1));
        }

        if let Some(note) = &input.segment.note_text {
            push_text_lines(note, res, res.height / 2, 2, 1.0, layers);
        }
        return;
    }

    match &input.primary {
        Some((media, Readiness::Ready)) => {
            layers.push(SceneLayer::new(
                LayerContent::Frame(media.clone()),
                full_rect(res),
                0,
            ));
        }
        _ => {
            layers.push(SceneLayer::new(
                LayerContent::Solid(PLACEHOLDER_BG),
                full_rect(res),
                0,
            ));
            let rect = centered_rect(res, res.width / 4, res.height / 4);
            layers.push(SceneLayer::new(
                LayerContent::Sprite(assets::load_problem()),
                rect,
                1,
            ));
        }
    }
}

/// Coach demonstration inset, bottom-right third of the frame. Only
/// rendered while coach mode is active and the coach media is decodable.
fn push_coach_inset(input: &SceneInput<'_>, layers: &mut Vec<SceneLayer>) {
    if !input.state.coach_mode_active {
        return;
    }
    let Some((media, Readiness::Ready)) = &input.coach else {
        return;
    };
    let res = input.resolution;
    let width = res.width / 3;
    let height = res.height / 3;
    let rect = Rect::new(
        res.width as i32 - width as i32 - 16,
        res.height as i32 - height as i32 - 16,
        width,
        height,
    );
    layers.push(SceneLayer::new(LayerContent::Frame(media.clone()), rect, 10));
}

/// Running title banner across the top, fading in at the segment start
/// and out toward the end, with wrapped lines when the title is long.
fn push_title_banner(input: &SceneInput<'_>, layers: &mut Vec<SceneLayer>) {
    if input.segment.is_control() {
        return;
    }
    let Some(title) = &input.segment.title_text else {
        return;
    };

    let opacity = windows::title_opacity(input.state.position, input.segment.duration());
    if opacity <= 0.0 {
        return;
    }

    let res = input.resolution;
    let lines = text::wrap(title, res.width - 2 * BANNER_PAD_PX, TEXT_ADVANCE_PX);
    if lines.is_empty() {
        return;
    }

    let banner_height = lines.len() as u32 * TEXT_LINE_HEIGHT_PX + BANNER_PAD_PX;
    layers.push(
        SceneLayer::new(
            LayerContent::Solid(BANNER_SCRIM),
            Rect::new(0, 0, res.width, banner_height),
            20,
        )
        .with_opacity(opacity),
    );

    let top = BANNER_PAD_PX / 2;
    push_wrapped_lines(&lines, res, top, 21, opacity, layers);
}

fn push_text_lines(
    text_value: &str,
    res: Resolution,
    top: u32,
    z: i32,
    opacity: f32,
    layers: &mut Vec<SceneLayer>,
) {
    let lines = text::wrap(text_value, res.width - 2 * BANNER_PAD_PX, TEXT_ADVANCE_PX);
    push_wrapped_lines(&lines, res, top, z, opacity, layers);
}

fn push_wrapped_lines(
    lines: &[String],
    res: Resolution,
    top: u32,
    z: i32,
    opacity: f32,
    layers: &mut Vec<SceneLayer>,
) {
    for (i, line) in lines.iter().enumerate() {
        let width = text::line_width_px(line, TEXT_ADVANCE_PX).min(res.width);
        let rect = Rect::new(
            (res.width as i32 - width as i32) / 2,
            (top + i as u32 * TEXT_LINE_HEIGHT_PX) as i32,
            width,
            TEXT_LINE_HEIGHT_PX,
        );
        layers.push(
            SceneLayer::new(LayerContent::Sprite(MediaRef::text_line(line)), rect, z)
                .with_opacity(opacity),
        );
    }
}

/// Next-clip preview thumbnail with its fade/slide entry.
fn push_preview(input: &SceneInput<'_>, layers: &mut Vec<SceneLayer>) {
    let Some(next) = input.next_segment else {
        return;
    };
    let window = windows::preview_window(input.segment.control_kind, input.segment.duration());
    let Some(opacity) = window.opacity_at(input.state.position) else {
        return;
    };

    let thumb = next
        .custom_image
        .as_ref()
        .or(next.primary_video.as_ref());
    let Some(thumb) = thumb else {
        return;
    };

    let res = input.resolution;
    let width = res.width / 4;
    let height = res.height / 4;
    // Slides in from the right edge as the ramp completes.
    let slide = ((1.0 - opacity) * PREVIEW_SLIDE_PX as f32) as i32;
    let rect = Rect::new(
        res.width as i32 - width as i32 - 24 + slide,
        24,
        width,
        height,
    );
    layers.push(
        SceneLayer::new(LayerContent::Sprite(thumb.clone()), rect, 30).with_opacity(opacity),
    );
}

/// Progress bar along the bottom, sized proportionally to the position.
fn push_progress(input: &SceneInput<'_>, layers: &mut Vec<SceneLayer>) {
    let fraction = windows::progress_fraction(input.state.position, input.segment.duration());
    let res = input.resolution;
    let width = (fraction * res.width as f32) as u32;
    if width == 0 {
        return;
    }
    let rect = Rect::new(
        0,
        (res.height - PROGRESS_HEIGHT_PX) as i32,
        width,
        PROGRESS_HEIGHT_PX,
    );
    layers.push(SceneLayer::new(LayerContent::Solid(PROGRESS_FILL), rect, 40));
}

/// Circular switching-hint glyph over the segment midpoint window.
fn push_glyph(input: &SceneInput<'_>, layers: &mut Vec<SceneLayer>) {
    if input.segment.switching_mode == SwitchingMode::None {
        return;
    }
    let Some(glyph) = assets::glyph(input.segment.switching_mode) else {
        return;
    };
    let window = windows::glyph_window(input.segment.duration());
    if !window.contains(input.state.position) {
        return;
    }

    let res = input.resolution;
    let size = res.width.min(res.height) / 4;
    let rect = centered_rect(res, size, size);
    layers.push(
        SceneLayer::new(LayerContent::Sprite(glyph), rect, 50)
            .with_circle_mask(input.glyph_mask_radius),
    );
}

/// Countdown timer overlay, bottom center, while the timer runs.
fn push_timer(input: &SceneInput<'_>, layers: &mut Vec<SceneLayer>) {
    if !input.state.timer_active {
        return;
    }
    let res = input.resolution;
    let width = res.width / 5;
    let height = res.height / 5;
    let rect = Rect::new(
        (res.width as i32 - width as i32) / 2,
        res.height as i32 - height as i32 - (PROGRESS_HEIGHT_PX as i32 + 16),
        width,
        height,
    );
    layers.push(SceneLayer::new(
        LayerContent::Sprite(assets::timer(input.segment.is_stretch)),
        rect,
        60,
    ));
}
