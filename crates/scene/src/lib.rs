//! `cadence-scene` — Per-tick scene evaluation for the cadence engine.
//!
//! `evaluate()` takes the playback state and the current segment and
//! produces a z-ordered list of [`SceneLayer`] for the compositor:
//! the base clip (or control card / placeholder), the coach inset, the
//! fading title banner, the next-clip preview, the progress bar, the
//! circular switching glyph, and the countdown timer overlay. All overlay
//! timing is driven by the fixed windows in [`windows`].

pub mod evaluator;
pub mod layer;
pub mod text;
pub mod windows;

pub use evaluator::{evaluate, SceneInput};
pub use layer::{assets, LayerContent, Rect, SceneLayer};
pub use windows::{glyph_window, preview_window, progress_fraction, timer_start, title_opacity, Window};
