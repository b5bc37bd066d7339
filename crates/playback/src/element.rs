//! The media-element boundary.
//!
//! The engine never decodes media itself. The host supplies playable
//! elements (two per track) behind this trait; the engine only assigns
//! references, transports play/pause/seek, and polls position and
//! readiness. All calls are non-blocking.

use cadence_common::{MediaRef, TimeCode};

/// Decodability of an element's currently assigned media.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Readiness {
    /// Nothing assigned.
    #[default]
    Empty,
    /// Assigned but not yet decodable; the compositor shows a placeholder.
    Loading,
    /// Decodable; frames and position are usable.
    Ready,
}

/// A host-provided playable media element.
pub trait MediaElement {
    /// Assign a new media reference. Implementations begin loading
    /// immediately and reset position to zero.
    fn assign(&mut self, media: &MediaRef);

    fn play(&mut self);

    fn pause(&mut self);

    /// Seek to an absolute position within the assigned media.
    fn seek(&mut self, position: TimeCode);

    /// Current playback position. Meaningless while [`Readiness::Empty`].
    fn position(&self) -> TimeCode;

    fn readiness(&self) -> Readiness;

    /// The currently assigned reference, if any.
    fn current(&self) -> Option<MediaRef>;

    /// Mute or unmute the element's own audio output. The mixer applies
    /// gain at its own nodes; muting here only silences standby slots.
    fn set_muted(&mut self, muted: bool);
}
