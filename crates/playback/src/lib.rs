//! `cadence-playback` — Double-buffered slots, playback clock, and the
//! playback state machine.
//!
//! The host supplies playable elements behind the [`MediaElement`] trait;
//! each track owns a [`SlotPair`] that keeps the standby slot one lookahead
//! step ahead so segment transitions are a pointer swap, never a load.
//! The [`PlaybackClock`] derives one position per tick and reports segment
//! completion to the [`PlaybackState`] machine.

pub mod clock;
pub mod element;
pub mod slot;
pub mod state;
pub mod testing;

pub use clock::{PlaybackClock, TimerSample};
pub use element::{MediaElement, Readiness};
pub use slot::{Slot, SlotPair};
pub use state::{Advance, Phase, PlaybackState};
