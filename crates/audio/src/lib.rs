//! `cadence-audio` — Audio mixing graph for the cadence engine.
//!
//! Every sound-bearing element (exercise video, coach video, coach
//! preview narration, music slots A/B, sound-effect cues) attaches to one
//! [`MixChannel`] node of the [`MixerGraph`]. Node gains are independently
//! controllable and ramped; the graph's single combined block pairs with
//! the compositor's surface to form the outbound stream.

pub mod mixer;
pub mod source;

pub use mixer::{MixChannel, MixerGraph};
pub use source::{AudioSource, Silence};
