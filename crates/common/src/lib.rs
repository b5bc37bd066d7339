//! `cadence-common` — Shared types and configuration for the cadence
//! playback engine.
//!
//! This crate is the foundation that all other engine crates depend on:
//!
//! - **Types**: `TimeCode`, `Resolution`, `MediaRef` (newtypes for safety)
//! - **Role**: `Role` (leader / follower / observer), fixed at construction
//! - **Tracks**: `TrackKind`, the identities of the double-buffered tracks
//! - **Config**: `EngineConfig` and the fixed `timing` constants

pub mod config;
pub mod role;
pub mod track;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{timing, EngineConfig};
pub use role::Role;
pub use track::TrackKind;
pub use types::{MediaRef, Resolution, TimeCode};
