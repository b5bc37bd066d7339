//! `cadence-program` — Scripted program model for the cadence engine.
//!
//! A program is an ordered, immutable-once-loaded table of [`Segment`]s.
//! It is fetched once before playback starts (via a [`ProgramSource`]
//! boundary) and feeds the slot pairs and the playback state machine.

pub mod error;
pub mod load;
pub mod types;

pub use error::{ProgramError, ProgramResult};
pub use load::{fetch_program, from_json_string, ProgramSource};
pub use types::{ControlKind, Program, Segment, SwitchingMode};
