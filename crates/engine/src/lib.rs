//! `cadence-engine` — Session orchestration for synchronized program
//! playback.
//!
//! A [`PlaybackSession`] wires the program model, the double-buffered
//! track registry, the playback clock and state machine, the scene
//! compositor, the audio mixing graph, and the leader/follower sync
//! protocol into one single-threaded tick loop. Transport callbacks and
//! host controls communicate through the [`Command`] queue, drained once
//! per tick.

pub mod command;
pub mod driver;
pub mod session;
pub mod track;

mod error;

pub use command::{Command, CommandQueue};
pub use driver::run;
pub use error::{EngineError, EngineResult};
pub use session::{PlaybackSession, StreamFrame, TickOutcome};
pub use track::{Track, TrackSet};
