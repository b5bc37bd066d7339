//! Media track identities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The double-buffered media tracks a program drives.
///
/// Each track owns one slot pair; which segment field feeds it is resolved
/// by the program model, so nothing downstream references named elements.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackKind {
    /// The main exercise video (or control-screen imagery).
    PrimaryVideo,
    /// The secondary coach demonstration video.
    CoachVideo,
    /// Background music.
    Music,
}

impl TrackKind {
    pub const ALL: [TrackKind; 3] = [
        TrackKind::PrimaryVideo,
        TrackKind::CoachVideo,
        TrackKind::Music,
    ];
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TrackKind::PrimaryVideo => "primary-video",
            TrackKind::CoachVideo => "coach-video",
            TrackKind::Music => "music",
        };
        write!(f, "{name}")
    }
}
