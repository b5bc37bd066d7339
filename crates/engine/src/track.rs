//! The track registry.
//!
//! Tracks are registered once at session construction; everything
//! downstream (slot advancement, compositing inputs, mixer routing)
//! iterates the registry instead of referencing named elements.

use cadence_audio::MixChannel;
use cadence_common::TrackKind;
use cadence_playback::SlotPair;
use cadence_program::Program;

/// One registered media track: its double-buffered slots plus where its
/// audio lands in the mixing graph (`None` for silent tracks).
pub struct Track {
    pub kind: TrackKind,
    pub pair: SlotPair,
    pub mix_channel: Option<MixChannel>,
}

/// All tracks of a session.
#[derive(Default)]
pub struct TrackSet {
    tracks: Vec<Track>,
}

impl TrackSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a track. Later registrations of the same kind replace the
    /// earlier one.
    pub fn register(mut self, kind: TrackKind, pair: SlotPair, mix_channel: Option<MixChannel>) -> Self {
        self.tracks.retain(|t| t.kind != kind);
        self.tracks.push(Track {
            kind,
            pair,
            mix_channel,
        });
        self
    }

    pub fn get(&self, kind: TrackKind) -> Option<&Track> {
        self.tracks.iter().find(|t| t.kind == kind)
    }

    pub fn get_mut(&mut self, kind: TrackKind) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    pub fn arm_initial(&mut self, program: &Program) {
        for track in &mut self.tracks {
            track.pair.arm_initial(program);
        }
    }

    pub fn advance_to(&mut self, program: &Program, index: usize) {
        for track in &mut self.tracks {
            track.pair.advance_to(program, index);
        }
    }

    pub fn jump_to(&mut self, program: &Program, index: usize) {
        for track in &mut self.tracks {
            track.pair.jump_to(program, index);
        }
    }

    pub fn resume(&mut self) {
        for track in &mut self.tracks {
            track.pair.resume();
        }
    }

    pub fn pause(&mut self) {
        for track in &mut self.tracks {
            track.pair.pause();
        }
    }

    pub fn stop(&mut self) {
        for track in &mut self.tracks {
            track.pair.stop();
        }
    }
}
