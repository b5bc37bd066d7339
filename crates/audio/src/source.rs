//! The audio-source boundary.

use cadence_common::MediaRef;

/// A sound-bearing element feeding the mixing graph.
///
/// Sources are pulled, never pushed: the graph asks each attached source
/// for a block of interleaved f32 samples every tick. A source that has
/// nothing to give returns fewer frames (or none); the graph zero-pads.
pub trait AudioSource {
    /// Identity of the media this source plays. Attach is idempotent per
    /// identity: re-attaching the same reference never restarts playback.
    fn id(&self) -> &MediaRef;

    /// Interleaved channel count of the samples this source produces.
    fn channels(&self) -> u16;

    /// Read up to `frames` frames of interleaved samples.
    fn read(&mut self, frames: usize) -> Vec<f32>;
}

/// A silent placeholder source (blank track, detached element).
pub struct Silence {
    id: MediaRef,
    channels: u16,
}

impl Silence {
    pub fn new(channels: u16) -> Self {
        Self {
            id: MediaRef::new("silence"),
            channels,
        }
    }
}

impl AudioSource for Silence {
    fn id(&self) -> &MediaRef {
        &self.id
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn read(&mut self, frames: usize) -> Vec<f32> {
        vec![0.0; frames * self.channels as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_reads_zeros() {
        let mut s = Silence::new(2);
        let block = s.read(4);
        assert_eq!(block.len(), 8);
        assert!(block.iter().all(|&x| x == 0.0));
    }
}
