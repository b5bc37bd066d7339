//! The mixing graph: every sound-bearing element feeds one node, nodes
//! carry independently controllable gains, and one combined block comes
//! out per tick.
//!
//! Gains are applied at the node, never by touching a source's own volume,
//! so volume changes can never interrupt playback state. A gain change
//! reaches the output through a short linear ramp — no discontinuity
//! beyond the ramp primitive itself.

use std::collections::HashMap;

use cadence_common::timing;
use tracing::debug;

use crate::source::AudioSource;

/// The named mixing channels. One node each.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MixChannel {
    /// Primary exercise video sound.
    ExerciseVideo,
    /// Coach demonstration video sound.
    CoachVideo,
    /// Coach preview narration.
    CoachPreview,
    /// Background music, slot A of the double buffer.
    MusicA,
    /// Background music, slot B of the double buffer.
    MusicB,
    /// Discrete sound-effect cues.
    Effects,
}

impl MixChannel {
    pub const ALL: [MixChannel; 6] = [
        MixChannel::ExerciseVideo,
        MixChannel::CoachVideo,
        MixChannel::CoachPreview,
        MixChannel::MusicA,
        MixChannel::MusicB,
        MixChannel::Effects,
    ];
}

/// A node gain that moves toward its target by a fixed per-frame step.
#[derive(Clone, Debug)]
struct RampedGain {
    current: f32,
    target: f32,
}

impl RampedGain {
    fn new(value: f32) -> Self {
        Self {
            current: value,
            target: value,
        }
    }

    fn set_target(&mut self, value: f32) {
        self.target = value.clamp(0.0, 1.0);
    }

    /// Advance one frame toward the target and return the gain to apply.
    fn step(&mut self, per_frame: f32) -> f32 {
        if (self.current - self.target).abs() <= per_frame {
            self.current = self.target;
        } else if self.current < self.target {
            self.current += per_frame;
        } else {
            self.current -= per_frame;
        }
        self.current
    }
}

struct ChannelNode {
    source: Option<Box<dyn AudioSource>>,
    gain: RampedGain,
}

/// Multi-node audio mixing graph with one combined output block.
pub struct MixerGraph {
    sample_rate: u32,
    channels: u16,
    nodes: HashMap<MixChannel, ChannelNode>,
}

impl MixerGraph {
    /// Create a graph for the given output format. All nodes exist up
    /// front at unity gain with nothing attached.
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        let mut nodes = HashMap::new();
        for channel in MixChannel::ALL {
            nodes.insert(
                channel,
                ChannelNode {
                    source: None,
                    gain: RampedGain::new(1.0),
                },
            );
        }
        Self {
            sample_rate,
            channels,
            nodes,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn output_channels(&self) -> u16 {
        self.channels
    }

    /// Attach a source to a node. Idempotent: attaching a source with the
    /// identity already on the node keeps the existing source playing
    /// (continuity wins); a different identity replaces it.
    pub fn attach(&mut self, channel: MixChannel, source: Box<dyn AudioSource>) {
        let node = self.node_mut(channel);
        if let Some(existing) = &node.source {
            if existing.id() == source.id() {
                return;
            }
        }
        debug!(channel = ?channel, id = %source.id(), "Source attached");
        node.source = Some(source);
    }

    /// Detach whatever is on a node. Idempotent.
    pub fn detach(&mut self, channel: MixChannel) {
        let node = self.node_mut(channel);
        if node.source.take().is_some() {
            debug!(channel = ?channel, "Source detached");
        }
    }

    pub fn is_attached(&self, channel: MixChannel) -> bool {
        self.nodes
            .get(&channel)
            .is_some_and(|n| n.source.is_some())
    }

    /// Set a node gain in `[0, 1]`. Takes effect on the next processed
    /// block through the ramp.
    pub fn set_gain(&mut self, channel: MixChannel, value: f32) {
        self.node_mut(channel).gain.set_target(value);
        debug!(channel = ?channel, gain = value.clamp(0.0, 1.0), "Gain set");
    }

    pub fn gain(&self, channel: MixChannel) -> f32 {
        self.nodes[&channel].gain.target
    }

    fn node_mut(&mut self, channel: MixChannel) -> &mut ChannelNode {
        self.nodes
            .entry(channel)
            .or_insert_with(|| ChannelNode {
                source: None,
                gain: RampedGain::new(1.0),
            })
    }

    /// Gain ramp step per frame: a full-scale change spans the ramp window.
    fn ramp_step(&self) -> f32 {
        let ramp_frames = self.sample_rate as f32 * (timing::GAIN_RAMP_MS as f32 / 1000.0);
        1.0 / ramp_frames.max(1.0)
    }

    /// Pull one block from every attached source and mix them into a
    /// single interleaved output of `frames` frames.
    ///
    /// Short reads are zero-padded, channel counts are up/downmixed, and
    /// the sum is soft-clipped.
    pub fn mix(&mut self, frames: usize) -> Vec<f32> {
        let out_ch = self.channels as usize;
        let mut output = vec![0.0f32; frames * out_ch];
        let step = self.ramp_step();

        // Deterministic node order keeps blocks reproducible.
        for channel in MixChannel::ALL {
            let Some(node) = self.nodes.get_mut(&channel) else {
                continue;
            };
            let Some(source) = node.source.as_mut() else {
                continue;
            };

            let src_ch = source.channels().max(1) as usize;
            let samples = source.read(frames);
            let src_frames = (samples.len() / src_ch).min(frames);

            for i in 0..src_frames {
                let g = node.gain.step(step);
                match (src_ch, out_ch) {
                    (1, 1) => output[i] += samples[i] * g,
                    (1, 2) => {
                        let s = samples[i] * g;
                        output[i * 2] += s;
                        output[i * 2 + 1] += s;
                    }
                    (2, 2) => {
                        output[i * 2] += samples[i * 2] * g;
                        output[i * 2 + 1] += samples[i * 2 + 1] * g;
                    }
                    (2, 1) => {
                        // Standard stereo-to-mono downmix: (L + R) * 0.5
                        output[i] += (samples[i * 2] + samples[i * 2 + 1]) * 0.5 * g;
                    }
                    _ => {
                        // Unusual layouts: take the first channel.
                        let s = samples[i * src_ch] * g;
                        for c in 0..out_ch {
                            output[i * out_ch + c] += s;
                        }
                    }
                }
            }
        }

        // Soft-clip the sum to prevent harsh digital clipping.
        for sample in &mut output {
            *sample = soft_clip(*sample);
        }

        output
    }
}

/// Soft-clip a sample using tanh-based saturation.
///
/// Values in [-1, 1] pass through unchanged; values beyond are gently
/// compressed.
fn soft_clip(x: f32) -> f32 {
    if x.abs() <= 1.0 {
        x
    } else {
        x.signum() * (1.0 + (x.abs() - 1.0).tanh()) * 0.5 + x.signum() * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_common::MediaRef;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Constant-value source that counts how many frames it has served.
    struct TestSource {
        id: MediaRef,
        channels: u16,
        value: f32,
        served: Arc<AtomicUsize>,
    }

    impl TestSource {
        fn boxed(id: &str, channels: u16, value: f32) -> Box<Self> {
            Box::new(Self {
                id: MediaRef::new(id),
                channels,
                value,
                served: Arc::new(AtomicUsize::new(0)),
            })
        }

        fn with_counter(id: &str, served: Arc<AtomicUsize>) -> Box<Self> {
            Box::new(Self {
                id: MediaRef::new(id),
                channels: 1,
                value: 0.1,
                served,
            })
        }
    }

    impl AudioSource for TestSource {
        fn id(&self) -> &MediaRef {
            &self.id
        }

        fn channels(&self) -> u16 {
            self.channels
        }

        fn read(&mut self, frames: usize) -> Vec<f32> {
            self.served.fetch_add(frames, Ordering::Relaxed);
            vec![self.value; frames * self.channels as usize]
        }
    }

    #[test]
    fn empty_graph_mixes_silence() {
        let mut graph = MixerGraph::new(48_000, 2);
        let out = graph.mix(256);
        assert_eq!(out.len(), 512);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn attached_sources_sum() {
        let mut graph = MixerGraph::new(48_000, 1);
        graph.attach(MixChannel::ExerciseVideo, TestSource::boxed("a", 1, 0.3));
        graph.attach(MixChannel::MusicA, TestSource::boxed("b", 1, 0.2));

        let out = graph.mix(8);
        // Gains are already at unity; the sum lands directly.
        assert!((out[7] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn attach_same_identity_is_a_no_op() {
        let served = Arc::new(AtomicUsize::new(0));
        let mut graph = MixerGraph::new(48_000, 1);
        graph.attach(
            MixChannel::MusicA,
            TestSource::with_counter("mix.mp3", served.clone()),
        );
        graph.mix(16);

        // Re-attaching the same reference must keep the existing source.
        graph.attach(
            MixChannel::MusicA,
            TestSource::with_counter("mix.mp3", Arc::new(AtomicUsize::new(0))),
        );
        graph.mix(16);
        assert_eq!(served.load(Ordering::Relaxed), 32);
    }

    #[test]
    fn attach_different_identity_replaces() {
        let old = Arc::new(AtomicUsize::new(0));
        let mut graph = MixerGraph::new(48_000, 1);
        graph.attach(
            MixChannel::MusicA,
            TestSource::with_counter("old.mp3", old.clone()),
        );
        graph.attach(
            MixChannel::MusicA,
            TestSource::with_counter("new.mp3", Arc::new(AtomicUsize::new(0))),
        );
        graph.mix(16);
        assert_eq!(old.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn detach_twice_is_harmless() {
        let mut graph = MixerGraph::new(48_000, 2);
        graph.attach(MixChannel::Effects, TestSource::boxed("fx", 2, 0.5));
        assert!(graph.is_attached(MixChannel::Effects));

        graph.detach(MixChannel::Effects);
        graph.detach(MixChannel::Effects);
        assert!(!graph.is_attached(MixChannel::Effects));
    }

    #[test]
    fn gain_change_ramps_not_jumps() {
        let mut graph = MixerGraph::new(48_000, 1);
        graph.attach(MixChannel::MusicA, TestSource::boxed("m", 1, 1.0));
        // Settle at unity first.
        graph.mix(4);

        graph.set_gain(MixChannel::MusicA, 0.0);
        let out = graph.mix(64);
        // The first frame after the change is still near unity, later
        // frames fall monotonically.
        assert!(out[0] > 0.9, "first frame jumped: {}", out[0]);
        assert!(out[63] < out[0]);
        for pair in out.windows(2) {
            assert!(pair[1] <= pair[0] + 1e-6);
        }
    }

    #[test]
    fn gain_reaches_target_after_ramp_window() {
        let mut graph = MixerGraph::new(48_000, 1);
        graph.attach(MixChannel::MusicA, TestSource::boxed("m", 1, 1.0));
        graph.set_gain(MixChannel::MusicA, 0.5);

        // 20ms at 48kHz = 960 frames; mix well past that.
        let out = graph.mix(2000);
        assert!((out[1999] - 0.5).abs() < 1e-3);
        assert!((graph.gain(MixChannel::MusicA) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn stereo_to_mono_downmixes() {
        let mut graph = MixerGraph::new(48_000, 1);
        graph.attach(MixChannel::ExerciseVideo, TestSource::boxed("v", 2, 0.8));
        let out = graph.mix(4);
        assert!((out[3] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn mono_to_stereo_duplicates() {
        let mut graph = MixerGraph::new(48_000, 2);
        graph.attach(MixChannel::CoachPreview, TestSource::boxed("n", 1, 0.4));
        let out = graph.mix(4);
        assert!((out[0] - 0.4).abs() < 1e-6);
        assert!((out[1] - 0.4).abs() < 1e-6);
    }

    #[test]
    fn soft_clip_passes_normal_values() {
        assert!((soft_clip(0.5) - 0.5).abs() < 0.001);
        assert!((soft_clip(-0.5) - (-0.5)).abs() < 0.001);
    }

    #[test]
    fn soft_clip_limits_extreme_values() {
        assert!(soft_clip(5.0) < 1.5);
        assert!(soft_clip(-5.0) > -1.5);
    }

    #[test]
    fn hot_sum_is_clipped() {
        let mut graph = MixerGraph::new(48_000, 1);
        graph.attach(MixChannel::ExerciseVideo, TestSource::boxed("a", 1, 0.9));
        graph.attach(MixChannel::MusicA, TestSource::boxed("b", 1, 0.9));
        let out = graph.mix(4);
        assert!(out[3] < 1.5);
    }
}
