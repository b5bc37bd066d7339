//! The playback session orchestrator.
//!
//! One `PlaybackSession` owns the program, the track registry, the clock,
//! the state machine, the compositor, and the mixer, and wires them to the
//! control channel according to the session's [`Role`]. The tick driver
//! calls [`PlaybackSession::tick`] on a fixed cadence; each tick drains
//! the command queue, samples the clock, advances the state machine,
//! renders the scene, and mixes one audio block. Nothing in the tick
//! blocks — media readiness is polled, never awaited.

use std::sync::Arc;

use cadence_audio::{MixChannel, MixerGraph};
use cadence_common::{EngineConfig, MediaRef, Role, TimeCode, TrackKind};
use cadence_compositor::{Compositor, FrameStore, Surface};
use cadence_playback::{
    Advance, MediaElement, PlaybackClock, PlaybackState, Readiness, TimerSample,
};
use cadence_program::{Program, ProgramError, Segment};
use cadence_scene::{assets, evaluate, preview_window, timer_start, SceneInput};
use cadence_sync::{
    topics, ControlChannel, ControlRequest, Correction, FollowerReconciler, Inbound,
    LeaderBroadcaster, StatusSnapshot,
};
use crossbeam::channel::Sender;
use tracing::{debug, info, warn};

use crate::command::{Command, CommandQueue};
use crate::error::EngineResult;
use crate::track::TrackSet;

/// Result of one tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// A frame and an audio block were produced.
    Rendered,
    /// Playback is over; the driver should stop ticking.
    Finished,
}

/// The composed output of one tick: the capturable outbound stream pair.
/// Transporting it is the platform's concern.
pub struct StreamFrame<'a> {
    pub video: &'a Surface,
    pub audio: &'a [f32],
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

pub struct PlaybackSession {
    role: Role,
    config: EngineConfig,
    program: Program,
    tracks: TrackSet,
    clock: PlaybackClock,
    state: PlaybackState,
    compositor: Compositor,
    surface: Surface,
    mixer: MixerGraph,
    audio_block: Vec<f32>,

    /// Countdown timer overlay element, when the host provides one. Its
    /// own position outranks the video clock once running.
    timer: Option<Box<dyn MediaElement>>,

    channel: Arc<dyn ControlChannel>,
    broadcaster: LeaderBroadcaster,
    reconciler: FollowerReconciler,
    commands: CommandQueue,

    /// Milliseconds on the session's monotonic timeline, accumulated from
    /// tick deltas.
    now_ms: f64,
    /// A state change happened; broadcast on this tick regardless of the
    /// periodic cadence.
    force_broadcast: bool,
}

impl PlaybackSession {
    /// Build a session. Fails when the program carries no segments — no
    /// partial playback is attempted.
    pub fn new(
        role: Role,
        program: Program,
        mut tracks: TrackSet,
        timer: Option<Box<dyn MediaElement>>,
        channel: Arc<dyn ControlChannel>,
        config: EngineConfig,
    ) -> EngineResult<Self> {
        if program.is_empty() {
            return Err(ProgramError::Unavailable {
                reason: "cannot start a session without segments".into(),
            }
            .into());
        }

        tracks.arm_initial(&program);

        let mut mixer = MixerGraph::new(config.sample_rate, config.channels);
        mixer.set_gain(MixChannel::MusicA, config.music_gain);
        mixer.set_gain(MixChannel::MusicB, config.music_gain);
        mixer.set_gain(MixChannel::CoachVideo, config.trainer_gain);
        mixer.set_gain(MixChannel::CoachPreview, config.trainer_gain);

        info!(role = ?role, segments = program.len(), "Session created");

        Ok(Self {
            role,
            surface: Surface::new(config.resolution),
            compositor: Compositor::new(config.resolution),
            config,
            program,
            tracks,
            clock: PlaybackClock::new(),
            state: PlaybackState::new(),
            mixer,
            audio_block: Vec::new(),
            timer,
            channel,
            broadcaster: LeaderBroadcaster::new(),
            reconciler: FollowerReconciler::new(),
            commands: CommandQueue::new(),
            now_ms: 0.0,
            force_broadcast: false,
        })
    }

    // -----------------------------------------------------------------------
    // Public accessors
    // -----------------------------------------------------------------------

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Mixer access for the host to attach/detach element audio sources.
    pub fn mixer_mut(&mut self) -> &mut MixerGraph {
        &mut self.mixer
    }

    /// Command handle for host controls and transport callbacks.
    pub fn sender(&self) -> Sender<Command> {
        self.commands.sender()
    }

    /// Enqueue an inbound control-channel message. Safe to call from a
    /// transport callback thread; the message is applied on the next tick.
    pub fn deliver(&self, inbound: Inbound) {
        let _ = self.commands.sender().send(Command::Channel(inbound));
    }

    /// The outbound stream pair composed on the last tick.
    pub fn output(&self) -> StreamFrame<'_> {
        StreamFrame {
            video: &self.surface,
            audio: &self.audio_block,
        }
    }

    /// Send a pause/play/seek request to the leader. Only followers
    /// transmit control requests; the leader applies commands locally and
    /// observers never send.
    pub fn send_request(&self, request: &ControlRequest) {
        if self.role != Role::Follower {
            debug!(role = ?self.role, "Control request suppressed for this role");
            return;
        }
        match request.encode() {
            Ok(payload) => {
                if let Err(error) =
                    self.channel
                        .send(topics::VIDEO_PAUSE, &payload, cadence_common::timing::STATUS_TTL_MS)
                {
                    // Best-effort: local state free-runs until a broadcast
                    // answers (or doesn't).
                    warn!(%error, "Control request send failed");
                }
            }
            Err(error) => warn!(%error, "Control request failed to encode"),
        }
    }

    /// Ask the leader for an immediate authoritative snapshot.
    pub fn request_status(&self) {
        if !self.role.may_transmit() {
            return;
        }
        if let Err(error) = self.channel.send(
            topics::GET_VIDEO_STATUS,
            "",
            cadence_common::timing::STATUS_TTL_MS,
        ) {
            warn!(%error, "Status request send failed");
        }
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Run one tick: drain commands, advance the clock and state machine,
    /// compose the frame, and mix the audio block. `dt_ms` is the time
    /// since the previous tick; `frames` is the host's per-tick store of
    /// decoded rasters.
    pub fn tick(&mut self, dt_ms: f64, frames: &FrameStore) -> EngineResult<TickOutcome> {
        for command in self.commands.drain() {
            self.apply_command(command);
        }

        if self.state.is_over() {
            self.maybe_broadcast();
            return Ok(TickOutcome::Finished);
        }

        if self.state.is_playing() {
            self.advance_clock(dt_ms);

            let duration = self.current_segment().duration();
            if self.clock.is_complete(duration) {
                self.advance_segment();
            }
        }

        self.render(frames)?;
        self.mix_audio(dt_ms);
        self.maybe_broadcast();

        self.now_ms += dt_ms;
        Ok(TickOutcome::Rendered)
    }

    /// Derive this tick's position and overlay flags.
    fn advance_clock(&mut self, dt_ms: f64) {
        let (duration, trim, is_control, is_stretch, control_kind) = {
            let segment = self.current_segment();
            (
                segment.duration(),
                segment.trim_offset(),
                segment.is_control(),
                segment.is_stretch,
                segment.control_kind,
            )
        };

        // Primary source: the active primary-video element. A blank or
        // still-loading slot free-runs on the previous position instead.
        let element_position = self.primary_element_position(trim);
        let position =
            element_position.unwrap_or(self.clock.position() + TimeCode::from_millis(dt_ms));

        // The countdown overlay is leader-derived; followers mirror the
        // flag from broadcasts instead of deciding locally.
        if self.role.is_leader() {
            let should_run = !is_control && position >= timer_start(duration);
            if should_run && !self.state.timer_active {
                self.start_timer(is_stretch);
                self.force_broadcast = true;
            } else if !should_run && self.state.timer_active {
                self.stop_timer();
            }
        }

        let timer_sample = if self.state.timer_active {
            self.timer.as_ref().map(|element| TimerSample {
                position: element.position(),
                baseline: TimerSample::baseline_for(duration),
            })
        } else {
            None
        };

        self.state.position = self.clock.sample(position, timer_sample);

        let next_exists = self.program.segment(self.state.segment_index + 1).is_some();
        self.state.showing_next_clip_preview =
            next_exists && preview_window(control_kind, duration).contains(self.state.position);
    }

    /// Position of the active primary element within the current segment,
    /// when it is loaded for it and decodable.
    fn primary_element_position(&self, trim: TimeCode) -> Option<TimeCode> {
        let track = self.tracks.get(TrackKind::PrimaryVideo)?;
        let slot = track.pair.active();
        if slot.loaded_segment() != Some(self.state.segment_index)
            || slot.element().readiness() != Readiness::Ready
        {
            return None;
        }
        let position = slot.element().position() - trim;
        Some(if position < TimeCode::ZERO {
            TimeCode::ZERO
        } else {
            position
        })
    }

    fn advance_segment(&mut self) {
        self.stop_timer();
        match self.state.advance(self.program.len()) {
            Advance::Next(next) => {
                self.tracks.advance_to(&self.program, next);
                self.clock.reset();
                self.force_broadcast = true;
                info!(segment = next, "Segment advance");
            }
            Advance::Finished => {
                self.tracks.stop();
                self.force_broadcast = true;
                info!("Program complete");
            }
        }
    }

    fn render(&mut self, frames: &FrameStore) -> EngineResult<()> {
        let layers = {
            let segment = self.current_segment();
            let input = SceneInput {
                state: &self.state,
                segment,
                next_segment: self.program.segment(self.state.segment_index + 1),
                resolution: self.config.resolution,
                primary: self.slot_view(TrackKind::PrimaryVideo),
                coach: self.slot_view(TrackKind::CoachVideo),
                glyph_mask_radius: self.config.glyph_mask_radius,
            };
            evaluate(&input)
        };
        self.compositor.render(&layers, frames, &mut self.surface)?;
        Ok(())
    }

    fn mix_audio(&mut self, dt_ms: f64) {
        let frames = (self.config.sample_rate as f64 * dt_ms / 1000.0).round() as usize;
        self.audio_block = self.mixer.mix(frames);
    }

    /// The active slot's media and readiness for a track, when it holds
    /// the current segment.
    fn slot_view(&self, kind: TrackKind) -> Option<(MediaRef, Readiness)> {
        let track = self.tracks.get(kind)?;
        let slot = track.pair.active();
        if slot.loaded_segment() != Some(self.state.segment_index) {
            return None;
        }
        let media = slot.element().current()?;
        Some((media, slot.element().readiness()))
    }

    fn current_segment(&self) -> &Segment {
        // The constructor rejects empty programs and the state machine
        // never indexes past the end, so the clamp is a no-op in practice.
        let index = self.state.segment_index.min(self.program.len() - 1);
        &self.program.segments[index]
    }

    // -----------------------------------------------------------------------
    // Commands and corrections
    // -----------------------------------------------------------------------

    fn apply_command(&mut self, command: Command) {
        match command {
            Command::Channel(inbound) => self.handle_inbound(inbound),
            Command::Start => self.resume(),
            Command::SetCoachMode(active) => {
                if self.role.is_leader() && self.state.coach_mode_active != active {
                    self.state.coach_mode_active = active;
                    self.force_broadcast = true;
                    debug!(active, "Coach mode toggled");
                }
            }
            Command::SetMusicGain(gain) => {
                self.mixer.set_gain(MixChannel::MusicA, gain);
                self.mixer.set_gain(MixChannel::MusicB, gain);
            }
            Command::SetTrainerGain(gain) => {
                self.mixer.set_gain(MixChannel::CoachVideo, gain);
                self.mixer.set_gain(MixChannel::CoachPreview, gain);
            }
            Command::PlayEffect(source) => {
                self.mixer.attach(MixChannel::Effects, source);
            }
            Command::WorkoutOver => self.finish(),
        }
    }

    fn handle_inbound(&mut self, inbound: Inbound) {
        match inbound.topic.as_str() {
            topics::VIDEO_STATUS => {
                if !self.role.mirrors() {
                    return;
                }
                match StatusSnapshot::decode(&inbound.payload) {
                    Ok(snapshot) => {
                        let correction = self.reconciler.reconcile(
                            &snapshot,
                            inbound.timestamp_ms,
                            self.state.segment_index,
                            self.state.position,
                        );
                        if let Some(correction) = correction {
                            self.apply_correction(correction);
                        }
                    }
                    Err(error) => warn!(%error, sender = %inbound.sender_id, "Bad status payload"),
                }
            }
            topics::VIDEO_PAUSE => {
                // Only the leader acts on control requests; followers see
                // the result through the broadcast.
                if !self.role.is_leader() {
                    return;
                }
                match ControlRequest::decode(&inbound.payload) {
                    Ok(ControlRequest::Pause) => self.pause(),
                    Ok(ControlRequest::Play) => self.resume(),
                    Ok(ControlRequest::SeekTo { index }) => self.seek(index),
                    Err(error) => {
                        warn!(%error, sender = %inbound.sender_id, "Bad control payload")
                    }
                }
            }
            topics::GET_VIDEO_STATUS => {
                if self.role.is_leader() {
                    self.force_broadcast = true;
                }
            }
            other => debug!(topic = other, "Ignoring message on unknown topic"),
        }
    }

    fn apply_correction(&mut self, correction: Correction) {
        if correction.over {
            self.finish();
            return;
        }

        if let Some(index) = correction.jump_to {
            let len = self.program.len();
            self.state.seek_to(index, len);
            if self.state.is_over() {
                self.tracks.stop();
                return;
            }
            self.tracks.jump_to(&self.program, index);
            self.clock.reset();
            info!(segment = index, "Jumped to leader's segment");
        }

        if let Some(position) = correction.snap_to {
            self.apply_position(position);
        }

        // Leader-authoritative flags, mirrored verbatim.
        if correction.timer_active != self.state.timer_active {
            if correction.timer_active {
                let is_stretch = self.current_segment().is_stretch;
                self.start_timer(is_stretch);
            } else {
                self.stop_timer();
            }
        }
        self.state.coach_mode_active = correction.coach_mode;

        if correction.paused {
            if self.state.is_playing() {
                self.state.pause();
                self.tracks.pause();
                self.pause_timer();
            }
        } else if !self.state.is_playing() {
            self.state.play();
            self.tracks.resume();
            self.resume_timer();
        }
    }

    /// Snap the local position: clock, state, and the active primary
    /// element all land on the corrected value so the next tick doesn't
    /// re-derive the stale position.
    fn apply_position(&mut self, position: TimeCode) {
        let trim = self.current_segment().trim_offset();
        self.clock.set(position);
        self.state.position = position;
        let index = self.state.segment_index;
        if let Some(track) = self.tracks.get_mut(TrackKind::PrimaryVideo) {
            if track.pair.active_holds(index) {
                track.pair.active_mut().element_mut().seek(position + trim);
            }
        }
        debug!(position = %position, "Position snapped");
    }

    // -----------------------------------------------------------------------
    // Transport controls
    // -----------------------------------------------------------------------

    fn pause(&mut self) {
        if !self.state.is_playing() {
            return;
        }
        self.state.pause();
        self.tracks.pause();
        self.pause_timer();
        self.force_broadcast = true;
    }

    fn resume(&mut self) {
        if self.state.is_over() || self.state.is_playing() {
            return;
        }
        self.state.play();
        self.tracks.resume();
        self.resume_timer();
        self.force_broadcast = true;
    }

    fn seek(&mut self, index: usize) {
        self.stop_timer();
        self.state.seek_to(index, self.program.len());
        if self.state.is_over() {
            self.tracks.stop();
        } else {
            self.tracks.jump_to(&self.program, index);
            self.clock.reset();
            if !self.state.is_playing() {
                self.state.play();
                self.tracks.resume();
            }
        }
        self.force_broadcast = true;
    }

    fn finish(&mut self) {
        if self.state.is_over() {
            return;
        }
        self.stop_timer();
        self.state.finish();
        self.tracks.stop();
        self.force_broadcast = true;
    }

    // -----------------------------------------------------------------------
    // Timer overlay element
    // -----------------------------------------------------------------------

    fn start_timer(&mut self, is_stretch: bool) {
        if let Some(timer) = &mut self.timer {
            timer.assign(&assets::timer(is_stretch));
            timer.play();
        }
        self.state.timer_active = true;
        debug!(is_stretch, "Timer overlay started");
    }

    fn stop_timer(&mut self) {
        if let Some(timer) = &mut self.timer {
            timer.pause();
        }
        self.state.timer_active = false;
    }

    fn pause_timer(&mut self) {
        if let Some(timer) = &mut self.timer {
            timer.pause();
        }
    }

    fn resume_timer(&mut self) {
        if self.state.timer_active {
            if let Some(timer) = &mut self.timer {
                timer.play();
            }
        }
    }

    fn maybe_broadcast(&mut self) {
        if !self.role.is_leader() {
            return;
        }
        if self.force_broadcast || self.broadcaster.due(self.now_ms) {
            let timer_position = self
                .timer
                .as_ref()
                .map(|t| t.position())
                .unwrap_or(TimeCode::ZERO);
            let snapshot = StatusSnapshot::capture(&self.state, timer_position);
            self.broadcaster
                .broadcast(self.channel.as_ref(), &snapshot, self.now_ms);
            self.force_broadcast = false;
        }
    }
}
