//! The session command queue.
//!
//! Transport callbacks and host controls never mutate the session
//! directly: they enqueue commands here, and the tick driver drains the
//! queue once at the start of each tick. That keeps every mutation on the
//! session's own execution path, so a handler can never observe a
//! half-updated state.

use cadence_audio::AudioSource;
use crossbeam::channel::{unbounded, Receiver, Sender, TryRecvError};
use cadence_sync::Inbound;

/// One queued instruction for the session.
pub enum Command {
    /// An inbound control-channel message (any topic).
    Channel(Inbound),
    /// Host: begin playback.
    Start,
    /// Host: show or hide the coach inset (leader UI transition).
    SetCoachMode(bool),
    /// Host: member background-music volume, 0..=1.
    SetMusicGain(f32),
    /// Host: coach/trainer volume, 0..=1.
    SetTrainerGain(f32),
    /// Host: fire a discrete sound-effect cue into the mixer.
    PlayEffect(Box<dyn AudioSource + Send>),
    /// External session-timeout signal: force the terminal state.
    WorkoutOver,
}

/// Unbounded command queue with cloneable senders for transport callbacks.
pub struct CommandQueue {
    tx: Sender<Command>,
    rx: Receiver<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// A sender handle for transport callbacks and host controls.
    pub fn sender(&self) -> Sender<Command> {
        self.tx.clone()
    }

    /// Drain everything queued so far, in arrival order, without blocking.
    pub fn drain(&self) -> Vec<Command> {
        let mut commands = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(command) => commands.push(command),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        commands
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}
