//! End-to-end leader/follower sessions wired through an in-memory
//! control channel.
//!
//! The transport is simulated by pumping the leader's recorded broadcasts
//! into the follower's queue with monotonically increasing transport
//! timestamps, exactly as the platform's subscription callback would.

use std::sync::Arc;

use cadence_audio::MixChannel;
use cadence_common::{EngineConfig, MediaRef, Resolution, Role, TimeCode, TrackKind};
use cadence_compositor::FrameStore;
use cadence_engine::{Command, PlaybackSession, TickOutcome, TrackSet};
use cadence_playback::testing::{FakeElement, SharedLog};
use cadence_playback::SlotPair;
use cadence_program::{Program, Segment, SwitchingMode};
use cadence_sync::{topics, ControlRequest, Inbound, MemoryChannel};

fn segment(index: usize, secs: f64) -> Segment {
    Segment {
        index,
        control_kind: None,
        duration_seconds: secs,
        source_video_duration_seconds: secs,
        switching_mode: SwitchingMode::None,
        is_stretch: false,
        primary_video: Some(MediaRef::new(format!("v{index}.mp4"))),
        coach_video: None,
        coach_audio: None,
        music: None,
        custom_image: None,
        note_text: None,
        title_text: None,
    }
}

fn program(count: usize, secs: f64) -> Program {
    Program {
        segments: (0..count).map(|i| segment(i, secs)).collect(),
        shares_one_track_of_music: false,
        music: None,
    }
}

struct Rig {
    session: PlaybackSession,
    elements: [FakeElement; 2],
    channel: MemoryChannel,
}

fn rig(role: Role, count: usize, secs: f64) -> Rig {
    let log = SharedLog::default();
    let a = FakeElement::named("a", log.clone());
    let b = FakeElement::named("b", log.clone());
    let tracks = TrackSet::new().register(
        TrackKind::PrimaryVideo,
        SlotPair::new(
            TrackKind::PrimaryVideo,
            Box::new(a.clone()),
            Box::new(b.clone()),
        ),
        Some(MixChannel::ExerciseVideo),
    );
    let channel = MemoryChannel::new();
    let session = PlaybackSession::new(
        role,
        program(count, secs),
        tracks,
        None,
        Arc::new(channel.clone()),
        EngineConfig {
            resolution: Resolution::new(64, 36),
            ..EngineConfig::default()
        },
    )
    .expect("session");
    Rig {
        session,
        elements: [a, b],
        channel,
    }
}

fn tick(rig: &mut Rig, dt_ms: f64) -> TickOutcome {
    for element in &rig.elements {
        element.advance(TimeCode::from_millis(dt_ms));
    }
    rig.session.tick(dt_ms, &FrameStore::new()).expect("tick")
}

/// Deliver every leader broadcast the follower has not yet seen, stamping
/// transport timestamps.
fn pump(leader: &MemoryChannel, follower: &PlaybackSession, next_ts: &mut i64, seen: &mut usize) {
    let sent = leader.sent_on(topics::VIDEO_STATUS);
    for payload in &sent[*seen..] {
        follower.deliver(Inbound {
            topic: topics::VIDEO_STATUS.into(),
            payload: payload.clone(),
            sender_id: "leader".into(),
            timestamp_ms: *next_ts,
        });
        *next_ts += 1;
    }
    *seen = sent.len();
}

#[test]
fn follower_converges_after_leader_seek() {
    let mut leader = rig(Role::Leader, 7, 30.0);
    let mut follower = rig(Role::Follower, 7, 30.0);
    let (mut ts, mut seen) = (1, 0);

    leader.session.sender().send(Command::Start).unwrap();
    follower.session.sender().send(Command::Start).unwrap();
    tick(&mut leader, 30.0);
    tick(&mut follower, 30.0);

    // A member asks the leader to jump to segment 5.
    leader.session.deliver(Inbound {
        topic: topics::VIDEO_PAUSE.into(),
        payload: ControlRequest::SeekTo { index: 5 }.encode().unwrap(),
        sender_id: "member-2".into(),
        timestamp_ms: 1,
    });
    tick(&mut leader, 30.0);
    assert_eq!(leader.session.state().segment_index, 5);

    pump(&leader.channel, &follower.session, &mut ts, &mut seen);
    tick(&mut follower, 30.0);

    // Direct jump, not a walk: the follower lands on 5 immediately.
    assert_eq!(follower.session.state().segment_index, 5);
}

#[test]
fn pause_and_resume_propagate() {
    let mut leader = rig(Role::Leader, 3, 30.0);
    let mut follower = rig(Role::Follower, 3, 30.0);
    let (mut ts, mut seen) = (1, 0);

    leader.session.sender().send(Command::Start).unwrap();
    follower.session.sender().send(Command::Start).unwrap();
    tick(&mut leader, 30.0);
    tick(&mut follower, 30.0);

    leader.session.deliver(Inbound {
        topic: topics::VIDEO_PAUSE.into(),
        payload: "Pause".into(),
        sender_id: "member-9".into(),
        timestamp_ms: 1,
    });
    tick(&mut leader, 30.0);
    assert!(leader.session.state().is_paused());

    pump(&leader.channel, &follower.session, &mut ts, &mut seen);
    tick(&mut follower, 30.0);
    assert!(follower.session.state().is_paused());

    leader.session.deliver(Inbound {
        topic: topics::VIDEO_PAUSE.into(),
        payload: "Play".into(),
        sender_id: "member-9".into(),
        timestamp_ms: 2,
    });
    tick(&mut leader, 30.0);
    pump(&leader.channel, &follower.session, &mut ts, &mut seen);
    tick(&mut follower, 30.0);
    assert!(follower.session.state().is_playing());
}

#[test]
fn replayed_and_stale_broadcasts_change_nothing() {
    let mut leader = rig(Role::Leader, 3, 30.0);
    let mut follower = rig(Role::Follower, 3, 30.0);
    let (mut ts, mut seen) = (100, 0);

    leader.session.sender().send(Command::Start).unwrap();
    follower.session.sender().send(Command::Start).unwrap();
    tick(&mut leader, 30.0);
    tick(&mut follower, 30.0);

    pump(&leader.channel, &follower.session, &mut ts, &mut seen);
    tick(&mut follower, 30.0);

    let payloads = leader.channel.sent_on(topics::VIDEO_STATUS);
    let replay = payloads[0].clone();
    let settled_index = follower.session.state().segment_index;
    let settled_position = follower.session.state().position;

    // Duplicate timestamp and an older timestamp: both fold away. The
    // zero-length tick isolates the fold from clock movement.
    for stale_ts in [ts - 1, 1] {
        follower.session.deliver(Inbound {
            topic: topics::VIDEO_STATUS.into(),
            payload: replay.clone(),
            sender_id: "leader".into(),
            timestamp_ms: stale_ts,
        });
    }
    tick(&mut follower, 0.0);

    assert_eq!(follower.session.state().segment_index, settled_index);
    assert_eq!(follower.session.state().position, settled_position);
}

#[test]
fn message_loss_free_runs_until_next_broadcast() {
    let mut leader = rig(Role::Leader, 3, 10.0);
    let mut follower = rig(Role::Follower, 3, 10.0);

    leader.session.sender().send(Command::Start).unwrap();
    follower.session.sender().send(Command::Start).unwrap();
    tick(&mut leader, 30.0);
    tick(&mut follower, 30.0);

    // Every broadcast is lost; the follower still advances on its own
    // clock and finishes without error.
    let mut finished = false;
    for _ in 0..1200 {
        if tick(&mut follower, 30.0) == TickOutcome::Finished {
            finished = true;
            break;
        }
    }
    assert!(finished);
    assert!(follower.session.state().is_over());
}

#[test]
fn leader_end_reaches_followers() {
    let mut leader = rig(Role::Leader, 3, 30.0);
    let mut follower = rig(Role::Follower, 3, 30.0);
    let (mut ts, mut seen) = (1, 0);

    leader.session.sender().send(Command::Start).unwrap();
    follower.session.sender().send(Command::Start).unwrap();
    tick(&mut leader, 30.0);
    tick(&mut follower, 30.0);

    leader.session.sender().send(Command::WorkoutOver).unwrap();
    let _ = tick(&mut leader, 30.0);

    pump(&leader.channel, &follower.session, &mut ts, &mut seen);
    let outcome = tick(&mut follower, 30.0);
    assert_eq!(outcome, TickOutcome::Finished);
    assert!(follower.session.state().is_over());
}
