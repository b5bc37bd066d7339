//! Deterministic media elements for tests.
//!
//! [`FakeElement`] shares its state through an `Arc`, so a test can keep a
//! clone, hand the element to a slot pair, and still advance its position
//! or inspect what was assigned to it.

use std::sync::Arc;

use cadence_common::{MediaRef, TimeCode};
use parking_lot::Mutex;

use crate::element::{MediaElement, Readiness};

/// One recorded element operation.
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    Assign { element: String, uri: String },
    Seek { element: String, secs: f64 },
    Play { element: String },
    Pause { element: String },
}

/// Shared operation log across all fakes of a test.
#[derive(Clone, Default)]
pub struct SharedLog {
    ops: Arc<Mutex<Vec<Op>>>,
}

impl SharedLog {
    pub fn clear(&self) {
        self.ops.lock().clear();
    }

    pub fn ops(&self) -> Vec<Op> {
        self.ops.lock().clone()
    }

    /// All assigned URIs, in order.
    pub fn assigns(&self) -> Vec<String> {
        self.ops
            .lock()
            .iter()
            .filter_map(|op| match op {
                Op::Assign { uri, .. } => Some(uri.clone()),
                _ => None,
            })
            .collect()
    }

    /// URIs assigned to one named element.
    pub fn assigns_for(&self, element: &str) -> Vec<String> {
        self.ops
            .lock()
            .iter()
            .filter_map(|op| match op {
                Op::Assign { element: e, uri } if e == element => Some(uri.clone()),
                _ => None,
            })
            .collect()
    }

    /// Seek targets (seconds) issued to one named element.
    pub fn seeks_for(&self, element: &str) -> Vec<f64> {
        self.ops
            .lock()
            .iter()
            .filter_map(|op| match op {
                Op::Seek { element: e, secs } if e == element => Some(*secs),
                _ => None,
            })
            .collect()
    }

    fn push(&self, op: Op) {
        self.ops.lock().push(op);
    }
}

#[derive(Debug)]
struct FakeInner {
    current: Option<MediaRef>,
    position: TimeCode,
    playing: bool,
    muted: bool,
    readiness: Readiness,
    ready_on_assign: bool,
}

/// A scriptable in-memory media element.
#[derive(Clone)]
pub struct FakeElement {
    name: String,
    log: SharedLog,
    inner: Arc<Mutex<FakeInner>>,
}

impl FakeElement {
    pub fn named(name: impl Into<String>, log: SharedLog) -> Self {
        Self {
            name: name.into(),
            log,
            inner: Arc::new(Mutex::new(FakeInner {
                current: None,
                position: TimeCode::ZERO,
                playing: false,
                muted: false,
                readiness: Readiness::Empty,
                ready_on_assign: true,
            })),
        }
    }

    /// Make subsequent assigns land in `Loading` instead of `Ready`.
    pub fn stall_loading(&self) {
        self.inner.lock().ready_on_assign = false;
    }

    /// Force the readiness state (e.g. finish a stalled load).
    pub fn set_readiness(&self, readiness: Readiness) {
        self.inner.lock().readiness = readiness;
    }

    /// Advance the element's own playback position when playing.
    pub fn advance(&self, dt: TimeCode) {
        let mut inner = self.inner.lock();
        if inner.playing {
            inner.position = inner.position + dt;
        }
    }

    /// Override the position directly (simulating decoder drift).
    pub fn set_position(&self, position: TimeCode) {
        self.inner.lock().position = position;
    }

    pub fn is_playing(&self) -> bool {
        self.inner.lock().playing
    }

    pub fn is_muted(&self) -> bool {
        self.inner.lock().muted
    }
}

impl MediaElement for FakeElement {
    fn assign(&mut self, media: &MediaRef) {
        self.log.push(Op::Assign {
            element: self.name.clone(),
            uri: media.as_str().to_string(),
        });
        let mut inner = self.inner.lock();
        inner.current = Some(media.clone());
        inner.position = TimeCode::ZERO;
        inner.readiness = if inner.ready_on_assign {
            Readiness::Ready
        } else {
            Readiness::Loading
        };
    }

    fn play(&mut self) {
        self.log.push(Op::Play {
            element: self.name.clone(),
        });
        self.inner.lock().playing = true;
    }

    fn pause(&mut self) {
        self.log.push(Op::Pause {
            element: self.name.clone(),
        });
        self.inner.lock().playing = false;
    }

    fn seek(&mut self, position: TimeCode) {
        self.log.push(Op::Seek {
            element: self.name.clone(),
            secs: position.as_secs(),
        });
        self.inner.lock().position = position;
    }

    fn position(&self) -> TimeCode {
        self.inner.lock().position
    }

    fn readiness(&self) -> Readiness {
        self.inner.lock().readiness
    }

    fn current(&self) -> Option<MediaRef> {
        self.inner.lock().current.clone()
    }

    fn set_muted(&mut self, muted: bool) {
        self.inner.lock().muted = muted;
    }
}
