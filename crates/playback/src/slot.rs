//! Per-track double buffering: one slot visible/audible now, the other
//! silently preloaded with the next segment's media.
//!
//! Advancing the active pointer is a swap plus a play call; the standby
//! slot is re-assigned the next defining segment immediately after, so a
//! load never sits on the critical path of a segment transition.

use cadence_common::{TimeCode, TrackKind};
use cadence_program::Program;
use tracing::{debug, warn};

use crate::element::MediaElement;

/// One half of a slot pair.
pub struct Slot {
    element: Box<dyn MediaElement>,
    /// Which segment this slot's media was loaded for. `None` when blank.
    loaded_segment: Option<usize>,
}

impl Slot {
    fn new(element: Box<dyn MediaElement>) -> Self {
        Self {
            element,
            loaded_segment: None,
        }
    }

    pub fn element(&self) -> &dyn MediaElement {
        self.element.as_ref()
    }

    pub fn element_mut(&mut self) -> &mut dyn MediaElement {
        self.element.as_mut()
    }

    pub fn loaded_segment(&self) -> Option<usize> {
        self.loaded_segment
    }

    /// Assign this slot the media for segment `index`, skipping the load
    /// when the element already holds it for that segment.
    fn load_for(&mut self, program: &Program, track: TrackKind, index: usize) -> bool {
        let Some(target) = program.media_for(index, track) else {
            self.loaded_segment = None;
            return false;
        };

        let already_loaded =
            self.loaded_segment == Some(index) && self.element.current().as_ref() == Some(target);
        if !already_loaded {
            self.element.assign(target);
            if track == TrackKind::PrimaryVideo {
                if let Some(segment) = program.segment(index) {
                    let offset = segment.trim_offset();
                    if offset > TimeCode::ZERO {
                        self.element.seek(offset);
                    }
                }
            }
        }
        self.loaded_segment = Some(index);
        true
    }
}

/// Double-buffered media holder for one track.
pub struct SlotPair {
    track: TrackKind,
    slots: [Slot; 2],
    active: usize,
    playing: bool,
}

impl SlotPair {
    /// Build a pair around two host-provided elements. Both start muted,
    /// paused, and blank.
    pub fn new(track: TrackKind, first: Box<dyn MediaElement>, second: Box<dyn MediaElement>) -> Self {
        let mut pair = Self {
            track,
            slots: [Slot::new(first), Slot::new(second)],
            active: 0,
            playing: false,
        };
        for slot in &mut pair.slots {
            slot.element.set_muted(true);
            slot.element.pause();
        }
        pair
    }

    pub fn track(&self) -> TrackKind {
        self.track
    }

    pub fn active(&self) -> &Slot {
        &self.slots[self.active]
    }

    pub fn active_mut(&mut self) -> &mut Slot {
        &mut self.slots[self.active]
    }

    pub fn standby(&self) -> &Slot {
        &self.slots[1 - self.active]
    }

    /// Whether the active slot currently holds media for the given segment.
    pub fn active_holds(&self, index: usize) -> bool {
        self.active().loaded_segment() == Some(index)
    }

    /// Assign segment 0 to the active slot (when it defines this track) and
    /// preload the standby slot with the next defining segment.
    pub fn arm_initial(&mut self, program: &Program) {
        self.slots[self.active].load_for(program, self.track, 0);
        self.preload_standby(program, 1);
        debug!(
            track = %self.track,
            active = ?self.active().loaded_segment(),
            standby = ?self.standby().loaded_segment(),
            "Slot pair armed"
        );
    }

    /// Natural advance to segment `index`: activate the preloaded standby
    /// (or keep the active element running when the reference is unchanged)
    /// and preload the next defining segment behind it.
    pub fn advance_to(&mut self, program: &Program, index: usize) {
        self.arm_for(program, index);
        debug!(
            track = %self.track,
            segment = index,
            active = ?self.active().loaded_segment(),
            standby = ?self.standby().loaded_segment(),
            "Slot pair advanced"
        );
    }

    /// Direct jump to an arbitrary segment (sync correction): re-runs the
    /// same assignment logic for `index`, not a sequential walk.
    pub fn jump_to(&mut self, program: &Program, index: usize) {
        self.arm_for(program, index);
        debug!(
            track = %self.track,
            segment = index,
            active = ?self.active().loaded_segment(),
            "Slot pair jumped"
        );
    }

    fn arm_for(&mut self, program: &Program, index: usize) {
        let target = program.media_for(index, self.track);

        match target {
            None => {
                // The segment defines nothing for this track: go blank but
                // keep the standby preload for whatever comes next.
                let active = &mut self.slots[self.active];
                active.element.pause();
                active.element.set_muted(true);
                active.loaded_segment = None;
            }
            Some(target) => {
                let active_continues =
                    self.slots[self.active].element.current().as_ref() == Some(target);
                if active_continues {
                    // Same reference spans consecutive segments: continuity
                    // of an already-playing source wins over reassignment.
                    self.slots[self.active].loaded_segment = Some(index);
                    self.slots[self.active].element.set_muted(false);
                    if self.playing {
                        self.slots[self.active].element.play();
                    }
                } else {
                    let standby = 1 - self.active;
                    if !self.slots[standby].load_for(program, self.track, index) {
                        warn!(
                            track = %self.track,
                            segment = index,
                            "Slot media vanished between preload and activation"
                        );
                    }
                    // Swap: the preloaded slot becomes audible/visible, the
                    // old active goes silent and turns into the preloader.
                    let old_active = self.active;
                    self.active = standby;
                    self.slots[standby].element.set_muted(false);
                    if self.playing {
                        self.slots[standby].element.play();
                    }
                    self.slots[old_active].element.pause();
                    self.slots[old_active].element.set_muted(true);
                }
            }
        }

        self.preload_standby(program, index + 1);
    }

    /// Point the standby slot at the next segment (at or after `from`) that
    /// defines this track. `None` from the scan leaves it blank; the track
    /// simply stays silent for the remainder of the program.
    fn preload_standby(&mut self, program: &Program, from: usize) {
        let standby = 1 - self.active;
        match program.next_defining(self.track, from) {
            Some(next) => {
                self.slots[standby].load_for(program, self.track, next);
            }
            None => {
                self.slots[standby].loaded_segment = None;
            }
        }
        self.slots[standby].element.pause();
        self.slots[standby].element.set_muted(true);
    }

    /// Resume the active element (no-op on a blank slot).
    pub fn resume(&mut self) {
        self.playing = true;
        if self.slots[self.active].loaded_segment.is_some() {
            self.slots[self.active].element.set_muted(false);
            self.slots[self.active].element.play();
        }
    }

    /// Pause the active element.
    pub fn pause(&mut self) {
        self.playing = false;
        self.slots[self.active].element.pause();
    }

    /// Stop both elements (teardown or end of program).
    pub fn stop(&mut self) {
        self.playing = false;
        for slot in &mut self.slots {
            slot.element.pause();
            slot.element.set_muted(true);
        }
    }
}
