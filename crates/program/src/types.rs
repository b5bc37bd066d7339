//! Program document types: an ordered, immutable-once-loaded table of
//! segments describing what to play and for how long.

use cadence_common::{MediaRef, TimeCode, TrackKind};
use serde::{Deserialize, Serialize};

/// Kind of a control screen; `None` on a [`Segment`] means an ordinary
/// exercise clip.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ControlKind {
    Welcome,
    GoTime,
    Rest,
    Water,
    Custom,
    Congratulations,
}

/// On-screen side-switching hint for the exercise.
///
/// Anything other than `None` also trims the source video: the excess over
/// the scripted duration is centered and cut from both ends.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SwitchingMode {
    #[default]
    None,
    LeftRight,
    Alternate,
}

/// One scripted unit of the program: an exercise clip, a rest period, or a
/// control screen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// Position in the program, 0-based. Re-derived from document order on
    /// load so the in-memory table is always dense.
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub control_kind: Option<ControlKind>,
    pub duration_seconds: f64,
    /// May exceed `duration_seconds`; the excess is centered and trimmed
    /// when a switching mode is set.
    #[serde(default)]
    pub source_video_duration_seconds: f64,
    #[serde(default)]
    pub switching_mode: SwitchingMode,
    /// Selects between the two parallel timer/transition asset pairs.
    #[serde(default)]
    pub is_stretch: bool,
    #[serde(default)]
    pub primary_video: Option<MediaRef>,
    #[serde(default)]
    pub coach_video: Option<MediaRef>,
    #[serde(default)]
    pub coach_audio: Option<MediaRef>,
    #[serde(default)]
    pub music: Option<MediaRef>,
    #[serde(default)]
    pub custom_image: Option<MediaRef>,
    #[serde(default)]
    pub note_text: Option<String>,
    #[serde(default)]
    pub title_text: Option<String>,
}

impl Segment {
    /// Scripted duration as a time code.
    pub fn duration(&self) -> TimeCode {
        TimeCode::from_secs(self.duration_seconds)
    }

    /// Whether this is a control screen rather than an exercise clip.
    pub fn is_control(&self) -> bool {
        self.control_kind.is_some()
    }

    /// The media reference this segment defines for the given track, if any.
    /// Shared-music resolution happens at the [`Program`] level.
    pub fn media_for(&self, track: TrackKind) -> Option<&MediaRef> {
        match track {
            TrackKind::PrimaryVideo => self.primary_video.as_ref(),
            TrackKind::CoachVideo => self.coach_video.as_ref(),
            TrackKind::Music => self.music.as_ref(),
        }
    }

    /// Playback start offset into the source video.
    ///
    /// When a switching mode is set and the source runs longer than the
    /// scripted duration, the excess is centered: playback starts halfway
    /// into the trimmed-off material.
    pub fn trim_offset(&self) -> TimeCode {
        if self.switching_mode == SwitchingMode::None {
            return TimeCode::ZERO;
        }
        let excess = self.source_video_duration_seconds - self.duration_seconds;
        if excess > 0.0 {
            TimeCode::from_secs(excess / 2.0)
        } else {
            TimeCode::ZERO
        }
    }
}

/// An ordered sequence of segments. Insertion order is playback order and
/// is never reordered after load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub segments: Vec<Segment>,
    /// When true, one music reference spans the whole program.
    #[serde(default)]
    pub shares_one_track_of_music: bool,
    #[serde(default)]
    pub music: Option<MediaRef>,
}

impl Program {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    /// The media reference the given segment uses for a track, resolving
    /// the program-wide shared music track.
    pub fn media_for(&self, index: usize, track: TrackKind) -> Option<&MediaRef> {
        if track == TrackKind::Music && self.shares_one_track_of_music {
            return self.music.as_ref();
        }
        self.segments.get(index)?.media_for(track)
    }

    /// Linear forward scan for the next segment at or after `from` that
    /// defines media for `track`. Returns `None` when the scan reaches the
    /// end; callers recover by leaving that track silent/blank.
    pub fn next_defining(&self, track: TrackKind, from: usize) -> Option<usize> {
        if track == TrackKind::Music && self.shares_one_track_of_music {
            // The shared track is defined everywhere the program still runs.
            return (from < self.segments.len() && self.music.is_some()).then_some(from);
        }
        self.segments[from.min(self.segments.len())..]
            .iter()
            .find(|s| s.media_for(track).is_some())
            .map(|s| s.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(index: usize, video: Option<&str>, music: Option<&str>) -> Segment {
        Segment {
            index,
            control_kind: None,
            duration_seconds: 30.0,
            source_video_duration_seconds: 30.0,
            switching_mode: SwitchingMode::None,
            is_stretch: false,
            primary_video: video.map(MediaRef::new),
            coach_video: None,
            coach_audio: None,
            music: music.map(MediaRef::new),
            custom_image: None,
            note_text: None,
            title_text: None,
        }
    }

    fn program(segments: Vec<Segment>) -> Program {
        Program {
            segments,
            shares_one_track_of_music: false,
            music: None,
        }
    }

    #[test]
    fn next_defining_skips_gaps() {
        let p = program(vec![
            clip(0, Some("a.mp4"), None),
            clip(1, None, None),
            clip(2, Some("b.mp4"), Some("m.mp3")),
        ]);
        assert_eq!(p.next_defining(TrackKind::PrimaryVideo, 1), Some(2));
        assert_eq!(p.next_defining(TrackKind::Music, 0), Some(2));
    }

    #[test]
    fn next_defining_none_at_end() {
        let p = program(vec![clip(0, Some("a.mp4"), None), clip(1, None, None)]);
        assert_eq!(p.next_defining(TrackKind::PrimaryVideo, 1), None);
        assert_eq!(p.next_defining(TrackKind::PrimaryVideo, 99), None);
    }

    #[test]
    fn shared_music_track_answers_everywhere() {
        let mut p = program(vec![clip(0, None, None), clip(1, None, None)]);
        p.shares_one_track_of_music = true;
        p.music = Some(MediaRef::new("session.mp3"));

        assert_eq!(p.next_defining(TrackKind::Music, 0), Some(0));
        assert_eq!(p.next_defining(TrackKind::Music, 1), Some(1));
        assert_eq!(p.next_defining(TrackKind::Music, 2), None);
        assert_eq!(
            p.media_for(1, TrackKind::Music).map(MediaRef::as_str),
            Some("session.mp3")
        );
    }

    #[test]
    fn trim_offset_centers_excess() {
        let mut s = clip(0, Some("a.mp4"), None);
        s.switching_mode = SwitchingMode::LeftRight;
        s.duration_seconds = 30.0;
        s.source_video_duration_seconds = 40.0;
        assert!((s.trim_offset().as_secs() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn trim_offset_zero_without_switching() {
        let mut s = clip(0, Some("a.mp4"), None);
        s.duration_seconds = 30.0;
        s.source_video_duration_seconds = 40.0;
        assert_eq!(s.trim_offset(), TimeCode::ZERO);
    }

    #[test]
    fn trim_offset_zero_when_source_shorter() {
        let mut s = clip(0, Some("a.mp4"), None);
        s.switching_mode = SwitchingMode::Alternate;
        s.duration_seconds = 30.0;
        s.source_video_duration_seconds = 25.0;
        assert_eq!(s.trim_offset(), TimeCode::ZERO);
    }
}
