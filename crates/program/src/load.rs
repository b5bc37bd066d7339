//! Program deserialization and the external metadata-source boundary.

use tracing::{debug, info};

use crate::error::{ProgramError, ProgramResult};
use crate::types::Program;

/// External source of program documents (HTTP retrieval lives behind this
/// boundary; the engine never talks to a transport directly).
pub trait ProgramSource {
    /// Fetch the raw program document for a scheduled class.
    ///
    /// Implementations return whatever the platform serves; parsing and
    /// validation happen here.
    fn fetch(&self, workout_id: &str, class_schedule_id: &str) -> Result<String, String>;
}

/// Deserialize a program from a JSON string and validate it.
pub fn from_json_string(json: &str) -> ProgramResult<Program> {
    let mut program: Program = serde_json::from_str(json)?;

    // Indices are re-derived from document order so the table is dense and
    // 0-based regardless of what the document carried.
    for (i, segment) in program.segments.iter_mut().enumerate() {
        segment.index = i;
    }

    debug!(
        segment_count = program.segments.len(),
        shared_music = program.shares_one_track_of_music,
        "Deserialized program document"
    );

    validate_program(&program)?;

    Ok(program)
}

/// Fetch and parse a program. Fails with [`ProgramError::Unavailable`] if
/// the source errors out or returns no usable segment list — fatal to
/// playback startup, surfaced to the caller.
pub fn fetch_program(
    source: &dyn ProgramSource,
    workout_id: &str,
    class_schedule_id: &str,
) -> ProgramResult<Program> {
    let json = source
        .fetch(workout_id, class_schedule_id)
        .map_err(|reason| {
            tracing::error!(workout_id, class_schedule_id, %reason, "Program fetch failed");
            ProgramError::Unavailable { reason }
        })?;

    let program = from_json_string(&json)?;

    info!(
        workout_id,
        class_schedule_id,
        segments = program.len(),
        "Program loaded"
    );

    Ok(program)
}

/// Validate basic structural requirements of a loaded program.
fn validate_program(program: &Program) -> ProgramResult<()> {
    if program.is_empty() {
        return Err(ProgramError::Unavailable {
            reason: "document contains no segments".into(),
        });
    }

    for segment in &program.segments {
        if !segment.duration_seconds.is_finite() || segment.duration_seconds <= 0.0 {
            return Err(ProgramError::Unavailable {
                reason: format!(
                    "segment {} has invalid duration {}",
                    segment.index, segment.duration_seconds
                ),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_common::TrackKind;

    struct FixedSource(Result<String, String>);

    impl ProgramSource for FixedSource {
        fn fetch(&self, _workout_id: &str, _class_schedule_id: &str) -> Result<String, String> {
            self.0.clone()
        }
    }

    fn sample_json() -> String {
        serde_json::json!({
            "segments": [
                {
                    "durationSeconds": 30.0,
                    "sourceVideoDurationSeconds": 35.0,
                    "switchingMode": "leftRight",
                    "primaryVideo": "squats.mp4",
                    "titleText": "Squats"
                },
                {
                    "controlKind": "rest",
                    "durationSeconds": 15.0,
                    "noteText": "Catch your breath"
                }
            ],
            "sharesOneTrackOfMusic": true,
            "music": "mix.mp3"
        })
        .to_string()
    }

    #[test]
    fn from_json_string_basic() {
        let program = from_json_string(&sample_json()).expect("parse");
        assert_eq!(program.len(), 2);
        assert_eq!(program.segments[0].index, 0);
        assert_eq!(program.segments[1].index, 1);
        assert!(program.segments[1].is_control());
        assert_eq!(
            program.media_for(1, TrackKind::Music).map(|m| m.as_str()),
            Some("mix.mp3")
        );
    }

    #[test]
    fn indices_rederived_from_order() {
        let json = serde_json::json!({
            "segments": [
                { "index": 7, "durationSeconds": 10.0 },
                { "index": 7, "durationSeconds": 10.0 }
            ]
        })
        .to_string();
        let program = from_json_string(&json).expect("parse");
        assert_eq!(program.segments[0].index, 0);
        assert_eq!(program.segments[1].index, 1);
    }

    #[test]
    fn empty_segment_list_is_unavailable() {
        let json = r#"{"segments":[]}"#;
        let err = from_json_string(json).unwrap_err();
        assert!(matches!(err, ProgramError::Unavailable { .. }));
    }

    #[test]
    fn invalid_duration_is_unavailable() {
        let json = r#"{"segments":[{"durationSeconds":0.0}]}"#;
        let err = from_json_string(json).unwrap_err();
        assert!(matches!(err, ProgramError::Unavailable { .. }));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = from_json_string("not json").unwrap_err();
        assert!(matches!(err, ProgramError::Parse(_)));
    }

    #[test]
    fn fetch_failure_maps_to_unavailable() {
        let source = FixedSource(Err("503 from metadata service".into()));
        let err = fetch_program(&source, "w1", "c1").unwrap_err();
        match err {
            ProgramError::Unavailable { reason } => assert!(reason.contains("503")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn fetch_success_parses() {
        let source = FixedSource(Ok(sample_json()));
        let program = fetch_program(&source, "w1", "c1").expect("fetch");
        assert_eq!(program.len(), 2);
    }
}
