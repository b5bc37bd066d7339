//! Program loading errors (thiserror-based).

use thiserror::Error;

/// Errors raised while fetching or parsing a program document.
#[derive(Error, Debug)]
pub enum ProgramError {
    /// The metadata source returned nothing usable. Fatal to playback
    /// startup; no partial playback is attempted.
    #[error("program unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("program document malformed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Convenience Result type for program operations.
pub type ProgramResult<T> = Result<T, ProgramError>;
