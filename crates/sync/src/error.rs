//! Sync protocol errors (thiserror-based).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unrecognized control payload: {payload:?}")]
    UnrecognizedPayload { payload: String },

    #[error("control channel send failed: {0}")]
    Channel(String),
}

pub type SyncResult<T> = Result<T, SyncError>;
