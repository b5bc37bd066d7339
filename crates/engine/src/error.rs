//! Top-level engine error (thiserror-based).

use thiserror::Error;

/// Aggregates the per-crate errors a session can surface.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("program error: {0}")]
    Program(#[from] cadence_program::ProgramError),

    #[error("compositor error: {0}")]
    Compositor(#[from] cadence_compositor::CompositorError),

    #[error("sync error: {0}")]
    Sync(#[from] cadence_sync::SyncError),
}

pub type EngineResult<T> = Result<T, EngineError>;
