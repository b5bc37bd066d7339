//! Compositor errors (thiserror-based).

use cadence_common::Resolution;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompositorError {
    #[error("surface is {got}, compositor expects {expected}")]
    SurfaceMismatch {
        expected: Resolution,
        got: Resolution,
    },
}
