use thiserror::Error;

use crate::math::Float;

pub type Result<T> = std::result::Result<T, Error>;

/// Configuration errors, raised while building a [`crate::scene::Scene`] and never during a
/// render.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("ripple interval must be positive and finite, got {0}")]
    InvalidInterval(Float),

    #[error("segment width must be positive and finite, with a canvas of at most 16384 pixels, got {0}")]
    InvalidSegmentWidth(Float),

    #[error("ambient term must be non-negative and finite, got {0}")]
    InvalidAmbient(Float),

    #[error("light {index} is invalid: {reason}")]
    InvalidLight { index: usize, reason: &'static str },
}
