//! Setup-time validation errors.

use thiserror::Error;

/// Rejected body or shape description.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    #[error("body mass must be positive, got {0}")]
    InvalidMass(f32),
    #[error("circle radius must be positive, got {0}")]
    InvalidRadius(f32),
    #[error("box extents must be positive, got {width}x{height}")]
    InvalidExtents { width: f32, height: f32 },
}
