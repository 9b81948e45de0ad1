//! 2D rigid-body physics for the gun range, built on Rapier2D.

pub mod collision;
pub mod error;
pub mod joint;
pub mod physics_world;
pub mod router;

pub use collision::*;
pub use error::*;
pub use joint::*;
pub use physics_world::*;
pub use router::*;

// Re-export Rapier for downstream crates
pub use rapier2d;

// Re-export common Rapier types
pub use rapier2d::prelude::{ColliderHandle, RigidBodyHandle};
