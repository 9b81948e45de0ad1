//! Core engine types shared by the gun range crates.
//!
//! - Fixed-timestep clock for the simulation loop
//! - Tick-based components for the ECS arena
//! - RGB palette used by render snapshots

pub mod color;
pub mod components;
pub mod time;

pub use color::*;
pub use components::*;
pub use time::*;
