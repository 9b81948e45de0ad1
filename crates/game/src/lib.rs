//! Gun range: a 2D physics sandbox with a recoiling gun, a detachable
//! magazine and targets that flash when hit.

pub mod arena;
pub mod bullet;
pub mod config;
pub mod effects;
pub mod gun;
pub mod interaction;
pub mod magazine;
pub mod simulation;
pub mod snapshot;
pub mod target;

pub use config::{ConfigError, GunConfig, SimConfig, TargetConfig};
pub use gun::Gun;
pub use interaction::{Interaction, InteractionController};
pub use simulation::Simulation;
pub use snapshot::{FrameSnapshot, GunView, MagazineView, ParticleView, TargetView};
