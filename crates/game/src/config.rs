//! Simulation configuration. Loaded from gunrange.ron at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "gunrange.ron";

/// Rejected or unreadable configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("recoil decay must be in (0, 1), got {0}")]
    RecoilDecay(f32),
    #[error("window must be at least 100x100, got {width}x{height}")]
    WindowTooSmall { width: u32, height: u32 },
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Top-level settings for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Play area width in pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Play area height in pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    /// Downward acceleration in px/s².
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    /// Fixed physics step in seconds.
    #[serde(default = "default_fixed_timestep")]
    pub fixed_timestep: f32,
    /// RNG seed; random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub gun: GunConfig,
    #[serde(default)]
    pub target: TargetConfig,
}

fn default_window_width() -> u32 {
    1000
}
fn default_window_height() -> u32 {
    700
}
fn default_gravity() -> f32 {
    980.0
}
fn default_fixed_timestep() -> f32 {
    1.0 / 60.0
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            gravity: default_gravity(),
            fixed_timestep: default_fixed_timestep(),
            seed: None,
            gun: GunConfig::default(),
            target: TargetConfig::default(),
        }
    }
}

/// Gun, magazine and projectile tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GunConfig {
    pub mass: f32,
    pub magazine_mass: f32,
    /// Magazine rest position relative to the gun center.
    pub magazine_offset: (f32, f32),
    /// Impulse applied on the first tick after a shot.
    pub recoil_force: f32,
    /// Per-tick recoil multiplier.
    pub recoil_decay: f32,
    pub bullet_speed: f32,
    pub bullet_mass: f32,
    pub bullet_radius: f32,
    pub bullet_lifetime_ticks: u32,
    pub cooldown_ticks: u32,
    pub barrel_length: f32,
    /// Magazine-to-gun distance beyond which the magazine comes loose.
    pub detach_distance: f32,
    /// Pointer distance within which a click grabs the magazine.
    pub grab_radius: f32,
    pub flash_particles: u32,
}

impl Default for GunConfig {
    fn default() -> Self {
        Self {
            mass: 5.0,
            magazine_mass: 1.0,
            magazine_offset: (-20.0, 30.0),
            recoil_force: 800.0,
            recoil_decay: 0.8,
            bullet_speed: 3000.0,
            bullet_mass: 0.1,
            bullet_radius: 5.0,
            bullet_lifetime_ticks: 180,
            cooldown_ticks: 10,
            barrel_length: 80.0,
            detach_distance: 50.0,
            grab_radius: 30.0,
            flash_particles: 15,
        }
    }
}

/// Target tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub count: u32,
    pub radius: f32,
    pub mass: f32,
    /// Ticks the explosion visual lasts after a hit.
    pub hit_ticks: u32,
    /// Bound on each velocity component assigned when a hit wears off.
    pub respawn_speed: f32,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            count: 3,
            radius: 30.0,
            mass: 10.0,
            hit_ticks: 30,
            respawn_speed: 200.0,
        }
    }
}

impl SimConfig {
    /// Load config from `gunrange.ron` in the current directory. If the file
    /// is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Invalid config at {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_ron(&data)
    }

    /// Parse and validate a RON document.
    pub fn from_ron(data: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Pretty-printed RON, the format `load` reads back.
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Reject values the physics setup cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_width < 100 || self.window_height < 100 {
            return Err(ConfigError::WindowTooSmall {
                width: self.window_width,
                height: self.window_height,
            });
        }
        let gun = &self.gun;
        let target = &self.target;
        for (field, value) in [
            ("fixed_timestep", self.fixed_timestep),
            ("gun.mass", gun.mass),
            ("gun.magazine_mass", gun.magazine_mass),
            ("gun.bullet_speed", gun.bullet_speed),
            ("gun.bullet_mass", gun.bullet_mass),
            ("gun.bullet_radius", gun.bullet_radius),
            ("gun.barrel_length", gun.barrel_length),
            ("gun.detach_distance", gun.detach_distance),
            ("gun.grab_radius", gun.grab_radius),
            ("target.radius", target.radius),
            ("target.mass", target.mass),
            ("target.respawn_speed", target.respawn_speed),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if !(gun.recoil_decay > 0.0 && gun.recoil_decay < 1.0) {
            return Err(ConfigError::RecoilDecay(gun.recoil_decay));
        }
        Ok(())
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(CONFIG_FILE)
}
