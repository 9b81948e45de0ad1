//! The gun: aiming, firing with cooldown and recoil, and the magazine it
//! carries on a pivot joint.

use crate::bullet::Bullet;
use crate::config::GunConfig;
use crate::effects::MuzzleFlash;
use crate::magazine::Magazine;
use engine_core::Rgb;
use glam::Vec2;
use hecs::World;
use physics::{BodyDesc, JointHandle, Material, PhysicsBody, PhysicsError, PhysicsWorld, ShapeDesc};
use rand::Rng;

pub const GUN_SIZE: Vec2 = Vec2::new(60.0, 20.0);
pub const GUN_COLOR: Rgb = Rgb::GRAY;
const GUN_MATERIAL: Material = Material::new(0.7, 0.3);
/// Recoil below this is dropped instead of decaying forever.
const RECOIL_CUTOFF: f32 = 0.5;

pub struct Gun {
    body: PhysicsBody,
    magazine: Magazine,
    /// The pivot holding the magazine in. Present exactly while attached.
    joint: Option<JointHandle>,
    /// Aim in degrees, recomputed from the pointer every update.
    angle: f32,
    cooldown: u32,
    recoil_force: f32,
    pub trigger_pulled: bool,
    muzzle_flash: MuzzleFlash,
    config: GunConfig,
}

impl Gun {
    /// Create the gun at `position` with a seated magazine.
    pub fn spawn(
        world: &mut PhysicsWorld,
        position: Vec2,
        config: GunConfig,
    ) -> Result<Self, PhysicsError> {
        let body = world.add_body(&BodyDesc::new(
            position,
            config.mass,
            ShapeDesc::Box {
                width: GUN_SIZE.x,
                height: GUN_SIZE.y,
            },
            GUN_MATERIAL,
        ))?;
        let magazine = Magazine::spawn(
            world,
            position + Vec2::from(config.magazine_offset),
            config.magazine_mass,
        )?;
        let mut gun = Self {
            body,
            magazine,
            joint: None,
            angle: 0.0,
            cooldown: 0,
            recoil_force: 0.0,
            trigger_pulled: false,
            muzzle_flash: MuzzleFlash::new(),
            config,
        };
        gun.attach(world);
        Ok(gun)
    }

    pub fn body(&self) -> PhysicsBody {
        self.body
    }

    pub fn magazine(&self) -> &Magazine {
        &self.magazine
    }

    pub fn joint(&self) -> Option<JointHandle> {
        self.joint
    }

    pub fn is_magazine_attached(&self) -> bool {
        self.joint.is_some()
    }

    /// Aim angle in degrees.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    pub fn recoil_force(&self) -> f32 {
        self.recoil_force
    }

    pub fn config(&self) -> &GunConfig {
        &self.config
    }

    pub fn muzzle_flash(&self) -> &MuzzleFlash {
        &self.muzzle_flash
    }

    pub fn status_text(&self) -> &'static str {
        if self.is_magazine_attached() {
            "Attached"
        } else {
            "Detached"
        }
    }

    /// Unit vector along the current aim.
    pub fn aim_direction(&self) -> Vec2 {
        Vec2::from_angle(self.angle.to_radians())
    }

    pub fn position(&self, world: &PhysicsWorld) -> Option<Vec2> {
        world.position(self.body.rigid_body)
    }

    /// Muzzle point, `barrel_length` out along the aim.
    pub fn barrel_end(&self, world: &PhysicsWorld) -> Option<Vec2> {
        self.position(world)
            .map(|p| p + self.aim_direction() * self.config.barrel_length)
    }

    /// Distance from the gun center to the magazine center.
    pub fn magazine_distance(&self, world: &PhysicsWorld) -> Option<f32> {
        Some(self.position(world)?.distance(self.magazine.position(world)?))
    }

    /// Per-tick bookkeeping: aim, recoil, cooldown, particles, and pulling
    /// the magazine loose once it strays past the detach distance.
    pub fn update(&mut self, world: &mut PhysicsWorld, pointer: Vec2, dt: f32) {
        let Some(position) = self.position(world) else {
            return;
        };
        let to_pointer = pointer - position;
        self.angle = to_pointer.y.atan2(to_pointer.x).to_degrees();

        if self.recoil_force > 0.0 {
            let kick = -self.aim_direction() * self.recoil_force;
            world.apply_impulse(self.body.rigid_body, kick);
            self.recoil_force *= self.config.recoil_decay;
            if self.recoil_force < RECOIL_CUTOFF {
                self.recoil_force = 0.0;
            }
        }

        self.cooldown = self.cooldown.saturating_sub(1);
        self.muzzle_flash.update(dt);

        if self.is_magazine_attached() {
            let distance = self.magazine_distance(world).unwrap_or(f32::INFINITY);
            if distance > self.config.detach_distance {
                log::info!("magazine pulled loose at {:.1}px", distance);
                self.detach(world);
            }
        }
    }

    /// Firing needs a clear cooldown, a seated magazine and the trigger.
    pub fn can_fire(&self) -> bool {
        self.cooldown == 0 && self.is_magazine_attached() && self.trigger_pulled
    }

    /// Fire one bullet if allowed. Returns whether a shot went off.
    pub fn fire<R: Rng + ?Sized>(
        &mut self,
        world: &mut PhysicsWorld,
        bullets: &mut World,
        rng: &mut R,
    ) -> bool {
        if !self.can_fire() {
            return false;
        }
        let Some(muzzle) = self.barrel_end(world) else {
            return false;
        };
        let velocity = self.aim_direction() * self.config.bullet_speed;
        if let Err(e) = Bullet::spawn(world, bullets, muzzle, velocity, &self.config) {
            log::error!("could not spawn bullet: {}", e);
            return false;
        }

        self.recoil_force = self.config.recoil_force;
        self.cooldown = self.config.cooldown_ticks;
        self.muzzle_flash
            .burst(muzzle, self.angle, self.config.flash_particles, rng);
        true
    }

    /// Seat the magazine with a fresh pivot. No-op if already attached, so
    /// the gun never holds two joints.
    pub fn attach(&mut self, world: &mut PhysicsWorld) -> bool {
        if self.joint.is_some() {
            return false;
        }
        let Some(position) = self.position(world) else {
            return false;
        };
        let anchor = position + Vec2::from(self.config.magazine_offset);
        self.joint = world.add_pivot_joint(
            self.body.rigid_body,
            self.magazine.body().rigid_body,
            anchor,
        );
        if self.joint.is_some() {
            log::info!("magazine attached");
        }
        self.joint.is_some()
    }

    /// Drop the pivot. No-op if already detached.
    pub fn detach(&mut self, world: &mut PhysicsWorld) -> bool {
        match self.joint.take() {
            Some(joint) => {
                world.remove_joint(joint);
                log::info!("magazine detached");
                true
            }
            None => false,
        }
    }

    /// Swap in a fresh magazine at the rest offset and seat it. Only
    /// allowed while detached; returns whether a reload happened.
    pub fn reload(&mut self, world: &mut PhysicsWorld) -> Result<bool, PhysicsError> {
        if self.is_magazine_attached() {
            return Ok(false);
        }
        let Some(position) = self.position(world) else {
            return Ok(false);
        };
        let fresh = Magazine::spawn(
            world,
            position + Vec2::from(self.config.magazine_offset),
            self.config.magazine_mass,
        )?;
        let old = std::mem::replace(&mut self.magazine, fresh);
        old.despawn(world);
        log::info!("reloaded");
        Ok(self.attach(world))
    }
}
