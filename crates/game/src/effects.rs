//! Muzzle flash particles. Visual only; they never touch the physics world.

use engine_core::Rgb;
use glam::Vec2;
use rand::seq::SliceRandom;
use rand::Rng;

const FLASH_COLORS: [Rgb; 3] = [Rgb::ORANGE, Rgb::YELLOW, Rgb::RED];
/// Half-angle of the flash cone, degrees.
const FLASH_SPREAD_DEG: f32 = 15.0;

pub struct MuzzleFlashParticle {
    pub position: Vec2,
    /// px/s
    pub velocity: Vec2,
    /// Remaining life in ticks.
    pub life: i32,
    pub color: Rgb,
    pub size: f32,
}

/// Live flash particles spawned by the gun.
#[derive(Default)]
pub struct MuzzleFlash {
    pub particles: Vec<MuzzleFlashParticle>,
}

impl MuzzleFlash {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spray `count` particles out of `origin` around `angle_deg`.
    pub fn burst<R: Rng + ?Sized>(&mut self, origin: Vec2, angle_deg: f32, count: u32, rng: &mut R) {
        self.particles.reserve(count as usize);
        for _ in 0..count {
            let angle = angle_deg + rng.gen_range(-FLASH_SPREAD_DEG..=FLASH_SPREAD_DEG);
            let speed: f32 = rng.gen_range(50.0..=200.0);
            self.particles.push(MuzzleFlashParticle {
                position: origin,
                velocity: Vec2::from_angle(angle.to_radians()) * speed,
                life: rng.gen_range(5..=15),
                color: *FLASH_COLORS.choose(rng).unwrap_or(&Rgb::ORANGE),
                size: rng.gen_range(3..=8) as f32,
            });
        }
    }

    /// Drift every particle one tick and drop the burnt-out ones.
    pub fn update(&mut self, dt: f32) {
        for p in &mut self.particles {
            p.position += p.velocity * dt;
            p.life -= 1;
        }
        self.particles.retain(|p| p.life > 0);
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn burst_respects_ranges() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut flash = MuzzleFlash::new();
        let aim = Vec2::X;
        flash.burst(Vec2::new(10.0, 20.0), 0.0, 15, &mut rng);
        assert_eq!(flash.len(), 15);
        for p in &flash.particles {
            assert_eq!(p.position, Vec2::new(10.0, 20.0));
            let speed = p.velocity.length();
            assert!((50.0 - 1e-3..=200.0 + 1e-3).contains(&speed));
            let off_axis = p.velocity.normalize().dot(aim).clamp(-1.0, 1.0).acos().to_degrees();
            assert!(off_axis <= 15.0 + 1e-3, "spread {}", off_axis);
            assert!((5..=15).contains(&p.life));
            assert!((3.0..=8.0).contains(&p.size));
            assert!(FLASH_COLORS.contains(&p.color));
        }
    }

    #[test]
    fn particles_burn_out() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut flash = MuzzleFlash::new();
        flash.burst(Vec2::ZERO, 90.0, 15, &mut rng);
        for _ in 0..15 {
            flash.update(1.0 / 60.0);
        }
        assert!(flash.is_empty());
    }

    #[test]
    fn particles_drift_by_velocity() {
        let mut flash = MuzzleFlash::new();
        flash.particles.push(MuzzleFlashParticle {
            position: Vec2::ZERO,
            velocity: Vec2::new(120.0, 0.0),
            life: 3,
            color: Rgb::RED,
            size: 4.0,
        });
        flash.update(0.5);
        assert_eq!(flash.particles[0].position, Vec2::new(60.0, 0.0));
        assert_eq!(flash.particles[0].life, 2);
    }
}
