//! Circular targets that flash when hit and then bounce off somewhere new.

use crate::config::TargetConfig;
use glam::Vec2;
use physics::{BodyDesc, CollisionType, Material, PhysicsBody, PhysicsError, PhysicsWorld, ShapeDesc};
use rand::Rng;

const TARGET_MATERIAL: Material = Material::new(0.5, 0.8);

#[derive(Debug, Clone)]
pub struct Target {
    body: PhysicsBody,
    radius: f32,
    hit: bool,
    /// Ticks left in the explosion visual. Only counts down while `hit`.
    hit_time: u32,
    config: TargetConfig,
}

impl Target {
    pub fn spawn(
        world: &mut PhysicsWorld,
        position: Vec2,
        config: TargetConfig,
    ) -> Result<Self, PhysicsError> {
        let body = world.add_body(
            &BodyDesc::new(
                position,
                config.mass,
                ShapeDesc::Circle {
                    radius: config.radius,
                },
                TARGET_MATERIAL,
            )
            .with_collision_type(CollisionType::Target),
        )?;
        Ok(Self {
            body,
            radius: config.radius,
            hit: false,
            hit_time: 0,
            config,
        })
    }

    pub fn body(&self) -> PhysicsBody {
        self.body
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn is_hit(&self) -> bool {
        self.hit
    }

    pub fn hit_time(&self) -> u32 {
        self.hit_time
    }

    /// Enter (or restart) the explosion visual.
    pub fn register_hit(&mut self) {
        self.hit = true;
        self.hit_time = self.config.hit_ticks;
    }

    /// Count the explosion down. The tick it reaches zero, the target
    /// leaves the hit state and is flung in a random direction.
    pub fn update<R: Rng + ?Sized>(&mut self, world: &mut PhysicsWorld, rng: &mut R) {
        if !self.hit {
            return;
        }
        self.hit_time = self.hit_time.saturating_sub(1);
        if self.hit_time == 0 {
            self.hit = false;
            let speed = self.config.respawn_speed;
            let velocity = Vec2::new(
                rng.gen_range(-speed..=speed),
                rng.gen_range(-speed..=speed),
            );
            world.set_velocity(self.body.rigid_body, velocity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn spawn(world: &mut PhysicsWorld) -> Target {
        Target::spawn(world, Vec2::new(700.0, 300.0), TargetConfig::default()).unwrap()
    }

    #[test]
    fn hit_time_only_runs_while_hit() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let mut rng = StdRng::seed_from_u64(3);
        let mut target = spawn(&mut world);
        target.update(&mut world, &mut rng);
        assert!(!target.is_hit());
        assert_eq!(target.hit_time(), 0);
        assert_eq!(world.velocity(target.body().rigid_body), Some(Vec2::ZERO));
    }

    #[test]
    fn hit_wears_off_on_the_zero_tick() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let mut rng = StdRng::seed_from_u64(9);
        let mut target = spawn(&mut world);
        target.register_hit();
        assert_eq!(target.hit_time(), 30);

        for remaining in (1..30).rev() {
            target.update(&mut world, &mut rng);
            assert!(target.is_hit());
            assert_eq!(target.hit_time(), remaining);
        }
        target.update(&mut world, &mut rng);
        assert_eq!(target.hit_time(), 0);
        assert!(!target.is_hit());
        let velocity = world.velocity(target.body().rigid_body).unwrap();
        assert!(velocity.x.abs() <= 200.0 && velocity.y.abs() <= 200.0);
        assert_ne!(velocity, Vec2::ZERO);
    }

    #[test]
    fn second_hit_restarts_the_countdown() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let mut rng = StdRng::seed_from_u64(0);
        let mut target = spawn(&mut world);
        target.register_hit();
        for _ in 0..10 {
            target.update(&mut world, &mut rng);
        }
        target.register_hit();
        assert_eq!(target.hit_time(), 30);
    }
}
