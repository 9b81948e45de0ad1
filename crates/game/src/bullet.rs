//! Projectiles fired by the gun, stored as entities in a hecs arena.

use crate::config::GunConfig;
use engine_core::Lifetime;
use glam::Vec2;
use hecs::{Entity, World};
use physics::{
    BodyDesc, ColliderHandle, CollisionType, Material, PhysicsBody, PhysicsError, PhysicsWorld,
    ShapeDesc,
};

const BULLET_MATERIAL: Material = Material::new(0.5, 0.8);

/// Projectile component.
#[derive(Debug, Clone, Copy)]
pub struct Bullet {
    pub body: PhysicsBody,
    /// Set by the first target contact; a spent bullet is removed after
    /// the current step and ignores any further contacts.
    pub spent: bool,
}

impl Bullet {
    /// Spawn a bullet body and its entity.
    pub fn spawn(
        world: &mut PhysicsWorld,
        bullets: &mut World,
        position: Vec2,
        velocity: Vec2,
        config: &GunConfig,
    ) -> Result<Entity, PhysicsError> {
        let body = world.add_body(
            &BodyDesc::new(
                position,
                config.bullet_mass,
                ShapeDesc::Circle {
                    radius: config.bullet_radius,
                },
                BULLET_MATERIAL,
            )
            .with_velocity(velocity)
            .with_collision_type(CollisionType::Projectile)
            .with_ccd(true),
        )?;
        Ok(bullets.spawn((
            Bullet { body, spent: false },
            Lifetime::new(config.bullet_lifetime_ticks),
        )))
    }
}

/// Find the bullet entity owning a collider.
pub fn find_bullet(bullets: &World, collider: ColliderHandle) -> Option<Entity> {
    bullets
        .query::<&Bullet>()
        .iter()
        .find(|(_, bullet)| bullet.body.collider == collider)
        .map(|(entity, _)| entity)
}

/// Remove a bullet's body and entity. Returns false if it was already gone.
pub fn despawn_bullet(world: &mut PhysicsWorld, bullets: &mut World, entity: Entity) -> bool {
    let body = match bullets.get::<&Bullet>(entity) {
        Ok(bullet) => bullet.body,
        Err(_) => return false,
    };
    if bullets.despawn(entity).is_err() {
        return false;
    }
    world.remove_body(body);
    true
}

/// Axis-aligned region bullets may occupy before they are culled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayArea {
    pub min: Vec2,
    pub max: Vec2,
}

impl PlayArea {
    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// Age every bullet one tick and drop those whose lifetime ran out or
/// that left the play area. Returns how many were removed.
pub fn expire_bullets(world: &mut PhysicsWorld, bullets: &mut World, area: PlayArea) -> usize {
    let mut expired = Vec::new();
    for (entity, (bullet, lifetime)) in bullets.query_mut::<(&Bullet, &mut Lifetime)>() {
        let out_of_area = world
            .position(bullet.body.rigid_body)
            .map_or(true, |p| !area.contains(p));
        if lifetime.tick() || out_of_area {
            expired.push(entity);
        }
    }

    expired
        .into_iter()
        .filter(|&entity| despawn_bullet(world, bullets, entity))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> PlayArea {
        PlayArea {
            min: Vec2::new(-100.0, -100.0),
            max: Vec2::new(1100.0, 800.0),
        }
    }

    #[test]
    fn spawned_bullet_is_a_fast_projectile() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let mut bullets = World::new();
        let config = GunConfig::default();
        let entity = Bullet::spawn(
            &mut world,
            &mut bullets,
            Vec2::new(10.0, 10.0),
            Vec2::new(3000.0, 0.0),
            &config,
        )
        .unwrap();
        let bullet = *bullets.get::<&Bullet>(entity).unwrap();
        assert!(!bullet.spent);
        assert_eq!(
            world.collision_type(bullet.body.collider),
            Some(CollisionType::Projectile)
        );
        assert_eq!(world.velocity(bullet.body.rigid_body), Some(Vec2::new(3000.0, 0.0)));
        assert_eq!(find_bullet(&bullets, bullet.body.collider), Some(entity));
    }

    #[test]
    fn despawn_happens_once() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let mut bullets = World::new();
        let entity = Bullet::spawn(
            &mut world,
            &mut bullets,
            Vec2::ZERO,
            Vec2::ZERO,
            &GunConfig::default(),
        )
        .unwrap();
        assert!(despawn_bullet(&mut world, &mut bullets, entity));
        assert!(!despawn_bullet(&mut world, &mut bullets, entity));
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn bullets_expire_by_lifetime_and_area() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let mut bullets = World::new();
        let config = GunConfig {
            bullet_lifetime_ticks: 3,
            ..GunConfig::default()
        };
        Bullet::spawn(&mut world, &mut bullets, Vec2::new(500.0, 300.0), Vec2::ZERO, &config).unwrap();
        Bullet::spawn(&mut world, &mut bullets, Vec2::new(-500.0, 300.0), Vec2::ZERO, &config).unwrap();

        assert_eq!(expire_bullets(&mut world, &mut bullets, area()), 1);
        assert_eq!(expire_bullets(&mut world, &mut bullets, area()), 0);
        assert_eq!(expire_bullets(&mut world, &mut bullets, area()), 1);
        assert_eq!(bullets.len(), 0);
        assert_eq!(world.body_count(), 0);
    }
}
