//! Gameplay state the collision handlers mutate: targets, live bullets and
//! the score.

use crate::bullet::{despawn_bullet, find_bullet, Bullet};
use crate::target::Target;
use hecs::{Entity, World};
use physics::{ColliderHandle, CollisionRouter, CollisionType, ContactBegin, PhysicsWorld};

pub struct Arena {
    pub targets: Vec<Target>,
    pub bullets: World,
    pub score: u32,
    /// Bullets marked spent during the last dispatch, removed after it.
    spent: Vec<Entity>,
}

impl Arena {
    pub fn new(targets: Vec<Target>) -> Self {
        Self {
            targets,
            bullets: World::new(),
            score: 0,
            spent: Vec::new(),
        }
    }

    /// Router with the arena's handlers registered.
    pub fn router() -> CollisionRouter<Arena> {
        let mut router = CollisionRouter::new();
        router.add_handler(
            CollisionType::Projectile,
            CollisionType::Target,
            bullet_hits_target,
        );
        router
    }

    fn target_mut(&mut self, collider: ColliderHandle) -> Option<&mut Target> {
        self.targets
            .iter_mut()
            .find(|t| t.body().collider == collider)
    }

    /// Bullets waiting for removal.
    pub fn spent_count(&self) -> usize {
        self.spent.len()
    }

    /// Take spent bullets out of the world. Each goes exactly once, even if
    /// several contacts marked it.
    pub fn remove_spent(&mut self, world: &mut PhysicsWorld) -> usize {
        let spent = std::mem::take(&mut self.spent);
        spent
            .into_iter()
            .filter(|&entity| despawn_bullet(world, &mut self.bullets, entity))
            .count()
    }
}

/// First contact wins: the target lights up, the score goes up and the
/// bullet is queued for removal. Later contacts from the same bullet are
/// ignored. The physical bounce still happens.
pub fn bullet_hits_target(arena: &mut Arena, contact: &ContactBegin) -> bool {
    let Some(entity) = find_bullet(&arena.bullets, contact.collider_a) else {
        return true;
    };
    match arena.bullets.get::<&mut Bullet>(entity) {
        Ok(mut bullet) if !bullet.spent => bullet.spent = true,
        _ => return true,
    }
    arena.spent.push(entity);

    if let Some(target) = arena.target_mut(contact.collider_b) {
        target.register_hit();
        arena.score += 1;
        log::info!("target hit, score {}", arena.score);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GunConfig, TargetConfig};
    use glam::Vec2;

    fn arena_with_target(world: &mut PhysicsWorld) -> Arena {
        let target = Target::spawn(world, Vec2::new(700.0, 300.0), TargetConfig::default()).unwrap();
        Arena::new(vec![target])
    }

    #[test]
    fn bullet_hit_marks_target_and_removes_bullet_once() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let mut arena = arena_with_target(&mut world);
        let entity = Bullet::spawn(
            &mut world,
            &mut arena.bullets,
            Vec2::new(600.0, 300.0),
            Vec2::new(3000.0, 0.0),
            &GunConfig::default(),
        )
        .unwrap();
        let bullet = *arena.bullets.get::<&Bullet>(entity).unwrap();
        let contact = ContactBegin {
            collider_a: bullet.body.collider,
            collider_b: arena.targets[0].body().collider,
            kind_a: CollisionType::Projectile,
            kind_b: CollisionType::Target,
        };

        let mut router = Arena::router();
        let declined = router.dispatch(&mut arena, &[contact, contact.swapped(), contact]);
        assert!(declined.is_empty());

        assert!(arena.targets[0].is_hit());
        assert_eq!(arena.targets[0].hit_time(), 30);
        assert_eq!(arena.score, 1);
        assert_eq!(arena.spent_count(), 1);

        let bodies = world.body_count();
        assert_eq!(arena.remove_spent(&mut world), 1);
        assert_eq!(world.body_count(), bodies - 1);
        assert!(!world.contains_body(bullet.body.rigid_body));
        assert_eq!(arena.remove_spent(&mut world), 0);

        // A late contact naming the removed bullet does nothing.
        router.dispatch(&mut arena, &[contact]);
        assert_eq!(arena.score, 1);
        assert_eq!(arena.spent_count(), 0);
    }

    #[test]
    fn stepped_bullet_reaches_the_target() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let mut arena = arena_with_target(&mut world);
        Bullet::spawn(
            &mut world,
            &mut arena.bullets,
            Vec2::new(500.0, 300.0),
            Vec2::new(3000.0, 0.0),
            &GunConfig::default(),
        )
        .unwrap();

        let mut router = Arena::router();
        for _ in 0..10 {
            let contacts = world.step(1.0 / 60.0);
            router.dispatch(&mut arena, &contacts);
            arena.remove_spent(&mut world);
        }
        assert_eq!(arena.score, 1);
        assert!(arena.targets[0].is_hit());
        assert_eq!(arena.bullets.len(), 0);
    }
}
