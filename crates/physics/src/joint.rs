//! Pivot joints pinning two bodies together at a shared point.

use crate::physics_world::PhysicsWorld;
use glam::Vec2;
use rapier2d::prelude::*;

/// Handle to a pivot joint owned by the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JointHandle(pub ImpulseJointHandle);

impl PhysicsWorld {
    /// Pin `body_a` and `body_b` together at `anchor` (world space).
    ///
    /// The local anchors come from the bodies' current poses, so the pivot
    /// pulls them back toward this configuration. Contacts between the two
    /// bodies are disabled while the joint exists. Returns `None` if either
    /// body is missing.
    pub fn add_pivot_joint(
        &mut self,
        body_a: RigidBodyHandle,
        body_b: RigidBodyHandle,
        anchor: Vec2,
    ) -> Option<JointHandle> {
        let world_anchor = point![anchor.x, anchor.y];
        let local_a = self
            .rigid_body_set
            .get(body_a)?
            .position()
            .inverse_transform_point(&world_anchor);
        let local_b = self
            .rigid_body_set
            .get(body_b)?
            .position()
            .inverse_transform_point(&world_anchor);

        let joint = RevoluteJointBuilder::new()
            .local_anchor1(local_a)
            .local_anchor2(local_b)
            .contacts_enabled(false)
            .build();
        let handle = self.impulse_joint_set.insert(body_a, body_b, joint, true);
        log::debug!("pivot joint {:?} at {:?}", handle, anchor);
        Some(JointHandle(handle))
    }

    /// Remove a joint. Returns false if it no longer exists (for example
    /// because one of its bodies was removed first).
    pub fn remove_joint(&mut self, handle: JointHandle) -> bool {
        let removed = self.impulse_joint_set.remove(handle.0, true).is_some();
        if !removed {
            log::debug!("remove_joint: {:?} not in world", handle);
        }
        removed
    }

    pub fn contains_joint(&self, handle: JointHandle) -> bool {
        self.impulse_joint_set.get(handle.0).is_some()
    }

    pub fn joint_count(&self) -> usize {
        self.impulse_joint_set.len()
    }

    /// Number of joints linking the two bodies, in either order.
    pub fn joints_between(&self, a: RigidBodyHandle, b: RigidBodyHandle) -> usize {
        self.impulse_joint_set
            .iter()
            .filter(|(_, joint)| {
                (joint.body1 == a && joint.body2 == b) || (joint.body1 == b && joint.body2 == a)
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{BodyDesc, Material, PhysicsBody, ShapeDesc};

    const DT: f32 = 1.0 / 60.0;

    fn block(world: &mut PhysicsWorld, position: Vec2, mass: f32) -> PhysicsBody {
        world
            .add_body(&BodyDesc::new(
                position,
                mass,
                ShapeDesc::Box {
                    width: 30.0,
                    height: 30.0,
                },
                Material::new(0.7, 0.3),
            ))
            .unwrap()
    }

    #[test]
    fn pivot_keeps_bodies_together_under_gravity() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, 980.0));
        let a = block(&mut world, Vec2::new(100.0, 100.0), 5.0);
        let b = block(&mut world, Vec2::new(80.0, 130.0), 1.0);
        let joint = world
            .add_pivot_joint(a.rigid_body, b.rigid_body, Vec2::new(80.0, 130.0))
            .unwrap();
        assert!(world.contains_joint(joint));
        assert_eq!(world.joints_between(b.rigid_body, a.rigid_body), 1);

        for _ in 0..60 {
            world.step(DT);
        }
        let pa = world.position(a.rigid_body).unwrap();
        let pb = world.position(b.rigid_body).unwrap();
        // Both fell, but stayed pinned near their initial separation.
        assert!(pa.y > 300.0);
        assert!(pa.distance(pb) < 45.0, "separation {}", pa.distance(pb));
    }

    #[test]
    fn joint_removal_is_guarded() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let a = block(&mut world, Vec2::ZERO, 1.0);
        let b = block(&mut world, Vec2::new(40.0, 0.0), 1.0);
        let joint = world
            .add_pivot_joint(a.rigid_body, b.rigid_body, Vec2::new(20.0, 0.0))
            .unwrap();
        assert_eq!(world.joint_count(), 1);
        assert!(world.remove_joint(joint));
        assert!(!world.remove_joint(joint));
        assert_eq!(world.joint_count(), 0);
    }

    #[test]
    fn removing_a_body_drops_its_joint() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let a = block(&mut world, Vec2::ZERO, 1.0);
        let b = block(&mut world, Vec2::new(40.0, 0.0), 1.0);
        let joint = world
            .add_pivot_joint(a.rigid_body, b.rigid_body, Vec2::new(20.0, 0.0))
            .unwrap();
        world.remove_body(b);
        assert!(!world.contains_joint(joint));
        assert!(!world.remove_joint(joint));
        assert!(world
            .add_pivot_joint(a.rigid_body, b.rigid_body, Vec2::ZERO)
            .is_none());
    }
}
