//! Physics world management with Rapier2D.

use crate::collision::{
    pair_key, BodyDesc, BodyState, CollisionType, ContactBegin, ContactCollector, Material,
    PairFilter, PhysicsBody,
};
use crate::error::PhysicsError;
use glam::Vec2;
use rapier2d::prelude::*;
use std::collections::HashSet;

pub(crate) fn to_na(v: Vec2) -> Vector<Real> {
    vector![v.x, v.y]
}

pub(crate) fn from_na(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// Main physics world containing all simulation state.
///
/// Coordinates are window pixels with y growing downward, so gravity
/// points along +y.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub gravity: Vector<Real>,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    events: ContactCollector,
    suppressed: HashSet<(ColliderHandle, ColliderHandle)>,
}

impl PhysicsWorld {
    /// Create an empty world with the given gravity (px/s²).
    pub fn new(gravity: Vec2) -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            gravity: to_na(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            events: ContactCollector::default(),
            suppressed: HashSet::new(),
        }
    }

    /// Advance the simulation by `dt` seconds and return the contacts that
    /// began during the step.
    ///
    /// Events are buffered while the solver runs and handed out afterwards,
    /// so callers can add and remove bodies freely before the next step.
    pub fn step(&mut self, dt: f32) -> Vec<ContactBegin> {
        self.integration_parameters.dt = dt;
        let hooks = PairFilter {
            suppressed: &self.suppressed,
        };
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &hooks,
            &self.events,
        );

        self.events
            .drain()
            .into_iter()
            .filter(|event| event.started())
            .filter_map(|event| {
                let (collider_a, collider_b) = (event.collider1(), event.collider2());
                Some(ContactBegin {
                    collider_a,
                    collider_b,
                    kind_a: self.collision_type(collider_a)?,
                    kind_b: self.collision_type(collider_b)?,
                })
            })
            .collect()
    }

    /// Add a dynamic body with one collider.
    pub fn add_body(&mut self, desc: &BodyDesc) -> Result<PhysicsBody, PhysicsError> {
        desc.validate()?;

        let rigid_body = RigidBodyBuilder::dynamic()
            .translation(to_na(desc.position))
            .linvel(to_na(desc.velocity))
            .ccd_enabled(desc.ccd)
            .build();
        let rigid_body = self.rigid_body_set.insert(rigid_body);

        let collider = desc
            .shape
            .builder()
            .mass(desc.mass)
            .friction(desc.material.friction)
            .restitution(desc.material.restitution)
            .user_data(desc.collision_type.to_user_data())
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .active_hooks(ActiveHooks::FILTER_CONTACT_PAIRS)
            .build();
        let collider =
            self.collider_set
                .insert_with_parent(collider, rigid_body, &mut self.rigid_body_set);

        log::debug!("added {:?} body at {:?}", desc.collision_type, desc.position);
        Ok(PhysicsBody {
            rigid_body,
            collider,
        })
    }

    /// Add a static box collider with no parent body (ground, walls).
    pub fn add_static_box(
        &mut self,
        center: Vec2,
        half_extents: Vec2,
        material: Material,
        collision_type: CollisionType,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y)
            .translation(to_na(center))
            .friction(material.friction)
            .restitution(material.restitution)
            .user_data(collision_type.to_user_data())
            .build();
        self.collider_set.insert(collider)
    }

    /// Remove a rigid body together with its collider and any joint
    /// attached to it. Returns false if the body was already gone.
    pub fn remove_body(&mut self, body: PhysicsBody) -> bool {
        let removed = self
            .rigid_body_set
            .remove(
                body.rigid_body,
                &mut self.island_manager,
                &mut self.collider_set,
                &mut self.impulse_joint_set,
                &mut self.multibody_joint_set,
                true,
            )
            .is_some();
        if removed {
            self.suppressed
                .retain(|(a, b)| *a != body.collider && *b != body.collider);
        } else {
            log::debug!("remove_body: {:?} not in world", body.rigid_body);
        }
        removed
    }

    /// Check whether a body is still registered.
    pub fn contains_body(&self, handle: RigidBodyHandle) -> bool {
        self.rigid_body_set.contains(handle)
    }

    /// Number of rigid bodies (static colliders without a body excluded).
    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    /// Collision tag of a collider, if it still exists.
    pub fn collision_type(&self, handle: ColliderHandle) -> Option<CollisionType> {
        self.collider_set
            .get(handle)
            .map(|collider| CollisionType::from_user_data(collider.user_data))
    }

    /// Full state snapshot of a body.
    pub fn body_state(&self, handle: RigidBodyHandle) -> Option<BodyState> {
        self.rigid_body_set.get(handle).map(|body| BodyState {
            position: from_na(body.translation()),
            velocity: from_na(body.linvel()),
            angle: body.rotation().angle(),
            angular_velocity: body.angvel(),
            mass: body.mass(),
            inertia: body.mass_properties().local_mprops.principal_inertia(),
        })
    }

    /// Get the position of a body's center.
    pub fn position(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        self.rigid_body_set
            .get(handle)
            .map(|body| from_na(body.translation()))
    }

    /// Get the linear velocity of a body.
    pub fn velocity(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        self.rigid_body_set
            .get(handle)
            .map(|body| from_na(body.linvel()))
    }

    /// Teleport a body, clearing its motion.
    pub fn set_position(&mut self, handle: RigidBodyHandle, position: Vec2) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_translation(to_na(position), true);
            body.set_linvel(vector![0.0, 0.0], true);
            body.set_angvel(0.0, true);
        }
    }

    /// Set the linear velocity of a body.
    pub fn set_velocity(&mut self, handle: RigidBodyHandle, velocity: Vec2) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_linvel(to_na(velocity), true);
        }
    }

    /// Apply an impulse through a body's center of mass.
    pub fn apply_impulse(&mut self, handle: RigidBodyHandle, impulse: Vec2) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.apply_impulse(to_na(impulse), true);
        }
    }

    /// Stop the solver from resolving contacts between two colliders.
    /// Contact events are still reported.
    pub fn suppress_contacts(&mut self, a: ColliderHandle, b: ColliderHandle) {
        self.suppressed.insert(pair_key(a, b));
    }
}
