//! Collision tags, body descriptions, and contact event plumbing.

use crate::error::PhysicsError;
use glam::Vec2;
use rapier2d::prelude::*;
use std::collections::HashSet;
use std::sync::Mutex;

/// Gameplay tag carried by every collider, used to route contact events.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CollisionType {
    /// Anything without gameplay meaning (gun, magazine).
    #[default]
    Default = 0,
    /// Fired bullets
    Projectile = 1,
    /// Shootable targets
    Target = 2,
    /// Static ground and walls
    Environment = 3,
}

impl CollisionType {
    pub(crate) fn to_user_data(self) -> u128 {
        self as u128
    }

    pub(crate) fn from_user_data(data: u128) -> Self {
        match data {
            1 => Self::Projectile,
            2 => Self::Target,
            3 => Self::Environment,
            _ => Self::Default,
        }
    }
}

/// Surface response coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub friction: f32,
    /// Restitution (elasticity)
    pub restitution: f32,
}

impl Material {
    pub const fn new(friction: f32, restitution: f32) -> Self {
        Self {
            friction,
            restitution,
        }
    }
}

/// Collider geometry, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeDesc {
    Box { width: f32, height: f32 },
    Circle { radius: f32 },
}

impl ShapeDesc {
    fn validate(&self) -> Result<(), PhysicsError> {
        match *self {
            ShapeDesc::Box { width, height } => {
                if !positive(width) || !positive(height) {
                    return Err(PhysicsError::InvalidExtents { width, height });
                }
            }
            ShapeDesc::Circle { radius } => {
                if !positive(radius) {
                    return Err(PhysicsError::InvalidRadius(radius));
                }
            }
        }
        Ok(())
    }

    pub(crate) fn builder(&self) -> ColliderBuilder {
        match *self {
            ShapeDesc::Box { width, height } => ColliderBuilder::cuboid(width * 0.5, height * 0.5),
            ShapeDesc::Circle { radius } => ColliderBuilder::ball(radius),
        }
    }
}

/// Everything needed to spawn one dynamic body with a single shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub position: Vec2,
    pub velocity: Vec2,
    pub mass: f32,
    pub shape: ShapeDesc,
    pub material: Material,
    pub collision_type: CollisionType,
    /// Continuous collision detection, for fast movers.
    pub ccd: bool,
}

impl BodyDesc {
    pub fn new(position: Vec2, mass: f32, shape: ShapeDesc, material: Material) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            mass,
            shape,
            material,
            collision_type: CollisionType::Default,
            ccd: false,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_collision_type(mut self, collision_type: CollisionType) -> Self {
        self.collision_type = collision_type;
        self
    }

    pub fn with_ccd(mut self, ccd: bool) -> Self {
        self.ccd = ccd;
        self
    }

    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !positive(self.mass) {
            return Err(PhysicsError::InvalidMass(self.mass));
        }
        self.shape.validate()
    }
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

/// Handles of a body and its single collider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhysicsBody {
    pub rigid_body: RigidBodyHandle,
    pub collider: ColliderHandle,
}

/// Read-only view of a rigid body's state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Orientation in radians
    pub angle: f32,
    pub angular_velocity: f32,
    pub mass: f32,
    /// Moment of inertia about the center of mass
    pub inertia: f32,
}

/// Two shapes started touching during the last step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactBegin {
    pub collider_a: ColliderHandle,
    pub collider_b: ColliderHandle,
    pub kind_a: CollisionType,
    pub kind_b: CollisionType,
}

impl ContactBegin {
    /// Same contact with the two shapes exchanged.
    pub fn swapped(&self) -> Self {
        Self {
            collider_a: self.collider_b,
            collider_b: self.collider_a,
            kind_a: self.kind_b,
            kind_b: self.kind_a,
        }
    }
}

/// Order-independent key for a collider pair.
pub(crate) fn pair_key(a: ColliderHandle, b: ColliderHandle) -> (ColliderHandle, ColliderHandle) {
    if a.into_raw_parts() <= b.into_raw_parts() {
        (a, b)
    } else {
        (b, a)
    }
}

/// Buffers collision events raised during a step.
///
/// Rapier requires `Send + Sync` event handlers, hence the mutex; the
/// world is only ever stepped from one thread.
#[derive(Default)]
pub(crate) struct ContactCollector {
    events: Mutex<Vec<CollisionEvent>>,
}

impl ContactCollector {
    pub(crate) fn drain(&mut self) -> Vec<CollisionEvent> {
        let events = self
            .events
            .get_mut()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::take(events)
    }
}

impl EventHandler for ContactCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

/// Turns off impulse computation for pairs a collision handler declined.
pub(crate) struct PairFilter<'a> {
    pub(crate) suppressed: &'a HashSet<(ColliderHandle, ColliderHandle)>,
}

impl PhysicsHooks for PairFilter<'_> {
    fn filter_contact_pair(&self, context: &PairFilterContext) -> Option<SolverFlags> {
        if self
            .suppressed
            .contains(&pair_key(context.collider1, context.collider2))
        {
            Some(SolverFlags::empty())
        } else {
            Some(SolverFlags::COMPUTE_IMPULSES)
        }
    }
}
