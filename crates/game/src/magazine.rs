//! The detachable magazine body.

use glam::Vec2;
use physics::{BodyDesc, Material, PhysicsBody, PhysicsError, PhysicsWorld, ShapeDesc};

pub const MAGAZINE_SIZE: Vec2 = Vec2::new(30.0, 40.0);
const MAGAZINE_MATERIAL: Material = Material::new(0.8, 0.2);
/// Cartridges drawn inside an attached magazine.
pub const ROUNDS_SHOWN: u32 = 10;

/// A magazine body. Whether it is seated is tracked by the gun's joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Magazine {
    body: PhysicsBody,
}

impl Magazine {
    pub fn spawn(world: &mut PhysicsWorld, position: Vec2, mass: f32) -> Result<Self, PhysicsError> {
        let body = world.add_body(&BodyDesc::new(
            position,
            mass,
            ShapeDesc::Box {
                width: MAGAZINE_SIZE.x,
                height: MAGAZINE_SIZE.y,
            },
            MAGAZINE_MATERIAL,
        ))?;
        Ok(Self { body })
    }

    pub fn body(&self) -> PhysicsBody {
        self.body
    }

    pub fn position(&self, world: &PhysicsWorld) -> Option<Vec2> {
        world.position(self.body.rigid_body)
    }

    /// Take the magazine out of the world, along with any joint on it.
    pub fn despawn(self, world: &mut PhysicsWorld) -> bool {
        world.remove_body(self.body)
    }
}
