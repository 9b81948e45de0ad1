//! Turns queued input events into magazine drags, reloads and quit
//! requests.

use crate::gun::Gun;
use input::{InputEvent, KeyCode, MouseButton};
use physics::PhysicsWorld;

/// What the simulation should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    None,
    DragStarted,
    Dropped { attached: bool },
    Reloaded,
    Quit,
}

#[derive(Debug, Default)]
pub struct InteractionController {
    dragging: bool,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn handle(&mut self, event: InputEvent, gun: &mut Gun, world: &mut PhysicsWorld) -> Interaction {
        match event {
            InputEvent::PointerDown {
                position,
                button: MouseButton::Left,
            } => {
                let grab = gun.config().grab_radius;
                let near = gun
                    .magazine()
                    .position(world)
                    .is_some_and(|m| m.distance(position) < grab);
                if near {
                    self.dragging = true;
                    log::debug!("magazine grabbed at {:?}", position);
                    return Interaction::DragStarted;
                }
                Interaction::None
            }
            InputEvent::PointerMove { position } if self.dragging => {
                world.set_position(gun.magazine().body().rigid_body, position);
                Interaction::None
            }
            InputEvent::PointerUp {
                button: MouseButton::Left,
                ..
            } if self.dragging => {
                self.dragging = false;
                let distance = gun.magazine_distance(world).unwrap_or(f32::INFINITY);
                if distance <= gun.config().detach_distance {
                    gun.attach(world);
                } else {
                    gun.detach(world);
                }
                Interaction::Dropped {
                    attached: gun.is_magazine_attached(),
                }
            }
            InputEvent::KeyDown(KeyCode::KeyR) => {
                self.dragging = false;
                match gun.reload(world) {
                    Ok(true) => Interaction::Reloaded,
                    Ok(false) => Interaction::None,
                    Err(e) => {
                        log::error!("reload failed: {}", e);
                        Interaction::None
                    }
                }
            }
            InputEvent::KeyDown(KeyCode::Escape) => Interaction::Quit,
            _ => Interaction::None,
        }
    }
}
