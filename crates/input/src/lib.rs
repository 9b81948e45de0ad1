//! Pointer and keyboard input for the gun range.
//!
//! The window layer feeds raw events in; the simulation drains them once
//! per tick as [`InputEvent`]s and reads the continuous state (pointer
//! position, primary button held) for aiming and the trigger.

use glam::Vec2;
use std::collections::{HashSet, VecDeque};

/// A discrete input intent, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { position: Vec2, button: MouseButton },
    PointerUp { position: Vec2, button: MouseButton },
    PointerMove { position: Vec2 },
    KeyDown(KeyCode),
}

/// Manages input state between simulation ticks.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Mouse buttons currently held.
    mouse_held: HashSet<MouseButton>,
    /// Pointer position in window coordinates.
    pointer: Vec2,
    /// Events not yet consumed by the simulation.
    pending: VecDeque<InputEvent>,
    /// Set once the window asked to close.
    quit_requested: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a keyboard event. Auto-repeat presses are not queued again.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.keys_held.insert(key) {
                    self.pending.push_back(InputEvent::KeyDown(key));
                }
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
            }
        }
    }

    /// Process a mouse button event at the current pointer position.
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        let position = self.pointer;
        match state {
            ElementState::Pressed => {
                if self.mouse_held.insert(button) {
                    self.pending
                        .push_back(InputEvent::PointerDown { position, button });
                }
            }
            ElementState::Released => {
                if self.mouse_held.remove(&button) {
                    self.pending.push_back(InputEvent::PointerUp { position, button });
                }
            }
        }
    }

    /// Process cursor position update.
    pub fn process_cursor_position(&mut self, position: (f64, f64)) {
        self.pointer = Vec2::new(position.0 as f32, position.1 as f32);
        self.pending.push_back(InputEvent::PointerMove {
            position: self.pointer,
        });
    }

    /// Window close request.
    pub fn request_quit(&mut self) {
        log::debug!("quit requested");
        self.quit_requested = true;
    }

    // Query methods

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Take every event queued since the last call.
    pub fn drain_events(&mut self) -> Vec<InputEvent> {
        self.pending.drain(..).collect()
    }

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a mouse button is held.
    pub fn is_mouse_held(&self, button: MouseButton) -> bool {
        self.mouse_held.contains(&button)
    }

    /// Trigger state: primary button held.
    pub fn is_fire_held(&self) -> bool {
        self.is_mouse_held(MouseButton::Left)
    }

    /// Get the pointer position in window coordinates.
    pub fn pointer_position(&self) -> Vec2 {
        self.pointer
    }
}

// Re-export for convenience
pub use winit::event::{ElementState, MouseButton};
pub use winit::keyboard::KeyCode;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_queued_in_order() {
        let mut input = InputState::new();
        input.process_cursor_position((120.0, 80.0));
        input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        input.process_cursor_position((150.0, 90.0));
        input.process_mouse_button(MouseButton::Left, ElementState::Released);

        let events = input.drain_events();
        assert_eq!(
            events,
            vec![
                InputEvent::PointerMove {
                    position: Vec2::new(120.0, 80.0)
                },
                InputEvent::PointerDown {
                    position: Vec2::new(120.0, 80.0),
                    button: MouseButton::Left
                },
                InputEvent::PointerMove {
                    position: Vec2::new(150.0, 90.0)
                },
                InputEvent::PointerUp {
                    position: Vec2::new(150.0, 90.0),
                    button: MouseButton::Left
                },
            ]
        );
        assert!(input.drain_events().is_empty());
    }

    #[test]
    fn held_state_tracks_press_and_release() {
        let mut input = InputState::new();
        input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(input.is_fire_held());
        input.process_mouse_button(MouseButton::Left, ElementState::Released);
        assert!(!input.is_fire_held());
    }

    #[test]
    fn key_repeat_queues_once() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyR, ElementState::Pressed);
        input.process_keyboard(KeyCode::KeyR, ElementState::Pressed);
        assert!(input.is_key_held(KeyCode::KeyR));
        assert_eq!(input.drain_events(), vec![InputEvent::KeyDown(KeyCode::KeyR)]);
        input.process_keyboard(KeyCode::KeyR, ElementState::Released);
        assert!(!input.is_key_held(KeyCode::KeyR));
    }
}
