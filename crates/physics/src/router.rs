//! Routes contact-begin events to gameplay handlers by collision type.

use crate::collision::{ContactBegin, CollisionType};
use rapier2d::prelude::ColliderHandle;
use std::collections::HashMap;

/// Handler invoked with mutable gameplay context and the contact, shapes
/// ordered as the handler was registered. Returns whether the solver
/// should keep resolving the physical collision for this pair.
pub type CollisionHandler<C> = Box<dyn FnMut(&mut C, &ContactBegin) -> bool>;

/// Maps unordered pairs of collision types to handlers.
pub struct CollisionRouter<C> {
    handlers: HashMap<(CollisionType, CollisionType), CollisionHandler<C>>,
}

impl<C> Default for CollisionRouter<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> CollisionRouter<C> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler for contacts between `a` and `b` (either order).
    /// Replaces any handler already registered for the pair.
    pub fn add_handler<F>(&mut self, a: CollisionType, b: CollisionType, handler: F)
    where
        F: FnMut(&mut C, &ContactBegin) -> bool + 'static,
    {
        if self.handlers.remove(&(b, a)).is_some() {
            log::debug!("replacing collision handler for {:?}/{:?}", b, a);
        }
        self.handlers.insert((a, b), Box::new(handler));
    }

    pub fn has_handler(&self, a: CollisionType, b: CollisionType) -> bool {
        self.handlers.contains_key(&(a, b)) || self.handlers.contains_key(&(b, a))
    }

    /// Run matching handlers for each contact.
    ///
    /// Returns the collider pairs whose handler declined physical
    /// resolution; pass them to `PhysicsWorld::suppress_contacts`.
    pub fn dispatch(
        &mut self,
        ctx: &mut C,
        contacts: &[ContactBegin],
    ) -> Vec<(ColliderHandle, ColliderHandle)> {
        let mut declined = Vec::new();
        for contact in contacts {
            let ordered = if self.handlers.contains_key(&(contact.kind_a, contact.kind_b)) {
                *contact
            } else {
                contact.swapped()
            };
            let Some(handler) = self.handlers.get_mut(&(ordered.kind_a, ordered.kind_b)) else {
                continue;
            };
            if !handler(ctx, &ordered) {
                declined.push((ordered.collider_a, ordered.collider_b));
            }
        }
        declined
    }
}
