//! Components stored in the gameplay ECS arena.

/// Tick-counted lifetime for transient entities (projectiles).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifetime {
    pub remaining: u32,
}

impl Lifetime {
    pub fn new(ticks: u32) -> Self {
        Self { remaining: ticks }
    }

    /// Count down one tick. Returns true once the lifetime is used up.
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0
    }
}
