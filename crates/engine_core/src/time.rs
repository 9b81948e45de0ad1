//! Fixed-timestep clock for the simulation loop.

use std::time::{Duration, Instant};

/// Upper bound on fixed steps consumed per frame, so a long stall
/// (debugger, window drag) does not trigger a catch-up spiral.
pub const MAX_STEPS_PER_FRAME: u32 = 5;

/// Tracks wall-clock frame timing and hands out fixed simulation steps.
#[derive(Debug)]
pub struct Time {
    /// Time when the clock started.
    start_time: Instant,
    /// Time of the last frame.
    last_frame: Instant,
    /// Fixed timestep for physics (default 60 Hz).
    fixed_timestep: Duration,
    /// Accumulated time not yet consumed by fixed steps.
    accumulator: Duration,
    /// Fixed steps handed out this frame.
    steps_this_frame: u32,
    /// Fixed steps handed out since start.
    tick_count: u64,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a clock stepping at 60 Hz.
    pub fn new() -> Self {
        Self::with_timestep(1.0 / 60.0)
    }

    /// Create a clock with the given fixed timestep in seconds.
    pub fn with_timestep(seconds: f64) -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_frame: now,
            fixed_timestep: Duration::from_secs_f64(seconds),
            accumulator: Duration::ZERO,
            steps_this_frame: 0,
            tick_count: 0,
        }
    }

    /// Update timing at the start of a new frame.
    pub fn update(&mut self) {
        let now = Instant::now();
        self.advance(now - self.last_frame);
        self.last_frame = now;
    }

    /// Feed an explicit frame duration into the accumulator.
    pub fn advance(&mut self, delta: Duration) {
        self.accumulator += delta;
        self.steps_this_frame = 0;
    }

    /// Check if a fixed step should run and consume its time.
    pub fn should_fixed_update(&mut self) -> bool {
        if self.steps_this_frame >= MAX_STEPS_PER_FRAME {
            // Drop the backlog rather than fall further behind.
            if self.accumulator >= self.fixed_timestep {
                log::debug!("dropping {:?} of simulation backlog", self.accumulator);
            }
            self.accumulator = Duration::ZERO;
            return false;
        }
        if self.accumulator >= self.fixed_timestep {
            self.accumulator -= self.fixed_timestep;
            self.steps_this_frame += 1;
            self.tick_count += 1;
            true
        } else {
            false
        }
    }

    /// Time left until the next fixed step is due.
    pub fn until_next_step(&self) -> Duration {
        self.fixed_timestep.saturating_sub(self.accumulator)
    }

    /// Get total elapsed wall time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.last_frame.duration_since(self.start_time).as_secs_f32()
    }

    /// Fixed steps handed out since start.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
