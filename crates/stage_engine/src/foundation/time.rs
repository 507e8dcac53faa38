//! Time management utilities

use std::time::Instant;

/// Frame number. Incremented once per game tick, never decreases.
pub type Frame = u64;

/// Per-tick timing context passed explicitly to update hooks and behaviors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Current frame number
    pub frame: Frame,

    /// Time since the previous tick in seconds
    pub delta: f32,

    /// Time since the game started in seconds
    pub now: f32,
}

impl FrameTime {
    /// Create a timing context
    pub fn new(frame: Frame, delta: f32, now: f32) -> Self {
        Self { frame, delta, now }
    }
}

/// High-precision timer for frame timing
#[derive(Debug)]
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
        }
    }

    /// Update the timer (should be called once per frame)
    pub fn update(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.delta_time = elapsed.as_secs_f32();
        self.total_time += self.delta_time;
        self.last_frame = now;
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }
}
