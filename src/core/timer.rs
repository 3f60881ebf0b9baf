/// Self-contained timers - manage internal state, no Frame dependency
/// Each timer accumulates delta time and decides when to fire

/// Fixed rate timer - fires at specific Hz
#[derive(Debug, Clone, Copy)]
pub struct FixedHz {
    pub interval: f32,
    pub accumulator: f32,
}

impl FixedHz {
    /// Create timer that fires at given frequency
    pub fn new(hz: f32) -> Self {
        Self {
            interval: 1.0 / hz,
            accumulator: 0.0,
        }
    }

    /// Update with delta, returns true if should fire
    pub fn tick(&mut self, delta: f32) -> bool {
        self.accumulator += delta;

        if self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            true
        } else {
            false
        }
    }
}

/// Average frame rate over a fixed reporting window
#[derive(Debug, Clone, Copy)]
pub struct FpsCounter {
    timer: FixedHz,
    frames: u32,
    elapsed: f32,
    fps: f32,
}

impl FpsCounter {
    /// Reports `hz` times per second
    pub fn new(hz: f32) -> Self {
        Self {
            timer: FixedHz::new(hz),
            frames: 0,
            elapsed: 0.0,
            fps: 0.0,
        }
    }

    /// Counts one frame; returns the new average when a window closes
    pub fn tick(&mut self, delta: f32) -> Option<f32> {
        self.frames += 1;
        self.elapsed += delta;

        if !self.timer.tick(delta) {
            return None;
        }
        if self.elapsed > 0.0 {
            self.fps = self.frames as f32 / self.elapsed;
        }
        self.frames = 0;
        self.elapsed = 0.0;
        Some(self.fps)
    }

    /// Last reported average, 0 until the first window closes
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(1.0)
    }
}
