use std::time::Instant;

/// Frame metadata - carries frame number and timing info
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    pub time: f32,
    pub delta: f32,
}

impl FrameInfo {
    pub fn new(number: u64, time: f32, delta: f32) -> Self {
        Self { number, time, delta }
    }
}

/// Monotonic frame clock. Each `tick` yields the next frame's timing.
#[derive(Debug, Clone)]
pub struct FrameClock {
    frame_number: u64,
    start_time: Instant,
    last_frame_time: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            frame_number: 0,
            start_time: start,
            last_frame_time: start,
        }
    }

    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    /// Seconds since the clock started
    pub fn time(&self) -> f32 {
        self.start_time.elapsed().as_secs_f32()
    }

    pub fn tick(&mut self) -> FrameInfo {
        self.tick_at(Instant::now())
    }

    /// `now` earlier than the previous tick counts as no time passing
    pub fn tick_at(&mut self, now: Instant) -> FrameInfo {
        let now = now.max(self.last_frame_time);
        let delta = now.duration_since(self.last_frame_time).as_secs_f32();
        let time = now.duration_since(self.start_time).as_secs_f32();

        let info = FrameInfo::new(self.frame_number, time, delta);

        self.frame_number += 1;
        self.last_frame_time = now;

        info
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for FrameClock {
    type Item = FrameInfo;

    fn next(&mut self) -> Option<FrameInfo> {
        Some(self.tick())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_ticks_number_frames() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);

        let first = clock.tick_at(start + Duration::from_millis(16));
        let second = clock.tick_at(start + Duration::from_millis(48));

        assert_eq!(first.number, 0);
        assert_eq!(second.number, 1);
        assert_eq!(clock.frame_number(), 2);
        assert!((first.delta - 0.016).abs() < 1e-4);
        assert!((second.delta - 0.032).abs() < 1e-4);
        assert!((second.time - 0.048).abs() < 1e-4);
    }

    #[test]
    fn test_time_never_goes_backwards() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);

        let later = clock.tick_at(start + Duration::from_millis(100));
        let earlier = clock.tick_at(start + Duration::from_millis(50));

        assert_eq!(earlier.delta, 0.0);
        assert_eq!(earlier.time, later.time);
    }

    #[test]
    fn test_iterator_yields_increasing_times() {
        let clock = FrameClock::new();
        let frames: Vec<_> = clock.take(3).collect();
        assert!(frames.windows(2).all(|w| w[1].time >= w[0].time));
        assert_eq!(frames[2].number, 2);
    }
}
