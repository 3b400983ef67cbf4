use std::time::{Duration, Instant};

/// Timing of one frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous frame, clamped.
    pub dt: f32,
    /// Starts at 0.
    pub frame_index: u64,
}

/// Ticks once per redraw.
///
/// `dt` is clamped: after the window was hidden or the process stalled, a
/// held pan key moves the camera by at most one `max_step`.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frames: u64,
    min_step: Duration,
    max_step: Duration,
}

impl FrameClock {
    pub const MIN_STEP: Duration = Duration::from_micros(100);
    pub const MAX_STEP: Duration = Duration::from_millis(100);

    pub fn new() -> Self {
        Self::with_steps(Self::MIN_STEP, Self::MAX_STEP)
    }

    pub fn with_steps(min_step: Duration, max_step: Duration) -> Self {
        assert!(min_step <= max_step, "min_step exceeds max_step");
        Self { last: Instant::now(), frames: 0, min_step, max_step }
    }

    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let step = now.saturating_duration_since(self.last).clamp(self.min_step, self.max_step);
        self.last = now;

        let time = FrameTime { dt: step.as_secs_f32(), frame_index: self.frames };
        self.frames += 1;
        time
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_are_numbered_from_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick().frame_index, 0);
        assert_eq!(clock.tick().frame_index, 1);
    }

    #[test]
    fn stalls_are_capped() {
        let mut clock = FrameClock::with_steps(Duration::from_millis(1), Duration::from_millis(10));
        std::thread::sleep(Duration::from_millis(30));
        let dt = clock.tick().dt;
        assert!((dt - 0.010).abs() < 1e-6, "dt = {dt}");
    }

    #[test]
    fn tiny_steps_are_raised() {
        let mut clock = FrameClock::with_steps(Duration::from_millis(5), Duration::from_millis(10));
        let dt = clock.tick().dt;
        assert!(dt >= 0.005 - 1e-6, "dt = {dt}");
    }

    #[test]
    #[should_panic]
    fn inverted_steps_are_rejected() {
        FrameClock::with_steps(Duration::from_millis(10), Duration::from_millis(1));
    }
}
