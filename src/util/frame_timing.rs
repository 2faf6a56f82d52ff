use web_time::{Duration, Instant};

/// Frame timing with FPS calculation and optional frame limiting
#[derive(Debug, Clone)]
pub struct FrameTiming {
    /// Target FPS (0 = unlimited)
    target_fps: u32,
    /// Minimum frame duration based on target FPS
    min_frame_duration: Duration,
    /// Last frame timestamp
    last_frame: Instant,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
    frames: u64,
}

impl FrameTiming {
    /// Create a new frame timer with the given FPS target (0 = unlimited).
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        let min_frame_duration = if target_fps > 0 {
            Duration::from_secs_f64(1.0 / f64::from(target_fps))
        } else {
            Duration::ZERO
        };

        Self {
            target_fps,
            min_frame_duration,
            last_frame: Instant::now(),
            smoothed_fps: 60.0,
            smoothing: 0.05,
            frames: 0,
        }
    }

    /// Returns true if enough time has passed since the last
    /// [`tick`](Self::tick) to render another frame.
    #[must_use]
    pub fn should_render(&self) -> bool {
        if self.target_fps == 0 {
            return true;
        }
        self.last_frame.elapsed() >= self.min_frame_duration
    }

    /// Measure the time since the previous tick, record it and return it
    /// in seconds.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.record(dt);
        dt
    }

    /// Fold an externally measured frame time (seconds) into the FPS
    /// average. Non-positive and non-finite values only count the frame.
    pub fn record(&mut self, dt: f32) {
        self.frames += 1;
        if dt > 0.0 && dt.is_finite() {
            let instant_fps = 1.0 / dt;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
    }

    /// Get the current FPS (smoothed)
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }

    /// Frames recorded so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_moves_average_toward_frame_rate() {
        let mut timing = FrameTiming::new(0);
        for _ in 0..500 {
            timing.record(1.0 / 120.0);
        }
        assert!((timing.fps() - 120.0).abs() < 1.0, "{}", timing.fps());
        assert_eq!(timing.frames(), 500);
    }

    #[test]
    fn degenerate_frame_times_keep_average() {
        let mut timing = FrameTiming::new(0);
        timing.record(0.0);
        timing.record(f32::NAN);
        timing.record(-1.0);
        assert_eq!(timing.fps(), 60.0);
        assert_eq!(timing.frames(), 3);
    }

    #[test]
    fn unlimited_target_always_renders() {
        assert!(FrameTiming::new(0).should_render());
    }

    #[test]
    fn tick_returns_elapsed_seconds() {
        let mut timing = FrameTiming::new(0);
        std::thread::sleep(Duration::from_millis(2));
        let dt = timing.tick();
        assert!(dt >= 0.002, "{dt}");
        assert_eq!(timing.frames(), 1);
    }
}
