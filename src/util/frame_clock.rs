//! Frame pacing and FPS measurement for the render loop.

use web_time::{Duration, Instant};

/// Per-tick timing with FPS smoothing and optional frame limiting.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Target FPS (0 = unlimited)
    target_fps: u32,
    /// Minimum frame duration based on target FPS
    min_frame_duration: Duration,
    /// Start of the previous tick
    last_tick: Instant,
    /// Elapsed seconds measured by the last tick
    last_dt: f32,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Weight of each new sample (0.0-1.0)
    smoothing: f32,
    ticks: u64,
}

impl FrameClock {
    /// Create a clock with the given FPS target (0 = unlimited).
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
            last_tick: Instant::now(),
            last_dt: 0.0,
            smoothed_fps: 60.0,
            smoothing: 0.05,
            ticks: 0,
        }
    }

    /// True once enough time has passed since the last tick to render
    /// again. Always true when unlimited.
    #[must_use]
    pub fn should_render(&self) -> bool {
        self.target_fps == 0 || self.last_tick.elapsed() >= self.min_frame_duration
    }

    /// When the next frame is due, or `None` when unlimited.
    #[must_use]
    pub fn next_frame_at(&self) -> Option<Instant> {
        (self.target_fps > 0).then(|| self.last_tick + self.min_frame_duration)
    }

    /// Mark the start of a frame. Returns the seconds elapsed since the
    /// previous tick.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        self.last_dt = dt;
        self.ticks += 1;

        if dt > 0.0 {
            let instant_fps = 1.0 / dt;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
        dt
    }

    /// Seconds measured by the most recent tick.
    #[must_use]
    pub fn delta(&self) -> f32 {
        self.last_dt
    }

    /// Smoothed frames per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }

    /// Number of ticks so far.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_measures_elapsed_time() {
        let mut clock = FrameClock::new(0);
        std::thread::sleep(Duration::from_millis(10));
        let dt = clock.tick();
        assert!(dt >= 0.009, "dt = {dt}");
        assert_eq!(clock.delta(), dt);
        assert_eq!(clock.ticks(), 1);
    }

    #[test]
    fn unlimited_always_renders() {
        let mut clock = FrameClock::new(0);
        let _ = clock.tick();
        assert!(clock.should_render());
        assert!(clock.next_frame_at().is_none());
    }

    #[test]
    fn target_fps_holds_back_early_frames() {
        let mut clock = FrameClock::new(1);
        let _ = clock.tick();
        assert!(!clock.should_render());
        assert!(clock.next_frame_at().is_some());
    }

    #[test]
    fn fps_moves_towards_measured_rate() {
        let mut clock = FrameClock::new(0);
        std::thread::sleep(Duration::from_millis(50));
        let _ = clock.tick();
        // One 20 fps sample pulls the 60 fps seed down.
        assert!(clock.fps() < 60.0);
    }
}
