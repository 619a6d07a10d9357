//! Frame-rate divider for recording sessions.

/// Decides which render ticks feed a recording session.
///
/// Only ticks that happen while recording are counted, so the first
/// captured frame of a session is always the `interval`-th recorded tick
/// counted since the throttle was created.
#[derive(Debug, Clone)]
pub struct CaptureThrottle {
    interval: u32,
    counter: u32,
}

impl CaptureThrottle {
    /// Capture every `interval`-th recording tick (0 is treated as 1).
    #[must_use]
    pub fn new(interval: u32) -> Self {
        Self {
            interval: interval.max(1),
            counter: 0,
        }
    }

    /// Effective interval.
    #[must_use]
    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Advance one render tick. Returns `true` if this tick should be
    /// captured.
    pub fn tick(&mut self, recording: bool) -> bool {
        if !recording {
            return false;
        }
        self.counter = self.counter.wrapping_add(1);
        self.counter % self.interval == 0
    }
}
