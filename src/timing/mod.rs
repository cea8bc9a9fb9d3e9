// Timing module - Clock primitive and frame pacing
//
// This module provides:
// - Clock trait (millisecond timestamps and sleeps)
// - SystemClock backed by std::time
// - Frame Pacer (time budget and automatic frame-skip)

pub mod pacer;

pub use pacer::{FramePacer, Pace, SkipChange, DEFAULT_TARGET_FRAME_MS};

use std::time::{Duration, Instant};

/// Millisecond clock consumed by the session loop
pub trait Clock {
    /// Milliseconds elapsed since an arbitrary fixed origin
    fn now_millis(&self) -> u64;

    /// Block the calling thread for `ms` milliseconds
    fn sleep_millis(&mut self, ms: u32);
}

/// Wall clock
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn sleep_millis(&mut self, ms: u32) {
        if ms > 0 {
            std::thread::sleep(Duration::from_millis(ms as u64));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_monotonic() {
        let mut clock = SystemClock::new();
        let start = clock.now_millis();
        clock.sleep_millis(2);
        assert!(clock.now_millis() >= start + 2);
    }
}
