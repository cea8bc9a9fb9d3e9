// Frame Pacer - Keeps the average frame duration on target
//
// A time budget carries the debt of slow frames forward. Fast frames pay the
// debt back before any sleep is issued. When the debt saturates at the target
// duration, frame-skip is switched on; it is switched off again as soon as a
// frame finishes early with no debt left.

/// Default target frame duration in milliseconds
pub const DEFAULT_TARGET_FRAME_MS: u32 = 16;

/// Frame-skip transition caused by a pacer update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipChange {
    Unchanged,
    Enabled,
    Disabled,
}

/// Decision taken at the end of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pace {
    /// Milliseconds to sleep before the next frame
    pub sleep_ms: u32,
    pub skip: SkipChange,
}

/// Frame Pacer state
#[derive(Debug, Clone)]
pub struct FramePacer {
    target: u32,
    time_budget: u32,
    frame_skip: bool,
    auto_skip: bool,
}

impl FramePacer {
    /// Create a pacer
    ///
    /// # Arguments
    ///
    /// * `target_frame_ms` - Target frame duration
    /// * `auto_skip` - Whether the pacer may turn frame-skip on and off
    pub fn new(target_frame_ms: u32, auto_skip: bool) -> Self {
        FramePacer {
            target: target_frame_ms,
            time_budget: 0,
            frame_skip: false,
            auto_skip,
        }
    }

    /// Start with frame-skip already active
    pub fn with_frame_skip(mut self, active: bool) -> Self {
        self.frame_skip = active;
        self
    }

    pub fn target_frame_ms(&self) -> u32 {
        self.target
    }

    /// Accumulated lateness, always within `0..=target`
    pub fn time_budget(&self) -> u32 {
        self.time_budget
    }

    pub fn frame_skip_active(&self) -> bool {
        self.frame_skip
    }

    /// Account for a finished frame
    ///
    /// # Arguments
    ///
    /// * `frame_ms` - Measured duration of the frame
    ///
    /// # Returns
    ///
    /// How long to sleep and whether frame-skip changed state
    pub fn end_frame(&mut self, frame_ms: u64) -> Pace {
        let target = self.target as u64;
        let delta = target.abs_diff(frame_ms).min(u32::MAX as u64) as u32;
        let mut pace = Pace {
            sleep_ms: 0,
            skip: SkipChange::Unchanged,
        };

        if frame_ms < target {
            if self.time_budget >= delta {
                self.time_budget -= delta;
            } else if self.time_budget > 0 {
                pace.sleep_ms = delta - self.time_budget;
                self.time_budget = 0;
            } else {
                pace.sleep_ms = delta;
                if self.auto_skip && self.frame_skip {
                    self.frame_skip = false;
                    pace.skip = SkipChange::Disabled;
                }
            }
        } else if self.time_budget < self.target {
            let budget = self.time_budget.saturating_add(delta);
            if budget >= self.target {
                self.time_budget = self.target;
                if self.auto_skip && !self.frame_skip {
                    self.frame_skip = true;
                    pace.skip = SkipChange::Enabled;
                }
            } else {
                self.time_budget = budget;
            }
        }

        pace
    }
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_FRAME_MS, true)
    }
}
