use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the clock was created. Monotonic; schedulers compare
    /// against this.
    pub elapsed: Duration,
}

/// Frame clock producing `FrameTime` snapshots.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }

    /// Samples the clock for the frame about to be drawn.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        FrameTime {
            elapsed: now.saturating_duration_since(self.start),
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
