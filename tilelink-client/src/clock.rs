//! Fixed-rate frame clock

use std::thread;
use std::time::{Duration, Instant};

use tilelink_hal::FrameClock;

/// Paces the frame loop at a fixed period
///
/// A frame that overruns its slot starts the next one immediately; missed
/// slots are not made up.
#[derive(Debug)]
pub struct FrameTicker {
    period: Duration,
    deadline: Instant,
}

impl FrameTicker {
    /// Create a ticker whose first frame ends one period from now
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            deadline: Instant::now() + period,
        }
    }
}

impl FrameClock for FrameTicker {
    fn present_and_wait(&mut self) {
        let now = Instant::now();
        if let Some(remaining) = self.deadline.checked_duration_since(now) {
            thread::sleep(remaining);
            self.deadline += self.period;
        } else {
            self.deadline = now + self.period;
        }
    }
}
