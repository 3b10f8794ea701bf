//! Tick cadence helper for driving visibility passes.

use std::time::{Duration, Instant};

/// Default interval between visibility passes of one channel (about 3 Hz).
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(300);

/// Decides when a channel's next visibility pass is due.
///
/// The tracker itself is cadence-agnostic; the channel's driver polls this
/// once per server frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSchedule {
    interval: Duration,
    next_due: Option<Instant>,
}

impl TickSchedule {
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns `true` if a pass is due at `now`, and schedules the next one
    /// `interval` later. The first poll is always due.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now < due => false,
            _ => {
                self.next_due = Some(now + self.interval);
                true
            }
        }
    }

    /// Makes the next poll due immediately.
    pub fn reset(&mut self) {
        self.next_due = None;
    }
}

impl Default for TickSchedule {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}
