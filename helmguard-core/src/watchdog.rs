//! Loop Supervision Watchdog
//!
//! Software watchdog for the cooperative control loop. The loop feeds
//! it at the end of every completed iteration and checks it at the top
//! of the next; a gap above the limit means an iteration stalled (hung
//! bus transaction, wedged network stack) and the loop must restart.
//!
//! Expiry latches: once tripped, `check` keeps failing until `reset`
//! is called from the restart path. Feeding does not clear a latched
//! expiry.

use crate::errors::{SystemError, SystemResult};
use crate::time::Timestamp;

/// Latching software watchdog driven by loop iterations
#[derive(Debug, Clone)]
pub struct LoopWatchdog {
    limit_ms: u32,
    last_fed: Timestamp,
    armed: bool,
    expired: bool,
}

impl LoopWatchdog {
    /// Watchdog with the given iteration gap limit; starts unarmed
    pub fn new(limit_ms: u32) -> Self {
        Self {
            limit_ms,
            last_fed: 0,
            armed: false,
            expired: false,
        }
    }

    /// Record a completed iteration; arms the watchdog on first call
    pub fn feed(&mut self, now: Timestamp) {
        self.last_fed = now;
        self.armed = true;
    }

    /// Fail if the gap since the last feed exceeded the limit, or if a
    /// prior check already tripped
    pub fn check(&mut self, now: Timestamp) -> SystemResult<()> {
        if !self.armed {
            return Ok(());
        }
        let elapsed = now.saturating_sub(self.last_fed);
        if self.expired || elapsed > self.limit_ms as u64 {
            self.expired = true;
            return Err(SystemError::WatchdogTimeout {
                elapsed_ms: elapsed.min(u32::MAX as u64) as u32,
                limit_ms: self.limit_ms,
            });
        }
        Ok(())
    }

    /// Clear a latched expiry and re-arm; the restart path calls this
    pub fn reset(&mut self, now: Timestamp) {
        self.expired = false;
        self.armed = true;
        self.last_fed = now;
    }

    /// Configured iteration gap limit in milliseconds
    pub fn limit_ms(&self) -> u32 {
        self.limit_ms
    }
}
