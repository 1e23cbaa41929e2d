//! Time management for the helmet loop
//!
//! Provides the clock abstraction every scheduled activity is measured
//! against:
//! - Monotonic clock (milliseconds since boot) for cadences and timers
//! - Mock clock for deterministic time-travel in tests
//! - `Cadence`: an interval plus last-fired pair polled by the control loop
//!
//! Wall-clock time never enters the core. The transport layer stamps
//! records with calendar time on its own; everything here is measured
//! from boot so clock adjustments cannot skew sampling.

/// Timestamp in milliseconds since device boot
pub type Timestamp = u64;

/// Source of time for the system
///
/// Implementations might read a hardware timer, an RTOS tick count, or
/// `std::time::Instant` depending on the platform. Tests inject
/// [`MockTimeSource`] and drive it by hand.
pub trait TimeSource {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;

    /// Check if this source provides wall clock time (vs monotonic)
    fn is_wall_clock(&self) -> bool;

    /// Get precision in milliseconds
    fn precision_ms(&self) -> u32;
}

/// Monotonic clock anchored at construction (requires std)
///
/// Reads as milliseconds since `new()` was called, which the loop treats
/// as boot time.
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    start: std::time::Instant,
}

#[cfg(feature = "std")]
impl MonotonicClock {
    /// Anchor the clock at the current instant
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TimeSource for MonotonicClock {
    fn now(&self) -> Timestamp {
        self.start.elapsed().as_millis() as Timestamp
    }

    fn is_wall_clock(&self) -> bool {
        false
    }

    fn precision_ms(&self) -> u32 {
        1
    }
}

/// Controllable time source for testing
#[derive(Debug, Clone)]
pub struct MockTimeSource {
    timestamp: Timestamp,
}

impl MockTimeSource {
    /// Create a mock clock starting at the given timestamp
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// Jump to an absolute timestamp
    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Advance the clock by the given number of milliseconds
    pub fn advance(&mut self, ms: u64) {
        self.timestamp += ms;
    }
}

impl TimeSource for MockTimeSource {
    fn now(&self) -> Timestamp {
        self.timestamp
    }

    fn is_wall_clock(&self) -> bool {
        false
    }

    fn precision_ms(&self) -> u32 {
        1
    }
}

/// A recurring deadline: fixed period plus the timestamp it last fired
///
/// The control loop polls each cadence once per iteration. A cadence
/// fires on its first poll (so boot produces an immediate sample) and
/// thereafter whenever a full period has elapsed since the last firing.
///
/// Two properties the loop relies on:
/// - Late polls do not replay missed firings; the cadence re-anchors on
///   the poll that fired.
/// - [`set_period_ms`](Cadence::set_period_ms) only changes the period.
///   The new value is used at the next comparison; it never forces an
///   immediate firing by itself.
#[derive(Debug, Clone)]
pub struct Cadence {
    period_ms: u32,
    last_fired: Option<Timestamp>,
}

impl Cadence {
    /// Create a cadence with the given period in milliseconds
    pub const fn new(period_ms: u32) -> Self {
        Self {
            period_ms,
            last_fired: None,
        }
    }

    /// Check whether the cadence is due, and re-arm it if so
    ///
    /// Returns `true` at most once per period; the caller performs its
    /// activity only on a `true` result.
    pub fn poll(&mut self, now: Timestamp) -> bool {
        let due = match self.last_fired {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.period_ms as u64,
        };
        if due {
            self.last_fired = Some(now);
        }
        due
    }

    /// Current period in milliseconds
    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    /// Change the period; takes effect at the next [`poll`](Cadence::poll)
    pub fn set_period_ms(&mut self, period_ms: u32) {
        self.period_ms = period_ms;
    }

    /// Timestamp of the last firing, if any
    pub fn last_fired(&self) -> Option<Timestamp> {
        self.last_fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_time_advances() {
        let mut time = MockTimeSource::new(1000);
        assert_eq!(time.now(), 1000);

        time.advance(500);
        assert_eq!(time.now(), 1500);

        time.set(10_000);
        assert_eq!(time.now(), 10_000);
    }

    #[test]
    fn cadence_fires_immediately_then_periodically() {
        let mut cadence = Cadence::new(1000);

        assert!(cadence.poll(0));
        assert!(!cadence.poll(500));
        assert!(!cadence.poll(999));
        assert!(cadence.poll(1000));
        assert!(!cadence.poll(1500));
        assert!(cadence.poll(2100));
    }

    #[test]
    fn cadence_does_not_replay_missed_firings() {
        let mut cadence = Cadence::new(1000);
        assert!(cadence.poll(0));

        // Loop stalled for 10 periods: exactly one firing, re-anchored
        assert!(cadence.poll(10_000));
        assert!(!cadence.poll(10_500));
        assert!(cadence.poll(11_000));
    }

    #[test]
    fn period_change_applies_at_next_comparison() {
        let mut cadence = Cadence::new(5000);
        assert!(cadence.poll(0));
        assert!(!cadence.poll(4000));

        // Shorten the period mid-wait: 4200ms already elapsed, so the
        // next poll observes >= 1000ms and fires.
        cadence.set_period_ms(1000);
        assert!(cadence.poll(4200));
        assert!(!cadence.poll(4900));
        assert!(cadence.poll(5200));

        // Lengthen it again: nothing fires until a full 5s has passed.
        cadence.set_period_ms(5000);
        assert!(!cadence.poll(9000));
        assert!(cadence.poll(10_200));
    }

    #[cfg(feature = "std")]
    #[test]
    fn monotonic_clock_is_monotonic() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
        assert!(!clock.is_wall_clock());
    }
}
