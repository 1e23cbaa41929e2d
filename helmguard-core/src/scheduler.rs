//! Cooperative Control Loop
//!
//! Single-threaded scheduler driving the whole device: sampling, alert
//! evaluation, health checks, telemetry, and indicator feedback, each
//! on its own cadence compared against one monotonic clock per
//! iteration.
//!
//! ## Tick Structure
//!
//! Every `step` runs, in order:
//!
//! 1. watchdog check (a stalled previous iteration aborts the loop)
//! 2. sampling tick at its cadence: drivers sample, the snapshot
//!    ingests, alerts re-derive, the session edge fires chirps
//! 3. health tick at its cadence: sensor presence, uplink, free heap
//! 4. transmission tick: the period is re-selected from the emergency
//!    flag before the cadence comparison, then the snapshot is sent
//!    best-effort; a failed send is logged and dropped
//! 5. indicator update, every iteration
//! 6. watchdog feed
//!
//! Because all of this happens on one timeline, the snapshot is never
//! observed mid-update. A failed sensor read leaves the previous value
//! standing; a failed send is never retried. The only fatal condition
//! is a watchdog trip, which propagates out of `step` so the platform
//! harness can restart the device.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;
#[cfg(feature = "std")]
use std::boxed::Box;

use heapless::Vec;

use crate::alerts::{AlertEvaluator, AlertSession, EmergencyPolicy, SessionEdge};
use crate::constants::schedule::{
    HEALTH_PERIOD_MS, SAMPLE_PERIOD_MS, TRANSMIT_EMERGENCY_PERIOD_MS, TRANSMIT_PERIOD_MS,
    WATCHDOG_LIMIT_MS,
};
#[cfg(feature = "std")]
use crate::constants::schedule::LOOP_DELAY_MS;
use crate::constants::system::{LOW_HEAP_FLOOR_BYTES, MAX_DRIVERS};
use crate::indicators::{IndicatorDriver, IndicatorPattern, IndicatorSink};
use crate::sensors::SensorDriver;
use crate::snapshot::Snapshot;
use crate::time::{Cadence, TimeSource, Timestamp};
use crate::watchdog::LoopWatchdog;
use crate::SystemResult;

/// Telemetry uplink the loop reports through
///
/// One call per transmission-timer firing. Implementations must bound
/// their own network timeout; the loop has no other protection against
/// a stalled send than the watchdog.
pub trait ReportSink {
    /// Transport error type, surfaced only in logs
    type Error: core::fmt::Debug;

    /// Deliver one snapshot, best effort; `emergency` selects priority
    /// treatment on transports that have it
    fn send(&mut self, snapshot: &Snapshot, emergency: bool) -> Result<(), Self::Error>;

    /// Whether the uplink looked reachable at last use
    fn is_connected(&self) -> bool;
}

/// Free-heap probe for the health tick
pub trait HeapMonitor {
    /// Currently free heap in bytes
    fn free_bytes(&mut self) -> u32;
}

/// Loop cadences and alert policy
#[derive(Debug, Clone, Copy)]
pub struct LoopConfig {
    /// Sampling tick period (ms)
    pub sample_period_ms: u32,
    /// Health check period (ms)
    pub health_period_ms: u32,
    /// Transmission period outside emergencies (ms)
    pub transmit_period_ms: u32,
    /// Transmission period while the emergency flag is set (ms)
    pub transmit_emergency_period_ms: u32,
    /// Watchdog iteration gap limit (ms)
    pub watchdog_limit_ms: u32,
    /// Emergency flag lifetime policy
    pub emergency_policy: EmergencyPolicy,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            sample_period_ms: SAMPLE_PERIOD_MS,
            health_period_ms: HEALTH_PERIOD_MS,
            transmit_period_ms: TRANSMIT_PERIOD_MS,
            transmit_emergency_period_ms: TRANSMIT_EMERGENCY_PERIOD_MS,
            watchdog_limit_ms: WATCHDOG_LIMIT_MS,
            emergency_policy: EmergencyPolicy::default(),
        }
    }
}

impl LoopConfig {
    /// Defaults for every cadence and the recompute emergency policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sampling tick period
    pub fn with_sample_period_ms(mut self, ms: u32) -> Self {
        self.sample_period_ms = ms;
        self
    }

    /// Set the health check period
    pub fn with_health_period_ms(mut self, ms: u32) -> Self {
        self.health_period_ms = ms;
        self
    }

    /// Set the normal and emergency transmission periods
    pub fn with_transmit_periods_ms(mut self, normal: u32, emergency: u32) -> Self {
        self.transmit_period_ms = normal;
        self.transmit_emergency_period_ms = emergency;
        self
    }

    /// Set the watchdog iteration gap limit
    pub fn with_watchdog_limit_ms(mut self, ms: u32) -> Self {
        self.watchdog_limit_ms = ms;
        self
    }

    /// Select the emergency flag lifetime policy
    pub fn with_emergency_policy(mut self, policy: EmergencyPolicy) -> Self {
        self.emergency_policy = policy;
        self
    }
}

/// What one loop iteration did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    /// Sampling tick ran this iteration
    pub sampled: bool,
    /// Health check ran this iteration
    pub health_checked: bool,
    /// A snapshot was handed to the sink and accepted
    pub transmitted: bool,
    /// A snapshot was handed to the sink and dropped
    pub send_failed: bool,
    /// Alert session transition observed this iteration
    pub edge: SessionEdge,
}

/// The device control loop
///
/// Owns every stateful part of the firmware core: the drivers, the
/// snapshot, the alert evaluator, the cadences, the watchdog, and the
/// indicator pattern state. The type parameters are the four hardware
/// seams: clock, uplink, indicator pins, heap probe.
pub struct HelmetLoop<C, S, I, M>
where
    C: TimeSource,
    S: ReportSink,
    I: IndicatorSink,
    M: HeapMonitor,
{
    clock: C,
    reporter: S,
    pins: I,
    heap: M,
    config: LoopConfig,
    drivers: Vec<Box<dyn SensorDriver>, MAX_DRIVERS>,
    snapshot: Snapshot,
    evaluator: AlertEvaluator,
    session: AlertSession,
    indicators: IndicatorDriver,
    sample_cadence: Cadence,
    health_cadence: Cadence,
    transmit_cadence: Cadence,
    watchdog: LoopWatchdog,
}

impl<C, S, I, M> HelmetLoop<C, S, I, M>
where
    C: TimeSource,
    S: ReportSink,
    I: IndicatorSink,
    M: HeapMonitor,
{
    /// Assemble a loop over the four hardware seams; add drivers next
    pub fn new(config: LoopConfig, clock: C, reporter: S, pins: I, heap: M) -> Self {
        let boot = clock.now();
        Self {
            clock,
            reporter,
            pins,
            heap,
            drivers: Vec::new(),
            snapshot: Snapshot::new(boot),
            evaluator: AlertEvaluator::new(config.emergency_policy),
            session: AlertSession::new(),
            indicators: IndicatorDriver::new(),
            sample_cadence: Cadence::new(config.sample_period_ms),
            health_cadence: Cadence::new(config.health_period_ms),
            transmit_cadence: Cadence::new(config.transmit_period_ms),
            watchdog: LoopWatchdog::new(config.watchdog_limit_ms),
            config,
        }
    }

    /// Register a sensor driver; silently ignored beyond the driver
    /// capacity
    pub fn add_driver<D: SensorDriver + 'static>(mut self, driver: D) -> Self {
        self.drivers.push(Box::new(driver)).ok();
        self
    }

    /// Current snapshot
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// The uplink this loop reports through
    pub fn reporter(&self) -> &S {
        &self.reporter
    }

    /// Mutable access to the uplink, for reconfiguration between steps
    pub fn reporter_mut(&mut self) -> &mut S {
        &mut self.reporter
    }

    /// Release a latched emergency (no effect under the recompute
    /// policy)
    pub fn clear_emergency(&mut self) {
        self.evaluator.clear_emergency();
    }

    /// Run one loop iteration against the clock
    pub fn step(&mut self) -> SystemResult<StepReport> {
        let now = self.clock.now();
        if let Err(e) = self.watchdog.check(now) {
            log_error!("watchdog: {}", e);
            return Err(e);
        }

        let mut report = StepReport {
            sampled: false,
            health_checked: false,
            transmitted: false,
            send_failed: false,
            edge: SessionEdge::None,
        };

        if self.sample_cadence.poll(now) {
            report.edge = self.sample_tick(now);
            report.sampled = true;
        }

        if self.health_cadence.poll(now) {
            self.health_tick(now);
            report.health_checked = true;
        }

        // Re-select the transmit period from the emergency flag before
        // the cadence comparison; an in-flight wait is never shortened
        // retroactively.
        let transmit_period = if self.snapshot.emergency_status {
            self.config.transmit_emergency_period_ms
        } else {
            self.config.transmit_period_ms
        };
        self.transmit_cadence.set_period_ms(transmit_period);

        if self.transmit_cadence.poll(now) {
            match self
                .reporter
                .send(&self.snapshot, self.snapshot.emergency_status)
            {
                Ok(()) => report.transmitted = true,
                Err(e) => {
                    log_warn!("telemetry dropped: {:?}", e);
                    report.send_failed = true;
                }
            }
        }

        let pattern = if self.snapshot.emergency_status || self.snapshot.alert_active {
            IndicatorPattern::Alarm
        } else {
            IndicatorPattern::Idle
        };
        self.indicators.set_pattern(pattern);
        match report.edge {
            SessionEdge::Started => self.indicators.chirp(now, 2),
            SessionEdge::Ended => self.indicators.chirp(now, 1),
            SessionEdge::None => {}
        }
        self.indicators.update(now, &mut self.pins);

        self.watchdog.feed(now);
        Ok(report)
    }

    /// Run the loop until the watchdog trips, sleeping briefly between
    /// iterations
    #[cfg(feature = "std")]
    pub fn run(&mut self) -> SystemResult<()> {
        loop {
            self.step()?;
            std::thread::sleep(std::time::Duration::from_millis(LOOP_DELAY_MS as u64));
        }
    }

    fn sample_tick(&mut self, now: Timestamp) -> SessionEdge {
        for driver in self.drivers.iter_mut() {
            match driver.sample(now) {
                Ok(sample) => self.snapshot.ingest(sample),
                Err(e) => {
                    // Stale-value policy: the previous reading stands
                    log_warn!("{} read failed: {:?}", driver.kind().name(), e);
                }
            }
        }

        self.snapshot.mark_sampled(now);
        self.evaluator.evaluate(&mut self.snapshot, now);
        self.session.update(&mut self.snapshot)
    }

    fn health_tick(&mut self, now: Timestamp) {
        let mut all_present = true;
        for driver in self.drivers.iter_mut() {
            if !driver.probe() {
                all_present = false;
                log_warn!("{} absent at health check", driver.kind().name());
                if let Err(e) = driver.reset() {
                    log_warn!("{} reset failed: {:?}", driver.kind().name(), e);
                }
            }
        }

        self.snapshot.sensor_error = !all_present;
        self.snapshot.wifi_connected = self.reporter.is_connected();

        let free = self.heap.free_bytes();
        if free < LOW_HEAP_FLOOR_BYTES {
            log_warn!("{} bytes of heap left, below the {} floor", free, LOW_HEAP_FLOOR_BYTES);
        }
        self.snapshot.free_heap_bytes = free;
        self.snapshot.system_error = free < LOW_HEAP_FLOOR_BYTES;

        self.snapshot.session_secs = (now.saturating_sub(self.snapshot.boot_at) / 1000) as u32;
    }
}
