//! Sampling and alert engine for HelmGuard
//!
//! Drives a firefighter helmet's sensor suite on a fixed cadence,
//! derives threshold safety alerts, and adapts the reporting interval
//! under emergency conditions.
//!
//! Key constraints:
//! - Single-threaded cooperative loop; the snapshot is never locked
//! - Runs on allocator-equipped microcontrollers (ESP32 class)
//! - Failed reads keep the last good value; failed sends are dropped
//!
//! ```
//! use helmguard_core::{AlertEvaluator, Snapshot};
//!
//! let mut snapshot = Snapshot::new(0);
//! snapshot.heart_rate = 158.0;
//! snapshot.spo2 = 96.0;
//!
//! let mut alerts = AlertEvaluator::default();
//! alerts.evaluate(&mut snapshot, 1_000);
//!
//! assert!(snapshot.critical_vitals);
//! assert!(snapshot.emergency_status);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Crate-internal logging; no-ops unless the `log` feature is enabled.
// Defined ahead of the module declarations so every module sees them.
#[cfg(feature = "log")]
macro_rules! log_info {
    ($($arg:tt)*) => { log::info!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_info {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! log_error {
    ($($arg:tt)*) => { log::error!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_error {
    ($($arg:tt)*) => {};
}

pub mod alerts;
pub mod constants;
pub mod errors;
pub mod indicators;
pub mod scheduler;
pub mod sensors;
pub mod snapshot;
pub mod time;
pub mod watchdog;

// Public API
pub use alerts::{AlertEvaluator, AlertSession, EmergencyPolicy, SessionEdge};
pub use errors::{SensorError, SensorResult, SystemError, SystemResult};
pub use indicators::{IndicatorDriver, IndicatorPattern, IndicatorSink};
pub use scheduler::{HeapMonitor, HelmetLoop, LoopConfig, ReportSink, StepReport};
pub use sensors::{SensorDriver, SensorKind, SensorSample};
pub use snapshot::Snapshot;
#[cfg(feature = "std")]
pub use time::MonotonicClock;
pub use time::{Cadence, MockTimeSource, TimeSource, Timestamp};
pub use watchdog::LoopWatchdog;

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
