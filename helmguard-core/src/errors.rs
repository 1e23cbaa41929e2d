//! Error Types for Sensor Bus Faults and Loop Supervision
//!
//! ## Design Philosophy
//!
//! HelmGuard's error system is designed for a helmet-mounted MCU:
//!
//! 1. **Small Size**: Each variant is kept minimal (typically 8-12 bytes) since
//!    errors are returned from every bus transaction on the sampling path.
//!
//! 2. **No Heap Allocation**: All error data is inline - no String, only
//!    `&'static str` where a reason is carried. Memory usage stays deterministic.
//!
//! 3. **Copy Semantics**: Errors implement Copy so drivers can return them
//!    without move complications and the loop can record the last one cheaply.
//!
//! 4. **Actionable Information**: A bus address or elapsed time is enough to
//!    decide the response; nothing requires a follow-up query.
//!
//! ## Error Categories
//!
//! ### Bus Faults (`SensorError`)
//! Raised by sensor drivers. Never fatal: the sampling tick keeps the last
//! good value and the next health check marks the sensor as absent if the
//! fault persists.
//!
//! ### Supervision Faults (`SystemError`)
//! Raised by the control loop itself. `WatchdogTimeout` is the one fatal
//! error in the system - the process restarts rather than limping on.
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use helmguard_core::errors::{SensorError, SensorResult, SystemError};
//!
//! fn classify(res: SensorResult<u16>) -> &'static str {
//!     match res {
//!         Ok(_) => "ok",
//!         Err(SensorError::NotPresent { .. }) => "absent",
//!         Err(SensorError::BusTimeout { .. }) => "stalled",
//!         Err(_) => "fault",
//!     }
//! }
//!
//! assert_eq!(classify(Err(SensorError::NotPresent { addr: 0x57 })), "absent");
//!
//! // Supervision faults render ready for the health log
//! let advisory = SystemError::LowMemory { free_bytes: 4_096, min_bytes: 10_240 };
//! assert_eq!(
//!     advisory.to_string(),
//!     "Low memory: 4096 bytes free (floor 10240)"
//! );
//! ```

use thiserror_no_std::Error;

/// Result type for sensor bus operations
pub type SensorResult<T> = Result<T, SensorError>;

/// Result type for loop supervision checks
pub type SystemResult<T> = Result<T, SystemError>;

/// Sensor bus errors - kept small for the sampling hot path
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Bus transaction exceeded its deadline
    #[error("Bus timeout talking to 0x{addr:02x}")]
    BusTimeout {
        /// 7-bit bus address of the device that stalled
        addr: u8,
    },

    /// Device did not acknowledge the transaction
    #[error("No ACK from device 0x{addr:02x}")]
    Nack {
        /// 7-bit bus address that failed to acknowledge
        addr: u8,
    },

    /// Probe found no device at the expected address
    #[error("No device present at 0x{addr:02x}")]
    NotPresent {
        /// 7-bit bus address that was probed
        addr: u8,
    },

    /// Read returned fewer bytes than the frame requires
    #[error("Short frame: expected {expected} bytes, got {got}")]
    ShortFrame {
        /// Bytes the register frame requires
        expected: u8,
        /// Bytes actually returned by the bus
        got: u8,
    },

    /// Raw value cannot be a real reading (rail-stuck ADC, all-ones register)
    #[error("Saturated or invalid raw reading")]
    InvalidFrame,
}

/// Loop supervision errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemError {
    /// An iteration failed to feed the watchdog within the limit
    #[error("Watchdog starved: {elapsed_ms}ms since last feed (limit {limit_ms}ms)")]
    WatchdogTimeout {
        /// Milliseconds since the watchdog was last fed
        elapsed_ms: u32,
        /// Configured feed deadline in milliseconds
        limit_ms: u32,
    },

    /// Free memory dropped below the advisory floor
    #[error("Low memory: {free_bytes} bytes free (floor {min_bytes})")]
    LowMemory {
        /// Free heap reported by the platform probe
        free_bytes: u32,
        /// Advisory minimum from the system constants
        min_bytes: u32,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for SensorError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::BusTimeout { addr } =>
                defmt::write!(fmt, "Bus timeout at 0x{:02x}", addr),
            Self::Nack { addr } =>
                defmt::write!(fmt, "NACK from 0x{:02x}", addr),
            Self::NotPresent { addr } =>
                defmt::write!(fmt, "Nothing at 0x{:02x}", addr),
            Self::ShortFrame { expected, got } =>
                defmt::write!(fmt, "Short frame: {}/{} bytes", got, expected),
            Self::InvalidFrame =>
                defmt::write!(fmt, "Invalid frame"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SystemError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::WatchdogTimeout { elapsed_ms, limit_ms } =>
                defmt::write!(fmt, "Watchdog starved: {}ms (limit {}ms)", elapsed_ms, limit_ms),
            Self::LowMemory { free_bytes, min_bytes } =>
                defmt::write!(fmt, "Low memory: {} bytes (floor {})", free_bytes, min_bytes),
        }
    }
}
