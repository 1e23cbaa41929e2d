//! Loop Cadences, Watchdog Deadline, and Indicator Timing
//!
//! Every periodic activity in the control loop takes its period from
//! here. The transmit pair is the one adaptive cadence in the system:
//! the loop switches between the two values as emergency status changes.

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1_000;

// ===== LOOP CADENCES =====

/// Sensor sampling period (ms).
///
/// One full acquisition of all four sensors plus alert evaluation per
/// second. Fast enough for the alert heuristics, slow enough to keep
/// the bus mostly idle.
pub const SAMPLE_PERIOD_MS: u32 = 1_000;

/// Health check period (ms).
///
/// Sensor presence probes, connectivity check, and the free-memory
/// floor test every 30 seconds.
pub const HEALTH_PERIOD_MS: u32 = 30_000;

/// Telemetry period under normal conditions (ms).
pub const TRANSMIT_PERIOD_MS: u32 = 5_000;

/// Telemetry period while emergency status is raised (ms).
pub const TRANSMIT_EMERGENCY_PERIOD_MS: u32 = 1_000;

// ===== SUPERVISION =====

/// Watchdog feed deadline (ms).
///
/// The loop feeds once per iteration; iterations normally complete in
/// tens of milliseconds. Eight seconds absorbs the worst case of a
/// full sampling tick plus an HTTP send at its timeout, so only a
/// genuinely hung bus or socket trips it.
pub const WATCHDOG_LIMIT_MS: u32 = 8_000;

/// Idle delay between loop iterations (ms).
///
/// Keeps the cooperative loop from spinning flat-out between cadence
/// firings.
pub const LOOP_DELAY_MS: u32 = 10;

// ===== INDICATOR TIMING =====

/// Idle heartbeat blink period (ms). LED toggles at half this period.
pub const IDLE_BLINK_PERIOD_MS: u32 = 2_000;

/// Alert flash period (ms). LED and buzzer alternate at half this period.
pub const ALERT_FLASH_PERIOD_MS: u32 = 250;

/// One-shot chirp length on alert session edges (ms).
pub const CHIRP_MS: u32 = 100;
