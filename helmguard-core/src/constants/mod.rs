//! Constants for HelmGuard Core
//!
//! This module provides centralized, well-documented constants used throughout
//! the helmet firmware. All numeric values are defined here with clear
//! explanations of their purpose, source, and rationale.
//!
//! ## Organization
//!
//! Constants are grouped by domain:
//! - **Vitals**: Physiological thresholds and pulse-oximetry parameters
//! - **Environment**: Ambient temperature and gas concentration limits
//! - **Motion**: Inertial scale factors and movement thresholds
//! - **Schedule**: Loop cadences, timeouts, and indicator timing
//! - **System**: Memory floors and capacity limits
//!
//! ## Usage Guidelines
//!
//! 1. Always use these constants instead of magic numbers
//! 2. When adding new constants, include comprehensive documentation
//! 3. Reference standards or datasheets where applicable
//! 4. Group related constants together
//! 5. Use descriptive names that include units

/// Physiological thresholds and pulse-oximetry algorithm parameters.
pub mod vitals;

/// Ambient temperature and carbon monoxide limits, gas cell model.
pub mod environment;

/// Inertial conversion factors and movement thresholds.
pub mod motion;

/// Loop cadences, watchdog deadline, and indicator timing.
pub mod schedule;

/// Memory floors and capacity limits.
pub mod system;

// Re-export commonly used constants for convenience
pub use vitals::{
    HR_HIGH_BPM, HR_CRITICAL_BPM,
    SPO2_CRITICAL_PCT, SPO2_MIN_PCT, SPO2_MAX_PCT,
    BODY_TEMP_HIGH_C, BODY_TEMP_CRITICAL_C, BODY_TEMP_DEFAULT_C,
};

pub use environment::{
    AMBIENT_TEMP_DEFAULT_C, AMBIENT_WARNING_C, AMBIENT_CRITICAL_C,
    CO_WARNING_PPM, CO_DANGER_PPM, CO_CRITICAL_PPM,
};

pub use motion::{
    FALL_THRESHOLD_G, IMPACT_THRESHOLD_G,
    MOTION_THRESHOLD_G, MOTIONLESS_WINDOW_MS,
};

pub use schedule::{
    SAMPLE_PERIOD_MS, HEALTH_PERIOD_MS,
    TRANSMIT_PERIOD_MS, TRANSMIT_EMERGENCY_PERIOD_MS,
    WATCHDOG_LIMIT_MS,
};

pub use system::LOW_HEAP_FLOOR_BYTES;
