//! Inertial Conversion Factors and Movement Thresholds
//!
//! Scale factors for the 16-bit IMU registers and the acceleration
//! magnitudes that separate normal movement from falls, impacts, and
//! dangerous stillness.

// ===== RAW CONVERSION FACTORS =====

/// Accelerometer sensitivity at the ±8g full-scale setting (LSB per g).
///
/// Fall and impact detection need headroom above 4g, which rules out
/// the default ±2g range.
///
/// Source: MPU-6050 register map (AFS_SEL=2)
pub const ACCEL_LSB_PER_G: f32 = 4096.0;

/// Gyroscope sensitivity at the ±500°/s full-scale setting (LSB per °/s).
///
/// Source: MPU-6050 register map (FS_SEL=1)
pub const GYRO_LSB_PER_DPS: f32 = 65.5;

// ===== EVENT THRESHOLDS =====

/// Acceleration magnitude above which a fall is declared (g).
///
/// Tumbles and collapses spike the norm well above gravity; stair
/// descent and vehicle vibration stay below it.
///
/// Source: fall-detection literature (2-3g trunk acceleration on impact)
pub const FALL_THRESHOLD_G: f32 = 2.5;

/// Acceleration magnitude above which a head impact is declared (g).
///
/// Distinct from fall: a struck or dropped helmet shows a sharper spike.
pub const IMPACT_THRESHOLD_G: f32 = 4.0;

/// Acceleration magnitude that counts as movement (g).
///
/// Gravity contributes 1g to the norm at rest; ordinary limb and torso
/// activity swings it above this floor many times a second. A norm that
/// never exceeds it means the wearer is still.
pub const MOTION_THRESHOLD_G: f32 = 1.05;

/// Continuous stillness required before the motionless alarm (ms).
///
/// Five minutes without a single movement spike. PASS devices alarm
/// faster; this window feeds telemetry escalation, not the local
/// audible PASS function.
///
/// Source: NFPA 1982 PASS context (pre-alarm concept)
pub const MOTIONLESS_WINDOW_MS: u64 = 300_000;
