//! Physiological Thresholds and Pulse-Oximetry Parameters
//!
//! Alert thresholds for heart rate, blood oxygen, and body temperature,
//! plus the fixed parameters of the optical beat-detection heuristic.
//! The pulse-oximetry numbers are illustrative working values, not a
//! clinically validated calibration.

// ===== HEART RATE THRESHOLDS =====

/// Sustained heart rate considered elevated for a working firefighter (BPM).
///
/// Heavy exertion routinely reaches 150+ BPM; 120 sustained alongside
/// other signals feeds the heat-stress heuristic rather than alarming
/// on its own.
///
/// Source: NFPA 1584 rehabilitation guidance (work/rest heart rate)
pub const HR_HIGH_BPM: f32 = 120.0;

/// Heart rate treated as a critical vital sign (BPM).
///
/// Sustained rates above this level contribute to the critical-vitals
/// flag and therefore to emergency escalation.
///
/// Source: NFPA 1584 (near age-predicted maximum under load)
pub const HR_CRITICAL_BPM: f32 = 150.0;

// ===== BLOOD OXYGEN THRESHOLDS =====

/// SpO2 below which vitals are considered critical (%).
///
/// Healthy saturation is 95-100%; below 90% indicates hypoxemia.
///
/// Source: WHO pulse oximetry training manual
pub const SPO2_CRITICAL_PCT: f32 = 90.0;

/// Lower clamp for published SpO2 values (%).
///
/// Ratio-based estimates degrade badly with motion and weak perfusion;
/// values under 70% from this class of sensor are noise, so the output
/// is clamped rather than reported.
pub const SPO2_MIN_PCT: f32 = 70.0;

/// Upper clamp for published SpO2 values (%).
///
/// Saturation cannot exceed 100%; the linear ratio model can.
pub const SPO2_MAX_PCT: f32 = 100.0;

/// SpO2 published when both optical channels are too weak to trust (%).
///
/// A loose or removed sensor reports near-zero light. Publishing a
/// nominal healthy value keeps the field populated without tripping the
/// critical-vitals flag on a wiring problem.
pub const SPO2_WEAK_SIGNAL_PCT: f32 = 98.0;

// ===== OPTICAL FRONT-END PARAMETERS =====

/// Minimum per-channel intensity treated as a real signal (ADC counts).
///
/// Below this the photodiode is seeing ambient leakage, not tissue.
///
/// Source: MAX30102 datasheet (18-bit ADC, finger DC level >> 10k counts)
pub const OPTICAL_MIN_SIGNAL: f32 = 5_000.0;

/// IR intensity a rising edge must cross to count as a beat (ADC counts).
pub const BEAT_THRESHOLD: f32 = 50_000.0;

/// Shortest credible beat-to-beat interval (ms). 300ms = 200 BPM.
pub const BEAT_INTERVAL_MIN_MS: u64 = 300;

/// Longest credible beat-to-beat interval (ms). 3000ms = 20 BPM.
pub const BEAT_INTERVAL_MAX_MS: u64 = 3_000;

/// Consecutive valid intervals averaged before the published rate moves.
pub const BEAT_WINDOW: usize = 4;

/// Intercept of the linear SpO2 ratio model: spo2 = 110 - 25 * R.
///
/// R is the red/IR intensity ratio. The 110/25 pair is the textbook
/// uncalibrated approximation for this sensor family.
///
/// Source: Maxim application note 6409 (SpO2 ratio estimation)
pub const SPO2_RATIO_INTERCEPT: f32 = 110.0;

/// Slope of the linear SpO2 ratio model (see [`SPO2_RATIO_INTERCEPT`]).
pub const SPO2_RATIO_SLOPE: f32 = 25.0;

// ===== BODY TEMPERATURE =====

/// Body temperature contributing to heat stress (°C).
///
/// Core temperature above 38.5°C during exertion marks the onset of
/// heat exhaustion territory.
///
/// Source: NFPA 1584 / sports medicine heat illness guidance
pub const BODY_TEMP_HIGH_C: f32 = 38.5;

/// Body temperature treated as a critical vital sign (°C).
///
/// 40°C and above is heat stroke range.
pub const BODY_TEMP_CRITICAL_C: f32 = 40.0;

/// Lowest body temperature the IR sensor can plausibly report (°C).
///
/// Skin under a helmet liner does not read below severe-hypothermia
/// levels; anything lower is an optics or aiming fault.
pub const BODY_TEMP_MIN_C: f32 = 30.0;

/// Highest body temperature the IR sensor can plausibly report (°C).
pub const BODY_TEMP_MAX_C: f32 = 45.0;

/// Value substituted when the body channel fails validation (°C).
pub const BODY_TEMP_DEFAULT_C: f32 = 37.0;
