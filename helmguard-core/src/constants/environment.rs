//! Ambient Temperature and Gas Concentration Limits
//!
//! Environmental thresholds for the helmet exterior: ambient heat as a
//! proxy for fire conditions, and the carbon monoxide ladder that drives
//! escalating alerts. Includes the fixed linear model for the analog CO
//! cell.

// ===== AMBIENT TEMPERATURE =====

/// Lowest ambient temperature the IR sensor reports reliably (°C).
///
/// Source: MLX90614 datasheet (ambient operating range -40..85°C)
pub const AMBIENT_TEMP_MIN_C: f32 = -40.0;

/// Highest ambient temperature the IR sensor reports reliably (°C).
///
/// Source: MLX90614 datasheet
pub const AMBIENT_TEMP_MAX_C: f32 = 85.0;

/// Value substituted when the ambient channel fails validation (°C).
pub const AMBIENT_TEMP_DEFAULT_C: f32 = 25.0;

/// Ambient temperature that marks a hot environment (°C).
///
/// Doubles as the smoke proxy: helmet-level air at 50°C means the
/// wearer is in or next to active fire conditions. Feeds heat stress
/// and the smoke-detected field.
///
/// Source: NIST fire environment studies (tenability thresholds)
pub const AMBIENT_WARNING_C: f32 = 50.0;

/// Ambient temperature contributing to critical vitals (°C).
///
/// Sustained 60°C air is untenable even in turnout gear.
///
/// Source: NIST fire environment studies
pub const AMBIENT_CRITICAL_C: f32 = 60.0;

// ===== CARBON MONOXIDE LADDER =====

/// First rung: CO warning threshold (ppm).
///
/// Sets the co-warning flag. 50 ppm is the OSHA 8-hour permissible
/// exposure limit; inside a structure it means SCBA discipline matters.
///
/// Source: OSHA PEL (29 CFR 1910.1000)
pub const CO_WARNING_PPM: f32 = 50.0;

/// Second rung: CO danger threshold (ppm).
///
/// No extra flag, but log severity rises. 200 ppm causes headache and
/// impaired judgement within the span of an interior attack.
///
/// Source: NIOSH ceiling recommendation
pub const CO_DANGER_PPM: f32 = 200.0;

/// Third rung: CO critical threshold (ppm).
///
/// Forces emergency escalation on its own.
///
/// Source: NIOSH (rapid incapacitation range)
pub const CO_CRITICAL_PPM: f32 = 400.0;

// ===== ANALOG GAS CELL MODEL =====

/// Full-scale ADC reading for the gas channel (12-bit converter).
pub const GAS_ADC_FULL_SCALE: f32 = 4095.0;

/// ADC reference voltage (V).
pub const GAS_ADC_REF_VOLTS: f32 = 3.3;

/// Cell output voltage in clean air (V).
///
/// Electrochemical CO cells idle above ground; readings below this are
/// clamped to zero ppm.
///
/// Source: MQ-7 module bias network (typical breakout boards)
pub const CO_CELL_ZERO_VOLTS: f32 = 0.4;

/// Linear cell sensitivity (ppm per volt above the zero offset).
///
/// The real response curve is logarithmic; this fixed linear fit matches
/// the single-point calibration these modules ship with.
///
/// Source: MQ-7 datasheet, linearized around the 50-400 ppm band
pub const CO_PPM_PER_VOLT: f32 = 200.0;
