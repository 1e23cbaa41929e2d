//! Alert Derivation
//!
//! Threshold rules evaluated once per sampling tick against the
//! current snapshot. Every flag except two is a pure function of the
//! snapshot at the moment of evaluation; the exceptions are the
//! motionless window (carries the last-motion instant across ticks)
//! and the emergency flag under the latched policy.
//!
//! ## Rules
//!
//! - heat stress: body temperature, heart rate, or ambient heat above
//!   their elevated thresholds
//! - critical vitals: body temperature, heart rate, SpO2, or ambient
//!   heat across a life-threatening threshold
//! - CO warning: concentration above the lowest rung of the exposure
//!   ladder; the middle rung raises log severity, the top rung forces
//!   an emergency
//! - smoke: ambient heat above the warning threshold (proxy signal,
//!   no dedicated smoke sensor)
//! - motionless: acceleration magnitude below the activity floor for
//!   the full window; forces an emergency
//! - emergency: OR of critical vitals, fall, impact, motionless, and
//!   critical CO
//!
//! ## Emergency Lifetime
//!
//! Two policies are supported. `Recompute` derives the emergency flag
//! fresh each tick, so it clears on its own when every trigger clears.
//! `Latched` holds the flag once set until `clear_emergency` is called
//! from outside the loop. Recompute is the default.

use crate::constants::environment::{
    AMBIENT_CRITICAL_C, AMBIENT_WARNING_C, CO_CRITICAL_PPM, CO_DANGER_PPM, CO_WARNING_PPM,
};
use crate::constants::motion::{MOTIONLESS_WINDOW_MS, MOTION_THRESHOLD_G};
use crate::constants::vitals::{
    BODY_TEMP_CRITICAL_C, BODY_TEMP_HIGH_C, HR_CRITICAL_BPM, HR_HIGH_BPM, SPO2_CRITICAL_PCT,
};
use crate::snapshot::Snapshot;
use crate::time::Timestamp;

/// How the emergency flag behaves after its triggers clear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmergencyPolicy {
    /// Derived fresh each tick; clears itself when all triggers clear
    #[default]
    Recompute,
    /// Held once set; cleared only by an explicit operator action
    Latched,
}

/// Per-tick alert rule evaluator
///
/// Owns the motionless window and the emergency latch. Everything else
/// is recomputed from the snapshot on every call.
#[derive(Debug, Clone)]
pub struct AlertEvaluator {
    policy: EmergencyPolicy,
    emergency_latched: bool,
}

impl AlertEvaluator {
    /// Evaluator with the given emergency policy
    pub fn new(policy: EmergencyPolicy) -> Self {
        Self {
            policy,
            emergency_latched: false,
        }
    }

    /// Configured emergency policy
    pub fn policy(&self) -> EmergencyPolicy {
        self.policy
    }

    /// Re-derive every alert flag in the snapshot from its current
    /// measurement fields
    pub fn evaluate(&mut self, snap: &mut Snapshot, now: Timestamp) {
        snap.heat_stress = snap.body_temp_c > BODY_TEMP_HIGH_C
            || snap.heart_rate > HR_HIGH_BPM
            || snap.ambient_temp_c > AMBIENT_WARNING_C;

        snap.critical_vitals = snap.body_temp_c > BODY_TEMP_CRITICAL_C
            || snap.heart_rate > HR_CRITICAL_BPM
            || snap.spo2 < SPO2_CRITICAL_PCT
            || snap.ambient_temp_c > AMBIENT_CRITICAL_C;

        snap.co_warning = snap.co_ppm > CO_WARNING_PPM;
        let co_critical = snap.co_ppm > CO_CRITICAL_PPM;
        if snap.co_ppm > CO_DANGER_PPM && !co_critical {
            log_warn!("CO at {} ppm, above the danger rung", snap.co_ppm);
        }

        snap.smoke_detected = snap.ambient_temp_c > AMBIENT_WARNING_C;

        if snap.accel_magnitude_g >= MOTION_THRESHOLD_G {
            snap.last_motion_at = now;
        }
        snap.motionless_alert = now.saturating_sub(snap.last_motion_at) > MOTIONLESS_WINDOW_MS;

        let triggers = snap.critical_vitals
            || snap.fall_detected
            || snap.impact_detected
            || snap.motionless_alert
            || co_critical;

        snap.emergency_status = match self.policy {
            EmergencyPolicy::Recompute => triggers,
            EmergencyPolicy::Latched => {
                self.emergency_latched |= triggers;
                self.emergency_latched
            }
        };
    }

    /// Release a latched emergency; the next tick re-derives from scratch
    pub fn clear_emergency(&mut self) {
        self.emergency_latched = false;
    }
}

impl Default for AlertEvaluator {
    fn default() -> Self {
        Self::new(EmergencyPolicy::default())
    }
}

/// Edge reported by one alert-session update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEdge {
    /// No transition this tick
    None,
    /// Alert session just became active
    Started,
    /// Alert session just ended
    Ended,
}

/// Edge-triggered alert-session tracker
///
/// Active while any of fall, heat stress, or CO warning is true.
/// Transitions, not steady state, drive one-shot side effects; the
/// steady active state drives the continuous indicator pattern.
#[derive(Debug, Clone, Default)]
pub struct AlertSession {
    active: bool,
}

impl AlertSession {
    /// Session starting inactive
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an alert session is currently active
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Fold this tick's flags into the session state; returns the edge
    /// if one occurred
    pub fn update(&mut self, snap: &mut Snapshot) -> SessionEdge {
        let any = snap.fall_detected || snap.heat_stress || snap.co_warning;
        let edge = match (self.active, any) {
            (false, true) => {
                log_info!("alert session started");
                SessionEdge::Started
            }
            (true, false) => {
                log_info!("alert session ended");
                SessionEdge::Ended
            }
            _ => SessionEdge::None,
        };
        self.active = any;
        snap.alert_active = any;
        edge
    }
}
