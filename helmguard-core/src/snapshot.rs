//! Helmet State Snapshot
//!
//! Single flat record holding the latest value from every sensor
//! channel plus the derived alert flags and supervision counters. One
//! instance lives for the whole session: sensor ticks overwrite the
//! measurement fields, the alert evaluator overwrites the flag fields,
//! and the health tick overwrites the supervision fields.
//!
//! A failed sensor read leaves its fields untouched, so the snapshot
//! always carries the last good value for every channel.

use crate::constants::environment::AMBIENT_TEMP_DEFAULT_C;
use crate::constants::vitals::{BODY_TEMP_DEFAULT_C, SPO2_WEAK_SIGNAL_PCT};
use crate::sensors::SensorSample;
use crate::time::Timestamp;

/// Latest helmet state: measurements, alert flags, supervision counters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Snapshot {
    /// Heart rate in BPM (0 until the first beat window completes)
    pub heart_rate: f32,
    /// Blood oxygen saturation in percent
    pub spo2: f32,
    /// Body (forehead) temperature in Celsius
    pub body_temp_c: f32,
    /// Ambient temperature inside the helmet shell in Celsius
    pub ambient_temp_c: f32,

    /// Carbon monoxide concentration in ppm
    pub co_ppm: f32,
    /// Ambient heat consistent with smoke or active fire
    pub smoke_detected: bool,

    /// Acceleration per axis in g
    pub accel_g: [f32; 3],
    /// Angular rate per axis in degrees per second
    pub gyro_dps: [f32; 3],
    /// Euclidean norm of the acceleration vector in g
    pub accel_magnitude_g: f32,
    /// Acceleration exceeded the fall threshold this sample
    pub fall_detected: bool,
    /// Acceleration exceeded the impact threshold this sample
    pub impact_detected: bool,
    /// No motion above the activity floor for the full window
    pub motionless_alert: bool,
    /// Last instant the acceleration magnitude cleared the activity floor
    pub last_motion_at: Timestamp,

    /// Elevated strain: body temperature, heart rate, or ambient heat
    pub heat_stress: bool,
    /// CO concentration above the exposure limit
    pub co_warning: bool,
    /// A vital sign crossed a life-threatening threshold
    pub critical_vitals: bool,
    /// Any mayday-class condition is in effect
    pub emergency_status: bool,
    /// Any alert condition is currently active
    pub alert_active: bool,

    /// Supervision fault (watchdog or memory floor)
    pub system_error: bool,
    /// At least one sensor failed its last health probe
    pub sensor_error: bool,
    /// Uplink reachable at the last health check
    pub wifi_connected: bool,
    /// Free heap reported at the last health check, in bytes
    pub free_heap_bytes: u32,

    /// Instant the measurement fields were last refreshed
    pub sampled_at: Timestamp,
    /// Whole seconds since boot
    pub session_secs: u32,
    /// Sampling ticks completed since boot
    pub packet_count: u32,

    /// Boot instant; origin for session time
    pub boot_at: Timestamp,
}

impl Snapshot {
    /// Snapshot at boot: defaults everywhere, no alerts, no motion history
    pub fn new(boot: Timestamp) -> Self {
        Self {
            heart_rate: 0.0,
            spo2: SPO2_WEAK_SIGNAL_PCT,
            body_temp_c: BODY_TEMP_DEFAULT_C,
            ambient_temp_c: AMBIENT_TEMP_DEFAULT_C,
            co_ppm: 0.0,
            smoke_detected: false,
            accel_g: [0.0; 3],
            gyro_dps: [0.0; 3],
            accel_magnitude_g: 0.0,
            fall_detected: false,
            impact_detected: false,
            motionless_alert: false,
            last_motion_at: boot,
            heat_stress: false,
            co_warning: false,
            critical_vitals: false,
            emergency_status: false,
            alert_active: false,
            system_error: false,
            sensor_error: false,
            wifi_connected: false,
            free_heap_bytes: 0,
            sampled_at: boot,
            session_secs: 0,
            packet_count: 0,
            boot_at: boot,
        }
    }

    /// Overwrite the measurement fields a sample carries; all others keep
    /// their current value
    pub fn ingest(&mut self, sample: SensorSample) {
        match sample {
            SensorSample::Vitals(v) => {
                self.heart_rate = v.heart_rate;
                self.spo2 = v.spo2;
            }
            SensorSample::Thermal(t) => {
                self.body_temp_c = t.body_c;
                self.ambient_temp_c = t.ambient_c;
            }
            SensorSample::Motion(m) => {
                self.accel_g = m.accel_g;
                self.gyro_dps = m.gyro_dps;
                self.accel_magnitude_g = m.magnitude_g;
                self.fall_detected = m.fall;
                self.impact_detected = m.impact;
            }
            SensorSample::Gas(g) => {
                self.co_ppm = g.co_ppm;
            }
        }
    }

    /// Close out one sampling tick: stamp it and advance the counters
    pub fn mark_sampled(&mut self, now: Timestamp) {
        self.sampled_at = now;
        self.session_secs = (now.saturating_sub(self.boot_at) / 1000) as u32;
        self.packet_count = self.packet_count.saturating_add(1);
    }
}
