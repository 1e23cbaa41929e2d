//! Collector Wire Record
//!
//! Flat JSON structure the collector ingests, one per transmission.
//! Field names are the collector's contract and must not drift; the
//! serialized keys below are exactly what the ingestion endpoint and
//! the dashboard queries expect.
//!
//! Wall-clock `date_time` is stamped at send, not at sample; the
//! monotonic `timestamp` field carries the sample instant. The two
//! serve different readers: the dashboard sorts on calendar time, the
//! device-side diagnostics correlate on milliseconds since boot.

use chrono::{DateTime, Utc};
use helmguard_core::Snapshot;
use serde::Serialize;

/// One flat telemetry record as the collector ingests it
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryRecord {
    /// Device identifier the collector keys records by
    pub device_id: String,
    /// Shared-secret credential, compared by exact match server-side
    pub api_key: String,
    /// Sample instant, milliseconds since device boot
    pub timestamp: u64,
    /// Wall-clock send time, `YYYY-MM-DD HH:MM:SS` UTC
    pub date_time: String,

    /// Heart rate in BPM
    pub heart_rate: f32,
    /// Blood oxygen saturation in percent
    pub spo2: f32,
    /// Body temperature in Celsius
    pub body_temperature: f32,
    /// In-helmet ambient temperature in Celsius
    pub ambient_temperature: f32,
    /// Carbon monoxide concentration in ppm
    pub co_level: f32,
    /// Ambient heat consistent with smoke or active fire
    pub smoke_detected: bool,

    /// Acceleration X axis in g
    pub accel_x: f32,
    /// Acceleration Y axis in g
    pub accel_y: f32,
    /// Acceleration Z axis in g
    pub accel_z: f32,
    /// Angular rate X axis in degrees per second
    pub gyro_x: f32,
    /// Angular rate Y axis in degrees per second
    pub gyro_y: f32,
    /// Angular rate Z axis in degrees per second
    pub gyro_z: f32,

    /// Fall classification
    pub fall_detected: bool,
    /// Impact classification
    pub impact_detected: bool,
    /// Motionless window elapsed
    pub motionless_alert: bool,
    /// Heat stress flag
    pub heat_stress: bool,
    /// CO exposure flag
    pub co_warning: bool,
    /// Critical vitals flag
    pub critical_vitals: bool,
    /// Emergency escalation flag
    pub emergency_status: bool,
    /// Alert session currently active
    pub alert_active: bool,

    /// Supervision fault flag
    pub system_error: bool,
    /// Sensor presence fault flag
    pub sensor_error: bool,
    /// Session elapsed time in whole seconds
    pub session_time: u32,
    /// Sampling ticks completed since boot
    pub data_packet_count: u32,
    /// Uplink reachable at the last health check
    pub wifi_connected: bool,
    /// Free heap in bytes at the last health check
    pub free_heap: u32,

    /// Present and true only on priority transmissions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency: Option<bool>,
}

impl TelemetryRecord {
    /// Flatten a snapshot into the collector's record layout
    pub fn from_snapshot(
        device_id: &str,
        api_key: &str,
        snapshot: &Snapshot,
        emergency: bool,
        sent_at: DateTime<Utc>,
    ) -> Self {
        Self {
            device_id: device_id.to_owned(),
            api_key: api_key.to_owned(),
            timestamp: snapshot.sampled_at,
            date_time: sent_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            heart_rate: snapshot.heart_rate,
            spo2: snapshot.spo2,
            body_temperature: snapshot.body_temp_c,
            ambient_temperature: snapshot.ambient_temp_c,
            co_level: snapshot.co_ppm,
            smoke_detected: snapshot.smoke_detected,
            accel_x: snapshot.accel_g[0],
            accel_y: snapshot.accel_g[1],
            accel_z: snapshot.accel_g[2],
            gyro_x: snapshot.gyro_dps[0],
            gyro_y: snapshot.gyro_dps[1],
            gyro_z: snapshot.gyro_dps[2],
            fall_detected: snapshot.fall_detected,
            impact_detected: snapshot.impact_detected,
            motionless_alert: snapshot.motionless_alert,
            heat_stress: snapshot.heat_stress,
            co_warning: snapshot.co_warning,
            critical_vitals: snapshot.critical_vitals,
            emergency_status: snapshot.emergency_status,
            alert_active: snapshot.alert_active,
            system_error: snapshot.system_error,
            sensor_error: snapshot.sensor_error,
            session_time: snapshot.session_secs,
            data_packet_count: snapshot.packet_count,
            wifi_connected: snapshot.wifi_connected,
            free_heap: snapshot.free_heap_bytes,
            emergency: emergency.then_some(true),
        }
    }
}
