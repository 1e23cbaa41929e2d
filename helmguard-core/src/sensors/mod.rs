//! Sensor Drivers and Bus Abstractions
//!
//! ## Overview
//!
//! Four sensor kinds feed the helmet loop:
//!
//! - **Optical** ([`optical::PulseOximeter`]): two-channel pulse oximetry,
//!   heart rate from a rising-edge beat detector, SpO2 from the channel ratio.
//! - **Thermal** ([`thermal::IrThermometer`]): infrared body and ambient
//!   temperature from a two-register radiometer.
//! - **Inertial** ([`inertial::Imu`]): 3-axis acceleration and angular rate,
//!   fall/impact classification from the acceleration norm.
//! - **Gas** ([`gas::GasCell`]): analog CO concentration through a fixed
//!   linear cell model.
//!
//! ## Capability Set
//!
//! Every driver exposes the same three capabilities through
//! [`SensorDriver`]:
//!
//! - `probe`: is the device answering on the bus right now
//! - `sample`: one acquisition, raw frame to physical units
//! - `reset`: put the device back into its configured state
//!
//! The loop never talks to hardware directly. Drivers sit on narrow bus
//! traits ([`SensorBus`] for register devices, [`AnalogInput`] for the ADC
//! channel), and the [`sim`] module provides scripted implementations of
//! both so the whole sampling path runs on a desk or in a test.
//!
//! ## Failure Policy
//!
//! `sample` errors are not fatal: the loop keeps the previous snapshot
//! values for that sensor and moves on. Persistent absence shows up at the
//! next health check through `probe`.

use crate::errors::SensorResult;
use crate::time::Timestamp;

pub mod gas;
pub mod inertial;
pub mod optical;
pub mod sim;
pub mod thermal;

pub use gas::GasCell;
pub use inertial::Imu;
pub use optical::PulseOximeter;
pub use thermal::IrThermometer;

/// Sensor kind enumeration
///
/// Labels drivers in logs and health reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SensorKind {
    /// Two-channel optical pulse oximeter
    Optical = 0,
    /// Infrared thermometer (body + ambient)
    Thermal = 1,
    /// Accelerometer + gyroscope
    Inertial = 2,
    /// Analog CO cell
    Gas = 3,
}

impl SensorKind {
    /// Get human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            SensorKind::Optical => "pulse_oximeter",
            SensorKind::Thermal => "ir_thermometer",
            SensorKind::Inertial => "imu",
            SensorKind::Gas => "gas_cell",
        }
    }

    /// Get the primary unit reported by this kind
    pub const fn unit(&self) -> &'static str {
        match self {
            SensorKind::Optical => "BPM",
            SensorKind::Thermal => "°C",
            SensorKind::Inertial => "g",
            SensorKind::Gas => "ppm",
        }
    }
}

/// One acquisition from the optical front end
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VitalsReading {
    /// Published heart rate (BPM); sticky between completed beat windows
    pub heart_rate: f32,
    /// Blood oxygen estimate (%), clamped to the publishable band
    pub spo2: f32,
}

/// One acquisition from the IR thermometer
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ThermalReading {
    /// Body (object channel) temperature in °C, validated
    pub body_c: f32,
    /// Ambient channel temperature in °C, validated
    pub ambient_c: f32,
}

/// One acquisition from the inertial unit
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MotionReading {
    /// Acceleration per axis in g
    pub accel_g: [f32; 3],
    /// Angular rate per axis in °/s
    pub gyro_dps: [f32; 3],
    /// Euclidean norm of the acceleration vector in g
    pub magnitude_g: f32,
    /// Norm exceeded the fall threshold
    pub fall: bool,
    /// Norm exceeded the impact threshold
    pub impact: bool,
}

/// One acquisition from the gas cell
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GasReading {
    /// CO concentration in ppm, floored at zero
    pub co_ppm: f32,
}

/// A decoded sample from any driver
///
/// The aggregator matches on the variant to update the snapshot; drivers
/// stay object-safe behind `Box<dyn SensorDriver>` this way.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SensorSample {
    /// Heart rate and SpO2
    Vitals(VitalsReading),
    /// Body and ambient temperature
    Thermal(ThermalReading),
    /// Acceleration, rotation, and motion classification
    Motion(MotionReading),
    /// CO concentration
    Gas(GasReading),
}

/// Register-addressed sensor bus (I2C-style)
///
/// Transactions are synchronous and bounded by the bus timeout; a fault
/// surfaces as a [`SensorError`](crate::errors::SensorError), never a hang
/// the driver has to manage itself.
pub trait SensorBus {
    /// Read `buf.len()` bytes starting at `reg` from device `addr`
    fn read_reg(&mut self, addr: u8, reg: u8, buf: &mut [u8]) -> SensorResult<()>;

    /// Write a single byte to `reg` on device `addr`
    fn write_reg(&mut self, addr: u8, reg: u8, value: u8) -> SensorResult<()>;

    /// Address a device with an empty transaction; true on ACK
    fn probe(&mut self, addr: u8) -> bool;
}

/// Single-channel analog input for the gas cell
pub trait AnalogInput {
    /// Read one conversion in raw ADC counts
    fn read_counts(&mut self) -> SensorResult<u16>;
}

/// Capability set common to all sensor drivers
pub trait SensorDriver {
    /// Which kind of sensor this driver manages
    fn kind(&self) -> SensorKind;

    /// Check device presence; cheap enough to run every health check
    fn probe(&mut self) -> bool;

    /// Acquire one sample and convert it to physical units
    fn sample(&mut self, now: Timestamp) -> SensorResult<SensorSample>;

    /// Return the device to its configured state
    fn reset(&mut self) -> SensorResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_metadata() {
        assert_eq!(SensorKind::Optical.name(), "pulse_oximeter");
        assert_eq!(SensorKind::Gas.unit(), "ppm");
        assert_eq!(SensorKind::Inertial.unit(), "g");
    }
}
