//! Inertial Measurement Unit Driver
//!
//! Six-axis accelerometer + gyroscope in the MPU-6050 family, used for
//! fall and impact detection. The driver converts raw big-endian
//! two's-complement axis words to engineering units and classifies the
//! acceleration magnitude per sample:
//!
//! - fall: magnitude above the free-fall-then-landing threshold
//! - impact: magnitude above the blunt-strike threshold
//!
//! Classification is per-sample and stateless. Inter-sample state
//! (the motionless window) lives in the alert evaluator, which sees
//! the magnitude on every tick.

use crate::constants::motion::{
    ACCEL_LSB_PER_G, FALL_THRESHOLD_G, GYRO_LSB_PER_DPS, IMPACT_THRESHOLD_G,
};
use crate::errors::SensorResult;
use crate::sensors::{MotionReading, SensorBus, SensorDriver, SensorKind, SensorSample};
use crate::time::Timestamp;

/// 7-bit bus address of the IMU (AD0 low)
pub const ADDR: u8 = 0x68;

/// Power management register
const REG_PWR_MGMT_1: u8 = 0x6b;
/// Gyroscope full-scale configuration
const REG_GYRO_CONFIG: u8 = 0x1b;
/// Accelerometer full-scale configuration
const REG_ACCEL_CONFIG: u8 = 0x1c;
/// First accelerometer output register (X high byte)
pub const REG_ACCEL_XOUT_H: u8 = 0x3b;
/// First gyroscope output register (X high byte)
pub const REG_GYRO_XOUT_H: u8 = 0x43;

/// Device reset bit in PWR_MGMT_1
const PWR_RESET: u8 = 0x80;
/// Clear sleep, internal oscillator
const PWR_WAKE: u8 = 0x00;
/// AFS_SEL = 2: +/-8g full scale
const ACCEL_FS_8G: u8 = 0x10;
/// FS_SEL = 1: +/-500 deg/s full scale
const GYRO_FS_500DPS: u8 = 0x08;

/// Decode three big-endian i16 axis words from a 6-byte burst
fn decode_axes(frame: &[u8; 6]) -> [i16; 3] {
    [
        i16::from_be_bytes([frame[0], frame[1]]),
        i16::from_be_bytes([frame[2], frame[3]]),
        i16::from_be_bytes([frame[4], frame[5]]),
    ]
}

/// Euclidean norm of a 3-axis acceleration vector
pub fn magnitude(accel_g: [f32; 3]) -> f32 {
    libm::sqrtf(
        accel_g[0] * accel_g[0] + accel_g[1] * accel_g[1] + accel_g[2] * accel_g[2],
    )
}

/// MPU-6050-style six-axis IMU driver
pub struct Imu<B: SensorBus> {
    bus: B,
}

impl<B: SensorBus> Imu<B> {
    /// Create a driver over the given bus; call `reset` to configure
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Access the underlying bus (primarily for scripted buses in tests)
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }
}

impl<B: SensorBus> SensorDriver for Imu<B> {
    fn kind(&self) -> SensorKind {
        SensorKind::Inertial
    }

    fn probe(&mut self) -> bool {
        self.bus.probe(ADDR)
    }

    fn sample(&mut self, _now: Timestamp) -> SensorResult<SensorSample> {
        let mut accel_frame = [0u8; 6];
        self.bus.read_reg(ADDR, REG_ACCEL_XOUT_H, &mut accel_frame)?;
        let mut gyro_frame = [0u8; 6];
        self.bus.read_reg(ADDR, REG_GYRO_XOUT_H, &mut gyro_frame)?;

        let accel_raw = decode_axes(&accel_frame);
        let gyro_raw = decode_axes(&gyro_frame);

        let accel_g = [
            accel_raw[0] as f32 / ACCEL_LSB_PER_G,
            accel_raw[1] as f32 / ACCEL_LSB_PER_G,
            accel_raw[2] as f32 / ACCEL_LSB_PER_G,
        ];
        let gyro_dps = [
            gyro_raw[0] as f32 / GYRO_LSB_PER_DPS,
            gyro_raw[1] as f32 / GYRO_LSB_PER_DPS,
            gyro_raw[2] as f32 / GYRO_LSB_PER_DPS,
        ];

        let magnitude_g = magnitude(accel_g);

        Ok(SensorSample::Motion(MotionReading {
            accel_g,
            gyro_dps,
            magnitude_g,
            fall: magnitude_g > FALL_THRESHOLD_G,
            impact: magnitude_g > IMPACT_THRESHOLD_G,
        }))
    }

    fn reset(&mut self) -> SensorResult<()> {
        self.bus.write_reg(ADDR, REG_PWR_MGMT_1, PWR_RESET)?;
        self.bus.write_reg(ADDR, REG_PWR_MGMT_1, PWR_WAKE)?;
        self.bus.write_reg(ADDR, REG_ACCEL_CONFIG, ACCEL_FS_8G)?;
        self.bus.write_reg(ADDR, REG_GYRO_CONFIG, GYRO_FS_500DPS)?;
        Ok(())
    }
}
