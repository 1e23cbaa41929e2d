//! Infrared Thermometer Driver
//!
//! Non-contact thermopile in the MLX90614 family with two measurement
//! channels: the object channel aimed at the wearer's forehead (body
//! temperature) and the die's own ambient channel (temperature inside
//! the helmet shell).
//!
//! The device reports linearized absolute temperature in units of
//! 0.02 K. Conversion to Celsius is `raw * 0.02 - 273.15`. A set MSB
//! high bit is the device's own error flag and fails the read.
//!
//! Out-of-range channels are replaced with per-channel defaults rather
//! than failing the sample: a saturated ambient channel must not take
//! the body channel down with it.

use crate::constants::environment::{AMBIENT_TEMP_DEFAULT_C, AMBIENT_TEMP_MAX_C, AMBIENT_TEMP_MIN_C};
use crate::constants::vitals::{BODY_TEMP_DEFAULT_C, BODY_TEMP_MAX_C, BODY_TEMP_MIN_C};
use crate::errors::{SensorError, SensorResult};
use crate::sensors::{SensorBus, SensorDriver, SensorKind, SensorSample, ThermalReading};
use crate::time::Timestamp;

/// 7-bit bus address of the thermometer
pub const ADDR: u8 = 0x5a;

/// RAM cell: ambient (die) temperature
pub const RAM_AMBIENT: u8 = 0x06;
/// RAM cell: object (forehead) temperature
pub const RAM_OBJECT: u8 = 0x07;

/// MSB high bit flags a measurement error on the device side
const ERROR_FLAG: u16 = 0x8000;

/// Convert a raw 0.02 K/LSB register value to Celsius
pub fn kelvin_raw_to_celsius(raw: u16) -> f32 {
    raw as f32 * 0.02 - 273.15
}

/// Clamp-or-default for the body channel
fn validate_body(celsius: f32) -> f32 {
    if (BODY_TEMP_MIN_C..=BODY_TEMP_MAX_C).contains(&celsius) {
        celsius
    } else {
        log_warn!("body temperature {} C out of range, using default", celsius);
        BODY_TEMP_DEFAULT_C
    }
}

/// Clamp-or-default for the ambient channel
fn validate_ambient(celsius: f32) -> f32 {
    if (AMBIENT_TEMP_MIN_C..=AMBIENT_TEMP_MAX_C).contains(&celsius) {
        celsius
    } else {
        log_warn!("ambient temperature {} C out of range, using default", celsius);
        AMBIENT_TEMP_DEFAULT_C
    }
}

/// MLX90614-style infrared thermometer driver
pub struct IrThermometer<B: SensorBus> {
    bus: B,
}

impl<B: SensorBus> IrThermometer<B> {
    /// Create a driver over the given bus
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Access the underlying bus (primarily for scripted buses in tests)
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    fn read_channel(&mut self, ram: u8) -> SensorResult<u16> {
        // LSB, MSB, PEC; the PEC byte is not checked
        let mut frame = [0u8; 3];
        self.bus.read_reg(ADDR, ram, &mut frame)?;

        let raw = frame[0] as u16 | (frame[1] as u16) << 8;
        if raw & ERROR_FLAG != 0 {
            return Err(SensorError::InvalidFrame);
        }
        Ok(raw)
    }
}

impl<B: SensorBus> SensorDriver for IrThermometer<B> {
    fn kind(&self) -> SensorKind {
        SensorKind::Thermal
    }

    fn probe(&mut self) -> bool {
        self.bus.probe(ADDR)
    }

    fn sample(&mut self, _now: Timestamp) -> SensorResult<SensorSample> {
        let ambient_raw = self.read_channel(RAM_AMBIENT)?;
        let object_raw = self.read_channel(RAM_OBJECT)?;

        let body_c = validate_body(kelvin_raw_to_celsius(object_raw));
        let ambient_c = validate_ambient(kelvin_raw_to_celsius(ambient_raw));

        Ok(SensorSample::Thermal(ThermalReading { body_c, ambient_c }))
    }

    fn reset(&mut self) -> SensorResult<()> {
        // No soft-reset command; presence is re-established by probe
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::sim::ScriptedBus;

    /// Little-endian raw frame for a Celsius temperature, PEC zeroed
    fn frame_for(celsius: f32) -> [u8; 3] {
        let raw = ((celsius + 273.15) / 0.02) as u16;
        [raw as u8, (raw >> 8) as u8, 0x00]
    }

    #[test]
    fn raw_conversion_matches_scale() {
        // 0x3AF7 = 15095 -> 301.90 K -> 28.75 C
        let c = kelvin_raw_to_celsius(0x3af7);
        assert!((c - 28.75).abs() < 0.01);
    }

    #[test]
    fn sample_reads_both_channels() {
        let mut bus = ScriptedBus::new(0x5a);
        bus.queue_frame(RAM_AMBIENT, &frame_for(25.0));
        bus.queue_frame(RAM_OBJECT, &frame_for(37.0));

        let mut thermometer = IrThermometer::new(bus);
        let sample = thermometer.sample(0).unwrap();

        match sample {
            SensorSample::Thermal(t) => {
                assert!((t.body_c - 37.0).abs() < 0.05);
                assert!((t.ambient_c - 25.0).abs() < 0.05);
            }
            other => panic!("expected thermal, got {:?}", other),
        }
    }

    #[test]
    fn error_flag_fails_the_read() {
        let mut bus = ScriptedBus::new(0x5a);
        bus.queue_frame(RAM_AMBIENT, &[0x00, 0x80, 0x00]);

        let mut thermometer = IrThermometer::new(bus);
        assert_eq!(thermometer.sample(0), Err(SensorError::InvalidFrame));
    }

    #[test]
    fn out_of_range_body_falls_back_to_default() {
        let mut bus = ScriptedBus::new(0x5a);
        bus.queue_frame(RAM_AMBIENT, &frame_for(25.0));
        // 80 C forehead reading: physically impossible, sensor misaimed
        bus.queue_frame(RAM_OBJECT, &frame_for(80.0));

        let mut thermometer = IrThermometer::new(bus);
        match thermometer.sample(0).unwrap() {
            SensorSample::Thermal(t) => {
                assert_eq!(t.body_c, BODY_TEMP_DEFAULT_C);
                assert!((t.ambient_c - 25.0).abs() < 0.05);
            }
            other => panic!("expected thermal, got {:?}", other),
        }
    }

    #[test]
    fn hot_ambient_passes_validation() {
        let mut bus = ScriptedBus::new(0x5a);
        bus.queue_frame(RAM_AMBIENT, &frame_for(62.0));
        bus.queue_frame(RAM_OBJECT, &frame_for(37.5));

        let mut thermometer = IrThermometer::new(bus);
        match thermometer.sample(0).unwrap() {
            SensorSample::Thermal(t) => {
                assert!((t.ambient_c - 62.0).abs() < 0.05);
            }
            other => panic!("expected thermal, got {:?}", other),
        }
    }
}
