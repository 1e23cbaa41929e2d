//! Electrochemical Gas Cell Driver
//!
//! Carbon monoxide cell in the MQ-7 family read through a 12-bit ADC
//! channel. The conversion chain is counts -> volts -> ppm using the
//! single-point linear calibration these modules ship with: a fixed
//! zero-bias voltage and a fixed ppm-per-volt slope.
//!
//! Concentrations are floored at zero. A cell reading below its bias
//! point is drift, not negative gas.

use crate::constants::environment::{
    CO_CELL_ZERO_VOLTS, CO_PPM_PER_VOLT, GAS_ADC_FULL_SCALE, GAS_ADC_REF_VOLTS,
};
use crate::errors::{SensorError, SensorResult};
use crate::sensors::{AnalogInput, GasReading, SensorDriver, SensorKind, SensorSample};
use crate::time::Timestamp;

/// Convert raw ADC counts to volts at the cell output
pub fn counts_to_volts(counts: u16) -> f32 {
    counts as f32 / GAS_ADC_FULL_SCALE * GAS_ADC_REF_VOLTS
}

/// Convert cell output voltage to CO concentration in ppm, floored at 0
pub fn volts_to_ppm(volts: f32) -> f32 {
    ((volts - CO_CELL_ZERO_VOLTS) * CO_PPM_PER_VOLT).max(0.0)
}

/// MQ-7-style CO cell behind a 12-bit ADC channel
pub struct GasCell<A: AnalogInput> {
    adc: A,
}

impl<A: AnalogInput> GasCell<A> {
    /// Create a driver over the given ADC channel
    pub fn new(adc: A) -> Self {
        Self { adc }
    }

    /// Access the underlying channel (primarily for scripted inputs in tests)
    pub fn adc_mut(&mut self) -> &mut A {
        &mut self.adc
    }
}

impl<A: AnalogInput> SensorDriver for GasCell<A> {
    fn kind(&self) -> SensorKind {
        SensorKind::Gas
    }

    fn probe(&mut self) -> bool {
        self.adc.read_counts().is_ok()
    }

    fn sample(&mut self, _now: Timestamp) -> SensorResult<SensorSample> {
        let counts = self.adc.read_counts()?;
        if counts as f32 > GAS_ADC_FULL_SCALE {
            return Err(SensorError::InvalidFrame);
        }

        let co_ppm = volts_to_ppm(counts_to_volts(counts));
        Ok(SensorSample::Gas(GasReading { co_ppm }))
    }

    fn reset(&mut self) -> SensorResult<()> {
        // Passive analog cell; nothing to reconfigure
        Ok(())
    }
}
