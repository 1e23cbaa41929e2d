//! Common test rig for control loop integration tests
//!
//! This module provides:
//! - A shareable clock wrapper so tests can advance time while the
//!   loop owns its time source
//! - A scripted sensor driver whose readings tests mutate mid-run
//! - A recording uplink and a settable heap probe
//!
//! Everything here drives the loop through its public seams only.

#![allow(dead_code)]

use core::cell::RefCell;
use std::rc::Rc;

use helmguard_core::constants::motion::{FALL_THRESHOLD_G, IMPACT_THRESHOLD_G};
use helmguard_core::errors::{SensorError, SensorResult};
use helmguard_core::sensors::{
    GasReading, MotionReading, SensorDriver, SensorKind, SensorSample, ThermalReading,
    VitalsReading,
};
use helmguard_core::{
    HeapMonitor, IndicatorSink, MockTimeSource, ReportSink, Snapshot, TimeSource, Timestamp,
};

/// Clock handle the loop owns while the test keeps the `RefCell`
pub struct SharedClock<'a> {
    pub inner: &'a RefCell<MockTimeSource>,
}

impl TimeSource for SharedClock<'_> {
    fn now(&self) -> Timestamp {
        self.inner.borrow().now()
    }

    fn is_wall_clock(&self) -> bool {
        false
    }

    fn precision_ms(&self) -> u32 {
        1
    }
}

/// Heap probe reading from a cell the test mutates
pub struct SharedHeap<'a> {
    pub free: &'a RefCell<u32>,
}

impl HeapMonitor for SharedHeap<'_> {
    fn free_bytes(&mut self) -> u32 {
        *self.free.borrow()
    }
}

/// Uplink that records every accepted report
pub struct RecordingSink {
    /// Accepted reports as (snapshot copy, emergency flag)
    pub sent: Vec<(Snapshot, bool)>,
    /// When set, every send fails and nothing is recorded
    pub fail_all: bool,
    /// What `is_connected` reports
    pub connected: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            sent: Vec::new(),
            fail_all: false,
            connected: true,
        }
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportSink for RecordingSink {
    type Error = &'static str;

    fn send(&mut self, snapshot: &Snapshot, emergency: bool) -> Result<(), Self::Error> {
        if self.fail_all {
            return Err("collector unreachable");
        }
        self.sent.push((*snapshot, emergency));
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

/// Indicator sink that discards everything
pub struct NullPins;

impl IndicatorSink for NullPins {
    fn set_led(&mut self, _on: bool) {}
    fn set_buzzer(&mut self, _on: bool) {}
}

/// Mutable half of a [`ScriptedDriver`], kept by the test
pub struct DriverState {
    pub sample: SensorSample,
    pub present: bool,
    pub fail_reads: bool,
}

/// Driver whose readings live behind a handle the test can mutate
/// while the loop owns the driver itself
pub struct ScriptedDriver {
    kind: SensorKind,
    state: Rc<RefCell<DriverState>>,
}

impl SensorDriver for ScriptedDriver {
    fn kind(&self) -> SensorKind {
        self.kind
    }

    fn probe(&mut self) -> bool {
        self.state.borrow().present
    }

    fn sample(&mut self, _now: Timestamp) -> SensorResult<SensorSample> {
        let state = self.state.borrow();
        if state.fail_reads {
            return Err(SensorError::BusTimeout { addr: 0 });
        }
        Ok(state.sample)
    }

    fn reset(&mut self) -> SensorResult<()> {
        Ok(())
    }
}

/// Scripted driver of any kind around an initial sample
pub fn scripted(kind: SensorKind, sample: SensorSample) -> (ScriptedDriver, Rc<RefCell<DriverState>>) {
    let state = Rc::new(RefCell::new(DriverState {
        sample,
        present: true,
        fail_reads: false,
    }));
    (
        ScriptedDriver {
            kind,
            state: Rc::clone(&state),
        },
        state,
    )
}

/// Scripted pulse oximeter seeded with calm vitals
pub fn vitals_driver(
    heart_rate: f32,
    spo2: f32,
) -> (ScriptedDriver, Rc<RefCell<DriverState>>) {
    scripted(
        SensorKind::Optical,
        SensorSample::Vitals(VitalsReading { heart_rate, spo2 }),
    )
}

/// Scripted thermometer
pub fn thermal_driver(
    body_c: f32,
    ambient_c: f32,
) -> (ScriptedDriver, Rc<RefCell<DriverState>>) {
    scripted(
        SensorKind::Thermal,
        SensorSample::Thermal(ThermalReading { body_c, ambient_c }),
    )
}

/// Scripted IMU; fall/impact classification follows the magnitude
pub fn motion_driver(magnitude_g: f32) -> (ScriptedDriver, Rc<RefCell<DriverState>>) {
    scripted(SensorKind::Inertial, motion_sample(magnitude_g))
}

/// Scripted gas cell
pub fn gas_driver(co_ppm: f32) -> (ScriptedDriver, Rc<RefCell<DriverState>>) {
    scripted(SensorKind::Gas, SensorSample::Gas(GasReading { co_ppm }))
}

/// Motion sample along the Z axis with the classification a real IMU
/// driver would attach to this magnitude
pub fn motion_sample(magnitude_g: f32) -> SensorSample {
    SensorSample::Motion(MotionReading {
        accel_g: [0.0, 0.0, magnitude_g],
        gyro_dps: [0.0; 3],
        magnitude_g,
        fall: magnitude_g > FALL_THRESHOLD_G,
        impact: magnitude_g > IMPACT_THRESHOLD_G,
    })
}
