//! Integration tests for alert derivation through the control loop
//!
//! Feeds scripted sensor readings through the full loop and checks the
//! derived flags, the emergency escalation, and the divergence between
//! the two emergency policies.

#![cfg(test)]

mod common;

use core::cell::RefCell;

use helmguard_core::alerts::{AlertEvaluator, EmergencyPolicy};
use helmguard_core::constants::motion::MOTIONLESS_WINDOW_MS;
use helmguard_core::sensors::{MotionReading, SensorKind, SensorSample};
use helmguard_core::{
    HeapMonitor, HelmetLoop, IndicatorSink, LoopConfig, MockTimeSource, ReportSink, Snapshot,
    StepReport,
};

use common::{NullPins, RecordingSink, SharedClock, SharedHeap};

fn step_at<'a, S, I, M>(
    device: &mut HelmetLoop<SharedClock<'a>, S, I, M>,
    clock: &RefCell<MockTimeSource>,
    t: u64,
) -> StepReport
where
    S: ReportSink,
    I: IndicatorSink,
    M: HeapMonitor,
{
    clock.borrow_mut().set(t);
    device.step().unwrap()
}

#[test]
fn critical_co_raises_warning_and_emergency_in_one_tick() {
    let clock = RefCell::new(MockTimeSource::new(0));
    let heap = RefCell::new(200_000u32);

    let (vitals, _) = common::vitals_driver(80.0, 97.0);
    let (thermal, _) = common::thermal_driver(37.0, 25.0);
    let (motion, _) = common::motion_driver(1.2);
    let (gas, _) = common::gas_driver(450.0);

    let mut device = HelmetLoop::new(
        LoopConfig::default(),
        SharedClock { inner: &clock },
        RecordingSink::new(),
        NullPins,
        SharedHeap { free: &heap },
    )
    .add_driver(vitals)
    .add_driver(thermal)
    .add_driver(motion)
    .add_driver(gas);

    let report = step_at(&mut device, &clock, 0);
    assert!(report.sampled);

    let snap = device.snapshot();
    assert!(snap.co_warning);
    assert!(snap.emergency_status);
    assert!(!snap.critical_vitals);
    assert!(!snap.fall_detected);
}

#[test]
fn hot_body_with_calm_heart_is_critical_and_heat_stressed() {
    let clock = RefCell::new(MockTimeSource::new(0));
    let heap = RefCell::new(200_000u32);

    let (vitals, _) = common::vitals_driver(90.0, 97.0);
    let (thermal, _) = common::thermal_driver(41.0, 25.0);
    let (motion, _) = common::motion_driver(1.2);
    let (gas, _) = common::gas_driver(0.0);

    let mut device = HelmetLoop::new(
        LoopConfig::default(),
        SharedClock { inner: &clock },
        RecordingSink::new(),
        NullPins,
        SharedHeap { free: &heap },
    )
    .add_driver(vitals)
    .add_driver(thermal)
    .add_driver(motion)
    .add_driver(gas);

    step_at(&mut device, &clock, 0);

    let snap = device.snapshot();
    assert!(snap.critical_vitals);
    assert!(snap.heat_stress);
    assert!(snap.emergency_status);
    assert!(!snap.co_warning);
}

#[test]
fn near_zero_motion_for_the_full_window_raises_motionless_emergency() {
    let clock = RefCell::new(MockTimeSource::new(0));
    let heap = RefCell::new(200_000u32);

    let (vitals, _) = common::vitals_driver(80.0, 97.0);
    let (thermal, _) = common::thermal_driver(37.0, 25.0);
    let (gas, _) = common::gas_driver(0.0);
    // The wearer is down: a few hundredths of a g on each axis
    let magnitude = (3.0f32 * 0.01 * 0.01).sqrt();
    let (motion, _) = common::scripted(
        SensorKind::Inertial,
        SensorSample::Motion(MotionReading {
            accel_g: [0.01, 0.01, 0.01],
            gyro_dps: [0.0; 3],
            magnitude_g: magnitude,
            fall: false,
            impact: false,
        }),
    );

    let mut device = HelmetLoop::new(
        LoopConfig::default(),
        SharedClock { inner: &clock },
        RecordingSink::new(),
        NullPins,
        SharedHeap { free: &heap },
    )
    .add_driver(vitals)
    .add_driver(thermal)
    .add_driver(motion)
    .add_driver(gas);

    // One sampling tick per second up to the window boundary
    let window_ticks = MOTIONLESS_WINDOW_MS / 1_000;
    for tick in 0..=window_ticks {
        step_at(&mut device, &clock, tick * 1_000);
    }
    assert!(!device.snapshot().motionless_alert);
    assert!(!device.snapshot().emergency_status);

    // One tick past the window
    step_at(&mut device, &clock, (window_ticks + 1) * 1_000);
    assert!(device.snapshot().motionless_alert);
    assert!(device.snapshot().emergency_status);
}

#[test]
fn single_active_tick_rearms_the_motionless_window() {
    let clock = RefCell::new(MockTimeSource::new(0));
    let heap = RefCell::new(200_000u32);

    let (motion, motion_state) = common::motion_driver(0.02);

    let mut device = HelmetLoop::new(
        LoopConfig::default(),
        SharedClock { inner: &clock },
        RecordingSink::new(),
        NullPins,
        SharedHeap { free: &heap },
    )
    .add_driver(motion);

    // Still for one tick less than the window
    let window_ticks = MOTIONLESS_WINDOW_MS / 1_000;
    for tick in 0..window_ticks {
        step_at(&mut device, &clock, tick * 1_000);
    }
    assert!(!device.snapshot().motionless_alert);

    // One burst of activity rearms the window
    motion_state.borrow_mut().sample = common::motion_sample(1.4);
    step_at(&mut device, &clock, window_ticks * 1_000);
    assert!(!device.snapshot().motionless_alert);

    // Still again: the old window does not carry over
    motion_state.borrow_mut().sample = common::motion_sample(0.02);
    step_at(&mut device, &clock, (window_ticks + 1) * 1_000);
    assert!(!device.snapshot().motionless_alert);
    assert!(!device.snapshot().emergency_status);
}

#[test]
fn emergency_is_exactly_the_or_of_its_five_triggers() {
    for mask in 0u32..32 {
        let critical = mask & 1 != 0;
        let fall = mask & 2 != 0;
        let impact = mask & 4 != 0;
        let still = mask & 8 != 0;
        let co_critical = mask & 16 != 0;

        let mut snap = Snapshot::new(0);
        snap.heart_rate = 80.0;
        snap.spo2 = if critical { 85.0 } else { 97.0 };
        snap.body_temp_c = 37.0;
        snap.ambient_temp_c = 25.0;
        snap.fall_detected = fall;
        snap.impact_detected = impact;
        snap.accel_magnitude_g = if still { 1.0 } else { 1.3 };
        snap.co_ppm = if co_critical { 450.0 } else { 0.0 };

        // last_motion_at is the boot instant, so stillness has already
        // outlasted the window at this tick
        let now = MOTIONLESS_WINDOW_MS + 1_000;
        let mut eval = AlertEvaluator::default();
        eval.evaluate(&mut snap, now);

        assert_eq!(snap.critical_vitals, critical, "mask {:05b}", mask);
        assert_eq!(snap.motionless_alert, still, "mask {:05b}", mask);
        assert_eq!(
            snap.emergency_status,
            critical || fall || impact || still || co_critical,
            "mask {:05b}",
            mask
        );
    }
}

#[test]
fn thresholds_are_strict_inequalities() {
    let mut snap = Snapshot::new(0);
    snap.heart_rate = 120.0;
    snap.spo2 = 90.0;
    snap.body_temp_c = 38.5;
    snap.ambient_temp_c = 50.0;
    snap.co_ppm = 50.0;
    snap.accel_magnitude_g = 1.2;

    let mut eval = AlertEvaluator::default();
    eval.evaluate(&mut snap, 1_000);

    // Sitting exactly on every threshold raises nothing
    assert!(!snap.heat_stress);
    assert!(!snap.critical_vitals);
    assert!(!snap.co_warning);
    assert!(!snap.smoke_detected);
    assert!(!snap.emergency_status);
}

#[test]
fn emergency_policies_diverge_after_triggers_clear() {
    let stimulus = |eval: &mut AlertEvaluator| {
        let mut snap = Snapshot::new(0);
        snap.heart_rate = 80.0;
        snap.spo2 = 97.0;
        snap.accel_magnitude_g = 1.2;

        snap.fall_detected = true;
        eval.evaluate(&mut snap, 1_000);
        assert!(snap.emergency_status);

        snap.fall_detected = false;
        eval.evaluate(&mut snap, 2_000);
        snap.emergency_status
    };

    let mut recompute = AlertEvaluator::new(EmergencyPolicy::Recompute);
    let mut latched = AlertEvaluator::new(EmergencyPolicy::Latched);

    assert!(!stimulus(&mut recompute), "recompute clears on its own");
    assert!(stimulus(&mut latched), "latched holds after triggers clear");
}
