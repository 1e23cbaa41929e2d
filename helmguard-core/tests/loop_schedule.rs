//! Integration tests for the cooperative loop schedule
//!
//! Exercises cadence interplay, the adaptive transmission interval,
//! drop-on-failure delivery, health checks, and watchdog supervision,
//! all with a hand-driven clock.

#![cfg(test)]

mod common;

use core::cell::RefCell;

use helmguard_core::alerts::SessionEdge;
use helmguard_core::errors::SystemError;
use helmguard_core::sensors::{SensorSample, ThermalReading};
use helmguard_core::{
    HeapMonitor, HelmetLoop, IndicatorSink, LoopConfig, MockTimeSource, ReportSink, StepReport,
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
fn first_step_runs_every_activity_once() {
    let clock = RefCell::new(MockTimeSource::new(0));
    let heap = RefCell::new(200_000u32);
    let (gas, _) = common::gas_driver(0.0);

    let mut device = HelmetLoop::new(
        LoopConfig::default(),
        SharedClock { inner: &clock },
        RecordingSink::new(),
        NullPins,
        SharedHeap { free: &heap },
    )
    .add_driver(gas);

    let report = step_at(&mut device, &clock, 0);
    assert!(report.sampled);
    assert!(report.health_checked);
    assert!(report.transmitted);
    assert!(!report.send_failed);
}

#[test]
fn sampling_and_transmission_follow_their_cadences() {
    let clock = RefCell::new(MockTimeSource::new(0));
    let heap = RefCell::new(200_000u32);
    let (gas, _) = common::gas_driver(0.0);

    let mut device = HelmetLoop::new(
        LoopConfig::default(),
        SharedClock { inner: &clock },
        RecordingSink::new(),
        NullPins,
        SharedHeap { free: &heap },
    )
    .add_driver(gas);

    let mut sampled = 0;
    let mut health_checks = 0;
    for tick in 0..=10 {
        let report = step_at(&mut device, &clock, tick * 1_000);
        if report.sampled {
            sampled += 1;
        }
        if report.health_checked {
            health_checks += 1;
        }
    }

    // One sample per second, one health check at boot, reports at
    // 0s, 5s, and 10s
    assert_eq!(sampled, 11);
    assert_eq!(health_checks, 1);
    assert_eq!(device.reporter().sent.len(), 3);
    assert_eq!(device.snapshot().packet_count, 11);
}

#[test]
fn emergency_switches_transmit_interval_at_next_comparison() {
    let clock = RefCell::new(MockTimeSource::new(0));
    let heap = RefCell::new(200_000u32);
    let (gas, gas_state) = common::gas_driver(0.0);
    let (motion, _) = common::motion_driver(1.2);

    let mut device = HelmetLoop::new(
        LoopConfig::default(),
        SharedClock { inner: &clock },
        RecordingSink::new(),
        NullPins,
        SharedHeap { free: &heap },
    )
    .add_driver(gas)
    .add_driver(motion);

    // Calm period: reports at 0s and 5s only
    for tick in 0..=5 {
        step_at(&mut device, &clock, tick * 1_000);
    }
    assert_eq!(device.reporter().sent.len(), 2);

    // CO spikes past the critical rung at 6s
    gas_state.borrow_mut().sample = SensorSample::Gas(helmguard_core::sensors::GasReading {
        co_ppm: 450.0,
    });
    for tick in 6..=8 {
        step_at(&mut device, &clock, tick * 1_000);
    }

    // 1s interval took effect at the next comparison: 6s, 7s, 8s all
    // reported, flagged as emergencies
    let sent = &device.reporter().sent;
    assert_eq!(sent.len(), 5);
    assert!(sent[2..].iter().all(|(snap, emergency)| {
        *emergency && snap.emergency_status
    }));

    // Air clears at 9s; the emergency recomputes to false and the
    // interval stretches back out. Last report was at 8s, so nothing
    // goes out until 13s.
    gas_state.borrow_mut().sample = SensorSample::Gas(helmguard_core::sensors::GasReading {
        co_ppm: 0.0,
    });
    for tick in 9..=12 {
        let report = step_at(&mut device, &clock, tick * 1_000);
        assert!(!report.transmitted, "no report expected at {}s", tick);
    }
    let report = step_at(&mut device, &clock, 13_000);
    assert!(report.transmitted);
    assert!(!device.reporter().sent.last().unwrap().1);
}

#[test]
fn failed_sends_drop_the_report_without_retry() {
    let clock = RefCell::new(MockTimeSource::new(0));
    let heap = RefCell::new(200_000u32);
    let (gas, _) = common::gas_driver(0.0);

    let mut device = HelmetLoop::new(
        LoopConfig::default(),
        SharedClock { inner: &clock },
        RecordingSink::new(),
        NullPins,
        SharedHeap { free: &heap },
    )
    .add_driver(gas);

    step_at(&mut device, &clock, 0);
    assert_eq!(device.reporter().sent.len(), 1);

    // Collector goes dark across the 5s firing
    device.reporter_mut().fail_all = true;
    for tick in 1..=5 {
        let report = step_at(&mut device, &clock, tick * 1_000);
        assert!(!report.transmitted);
        if tick == 5 {
            assert!(report.send_failed);
        }
    }

    // Back up for the 10s firing: the delivered record is the fresh
    // one, not a replay of the dropped 5s report
    device.reporter_mut().fail_all = false;
    for tick in 6..=10 {
        step_at(&mut device, &clock, tick * 1_000);
    }
    let sent = &device.reporter().sent;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].0.sampled_at, 10_000);
}

#[test]
fn watchdog_trips_when_an_iteration_stalls() {
    let clock = RefCell::new(MockTimeSource::new(0));
    let heap = RefCell::new(200_000u32);
    let (gas, _) = common::gas_driver(0.0);

    let mut device = HelmetLoop::new(
        LoopConfig::default(),
        SharedClock { inner: &clock },
        RecordingSink::new(),
        NullPins,
        SharedHeap { free: &heap },
    )
    .add_driver(gas);

    step_at(&mut device, &clock, 0);

    // The next iteration arrives 9s late, past the 8s limit
    clock.borrow_mut().set(9_000);
    let err = device.step().unwrap_err();
    assert_eq!(
        err,
        SystemError::WatchdogTimeout {
            elapsed_ms: 9_000,
            limit_ms: 8_000,
        }
    );

    // Expiry latches until the harness restarts the device
    clock.borrow_mut().set(9_010);
    assert!(device.step().is_err());
}

#[test]
fn health_check_reports_faults_and_recovers() {
    let clock = RefCell::new(MockTimeSource::new(0));
    let heap = RefCell::new(200_000u32);
    let (gas, gas_state) = common::gas_driver(0.0);

    let mut device = HelmetLoop::new(
        LoopConfig::default(),
        SharedClock { inner: &clock },
        RecordingSink::new(),
        NullPins,
        SharedHeap { free: &heap },
    )
    .add_driver(gas);

    step_at(&mut device, &clock, 0);
    assert!(!device.snapshot().sensor_error);
    assert!(!device.snapshot().system_error);
    assert!(device.snapshot().wifi_connected);
    assert_eq!(device.snapshot().free_heap_bytes, 200_000);

    // Sensor unplugged, heap shrinks below the floor, uplink gone
    gas_state.borrow_mut().present = false;
    *heap.borrow_mut() = 8_000;
    device.reporter_mut().connected = false;

    // Reach the 30s health tick in hops the fed-per-iteration watchdog
    // tolerates; none of them fires the health check early
    for t in [7_000, 14_000, 21_000, 28_000] {
        let report = step_at(&mut device, &clock, t);
        assert!(!report.health_checked);
    }
    let report = step_at(&mut device, &clock, 30_000);
    assert!(report.health_checked);

    let snap = device.snapshot();
    assert!(snap.sensor_error);
    assert!(snap.system_error);
    assert!(!snap.wifi_connected);
    assert_eq!(snap.free_heap_bytes, 8_000);
    assert_eq!(snap.session_secs, 30);

    // Everything comes back before the next health tick
    gas_state.borrow_mut().present = true;
    *heap.borrow_mut() = 190_000;
    device.reporter_mut().connected = true;

    for t in [37_000, 44_000, 51_000, 58_000] {
        step_at(&mut device, &clock, t);
    }
    let report = step_at(&mut device, &clock, 60_000);
    assert!(report.health_checked);
    assert!(!device.snapshot().sensor_error);
    assert!(!device.snapshot().system_error);
    assert!(device.snapshot().wifi_connected);
}

#[test]
fn alert_session_edges_are_one_shot() {
    let clock = RefCell::new(MockTimeSource::new(0));
    let heap = RefCell::new(200_000u32);
    let (thermal, thermal_state) = common::thermal_driver(37.0, 25.0);
    let (motion, _) = common::motion_driver(1.2);

    let mut device = HelmetLoop::new(
        LoopConfig::default(),
        SharedClock { inner: &clock },
        RecordingSink::new(),
        NullPins,
        SharedHeap { free: &heap },
    )
    .add_driver(thermal)
    .add_driver(motion);

    assert_eq!(step_at(&mut device, &clock, 0).edge, SessionEdge::None);

    // Body temperature climbs into heat stress
    thermal_state.borrow_mut().sample = SensorSample::Thermal(ThermalReading {
        body_c: 39.0,
        ambient_c: 25.0,
    });
    assert_eq!(step_at(&mut device, &clock, 1_000).edge, SessionEdge::Started);
    assert_eq!(step_at(&mut device, &clock, 2_000).edge, SessionEdge::None);
    assert!(device.snapshot().alert_active);

    // And back down
    thermal_state.borrow_mut().sample = SensorSample::Thermal(ThermalReading {
        body_c: 37.0,
        ambient_c: 25.0,
    });
    assert_eq!(step_at(&mut device, &clock, 3_000).edge, SessionEdge::Ended);
    assert_eq!(step_at(&mut device, &clock, 4_000).edge, SessionEdge::None);
    assert!(!device.snapshot().alert_active);
}

#[test]
fn failed_sensor_read_keeps_the_last_good_value() {
    let clock = RefCell::new(MockTimeSource::new(0));
    let heap = RefCell::new(200_000u32);
    let (gas, gas_state) = common::gas_driver(30.0);

    let mut device = HelmetLoop::new(
        LoopConfig::default(),
        SharedClock { inner: &clock },
        RecordingSink::new(),
        NullPins,
        SharedHeap { free: &heap },
    )
    .add_driver(gas);

    step_at(&mut device, &clock, 0);
    assert_eq!(device.snapshot().co_ppm, 30.0);

    // Bus starts timing out; the stored state changes under it, but
    // nothing of that reaches the snapshot
    {
        let mut state = gas_state.borrow_mut();
        state.fail_reads = true;
        state.sample = SensorSample::Gas(helmguard_core::sensors::GasReading { co_ppm: 999.0 });
    }

    let report = step_at(&mut device, &clock, 1_000);
    assert!(report.sampled);
    assert_eq!(device.snapshot().co_ppm, 30.0);
    assert_eq!(device.snapshot().packet_count, 2);
}
