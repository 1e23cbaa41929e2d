//! Scripted Bus and ADC Fakes
//!
//! Deterministic stand-ins for the hardware interfaces. A script is a
//! queue of raw frames per register: each read pops the next frame, and
//! once the queue runs dry the last frame replays forever (a real sensor
//! keeps reporting its latest conversion, so held frames model steady
//! state without scripting thousands of reads).
//!
//! Faults are injected one at a time and consumed by the next
//! transaction, which is how the retained-value and health-check paths
//! get exercised without hardware.
//!
//! ```rust
//! use helmguard_core::sensors::{SensorBus, sim::ScriptedBus};
//!
//! let mut bus = ScriptedBus::new(0x5a);
//! bus.queue_frame(0x06, &[0x4c, 0x3a]);
//!
//! let mut frame = [0u8; 2];
//! bus.read_reg(0x5a, 0x06, &mut frame).unwrap();
//! assert_eq!(frame, [0x4c, 0x3a]);
//! ```

use heapless::{Deque, FnvIndexMap, Vec};

use crate::errors::{SensorError, SensorResult};
use crate::sensors::{AnalogInput, SensorBus};

/// Longest raw frame any driver reads in one transaction
const MAX_FRAME: usize = 8;

/// Queued frames per register before hold semantics take over
const MAX_QUEUED: usize = 32;

/// Registers one scripted device can carry
const MAX_REGS: usize = 16;

type Frame = Vec<u8, MAX_FRAME>;

#[derive(Default)]
struct Script {
    frames: Deque<Frame, MAX_QUEUED>,
    hold: Option<Frame>,
}

impl Script {
    fn next(&mut self) -> Option<Frame> {
        if let Some(frame) = self.frames.pop_front() {
            self.hold = Some(frame.clone());
            Some(frame)
        } else {
            self.hold.clone()
        }
    }
}

/// Scripted register bus carrying a single device
///
/// Reads follow the per-register script; writes are recorded so tests can
/// assert configuration and reset sequences.
pub struct ScriptedBus {
    addr: u8,
    present: bool,
    scripts: FnvIndexMap<u8, Script, MAX_REGS>,
    writes: Vec<(u8, u8), MAX_QUEUED>,
    fault: Option<SensorError>,
}

impl ScriptedBus {
    /// Create a bus with one present device at `addr`
    pub fn new(addr: u8) -> Self {
        Self {
            addr,
            present: true,
            scripts: FnvIndexMap::new(),
            writes: Vec::new(),
            fault: None,
        }
    }

    /// Append one raw frame to the script for `reg`
    ///
    /// Frames are consumed in FIFO order; the last one replays once the
    /// queue is empty.
    pub fn queue_frame(&mut self, reg: u8, bytes: &[u8]) {
        let mut frame = Frame::new();
        frame.extend_from_slice(bytes).ok();

        if !self.scripts.contains_key(&reg) {
            self.scripts.insert(reg, Script::default()).ok();
        }
        if let Some(script) = self.scripts.get_mut(&reg) {
            script.frames.push_back(frame).ok();
        }
    }

    /// Mark the device present or absent for probe and read purposes
    pub fn set_present(&mut self, present: bool) {
        self.present = present;
    }

    /// Fail the next read with `err`, then resume the script
    pub fn inject_fault(&mut self, err: SensorError) {
        self.fault = Some(err);
    }

    /// Register writes recorded so far, in order
    pub fn writes(&self) -> &[(u8, u8)] {
        &self.writes
    }
}

impl SensorBus for ScriptedBus {
    fn read_reg(&mut self, addr: u8, reg: u8, buf: &mut [u8]) -> SensorResult<()> {
        if let Some(err) = self.fault.take() {
            return Err(err);
        }
        if addr != self.addr {
            return Err(SensorError::NotPresent { addr });
        }
        if !self.present {
            return Err(SensorError::Nack { addr });
        }

        let frame = self
            .scripts
            .get_mut(&reg)
            .and_then(Script::next)
            .ok_or(SensorError::InvalidFrame)?;

        if frame.len() < buf.len() {
            return Err(SensorError::ShortFrame {
                expected: buf.len() as u8,
                got: frame.len() as u8,
            });
        }
        buf.copy_from_slice(&frame[..buf.len()]);
        Ok(())
    }

    fn write_reg(&mut self, addr: u8, reg: u8, value: u8) -> SensorResult<()> {
        if addr != self.addr {
            return Err(SensorError::NotPresent { addr });
        }
        if !self.present {
            return Err(SensorError::Nack { addr });
        }
        self.writes.push((reg, value)).ok();
        Ok(())
    }

    fn probe(&mut self, addr: u8) -> bool {
        self.present && addr == self.addr
    }
}

/// Scripted ADC channel for the gas cell
pub struct ScriptedAdc {
    readings: Deque<u16, MAX_QUEUED>,
    hold: Option<u16>,
    fault: Option<SensorError>,
}

impl ScriptedAdc {
    /// Create an empty channel; reads fail until something is queued
    pub fn new() -> Self {
        Self {
            readings: Deque::new(),
            hold: None,
            fault: None,
        }
    }

    /// Append one conversion result in raw counts
    pub fn queue(&mut self, counts: u16) {
        self.readings.push_back(counts).ok();
    }

    /// Append several conversion results at once
    pub fn queue_many(&mut self, counts: &[u16]) {
        for &c in counts {
            self.queue(c);
        }
    }

    /// Fail the next read with `err`, then resume the script
    pub fn inject_fault(&mut self, err: SensorError) {
        self.fault = Some(err);
    }
}

impl Default for ScriptedAdc {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalogInput for ScriptedAdc {
    fn read_counts(&mut self) -> SensorResult<u16> {
        if let Some(err) = self.fault.take() {
            return Err(err);
        }
        if let Some(counts) = self.readings.pop_front() {
            self.hold = Some(counts);
            Ok(counts)
        } else {
            self.hold.ok_or(SensorError::InvalidFrame)
        }
    }
}
