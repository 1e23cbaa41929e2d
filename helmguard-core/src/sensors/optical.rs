//! Optical Pulse Oximeter Driver
//!
//! Two-channel (red + IR) photoplethysmography front end in the MAX30102
//! family. Heart rate comes from rising-edge beat detection on the IR
//! channel: a crossing of the fixed intensity threshold marks a beat,
//! beat-to-beat intervals outside the credible band are discarded, and
//! the published rate only moves once four consecutive valid intervals
//! have been averaged.
//!
//! SpO2 is the textbook linear function of the red/IR ratio, clamped to
//! the publishable band. When both channels drop below the minimum
//! signal level (sensor off the skin), the weak-signal default is
//! published instead; weak signal is a fallback, not an error.
//!
//! None of this is clinically valid estimation. It is the fixed
//! heuristic the alert rules are specified against.

use crate::constants::vitals::{
    BEAT_INTERVAL_MAX_MS, BEAT_INTERVAL_MIN_MS, BEAT_THRESHOLD, BEAT_WINDOW,
    OPTICAL_MIN_SIGNAL, SPO2_MAX_PCT, SPO2_MIN_PCT, SPO2_RATIO_INTERCEPT, SPO2_RATIO_SLOPE,
    SPO2_WEAK_SIGNAL_PCT,
};
use crate::errors::SensorResult;
use crate::sensors::{SensorBus, SensorDriver, SensorKind, SensorSample, VitalsReading};
use crate::time::Timestamp;

/// 7-bit bus address of the optical front end
pub const ADDR: u8 = 0x57;

/// FIFO data register; one read yields a red+IR sample pair
pub const REG_FIFO_DATA: u8 = 0x07;
/// Mode configuration register
const REG_MODE_CONFIG: u8 = 0x09;
/// SpO2 configuration register
const REG_SPO2_CONFIG: u8 = 0x0a;
/// Red LED pulse amplitude
const REG_LED1_PA: u8 = 0x0c;
/// IR LED pulse amplitude
const REG_LED2_PA: u8 = 0x0d;

/// Reset bit in the mode configuration register
const MODE_RESET: u8 = 0x40;
/// SpO2 mode (red + IR active)
const MODE_SPO2: u8 = 0x03;
/// 100 Hz sample rate, 411us pulse width, 4096nA ADC range
const SPO2_CONFIG: u8 = 0x27;
/// LED drive current (~7mA)
const LED_CURRENT: u8 = 0x24;

/// ADC samples are 18-bit, left-packed into three bytes
const CHANNEL_MASK: u32 = 0x03_ffff;

/// Decode one 6-byte FIFO frame into (red, ir) channel intensities
pub fn decode_channels(frame: &[u8; 6]) -> (f32, f32) {
    let red = ((frame[0] as u32) << 16 | (frame[1] as u32) << 8 | frame[2] as u32) & CHANNEL_MASK;
    let ir = ((frame[3] as u32) << 16 | (frame[4] as u32) << 8 | frame[5] as u32) & CHANNEL_MASK;
    (red as f32, ir as f32)
}

/// Estimate SpO2 (%) from the two channel intensities
///
/// Linear ratio model clamped to [70, 100]. Returns the weak-signal
/// default when both channels are below the minimum signal level, or
/// when the IR channel alone is too weak to form a ratio.
pub fn spo2_from_channels(red: f32, ir: f32) -> f32 {
    if red < OPTICAL_MIN_SIGNAL && ir < OPTICAL_MIN_SIGNAL {
        return SPO2_WEAK_SIGNAL_PCT;
    }
    if ir < OPTICAL_MIN_SIGNAL {
        // No denominator worth dividing by
        return SPO2_WEAK_SIGNAL_PCT;
    }

    let ratio = red / ir;
    let spo2 = SPO2_RATIO_INTERCEPT - SPO2_RATIO_SLOPE * ratio;
    spo2.clamp(SPO2_MIN_PCT, SPO2_MAX_PCT)
}

/// Rising-edge beat detector with interval averaging
///
/// Pure state machine over (IR level, timestamp) pairs; owns no bus.
/// The published rate is sticky: it holds its last value until another
/// full window of valid intervals completes.
#[derive(Debug, Clone)]
pub struct BeatDetector {
    last_level: f32,
    last_beat_at: Option<Timestamp>,
    intervals: heapless::Vec<u64, BEAT_WINDOW>,
    published_bpm: f32,
}

impl BeatDetector {
    /// Fresh detector; publishes 0 BPM until the first window completes
    pub fn new() -> Self {
        Self {
            last_level: 0.0,
            last_beat_at: None,
            intervals: heapless::Vec::new(),
            published_bpm: 0.0,
        }
    }

    /// Feed one IR sample; returns the currently published rate
    pub fn update(&mut self, ir_level: f32, now: Timestamp) -> f32 {
        let rising = self.last_level < BEAT_THRESHOLD && ir_level >= BEAT_THRESHOLD;
        self.last_level = ir_level;

        if rising {
            if let Some(prev) = self.last_beat_at {
                let interval = now.saturating_sub(prev);
                if (BEAT_INTERVAL_MIN_MS..=BEAT_INTERVAL_MAX_MS).contains(&interval) {
                    self.intervals.push(interval).ok();
                    if self.intervals.len() == BEAT_WINDOW {
                        let sum: u64 = self.intervals.iter().sum();
                        let mean = sum / BEAT_WINDOW as u64;
                        self.published_bpm = 60_000.0 / mean as f32;
                        self.intervals.clear();
                    }
                } else {
                    // Implausible gap: the run of consecutive valid
                    // beats is broken, start the window over.
                    self.intervals.clear();
                }
            }
            self.last_beat_at = Some(now);
        }

        self.published_bpm
    }

    /// Currently published heart rate (BPM)
    pub fn bpm(&self) -> f32 {
        self.published_bpm
    }
}

impl Default for BeatDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// MAX30102-style pulse oximeter driver
pub struct PulseOximeter<B: SensorBus> {
    bus: B,
    detector: BeatDetector,
}

impl<B: SensorBus> PulseOximeter<B> {
    /// Create a driver over the given bus; call `reset` to configure
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            detector: BeatDetector::new(),
        }
    }

    /// Access the underlying bus (primarily for scripted buses in tests)
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }
}

impl<B: SensorBus> SensorDriver for PulseOximeter<B> {
    fn kind(&self) -> SensorKind {
        SensorKind::Optical
    }

    fn probe(&mut self) -> bool {
        self.bus.probe(ADDR)
    }

    fn sample(&mut self, now: Timestamp) -> SensorResult<SensorSample> {
        let mut frame = [0u8; 6];
        self.bus.read_reg(ADDR, REG_FIFO_DATA, &mut frame)?;

        let (red, ir) = decode_channels(&frame);
        let heart_rate = self.detector.update(ir, now);
        let spo2 = spo2_from_channels(red, ir);

        Ok(SensorSample::Vitals(VitalsReading { heart_rate, spo2 }))
    }

    fn reset(&mut self) -> SensorResult<()> {
        self.bus.write_reg(ADDR, REG_MODE_CONFIG, MODE_RESET)?;
        self.bus.write_reg(ADDR, REG_MODE_CONFIG, MODE_SPO2)?;
        self.bus.write_reg(ADDR, REG_SPO2_CONFIG, SPO2_CONFIG)?;
        self.bus.write_reg(ADDR, REG_LED1_PA, LED_CURRENT)?;
        self.bus.write_reg(ADDR, REG_LED2_PA, LED_CURRENT)?;
        Ok(())
    }
}
