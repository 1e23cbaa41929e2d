//! LED and Buzzer Feedback
//!
//! Wearer-facing feedback driven every loop iteration from the current
//! alert state. Patterns are pure functions of the monotonic clock, so
//! the driver needs no per-iteration bookkeeping beyond an optional
//! one-shot chirp:
//!
//! - idle: slow heartbeat blink, buzzer silent
//! - alarm: fast alternating LED/buzzer flash
//! - chirp: short beep burst on alert session edges, overriding the
//!   steady pattern until it completes
//!
//! The sink trait is the hardware seam. Firmware binds it to GPIO
//! pins; tests and demos bind it to recording stubs.

use crate::constants::schedule::{ALERT_FLASH_PERIOD_MS, CHIRP_MS, IDLE_BLINK_PERIOD_MS};
use crate::time::Timestamp;

/// Output pins the indicator patterns drive
pub trait IndicatorSink {
    /// Drive the helmet status LED
    fn set_led(&mut self, on: bool);
    /// Drive the piezo buzzer
    fn set_buzzer(&mut self, on: bool);
}

/// Steady indicator pattern selected from the alert state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndicatorPattern {
    /// Slow heartbeat blink, buzzer silent
    #[default]
    Idle,
    /// Fast alternating LED/buzzer flash
    Alarm,
}

#[derive(Debug, Clone, Copy)]
struct ChirpState {
    started_at: Timestamp,
    pulses: u8,
}

/// Pattern generator for the LED and buzzer
#[derive(Debug, Clone, Default)]
pub struct IndicatorDriver {
    pattern: IndicatorPattern,
    chirp: Option<ChirpState>,
}

impl IndicatorDriver {
    /// Driver starting in the idle pattern
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the steady pattern
    pub fn set_pattern(&mut self, pattern: IndicatorPattern) {
        self.pattern = pattern;
    }

    /// Currently selected steady pattern
    pub fn pattern(&self) -> IndicatorPattern {
        self.pattern
    }

    /// Start a one-shot burst of `pulses` beeps, separated by equal
    /// silent gaps; overrides the steady pattern until it completes
    pub fn chirp(&mut self, now: Timestamp, pulses: u8) {
        if pulses == 0 {
            return;
        }
        self.chirp = Some(ChirpState {
            started_at: now,
            pulses,
        });
    }

    /// Drive the sink for this instant
    pub fn update<S: IndicatorSink>(&mut self, now: Timestamp, sink: &mut S) {
        if let Some(chirp) = self.chirp {
            // pulses on-segments with (pulses - 1) gaps between them
            let segments = chirp.pulses as u32 * 2 - 1;
            let total = (segments * CHIRP_MS) as u64;
            let elapsed = now.saturating_sub(chirp.started_at);
            if elapsed < total {
                let on = (elapsed / CHIRP_MS as u64) % 2 == 0;
                sink.set_led(on);
                sink.set_buzzer(on);
                return;
            }
            self.chirp = None;
        }

        match self.pattern {
            IndicatorPattern::Idle => {
                let phase = now % IDLE_BLINK_PERIOD_MS as u64;
                sink.set_led(phase < (IDLE_BLINK_PERIOD_MS / 2) as u64);
                sink.set_buzzer(false);
            }
            IndicatorPattern::Alarm => {
                let phase = now % ALERT_FLASH_PERIOD_MS as u64;
                let first_half = phase < (ALERT_FLASH_PERIOD_MS / 2) as u64;
                sink.set_led(first_half);
                sink.set_buzzer(!first_half);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct PinSink {
        led: bool,
        buzzer: bool,
    }

    impl IndicatorSink for PinSink {
        fn set_led(&mut self, on: bool) {
            self.led = on;
        }
        fn set_buzzer(&mut self, on: bool) {
            self.buzzer = on;
        }
    }

    #[test]
    fn idle_blinks_slowly_and_stays_silent() {
        let mut driver = IndicatorDriver::new();
        let mut pins = PinSink::default();

        driver.update(100, &mut pins);
        assert!(pins.led);
        assert!(!pins.buzzer);

        driver.update(1_500, &mut pins);
        assert!(!pins.led);
        assert!(!pins.buzzer);
    }

    #[test]
    fn alarm_alternates_led_and_buzzer() {
        let mut driver = IndicatorDriver::new();
        driver.set_pattern(IndicatorPattern::Alarm);
        let mut pins = PinSink::default();

        driver.update(0, &mut pins);
        assert!(pins.led);
        assert!(!pins.buzzer);

        driver.update(130, &mut pins);
        assert!(!pins.led);
        assert!(pins.buzzer);
    }

    #[test]
    fn chirp_overrides_then_expires() {
        let mut driver = IndicatorDriver::new();
        let mut pins = PinSink::default();

        // Two pulses: on 0-100, gap 100-200, on 200-300
        driver.chirp(0, 2);

        driver.update(50, &mut pins);
        assert!(pins.buzzer);
        driver.update(150, &mut pins);
        assert!(!pins.buzzer);
        driver.update(250, &mut pins);
        assert!(pins.buzzer);

        // Expired: idle pattern takes over, mid-blink-window LED on
        driver.update(350, &mut pins);
        assert!(!pins.buzzer);
        assert!(pins.led);
    }

    #[test]
    fn single_pulse_chirp_is_one_beep() {
        let mut driver = IndicatorDriver::new();
        let mut pins = PinSink::default();

        driver.chirp(1_000, 1);
        driver.update(1_050, &mut pins);
        assert!(pins.buzzer);
        driver.update(1_110, &mut pins);
        assert!(!pins.buzzer);
    }
}
