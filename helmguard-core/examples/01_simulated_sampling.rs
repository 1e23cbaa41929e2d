//! Simulated Sensor Sampling Example
//!
//! This example runs the real sensor drivers against scripted buses,
//! so you can watch raw register frames turn into physical readings
//! without any hardware on the bench.
//!
//! ## What You'll Learn
//!
//! - Scripting I2C frames and ADC counts with `ScriptedBus`/`ScriptedAdc`
//! - How the pulse oximeter turns FIFO samples into heart rate and SpO2
//! - IR thermometer raw-to-Celsius conversion
//! - Electrochemical cell counts-to-ppm conversion
//! - What a driver reports when the bus misbehaves
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_simulated_sampling
//! ```

use helmguard_core::errors::SensorError;
use helmguard_core::sensors::sim::{ScriptedAdc, ScriptedBus};
use helmguard_core::sensors::{
    gas, optical, thermal, GasCell, IrThermometer, PulseOximeter, SensorDriver, SensorSample,
};

fn main() {
    println!("HelmGuard Simulated Sampling Example");
    println!("====================================\n");

    pulse_oximeter_demo();
    thermometer_demo();
    gas_cell_demo();
    fault_demo();

    println!("\n{}", "=".repeat(60));
    println!("Key Insights:");
    println!("- Drivers decode raw frames; they never see physical units on the bus");
    println!("- Heart rate needs a full window of plausible beats before it publishes");
    println!("- A failed read surfaces as a typed error, not a bogus reading");
    println!("- Scripted buses make driver behavior reproducible in CI");
}

/// One 18-bit sample per channel, packed big-endian into 6 bytes
fn fifo_frame(red: u32, ir: u32) -> [u8; 6] {
    [
        (red >> 16) as u8,
        (red >> 8) as u8,
        red as u8,
        (ir >> 16) as u8,
        (ir >> 8) as u8,
        ir as u8,
    ]
}

/// Thermometer RAM word (LSB, MSB, PEC) for a temperature in Celsius
fn thermal_frame(celsius: f32) -> [u8; 3] {
    let raw = ((celsius + 273.15) / 0.02) as u16;
    [raw as u8, (raw >> 8) as u8, 0x00]
}

fn pulse_oximeter_demo() {
    println!("Pulse Oximeter (sampled every 250 ms):");
    println!("--------------------------------------");

    // IR crosses the beat threshold once per second: a 60 BPM pulse
    // train. Red stays steady so SpO2 tracks the ratio.
    let mut bus = ScriptedBus::new(optical::ADDR);
    for tick in 0..=16u32 {
        let ir = if tick % 4 == 0 { 60_000 } else { 30_000 };
        bus.queue_frame(optical::REG_FIFO_DATA, &fifo_frame(30_000, ir));
    }

    let mut oximeter = PulseOximeter::new(bus);
    for tick in 0..=16u64 {
        let now = tick * 250;
        match oximeter.sample(now) {
            Ok(SensorSample::Vitals(vitals)) => {
                if tick % 4 == 0 {
                    println!(
                        "  t={:>5} ms  beat  HR: {:>5.1} BPM  SpO2: {:.1}%",
                        now, vitals.heart_rate, vitals.spo2
                    );
                }
            }
            Ok(other) => println!("  unexpected sample: {:?}", other),
            Err(e) => println!("  ✗ read failed: {}", e),
        }
    }
    println!("  (rate publishes once four valid beat intervals accumulate)\n");
}

fn thermometer_demo() {
    println!("IR Thermometer:");
    println!("---------------");

    let mut bus = ScriptedBus::new(thermal::ADDR);
    bus.queue_frame(thermal::RAM_AMBIENT, &thermal_frame(31.0));
    bus.queue_frame(thermal::RAM_OBJECT, &thermal_frame(37.2));

    let mut thermometer = IrThermometer::new(bus);
    match thermometer.sample(0) {
        Ok(SensorSample::Thermal(reading)) => {
            println!("  ✓ Body:    {:.2} °C", reading.body_c);
            println!("  ✓ Ambient: {:.2} °C", reading.ambient_c);
        }
        Ok(other) => println!("  unexpected sample: {:?}", other),
        Err(e) => println!("  ✗ read failed: {}", e),
    }

    let raw = 0x3af7;
    println!(
        "  (raw 0x{:04x} -> {:.2} °C at 0.02 K per LSB)\n",
        raw,
        thermal::kelvin_raw_to_celsius(raw)
    );
}

fn gas_cell_demo() {
    println!("CO Gas Cell:");
    println!("------------");

    let mut adc = ScriptedAdc::new();
    adc.queue_many(&[496, 682, 1_117, 3_100]);

    let mut cell = GasCell::new(adc);
    for (label, now) in [
        ("clean air      ", 0u64),
        ("light exposure ", 1_000),
        ("smoke nearby   ", 2_000),
        ("critical       ", 3_000),
    ] {
        match cell.sample(now) {
            Ok(SensorSample::Gas(reading)) => {
                println!("  {}  {:>6.1} ppm CO", label, reading.co_ppm)
            }
            Ok(other) => println!("  unexpected sample: {:?}", other),
            Err(e) => println!("  ✗ read failed: {}", e),
        }
    }
    println!(
        "  (counts -> volts -> ppm: 682 counts = {:.2} V = {:.0} ppm)\n",
        gas::counts_to_volts(682),
        gas::volts_to_ppm(gas::counts_to_volts(682))
    );
}

fn fault_demo() {
    println!("Bus Fault Handling:");
    println!("-------------------");

    let mut bus = ScriptedBus::new(thermal::ADDR);
    bus.queue_frame(thermal::RAM_AMBIENT, &thermal_frame(25.0));
    bus.queue_frame(thermal::RAM_OBJECT, &thermal_frame(37.0));
    bus.inject_fault(SensorError::BusTimeout { addr: thermal::ADDR });

    let mut thermometer = IrThermometer::new(bus);

    match thermometer.sample(0) {
        Ok(sample) => println!("  unexpected success: {:?}", sample),
        Err(e) => println!("  ✗ first read:  {}", e),
    }
    match thermometer.sample(1_000) {
        Ok(SensorSample::Thermal(reading)) => {
            println!("  ✓ second read: body {:.2} °C (fault was one-shot)", reading.body_c)
        }
        Ok(other) => println!("  unexpected sample: {:?}", other),
        Err(e) => println!("  ✗ second read: {}", e),
    }
}
