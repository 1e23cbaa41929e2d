//! Alert Derivation Example
//!
//! This example feeds hand-built snapshots through the alert rules and
//! prints which flags each situation raises, including the carbon
//! monoxide ladder and the two emergency lifecycle policies.
//!
//! ## What You'll Learn
//!
//! - The difference between heat stress and critical vitals
//! - How the CO ladder escalates from warning to emergency
//! - The motionless window and how movement re-arms it
//! - `Recompute` vs `Latched` emergency lifecycles
//!
//! ## Thresholds
//!
//! | Flag            | Trips when                                        |
//! |-----------------|---------------------------------------------------|
//! | heat_stress     | body > 38.5 °C, HR > 120, or ambient > 50 °C      |
//! | critical_vitals | body > 40 °C, HR > 150, SpO2 < 90, ambient > 60 °C |
//! | co_warning      | CO > 50 ppm                                       |
//! | emergency       | critical vitals, fall, impact, motionless, CO > 400 |
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 02_alert_rules
//! ```

use helmguard_core::constants::motion::MOTIONLESS_WINDOW_MS;
use helmguard_core::{AlertEvaluator, EmergencyPolicy, Snapshot};

fn main() {
    println!("HelmGuard Alert Rules Example");
    println!("=============================\n");

    println!("Vitals Scenarios:");
    println!("-----------------");
    evaluate("Resting baseline", |s| {
        s.heart_rate = 72.0;
        s.spo2 = 98.0;
    });
    evaluate("Working hard", |s| {
        s.heart_rate = 135.0;
        s.spo2 = 96.0;
    });
    evaluate("Heat emergency", |s| {
        s.heart_rate = 155.0;
        s.body_temp_c = 40.5;
    });
    evaluate("Low oxygen", |s| {
        s.spo2 = 85.0;
    });

    println!("\nCarbon Monoxide Ladder:");
    println!("-----------------------");
    for co_ppm in [30.0, 80.0, 250.0, 450.0] {
        evaluate(&format!("CO at {:.0} ppm", co_ppm), |s| s.co_ppm = co_ppm);
    }

    println!("\nMotion Scenarios:");
    println!("-----------------");
    evaluate("Hard fall", |s| {
        s.accel_magnitude_g = 3.1;
        s.fall_detected = true;
    });
    evaluate("Severe impact", |s| {
        s.accel_magnitude_g = 4.6;
        s.fall_detected = true;
        s.impact_detected = true;
    });
    motionless_demo();
    policy_demo();

    println!("\n{}", "=".repeat(60));
    println!("Key Insights:");
    println!("- Heat stress warns early; critical vitals escalate to emergency");
    println!("- CO at 80 ppm warns the wearer, 450 ppm pages the incident commander");
    println!("- Any movement above 1.05 g re-arms the motionless window");
    println!("- Latched emergencies persist until explicitly cleared");
}

/// Evaluate one situation on top of a benign baseline and print the flags
fn evaluate(label: &str, setup: impl FnOnce(&mut Snapshot)) {
    let mut snapshot = Snapshot::new(0);
    snapshot.heart_rate = 72.0;
    snapshot.accel_magnitude_g = 1.2;
    setup(&mut snapshot);

    AlertEvaluator::default().evaluate(&mut snapshot, 1_000);

    let mut flags: Vec<&str> = Vec::new();
    if snapshot.heat_stress {
        flags.push("heat_stress");
    }
    if snapshot.critical_vitals {
        flags.push("critical_vitals");
    }
    if snapshot.co_warning {
        flags.push("co_warning");
    }
    if snapshot.motionless_alert {
        flags.push("motionless");
    }

    let mark = if snapshot.emergency_status { "✗ EMERGENCY" } else { "✓" };
    if flags.is_empty() {
        println!("  {:<18} {}", label, mark);
    } else {
        println!("  {:<18} {} [{}]", label, mark, flags.join(", "));
    }
}

fn motionless_demo() {
    let mut snapshot = Snapshot::new(0);
    snapshot.heart_rate = 72.0;
    snapshot.accel_magnitude_g = 0.98;

    let mut evaluator = AlertEvaluator::default();

    // Still, but the window has not elapsed yet
    evaluator.evaluate(&mut snapshot, MOTIONLESS_WINDOW_MS);
    println!(
        "  Still for {:>3} s      {}",
        MOTIONLESS_WINDOW_MS / 1_000,
        if snapshot.emergency_status { "✗ EMERGENCY [motionless]" } else { "✓" }
    );

    // One second past the window
    evaluator.evaluate(&mut snapshot, MOTIONLESS_WINDOW_MS + 1_000);
    println!(
        "  Still for {:>3} s      {}",
        (MOTIONLESS_WINDOW_MS + 1_000) / 1_000,
        if snapshot.emergency_status { "✗ EMERGENCY [motionless]" } else { "✓" }
    );

    // A single stretch re-arms the window
    snapshot.accel_magnitude_g = 1.4;
    evaluator.evaluate(&mut snapshot, MOTIONLESS_WINDOW_MS + 2_000);
    println!(
        "  One stretch at 1.4 g  {}",
        if snapshot.emergency_status { "✗ EMERGENCY" } else { "✓ (window re-armed)" }
    );
}

fn policy_demo() {
    println!("\nEmergency Lifecycle Policies:");
    println!("-----------------------------");

    for policy in [EmergencyPolicy::Recompute, EmergencyPolicy::Latched] {
        let mut snapshot = Snapshot::new(0);
        snapshot.heart_rate = 72.0;
        snapshot.accel_magnitude_g = 1.2;
        let mut evaluator = AlertEvaluator::new(policy);

        // CO spikes past the critical rung, then the air clears
        snapshot.co_ppm = 450.0;
        evaluator.evaluate(&mut snapshot, 1_000);
        let during = snapshot.emergency_status;

        snapshot.co_ppm = 5.0;
        evaluator.evaluate(&mut snapshot, 2_000);
        let after = snapshot.emergency_status;

        println!(
            "  {:?}: during spike {} -> after air clears {}",
            policy,
            if during { "EMERGENCY" } else { "ok" },
            if after { "EMERGENCY" } else { "ok" }
        );
    }
    println!("  (a latched emergency drops only via clear_emergency)");
}
