//! Simulate one service day for 100 devices and print a summary.
//!
//! Run with: cargo run -p fleet_core --example service_day_run

use chrono::NaiveDate;
use fleet_core::boundary::Boundary;
use fleet_core::records::EventTypeReason;
use fleet_core::scenario::{run_service, ServiceParams};
use fleet_core::validate::validate_device_sequences;

fn main() {
    const NUM_DEVICES: usize = 100;
    const SEED: u64 = 123;

    let boundary = Boundary::from_rect(-118.50, 33.90, -118.20, 34.15).expect("boundary has area");
    let date = NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date");
    let params = ServiceParams::default()
        .with_devices(NUM_DEVICES)
        .with_seed(SEED)
        .with_dates(date, date);

    let output = run_service(&boundary, &params).expect("run should succeed");
    let (_, stats) = output.days[0];

    println!("--- Service day ({} devices, {}, seed {}) ---", NUM_DEVICES, date, SEED);
    println!("Inactive devices: {}", stats.inactive_devices);
    println!("Trips: {}", stats.trips);
    println!("Low-battery removals: {}", stats.low_battery_removals);
    println!("Recharges: {}", stats.recharges);
    println!("Status changes: {}", output.status_changes.len());

    let reasons = [
        EventTypeReason::ServiceStart,
        EventTypeReason::UserPickUp,
        EventTypeReason::UserDropOff,
        EventTypeReason::LowBattery,
        EventTypeReason::MaintenanceDropOff,
        EventTypeReason::ServiceEnd,
    ];
    println!("\nEvents by reason:");
    for reason in reasons {
        let count = output.status_changes.iter().filter(|e| e.reason == reason).count();
        println!("  {:<22} {}", reason.as_str(), count);
    }

    println!("\nSample trips (first 10):");
    for (i, trip) in output.trips.iter().take(10).enumerate() {
        println!(
            "  {}  device={} start={} duration={} s distance={} m",
            i + 1,
            trip.device.vehicle_id,
            trip.start_time.format("%H:%M:%S"),
            trip.trip_duration,
            trip.trip_distance
        );
    }

    match validate_device_sequences(&output.status_changes) {
        None => println!("\nAll device sequences are consistent."),
        Some(message) => println!("\nInconsistent sequence: {}", message),
    }
}
