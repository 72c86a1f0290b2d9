//! Load tests for fleet_core: a large fleet over a week of service.

use std::time::Instant;

use chrono::NaiveDate;
use fleet_core::boundary::Boundary;
use fleet_core::scenario::{run_service, ServiceParams};
use fleet_core::validate::validate_device_sequences;

#[test]
#[ignore] // Only run explicitly: cargo test --package fleet_core --test load_tests -- --ignored
fn test_week_of_large_fleet() {
    // Roughly the footprint of a mid-sized city, in degrees.
    let boundary = Boundary::from_rect(-118.50, 33.90, -118.20, 34.15).expect("boundary");
    let start = NaiveDate::from_ymd_opt(2024, 6, 3).expect("date");
    let end = NaiveDate::from_ymd_opt(2024, 6, 9).expect("date");
    let params = ServiceParams::default()
        .with_devices(2_000)
        .with_seed(42)
        .with_inactivity(0.05)
        .with_dates(start, end);

    let started = Instant::now();
    let output = run_service(&boundary, &params).expect("run");
    let duration = started.elapsed();

    let events_per_sec = output.status_changes.len() as f64 / duration.as_secs_f64();
    println!(
        "Week load test: {} events, {} trips in {:.2}s ({:.0} events/sec)",
        output.status_changes.len(),
        output.trips.len(),
        duration.as_secs_f64(),
        events_per_sec
    );

    assert_eq!(validate_device_sequences(&output.status_changes), None);
    assert!(
        events_per_sec > 10_000.0,
        "Should generate >10000 events/sec, got {:.0}",
        events_per_sec
    );
}
