mod support;

use chrono::NaiveDate;
use fleet_core::device::{PropulsionType, VehicleType};
use fleet_core::distributions::FixedTripDistribution;
use fleet_core::records::EventTypeReason;
use fleet_core::scenario::{run_service, run_service_with, ServiceParams};
use fleet_core::test_helpers::unit_square;
use fleet_core::validate::validate_device_sequences;

use support::{count_reason, events_by_device};

fn may(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, day).expect("valid date")
}

#[test]
fn test_multi_day_run_reuses_one_roster() {
    let boundary = unit_square();
    let params = ServiceParams::default()
        .with_devices(15)
        .with_seed(2024)
        .with_dates(may(1), may(3))
        .with_inactivity(0.2);

    let output = run_service(&boundary, &params).expect("run");

    assert_eq!(output.devices.len(), 15);
    assert_eq!(output.days.len(), 3);
    assert_eq!(output.days.iter().map(|(d, _)| *d).collect::<Vec<_>>(), vec![may(1), may(2), may(3)]);
    assert_eq!(count_reason(&output.status_changes, EventTypeReason::ServiceStart), 45);
    assert_eq!(count_reason(&output.status_changes, EventTypeReason::ServiceEnd), 45);
    for (_, stats) in &output.days {
        assert_eq!(stats.inactive_devices, 3);
        assert_eq!(stats.inactive_devices + stats.active_devices, 15);
    }

    let grouped = events_by_device(&output.status_changes);
    assert_eq!(grouped.len(), 15);
    let provider = output.devices[0].identity.provider_id;
    assert!(output.status_changes.iter().all(|e| e.device.provider_id == provider));
    assert_eq!(validate_device_sequences(&output.status_changes), None);
}

#[test]
fn test_back_to_back_round_the_clock_days_stay_monotonic() {
    let boundary = unit_square();
    let params = ServiceParams::default()
        .with_devices(10)
        .with_seed(5)
        .with_hours(0, 23)
        .with_inactivity(0.0)
        .with_vehicle_types(vec![VehicleType::Scooter])
        .with_propulsion_types(vec![PropulsionType::Electric])
        .with_dates(may(1), may(2));

    let output = run_service(&boundary, &params).expect("run");
    assert_eq!(validate_device_sequences(&output.status_changes), None);
}

#[test]
fn test_day_callback_sees_every_day() {
    let boundary = unit_square();
    let params = ServiceParams::default()
        .with_devices(4)
        .with_seed(1)
        .with_hours(9, 11)
        .with_dates(may(10), may(14));
    let distribution = FixedTripDistribution {
        duration_secs: 300.0,
        accuracy_m: 3.0,
    };

    let mut seen = Vec::new();
    let output = run_service_with(&boundary, &params, &distribution, |date, stats| {
        seen.push((date, stats.trips));
    })
    .expect("run");

    assert_eq!(seen.len(), 5);
    assert_eq!(seen.iter().map(|(_, trips)| trips).sum::<usize>(), output.trips.len());
    assert!(output.trips.iter().all(|t| t.trip_duration == 300));
}
