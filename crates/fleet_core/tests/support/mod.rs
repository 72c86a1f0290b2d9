#![allow(dead_code)]

use std::collections::HashMap;

use fleet_core::boundary::Boundary;
use fleet_core::device::Device;
use fleet_core::distributions::GammaTripDistribution;
use fleet_core::records::{EventTypeReason, StatusChange};
use fleet_core::service_day::{DailySimulator, DayOutput, ServiceDay};
use fleet_core::test_helpers::test_date;
use fleet_core::version::MdsVersion;
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

/// Average speed used by the day fixtures, in m/s.
pub const TEST_SPEED_MS: f64 = 5.0;

/// A service day on the shared test date.
pub fn service_day(hour_open: u32, hour_close: u32, inactivity: f64) -> ServiceDay {
    ServiceDay::new(test_date(), hour_open, hour_close, inactivity)
}

/// Run one seeded day over `devices` with Gamma trip durations.
pub fn run_day(
    boundary: &Boundary,
    devices: &mut [Device],
    day: &ServiceDay,
    version: &MdsVersion,
    seed: u64,
) -> DayOutput {
    let distribution = GammaTripDistribution::new();
    let simulator = DailySimulator::new(boundary, TEST_SPEED_MS, version, &distribution);
    let mut rng = StdRng::seed_from_u64(seed);
    simulator
        .service_day(&mut rng, devices, day)
        .expect("service day should succeed inside the boundary")
}

/// Events grouped by device, each group in emission order.
pub fn events_by_device(events: &[StatusChange]) -> HashMap<Uuid, Vec<&StatusChange>> {
    let mut grouped: HashMap<Uuid, Vec<&StatusChange>> = HashMap::new();
    for event in events {
        grouped.entry(event.device_id()).or_default().push(event);
    }
    grouped
}

pub fn count_reason(events: &[StatusChange], reason: EventTypeReason) -> usize {
    events.iter().filter(|e| e.reason == reason).count()
}
