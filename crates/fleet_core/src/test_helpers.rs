//! Shared fixtures for unit tests, integration tests and benches.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::boundary::Boundary;
use crate::device::{Device, DeviceRoster, PropulsionType, VehicleType};

/// Calendar day used by fixtures that need a concrete date.
pub const TEST_DATE: (i32, u32, u32) = (2024, 5, 1);

static NEXT_DEVICE_SEED: AtomicU64 = AtomicU64::new(1);

/// The unit square `[0, 1] x [0, 1]`.
///
/// # Panics
///
/// Never in practice; the square has positive area.
pub fn unit_square() -> Boundary {
    Boundary::from_rect(0.0, 0.0, 1.0, 1.0).expect("unit square has positive area")
}

pub fn test_date() -> NaiveDate {
    let (y, m, d) = TEST_DATE;
    NaiveDate::from_ymd_opt(y, m, d).expect("TEST_DATE should be a valid date")
}

/// `hour:00` UTC on [`TEST_DATE`].
pub fn test_time(hour: u32) -> DateTime<Utc> {
    let naive = test_date().and_hms_opt(hour, 0, 0).expect("hour should be < 24");
    Utc.from_utc_datetime(&naive)
}

/// Seeded roster of `count` devices with a single vehicle and propulsion type.
pub fn roster(
    seed: u64,
    count: usize,
    vehicle_type: VehicleType,
    propulsion_type: PropulsionType,
) -> Vec<Device> {
    let mut rng = StdRng::seed_from_u64(seed);
    DeviceRoster::generate(&mut rng, count, "Test Mobility", None, &[vehicle_type], &[propulsion_type])
}

fn single_device(vehicle_type: VehicleType, propulsion_type: PropulsionType) -> Device {
    let seed = NEXT_DEVICE_SEED.fetch_add(1, Ordering::Relaxed);
    roster(seed, 1, vehicle_type, propulsion_type)
        .pop()
        .expect("roster of one has one device")
}

/// A human-powered bicycle (no battery). Each call yields a distinct device id.
pub fn human_bicycle() -> Device {
    single_device(VehicleType::Bicycle, PropulsionType::Human)
}

/// A fully charged electric scooter. Each call yields a distinct device id.
pub fn electric_scooter() -> Device {
    single_device(VehicleType::Scooter, PropulsionType::Electric)
}
