use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::boundary::Boundary;
use crate::device::{Device, DeviceRoster};
use crate::distributions::{GammaTripDistribution, TripDistribution};
use crate::error::FleetError;
use crate::records::{StatusChange, Trip};
use crate::service_day::{DailySimulator, DayStats, ServiceDay};

use super::params::ServiceParams;

/// Everything a run produced: the roster in its end-of-run state plus every
/// day's records, day by day.
#[derive(Debug, Clone, Default)]
pub struct FleetOutput {
    pub devices: Vec<Device>,
    pub status_changes: Vec<StatusChange>,
    pub trips: Vec<Trip>,
    pub days: Vec<(NaiveDate, DayStats)>,
}

/// Simulate every date in `[start_date, end_date]` over one generated roster,
/// with Gamma trip durations.
pub fn run_service(boundary: &Boundary, params: &ServiceParams) -> Result<FleetOutput, FleetError> {
    let distribution = GammaTripDistribution::new();
    run_service_with(boundary, params, &distribution, |_, _| {})
}

/// Like [`run_service`], with a custom trip distribution and a callback after each day.
pub fn run_service_with<F>(
    boundary: &Boundary,
    params: &ServiceParams,
    distribution: &dyn TripDistribution,
    mut on_day: F,
) -> Result<FleetOutput, FleetError>
where
    F: FnMut(NaiveDate, &DayStats),
{
    params.validate()?;

    let mut rng = match params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut devices = DeviceRoster::generate(
        &mut rng,
        params.num_devices,
        &params.provider_name,
        params.provider_id,
        &params.vehicle_types,
        &params.propulsion_types,
    );
    debug!(devices = devices.len(), provider = %params.provider_name, "roster generated");

    let simulator = DailySimulator::new(boundary, params.speed_ms, &params.version, distribution);
    let mut output = FleetOutput::default();

    let mut last_event_time = None;
    for date in params.start_date.iter_days().take(params.num_days()) {
        let day = ServiceDay::new(date, params.hour_open, params.hour_close, params.inactivity)
            .after(last_event_time);
        let day_output = simulator.service_day(&mut rng, &mut devices, &day)?;
        last_event_time = day_output
            .status_changes
            .iter()
            .map(|e| e.event_time)
            .max()
            .or(last_event_time);
        on_day(date, &day_output.stats);
        output.status_changes.extend(day_output.status_changes);
        output.trips.extend(day_output.trips);
        output.days.push((date, day_output.stats));
    }

    output.devices = devices;
    Ok(output)
}
