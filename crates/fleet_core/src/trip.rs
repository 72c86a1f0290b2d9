//! Trip generation: one ride for one device, bracketed by a pick-up and a
//! drop-off status change.

use chrono::{DateTime, Duration, Utc};
use geo::Point;
use rand::Rng;

use crate::battery;
use crate::boundary::Boundary;
use crate::device::Device;
use crate::distributions::{random_file_url, random_time_between, random_uuid, TripDistribution};
use crate::error::FleetError;
use crate::records::{EventTypeReason, Location, Route, StatusChange, Trip};
use crate::spatial::point_nearby_within;
use crate::version::MdsVersion;

/// Share of straight-line distance actually covered (turns, traffic, detours).
pub const ROUTE_EFFICIENCY: f64 = 0.8;

/// Flat "standard" pricing, in cents.
pub const STANDARD_BASE_COST: i64 = 100;
pub const STANDARD_PER_MINUTE: i64 = 15;

/// Ranges for the randomized "actual" pricing, in cents.
pub const ACTUAL_BASE_COST_RANGE: (i64, i64) = (75, 150);
pub const ACTUAL_PER_MINUTE_RANGE: (i64, i64) = (12, 20);

/// Where and when a trip starts. Anything left `None` is sampled.
#[derive(Debug, Clone, Default)]
pub struct TripContext {
    /// Exact start time; wins over `reference_time`.
    pub start_time: Option<DateTime<Utc>>,
    /// Anchor for a random start in `[reference + min_offset, reference + max_offset]`.
    pub reference_time: Option<DateTime<Utc>>,
    pub min_offset: Duration,
    pub max_offset: Duration,
    pub start_location: Option<Point<f64>>,
    pub end_location: Option<Point<f64>>,
    /// Overrides the generator's average speed (m/s).
    pub speed_ms: Option<f64>,
}

impl TripContext {
    pub fn starting_at(start_time: DateTime<Utc>) -> Self {
        Self {
            start_time: Some(start_time),
            ..Default::default()
        }
    }

    /// Random start between `reference + min_offset` and `reference + max_offset`.
    pub fn anchored(reference: DateTime<Utc>, min_offset: Duration, max_offset: Duration) -> Self {
        Self {
            reference_time: Some(reference),
            min_offset,
            max_offset,
            ..Default::default()
        }
    }

    pub fn from_location(mut self, start: Point<f64>) -> Self {
        self.start_location = Some(start);
        self
    }

    pub fn to_location(mut self, end: Point<f64>) -> Self {
        self.end_location = Some(end);
        self
    }

    pub fn with_speed(mut self, speed_ms: f64) -> Self {
        self.speed_ms = Some(speed_ms);
        self
    }
}

/// A trip plus its `[pick-up, drop-off]` events.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedTrip {
    pub events: [StatusChange; 2],
    pub trip: Trip,
}

impl GeneratedTrip {
    pub fn end_event(&self) -> &StatusChange {
        &self.events[1]
    }
}

/// Build a status change, stamping `publication_time` when the version has it.
pub(crate) fn status_change_event(
    version: &MdsVersion,
    device: &Device,
    reason: EventTypeReason,
    event_time: DateTime<Utc>,
    point: Point<f64>,
) -> StatusChange {
    let event = StatusChange::new(device, reason, event_time, point);
    if version.has_publication_time() {
        event.with_publication_time(event_time)
    } else {
        event
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TripGenerator<'a> {
    pub boundary: &'a Boundary,
    /// Average device speed (m/s).
    pub speed_ms: f64,
    pub version: &'a MdsVersion,
    pub distribution: &'a dyn TripDistribution,
}

impl<'a> TripGenerator<'a> {
    pub fn new(
        boundary: &'a Boundary,
        speed_ms: f64,
        version: &'a MdsVersion,
        distribution: &'a dyn TripDistribution,
    ) -> Self {
        Self {
            boundary,
            speed_ms,
            version,
            distribution,
        }
    }

    /// Generate one trip for `device`, draining its battery.
    pub fn generate<R: Rng>(
        &self,
        rng: &mut R,
        device: &mut Device,
        context: &TripContext,
    ) -> Result<GeneratedTrip, FleetError> {
        let start_time = match (context.start_time, context.reference_time) {
            (Some(start), _) => start,
            (None, Some(reference)) => {
                random_time_between(rng, reference, context.min_offset, context.max_offset)
            }
            (None, None) => {
                return Err(FleetError::InvalidParams(
                    "trip needs a start time or a reference time".to_string(),
                ))
            }
        };
        let start_point = match context.start_location {
            Some(point) => point,
            None => self.boundary.random_point_within(rng)?,
        };
        let speed = context.speed_ms.unwrap_or(self.speed_ms);
        let trip_id = random_uuid(rng);

        let pick_up = status_change_event(self.version, device, EventTypeReason::UserPickUp, start_time, start_point)
            .with_associated_trip(trip_id);

        let duration_secs = self.distribution.sample_duration_secs(rng);
        let distance_m = duration_secs * speed * ROUTE_EFFICIENCY;
        let accuracy_m = self.distribution.sample_accuracy_m(rng);

        if device.has_battery() {
            // sqrt(d) / 200 == d / (sqrt(d) * 200), without the 0/0 at d == 0.
            battery::drain(device, speed / 100.0, distance_m.sqrt() / 200.0);
        }

        let end_time = start_time + Duration::milliseconds((duration_secs * 1000.0).round() as i64);
        let end_point = match context.end_location {
            Some(point) => point,
            None => point_nearby_within(rng, start_point, distance_m, None, self.boundary)?,
        };

        let route = Route {
            start: Location::new(start_point, start_time),
            end: Location::new(end_point, end_time),
        };

        let minutes = (duration_secs / 60.0).floor() as i64;
        let parking_verification_url = rng
            .gen_bool(0.5)
            .then(|| random_file_url(rng, &device.identity.provider_name));
        let standard_cost = rng
            .gen_bool(0.5)
            .then(|| STANDARD_BASE_COST + (minutes - 1) * STANDARD_PER_MINUTE);
        let actual_cost = if rng.gen_bool(0.5) {
            let base = rng.gen_range(ACTUAL_BASE_COST_RANGE.0..=ACTUAL_BASE_COST_RANGE.1);
            let per_minute = rng.gen_range(ACTUAL_PER_MINUTE_RANGE.0..=ACTUAL_PER_MINUTE_RANGE.1);
            Some(base + (minutes - 1) * per_minute)
        } else {
            None
        };

        let trip = Trip {
            device: device.identity.clone(),
            trip_id,
            trip_duration: (duration_secs as u64).max(1),
            trip_distance: distance_m.max(0.0) as u64,
            accuracy: accuracy_m.max(0.0) as u64,
            route,
            start_time,
            end_time,
            parking_verification_url,
            standard_cost,
            actual_cost,
            publication_time: self.version.has_publication_time().then_some(end_time),
        };

        let drop_off = status_change_event(self.version, device, EventTypeReason::UserDropOff, end_time, end_point)
            .with_associated_trip(trip_id);

        Ok(GeneratedTrip {
            events: [pick_up, drop_off],
            trip,
        })
    }
}
