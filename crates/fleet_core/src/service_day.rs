//! Daily service simulator: one calendar day of fleet activity.
//!
//! Per device the day runs
//! `pending -> active -> (tripping <-> idle) -> [low-battery removed -> recharged -> active] -> ended`.
//!
//! The roster is split into day-inactive devices (a `service_start` and a
//! `service_end` at the same spot, nothing else) and active devices, which
//! are ticked once per operating hour from open to close inclusive. Each tick
//! may return low-battery devices to service, pulls devices under the
//! low-battery threshold, and lets the rest take at most one trip.
//!
//! Every event for a device is emitted in time order and starts where the
//! previous one left the device.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use geo::Point;
use rand::seq::index;
use rand::Rng;
use tracing::{debug, trace};

use crate::battery;
use crate::boundary::Boundary;
use crate::device::Device;
use crate::distributions::{random_time_between, TripDistribution};
use crate::error::FleetError;
use crate::records::{EventTypeReason, StatusChange, Trip};
use crate::trip::{status_change_event, TripContext, TripGenerator};
use crate::version::MdsVersion;

/// Devices are placed up to this many hours before opening and collected up
/// to this many hours after closing.
pub const SERVICE_JITTER_HOURS: i64 = 2;

/// Upper bound of the per-hour drain rate for a device that sits idle.
pub const IDLE_LEAK_MAX_RATE: f64 = 0.05;

const HOUR_MS: i64 = 60 * 60 * 1000;

/// Calendar and fleet settings for one simulated day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceDay {
    pub date: NaiveDate,
    pub hour_open: u32,
    /// Inclusive: the closing hour is simulated too.
    pub hour_close: u32,
    /// Fraction of the roster held out for the whole day, and the per-hour
    /// probability that an active device skips taking a trip.
    pub inactivity: f64,
    /// Earliest allowed `service_start`, when this day follows another one.
    pub not_before: Option<DateTime<Utc>>,
}

impl ServiceDay {
    pub fn new(date: NaiveDate, hour_open: u32, hour_close: u32, inactivity: f64) -> Self {
        Self {
            date,
            hour_open,
            hour_close,
            inactivity,
            not_before: None,
        }
    }

    pub fn after(mut self, not_before: Option<DateTime<Utc>>) -> Self {
        self.not_before = not_before;
        self
    }

    /// Chance that an active device takes a trip in a given hour. Shares the
    /// `inactivity` knob with the day-inactive fraction.
    pub fn trip_probability(&self) -> f64 {
        (1.0 - self.inactivity).clamp(0.0, 1.0)
    }

    /// Number of day-inactive devices for a roster of `roster_len`.
    pub fn inactive_count(&self, roster_len: usize) -> usize {
        let count = (roster_len as f64 * self.inactivity.clamp(0.0, 1.0)).floor() as usize;
        count.min(roster_len)
    }

    pub fn hour_start(&self, hour: u32) -> Result<DateTime<Utc>, FleetError> {
        let naive = self
            .date
            .and_hms_opt(hour, 0, 0)
            .ok_or_else(|| FleetError::InvalidParams(format!("hour {hour} is not a valid hour of day")))?;
        Ok(Utc.from_utc_datetime(&naive))
    }
}

/// Where an in-service (or removed) device was last seen, by roster index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedDevice {
    pub index: usize,
    pub last_time: DateTime<Utc>,
    pub last_point: Point<f64>,
}

impl TrackedDevice {
    fn follow(&mut self, event: &StatusChange) {
        self.last_time = event.event_time;
        self.last_point = event.event_location.point;
    }
}

/// Result of one operating hour.
#[derive(Debug, Clone, Default)]
pub struct HourOutput {
    /// Devices still in service after the hour, in processing order.
    pub active: Vec<TrackedDevice>,
    /// Devices pulled for low battery this hour; `last_time` is the removal time.
    pub removed: Vec<TrackedDevice>,
    pub status_changes: Vec<StatusChange>,
    pub trips: Vec<Trip>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayStats {
    pub inactive_devices: usize,
    pub active_devices: usize,
    pub low_battery_removals: usize,
    pub recharges: usize,
    pub trips: usize,
}

/// Everything one simulated day produced.
#[derive(Debug, Clone, Default)]
pub struct DayOutput {
    /// Roster indices of the day-inactive devices, ascending.
    pub inactive: Vec<usize>,
    pub status_changes: Vec<StatusChange>,
    pub trips: Vec<Trip>,
    pub stats: DayStats,
}

/// Drives trip generation and battery cycles across the hours of a day.
#[derive(Debug, Clone, Copy)]
pub struct DailySimulator<'a> {
    trips: TripGenerator<'a>,
}

impl<'a> DailySimulator<'a> {
    pub fn new(
        boundary: &'a Boundary,
        speed_ms: f64,
        version: &'a MdsVersion,
        distribution: &'a dyn TripDistribution,
    ) -> Self {
        Self {
            trips: TripGenerator::new(boundary, speed_ms, version, distribution),
        }
    }

    pub fn trip_generator(&self) -> &TripGenerator<'a> {
        &self.trips
    }

    fn boundary(&self) -> &'a Boundary {
        self.trips.boundary
    }

    fn event(&self, device: &Device, reason: EventTypeReason, time: DateTime<Utc>, point: Point<f64>) -> StatusChange {
        status_change_event(self.trips.version, device, reason, time, point)
    }

    /// Place `indices` into service some time in the two hours before `open_at`
    /// (never before `not_before`), each at a fresh random spot. `recharge`
    /// tops up batteries first.
    pub fn start_service<R: Rng>(
        &self,
        rng: &mut R,
        devices: &mut [Device],
        indices: &[usize],
        open_at: DateTime<Utc>,
        not_before: Option<DateTime<Utc>>,
        recharge: bool,
    ) -> Result<(Vec<TrackedDevice>, Vec<StatusChange>), FleetError> {
        let mut tracked = Vec::with_capacity(indices.len());
        let mut events = Vec::with_capacity(indices.len());
        for &index in indices {
            let device = &mut devices[index];
            if recharge {
                battery::recharge(device);
            }
            let mut time = random_time_between(rng, open_at, -Duration::hours(SERVICE_JITTER_HOURS), Duration::zero());
            if let Some(earliest) = not_before {
                time = time.max(earliest);
            }
            let point = self.boundary().random_point_within(rng)?;
            events.push(self.event(device, EventTypeReason::ServiceStart, time, point));
            tracked.push(TrackedDevice {
                index,
                last_time: time,
                last_point: point,
            });
        }
        Ok((tracked, events))
    }

    /// Collect devices in the two hours after `close_at`, where they were last seen.
    /// Never earlier than a device's last event.
    pub fn end_service<R: Rng>(
        &self,
        rng: &mut R,
        devices: &[Device],
        tracked: &[TrackedDevice],
        close_at: DateTime<Utc>,
    ) -> Vec<StatusChange> {
        tracked
            .iter()
            .map(|t| {
                let time = random_time_between(rng, close_at, Duration::zero(), Duration::hours(SERVICE_JITTER_HOURS))
                    .max(t.last_time);
                self.event(&devices[t.index], EventTypeReason::ServiceEnd, time, t.last_point)
            })
            .collect()
    }

    /// Return a uniformly sized random subset of `removed` to service, recharged
    /// in place. Each drop-off lands between `max(removal, hour_start)` and the
    /// next top of the hour. An empty pool is a no-op.
    pub fn recharge_removed<R: Rng>(
        &self,
        rng: &mut R,
        devices: &mut [Device],
        removed: &mut Vec<TrackedDevice>,
        hour_start: DateTime<Utc>,
    ) -> (Vec<TrackedDevice>, Vec<StatusChange>) {
        if removed.is_empty() {
            return (Vec::new(), Vec::new());
        }

        let count = rng.gen_range(0..=removed.len());
        let mut picked = vec![false; removed.len()];
        for i in index::sample(rng, removed.len(), count) {
            picked[i] = true;
        }

        let mut recharged = Vec::with_capacity(count);
        let mut events = Vec::with_capacity(count);
        let mut remaining = Vec::with_capacity(removed.len() - count);
        for (mut tracked, picked) in removed.drain(..).zip(picked) {
            if !picked {
                remaining.push(tracked);
                continue;
            }
            let device = &mut devices[tracked.index];
            battery::recharge(device);
            let anchor = tracked.last_time.max(hour_start);
            let time = random_time_between(rng, anchor, Duration::zero(), until_next_hour(anchor));
            let event = self.event(device, EventTypeReason::MaintenanceDropOff, time, tracked.last_point);
            tracked.follow(&event);
            events.push(event);
            recharged.push(tracked);
        }
        *removed = remaining;
        (recharged, events)
    }

    /// Simulate one operating hour for the devices in `active`.
    ///
    /// A battery device under the low-battery threshold is pulled at once and
    /// takes no trip. Every other device takes a trip with probability
    /// `trip_probability`, started somewhere between its last event (or the top
    /// of the hour, if later) and the end of the hour; idle battery devices
    /// leak a little charge instead.
    pub fn service_hour<R: Rng>(
        &self,
        rng: &mut R,
        devices: &mut [Device],
        active: Vec<TrackedDevice>,
        hour_start: DateTime<Utc>,
        trip_probability: f64,
    ) -> Result<HourOutput, FleetError> {
        let hour_end = hour_start + Duration::hours(1);
        let mut output = HourOutput {
            active: Vec::with_capacity(active.len()),
            ..Default::default()
        };

        for mut tracked in active {
            let device = &mut devices[tracked.index];

            if battery::is_low(device) {
                let time = tracked.last_time.max(hour_start);
                let event = self.event(device, EventTypeReason::LowBattery, time, tracked.last_point);
                tracked.follow(&event);
                output.status_changes.push(event);
                output.removed.push(tracked);
                continue;
            }

            if rng.gen_bool(trip_probability.clamp(0.0, 1.0)) {
                let window_start = tracked.last_time.max(hour_start);
                let window = (hour_end - window_start).max(Duration::zero());
                let context = TripContext::anchored(window_start, Duration::zero(), window)
                    .from_location(tracked.last_point);
                let generated = self.trips.generate(rng, device, &context)?;
                tracked.follow(generated.end_event());
                output.status_changes.extend(generated.events);
                output.trips.push(generated.trip);
            } else if device.has_battery() {
                battery::drain(device, 0.0, rng.gen_range(0.0..=IDLE_LEAK_MAX_RATE));
            }

            output.active.push(tracked);
        }

        Ok(output)
    }

    /// Simulate a full service day over the whole roster.
    pub fn service_day<R: Rng>(
        &self,
        rng: &mut R,
        devices: &mut [Device],
        day: &ServiceDay,
    ) -> Result<DayOutput, FleetError> {
        let open_at = day.hour_start(day.hour_open)?;
        let close_at = day.hour_start(day.hour_close)?;
        let mut output = DayOutput::default();

        let mut inactive: Vec<usize> = index::sample(rng, devices.len(), day.inactive_count(devices.len())).into_vec();
        inactive.sort_unstable();
        let mut is_inactive = vec![false; devices.len()];
        for &i in &inactive {
            is_inactive[i] = true;
        }
        let active_indices: Vec<usize> = (0..devices.len()).filter(|i| !is_inactive[*i]).collect();
        output.stats.inactive_devices = inactive.len();
        output.stats.active_devices = active_indices.len();
        output.inactive = inactive.clone();

        // Day-inactive devices: out and back at the same spot, batteries untouched.
        let (parked, starts) = self.start_service(rng, devices, &inactive, open_at, day.not_before, false)?;
        output.status_changes.extend(starts);
        output
            .status_changes
            .extend(self.end_service(rng, devices, &parked, close_at));

        let (mut active, starts) = self.start_service(rng, devices, &active_indices, open_at, day.not_before, true)?;
        output.status_changes.extend(starts);

        let mut removed: Vec<TrackedDevice> = Vec::new();
        for hour in day.hour_open..=day.hour_close {
            let hour_start = day.hour_start(hour)?;

            let (recharged, events) = self.recharge_removed(rng, devices, &mut removed, hour_start);
            output.stats.recharges += recharged.len();
            output.status_changes.extend(events);
            active.extend(recharged);

            let hour_output = self.service_hour(rng, devices, active, hour_start, day.trip_probability())?;
            trace!(
                hour,
                active = hour_output.active.len(),
                removed = hour_output.removed.len(),
                trips = hour_output.trips.len(),
                "service hour complete"
            );
            output.stats.low_battery_removals += hour_output.removed.len();
            output.stats.trips += hour_output.trips.len();
            output.status_changes.extend(hour_output.status_changes);
            output.trips.extend(hour_output.trips);
            removed.extend(hour_output.removed);
            active = hour_output.active;
        }

        // Devices still waiting on a recharge are collected with the rest.
        active.extend(removed);
        output
            .status_changes
            .extend(self.end_service(rng, devices, &active, close_at));

        debug!(
            date = %day.date,
            inactive = output.stats.inactive_devices,
            active = output.stats.active_devices,
            trips = output.stats.trips,
            low_battery = output.stats.low_battery_removals,
            recharges = output.stats.recharges,
            events = output.status_changes.len(),
            "service day complete"
        );
        Ok(output)
    }
}

/// Time from `time` to the next top of the hour (a full hour when already on one).
fn until_next_hour(time: DateTime<Utc>) -> Duration {
    let ms = time.timestamp_millis();
    let next = (ms.div_euclid(HOUR_MS) + 1) * HOUR_MS;
    Duration::milliseconds(next - ms)
}
