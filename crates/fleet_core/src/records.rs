//! Output records: status-change events and trips.
//!
//! Records are built field by field from a device snapshot; invalid
//! event-type/reason pairs cannot be constructed because the event type is
//! derived from the reason.

use chrono::{DateTime, Utc};
use geo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::device::{Device, DeviceIdentity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Available,
    Reserved,
    Unavailable,
    Removed,
}

impl EventType {
    /// Reasons allowed for this event type.
    pub fn reasons(self) -> &'static [EventTypeReason] {
        use EventTypeReason::*;
        match self {
            EventType::Available => &[ServiceStart, UserDropOff, RebalanceDropOff, MaintenanceDropOff],
            EventType::Reserved => &[UserPickUp],
            EventType::Unavailable => &[Maintenance, LowBattery],
            EventType::Removed => &[ServiceEnd, RebalancePickUp, MaintenancePickUp],
        }
    }

    pub fn allows(self, reason: EventTypeReason) -> bool {
        self.reasons().contains(&reason)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Available => "available",
            EventType::Reserved => "reserved",
            EventType::Unavailable => "unavailable",
            EventType::Removed => "removed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventTypeReason {
    ServiceStart,
    UserDropOff,
    RebalanceDropOff,
    MaintenanceDropOff,
    UserPickUp,
    Maintenance,
    LowBattery,
    ServiceEnd,
    RebalancePickUp,
    MaintenancePickUp,
}

impl EventTypeReason {
    /// The one event type this reason belongs to.
    pub fn event_type(self) -> EventType {
        use EventTypeReason::*;
        match self {
            ServiceStart | UserDropOff | RebalanceDropOff | MaintenanceDropOff => EventType::Available,
            UserPickUp => EventType::Reserved,
            Maintenance | LowBattery => EventType::Unavailable,
            ServiceEnd | RebalancePickUp | MaintenancePickUp => EventType::Removed,
        }
    }

    pub fn as_str(self) -> &'static str {
        use EventTypeReason::*;
        match self {
            ServiceStart => "service_start",
            UserDropOff => "user_drop_off",
            RebalanceDropOff => "rebalance_drop_off",
            MaintenanceDropOff => "maintenance_drop_off",
            UserPickUp => "user_pick_up",
            Maintenance => "maintenance",
            LowBattery => "low_battery",
            ServiceEnd => "service_end",
            RebalancePickUp => "rebalance_pick_up",
            MaintenancePickUp => "maintenance_pick_up",
        }
    }
}

/// A timestamped point; serialized downstream as a GeoJSON Point feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub point: Point<f64>,
    pub timestamp: DateTime<Utc>,
}

impl Location {
    pub fn new(point: Point<f64>, timestamp: DateTime<Utc>) -> Self {
        Self { point, timestamp }
    }

    pub fn lon(&self) -> f64 {
        self.point.x()
    }

    pub fn lat(&self) -> f64 {
        self.point.y()
    }

    /// Same place, later time.
    pub fn at(&self, timestamp: DateTime<Utc>) -> Self {
        Self { point: self.point, timestamp }
    }
}

/// One device status transition.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub device: DeviceIdentity,
    pub reason: EventTypeReason,
    pub event_time: DateTime<Utc>,
    pub event_location: Location,
    pub battery_pct: Option<f64>,
    pub associated_trip: Option<Uuid>,
    pub publication_time: Option<DateTime<Utc>>,
}

impl StatusChange {
    /// Snapshot `device` (identity and current charge) into a new event.
    pub fn new(device: &Device, reason: EventTypeReason, event_time: DateTime<Utc>, point: Point<f64>) -> Self {
        Self {
            device: device.identity.clone(),
            reason,
            event_time,
            event_location: Location::new(point, event_time),
            battery_pct: device.battery(),
            associated_trip: None,
            publication_time: None,
        }
    }

    pub fn event_type(&self) -> EventType {
        self.reason.event_type()
    }

    pub fn device_id(&self) -> Uuid {
        self.device.device_id
    }

    pub fn with_associated_trip(mut self, trip_id: Uuid) -> Self {
        self.associated_trip = Some(trip_id);
        self
    }

    pub fn with_publication_time(mut self, publication_time: DateTime<Utc>) -> Self {
        self.publication_time = Some(publication_time);
        self
    }
}

/// Ordered start/end pair of a trip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Route {
    pub start: Location,
    pub end: Location,
}

/// A completed ride. Carries device identity but never the battery level.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub device: DeviceIdentity,
    pub trip_id: Uuid,
    /// Seconds.
    pub trip_duration: u64,
    /// Meters.
    pub trip_distance: u64,
    /// Meters.
    pub accuracy: u64,
    pub route: Route,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub parking_verification_url: Option<String>,
    /// Cents.
    pub standard_cost: Option<i64>,
    /// Cents.
    pub actual_cost: Option<i64>,
    pub publication_time: Option<DateTime<Utc>>,
}

impl Trip {
    pub fn device_id(&self) -> Uuid {
        self.device.device_id
    }
}
