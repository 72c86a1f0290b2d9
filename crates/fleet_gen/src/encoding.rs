//! JSON encoding of payloads.
//!
//! Locations become GeoJSON Point features carrying their timestamp, routes
//! become a two-feature FeatureCollection, UUIDs are strings and timestamps
//! follow the chosen [`DateFormat`].

use std::fmt;
use std::str::FromStr;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, SecondsFormat, Utc};
use fleet_core::device::DeviceIdentity;
use fleet_core::payload::{Payload, PayloadData};
use fleet_core::records::{Location, Route, StatusChange, Trip};
use fleet_core::version::{MdsVersion, TimestampUnit};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value as GeoValue};
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DateFormat {
    /// Numeric epoch time, in the payload version's unit.
    #[default]
    Unix,
    /// RFC 3339 with millisecond precision.
    Iso8601,
    /// Any `strftime` pattern.
    Custom(String),
}

impl FromStr for DateFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unix" => Ok(DateFormat::Unix),
            "iso8601" => Ok(DateFormat::Iso8601),
            "" => Err("date format must not be empty".to_string()),
            pattern if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) => {
                Err(format!("invalid strftime pattern: {pattern}"))
            }
            pattern => Ok(DateFormat::Custom(pattern.to_string())),
        }
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateFormat::Unix => f.write_str("unix"),
            DateFormat::Iso8601 => f.write_str("iso8601"),
            DateFormat::Custom(pattern) => f.write_str(pattern),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Encoder {
    version: MdsVersion,
    date_format: DateFormat,
}

impl Encoder {
    pub fn new(version: MdsVersion, date_format: DateFormat) -> Self {
        Self { version, date_format }
    }

    pub fn version(&self) -> &MdsVersion {
        &self.version
    }

    pub fn encode_time(&self, time: DateTime<Utc>) -> Value {
        match &self.date_format {
            DateFormat::Unix => match self.version.timestamp_unit() {
                TimestampUnit::Seconds => json!(time.timestamp()),
                TimestampUnit::Milliseconds => json!(time.timestamp_millis()),
            },
            DateFormat::Iso8601 => json!(time.to_rfc3339_opts(SecondsFormat::Millis, true)),
            DateFormat::Custom(pattern) => json!(time.format(pattern).to_string()),
        }
    }

    pub fn location_feature(&self, location: &Location) -> Feature {
        let mut properties = JsonObject::new();
        properties.insert("timestamp".to_string(), self.encode_time(location.timestamp));
        Feature {
            bbox: None,
            geometry: Some(Geometry::new(GeoValue::Point(vec![location.lon(), location.lat()]))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }

    pub fn route(&self, route: &Route) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: vec![self.location_feature(&route.start), self.location_feature(&route.end)],
            foreign_members: None,
        }
    }

    fn device_fields(&self, device: &DeviceIdentity) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("provider_id".into(), json!(device.provider_id.to_string()));
        fields.insert("provider_name".into(), json!(device.provider_name));
        fields.insert("device_id".into(), json!(device.device_id.to_string()));
        fields.insert("vehicle_id".into(), json!(device.vehicle_id));
        fields.insert("vehicle_type".into(), json!(device.vehicle_type));
        fields.insert("propulsion_type".into(), json!(device.propulsion_type));
        fields
    }

    pub fn status_change(&self, event: &StatusChange) -> Value {
        let mut fields = self.device_fields(&event.device);
        fields.insert("event_type".into(), json!(event.event_type()));
        fields.insert("event_type_reason".into(), json!(event.reason));
        fields.insert("event_time".into(), self.encode_time(event.event_time));
        fields.insert(
            "event_location".into(),
            json!(self.location_feature(&event.event_location)),
        );
        if let Some(level) = event.battery_pct {
            fields.insert("battery_pct".into(), json!(level));
        }
        if let Some(trip_id) = event.associated_trip {
            fields.insert("associated_trip".into(), json!(trip_id.to_string()));
        }
        if let Some(published) = event.publication_time {
            fields.insert("publication_time".into(), self.encode_time(published));
        }
        Value::Object(fields)
    }

    pub fn trip(&self, trip: &Trip) -> Value {
        let mut fields = self.device_fields(&trip.device);
        fields.insert("trip_id".into(), json!(trip.trip_id.to_string()));
        fields.insert("trip_duration".into(), json!(trip.trip_duration));
        fields.insert("trip_distance".into(), json!(trip.trip_distance));
        fields.insert("route".into(), json!(self.route(&trip.route)));
        fields.insert("accuracy".into(), json!(trip.accuracy));
        fields.insert("start_time".into(), self.encode_time(trip.start_time));
        fields.insert("end_time".into(), self.encode_time(trip.end_time));
        if let Some(url) = &trip.parking_verification_url {
            fields.insert("parking_verification_url".into(), json!(url));
        }
        if let Some(cost) = trip.standard_cost {
            fields.insert("standard_cost".into(), json!(cost));
        }
        if let Some(cost) = trip.actual_cost {
            fields.insert("actual_cost".into(), json!(cost));
        }
        if let Some(published) = trip.publication_time {
            fields.insert("publication_time".into(), self.encode_time(published));
        }
        Value::Object(fields)
    }

    /// `{"version": .., "data": {"status_changes" | "trips": [..]}}`
    pub fn payload(&self, payload: &Payload) -> Value {
        let records: Vec<Value> = match &payload.data {
            PayloadData::StatusChanges(events) => events.iter().map(|e| self.status_change(e)).collect(),
            PayloadData::Trips(trips) => trips.iter().map(|t| self.trip(t)).collect(),
        };
        let mut data = Map::new();
        data.insert(payload.data.key().to_string(), Value::Array(records));
        json!({
            "version": payload.version.to_string(),
            "data": data,
        })
    }
}
