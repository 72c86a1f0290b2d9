use std::collections::HashMap;

use uuid::Uuid;

use crate::records::{EventType, StatusChange, Trip};

/// Checks every device's event sequence, in emission order:
/// timestamps never go backwards, the event type allows the reason, and a
/// device only changes location after a `reserved` or `removed` event.
/// Returns a message for the first violation found, None if valid.
pub fn validate_device_sequences(events: &[StatusChange]) -> Option<String> {
    let mut last_seen: HashMap<Uuid, &StatusChange> = HashMap::new();

    for (i, event) in events.iter().enumerate() {
        if !event.event_type().allows(event.reason) {
            return Some(format!(
                "Event {} (device {}): reason {} is not valid for event type {}",
                i,
                event.device_id(),
                event.reason.as_str(),
                event.event_type().as_str()
            ));
        }
        if event.event_location.timestamp != event.event_time {
            return Some(format!(
                "Event {} (device {}): location timestamp ({}) != event_time ({})",
                i,
                event.device_id(),
                event.event_location.timestamp,
                event.event_time
            ));
        }

        if let Some(previous) = last_seen.insert(event.device_id(), event) {
            if previous.event_time > event.event_time {
                return Some(format!(
                    "Event {} (device {}): {} at {} precedes previous {} at {}",
                    i,
                    event.device_id(),
                    event.reason.as_str(),
                    event.event_time,
                    previous.reason.as_str(),
                    previous.event_time
                ));
            }
            let may_move = matches!(previous.event_type(), EventType::Reserved | EventType::Removed);
            if !may_move && previous.event_location.point != event.event_location.point {
                return Some(format!(
                    "Event {} (device {}): moved after {} without a trip or removal",
                    i,
                    event.device_id(),
                    previous.reason.as_str()
                ));
            }
        }
    }

    None
}

/// Validates a trip against its own route: start before end, the route's
/// endpoints stamped with the trip's start/end, and a positive duration.
pub fn validate_trip(trip: &Trip) -> Option<String> {
    if trip.start_time > trip.end_time {
        return Some(format!(
            "Trip {}: start_time ({}) > end_time ({})",
            trip.trip_id, trip.start_time, trip.end_time
        ));
    }
    if trip.route.start.timestamp != trip.start_time || trip.route.end.timestamp != trip.end_time {
        return Some(format!("Trip {}: route timestamps do not match trip times", trip.trip_id));
    }
    if trip.trip_duration == 0 {
        return Some(format!("Trip {}: trip_duration must be positive", trip.trip_id));
    }
    None
}
