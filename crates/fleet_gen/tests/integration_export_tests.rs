use std::path::PathBuf;

use chrono::NaiveDate;
use fleet_core::scenario::{run_service, ServiceParams};
use fleet_core::version::MdsVersion;
use fleet_gen::boundary_file::load_boundary;
use fleet_gen::encoding::{DateFormat, Encoder};
use fleet_gen::export::{export_payloads, STATUS_CHANGES_FILE, TRIPS_FILE};
use geo::Point;
use serde_json::Value;

fn sample_boundary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/boundary.geojson")
}

fn read_json(path: &std::path::Path) -> Value {
    let text = std::fs::read_to_string(path).expect("payload file should exist");
    serde_json::from_str(&text).expect("payload should be valid JSON")
}

#[test]
fn test_generate_and_export_sample_area() {
    let boundary = load_boundary(sample_boundary_path()).expect("sample boundary");
    let date = NaiveDate::from_ymd_opt(2024, 6, 1).expect("date");
    let version = MdsVersion::parse("0.3.0").expect("supported");
    let params = ServiceParams::default()
        .with_devices(25)
        .with_seed(99)
        .with_dates(date, date)
        .with_version(version.clone());

    let output = run_service(&boundary, &params).expect("run");
    let (num_events, num_trips) = (output.status_changes.len(), output.trips.len());

    let dir = tempfile::tempdir().expect("temp dir");
    let encoder = Encoder::new(version, DateFormat::Unix);
    let files = export_payloads(dir.path(), &encoder, output.status_changes, output.trips).expect("export");
    assert_eq!(files.status_changes, dir.path().join(STATUS_CHANGES_FILE));
    assert_eq!(files.trips, dir.path().join(TRIPS_FILE));

    let status = read_json(&files.status_changes);
    assert_eq!(status["version"], "0.3.0");
    let events = status["data"]["status_changes"].as_array().expect("array");
    assert_eq!(events.len(), num_events);
    for event in events {
        let coords = &event["event_location"]["geometry"]["coordinates"];
        let point = Point::new(
            coords[0].as_f64().expect("lon"),
            coords[1].as_f64().expect("lat"),
        );
        assert!(boundary.contains(&point));
        assert!(event["event_time"].is_i64());
        assert_eq!(event["publication_time"], event["event_time"]);
    }

    let trips = read_json(&files.trips);
    let trips = trips["data"]["trips"].as_array().expect("array");
    assert_eq!(trips.len(), num_trips);
    for trip in trips {
        assert_eq!(trip["route"]["type"], "FeatureCollection");
        assert_eq!(trip["route"]["features"].as_array().map(Vec::len), Some(2));
        assert_eq!(trip["route"]["features"][0]["properties"]["timestamp"], trip["start_time"]);
        assert!(trip["trip_duration"].as_u64().expect("duration") > 0);
        assert!(trip.get("battery_pct").is_none());
    }
}
