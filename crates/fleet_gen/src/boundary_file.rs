//! Load a service-area boundary from a local GeoJSON file.
//!
//! Accepts a FeatureCollection, a single Feature or a bare Geometry. Every
//! Polygon / MultiPolygon found (including inside GeometryCollections) is
//! unioned into one shape; other geometry kinds are skipped.

use std::path::Path;

use anyhow::{bail, Context, Result};
use fleet_core::boundary::Boundary;
use geo::{BooleanOps, MultiPolygon};
use geojson::GeoJson;
use tracing::debug;

pub fn load_boundary(path: impl AsRef<Path>) -> Result<Boundary> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading boundary file {}", path.display()))?;
    parse_boundary(&text).with_context(|| format!("parsing boundary file {}", path.display()))
}

pub fn parse_boundary(text: &str) -> Result<Boundary> {
    let geojson: GeoJson = text.parse()?;
    let geometries = match geojson {
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .filter_map(|feature| feature.geometry)
            .collect(),
        GeoJson::Feature(feature) => feature.geometry.into_iter().collect(),
        GeoJson::Geometry(geometry) => vec![geometry],
    };

    let mut polygons: Vec<MultiPolygon<f64>> = Vec::new();
    for geometry in geometries {
        let geometry: geo::Geometry<f64> = geometry.try_into()?;
        collect_polygons(geometry, &mut polygons);
    }
    debug!(parts = polygons.len(), "boundary polygons collected");

    let mut parts = polygons.into_iter();
    let Some(first) = parts.next() else {
        bail!("boundary contains no Polygon or MultiPolygon geometry");
    };
    let shape = parts.fold(first, |acc, next| acc.union(&next));
    Ok(Boundary::new(shape)?)
}

fn collect_polygons(geometry: geo::Geometry<f64>, out: &mut Vec<MultiPolygon<f64>>) {
    match geometry {
        geo::Geometry::Polygon(polygon) => out.push(MultiPolygon::new(vec![polygon])),
        geo::Geometry::MultiPolygon(multi) => out.push(multi),
        geo::Geometry::GeometryCollection(collection) => {
            for inner in collection {
                collect_polygons(inner, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Area, Point};

    const SQUARE: &str = r#"{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,1],[0,0]]]}"#;

    #[test]
    fn bare_polygon() {
        let boundary = parse_boundary(SQUARE).expect("polygon");
        assert!(boundary.contains(&Point::new(0.5, 0.5)));
        assert!(!boundary.contains(&Point::new(1.5, 0.5)));
    }

    #[test]
    fn feature_collection_is_unioned() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type":"Feature","properties":{},"geometry":
                    {"type":"Polygon","coordinates":[[[0,0],[2,0],[2,1],[0,1],[0,0]]]}},
                {"type":"Feature","properties":{},"geometry":
                    {"type":"Polygon","coordinates":[[[1,0],[3,0],[3,1],[1,1],[1,0]]]}},
                {"type":"Feature","properties":{},"geometry":
                    {"type":"Point","coordinates":[10,10]}}
            ]
        }"#;
        let boundary = parse_boundary(text).expect("collection");
        assert!((boundary.shape().unsigned_area() - 3.0).abs() < 1e-9);
        assert!(boundary.contains(&Point::new(2.5, 0.5)));
    }

    #[test]
    fn no_polygons_is_an_error() {
        let text = r#"{"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[1,1]}}"#;
        assert!(parse_boundary(text).is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("boundary.geojson");
        std::fs::write(&path, SQUARE).expect("write");
        assert!(load_boundary(&path).is_ok());
        assert!(load_boundary(dir.path().join("missing.geojson")).is_err());
    }
}
