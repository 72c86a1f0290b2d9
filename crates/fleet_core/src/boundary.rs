//! Boundary geometry: the service-area polygon(s) devices operate in.
//!
//! Longitude is `x` and latitude is `y`, in degrees. Containment is strict:
//! points on the outline are outside.

use geo::{Area, BoundingRect, Contains, Coord, MultiPolygon, Point, Polygon, Rect};
use rand::Rng;

use crate::error::FleetError;

/// Draw cap for rejection sampling. Generous: a boundary filling 1% of its
/// bounding box fails with probability ~e^-100.
pub const MAX_SAMPLING_ATTEMPTS: usize = 10_000;

/// Immutable service area, possibly made of several disjoint polygons.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    shape: MultiPolygon<f64>,
    bounds: Rect<f64>,
}

impl Boundary {
    /// Wrap a (multi)polygon. Fails for empty or zero-area shapes.
    pub fn new(shape: MultiPolygon<f64>) -> Result<Self, FleetError> {
        let bounds = shape.bounding_rect().ok_or(FleetError::EmptyBoundary)?;
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 || shape.unsigned_area() <= 0.0 {
            return Err(FleetError::EmptyBoundary);
        }
        Ok(Self { shape, bounds })
    }

    pub fn from_polygon(polygon: Polygon<f64>) -> Result<Self, FleetError> {
        Self::new(MultiPolygon::new(vec![polygon]))
    }

    /// Axis-aligned rectangle in degrees.
    pub fn from_rect(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Result<Self, FleetError> {
        let rect = Rect::new(
            Coord { x: min_lon, y: min_lat },
            Coord { x: max_lon, y: max_lat },
        );
        Self::from_polygon(rect.to_polygon())
    }

    pub fn shape(&self) -> &MultiPolygon<f64> {
        &self.shape
    }

    pub fn bounds(&self) -> Rect<f64> {
        self.bounds
    }

    pub fn contains(&self, point: &Point<f64>) -> bool {
        self.shape.contains(point)
    }

    /// Uniform point inside the boundary by rejection sampling over the bounding box.
    pub fn random_point_within<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Point<f64>, FleetError> {
        let min = self.bounds.min();
        let max = self.bounds.max();
        for _ in 0..MAX_SAMPLING_ATTEMPTS {
            let point = Point::new(rng.gen_range(min.x..=max.x), rng.gen_range(min.y..=max.y));
            if self.contains(&point) {
                return Ok(point);
            }
        }
        Err(FleetError::SamplingExhausted {
            attempts: MAX_SAMPLING_ATTEMPTS,
        })
    }
}
