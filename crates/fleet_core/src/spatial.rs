//! Geospatial offsets on a spherical Earth.
//!
//! `destination_point` is the direct great-circle formula; `point_nearby_within`
//! adds a boundary constraint with bearing retries and distance decay.

use std::f64::consts::TAU;

use geo::Point;
use rand::Rng;
use tracing::debug;

use crate::boundary::Boundary;
use crate::error::FleetError;

/// Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_378_100.0;

/// Fresh random bearings tried at each distance before decaying.
pub const RANDOM_BEARING_ATTEMPTS: usize = 50;

/// Multiplier applied to the distance after a failed round.
pub const DISTANCE_DECAY: f64 = 0.9;

/// Decay rounds before giving up (0.9^400 ~ 5e-19).
pub const MAX_DECAY_STEPS: usize = 400;

/// Point `distance_m` from `origin` along `bearing_rad` (clockwise from north).
pub fn destination_point(origin: Point<f64>, distance_m: f64, bearing_rad: f64) -> Point<f64> {
    let lat1 = origin.y().to_radians();
    let lon1 = origin.x().to_radians();
    let ang_dist = distance_m / EARTH_RADIUS_M;

    let lat2 = (lat1.sin() * ang_dist.cos() + lat1.cos() * ang_dist.sin() * bearing_rad.cos()).asin();
    let lon2 = lon1
        + (bearing_rad.sin() * ang_dist.sin() * lat1.cos())
            .atan2(ang_dist.cos() - lat1.sin() * lat2.sin());

    Point::new(lon2.to_degrees(), lat2.to_degrees())
}

/// Point `distance_m` from `origin`, along `bearing_rad` or a uniform random bearing.
pub fn point_nearby<R: Rng + ?Sized>(
    rng: &mut R,
    origin: Point<f64>,
    distance_m: f64,
    bearing_rad: Option<f64>,
) -> Point<f64> {
    let bearing = bearing_rad.unwrap_or_else(|| rng.gen_range(0.0..TAU));
    destination_point(origin, distance_m, bearing)
}

/// Like [`point_nearby`] but the result must lie inside `boundary`.
///
/// Each round tries one point for a fixed bearing, or up to
/// [`RANDOM_BEARING_ATTEMPTS`] fresh bearings, then shrinks the distance by
/// [`DISTANCE_DECAY`]. An origin outside the boundary can never be satisfied
/// and fails immediately.
pub fn point_nearby_within<R: Rng + ?Sized>(
    rng: &mut R,
    origin: Point<f64>,
    distance_m: f64,
    bearing_rad: Option<f64>,
    boundary: &Boundary,
) -> Result<Point<f64>, FleetError> {
    if !boundary.contains(&origin) {
        return Err(FleetError::OriginOutsideBoundary {
            lon: origin.x(),
            lat: origin.y(),
        });
    }
    if distance_m <= 0.0 {
        return Ok(origin);
    }

    let per_round = if bearing_rad.is_some() { 1 } else { RANDOM_BEARING_ATTEMPTS };
    let mut distance = distance_m;
    let mut attempts = 0;
    for step in 0..=MAX_DECAY_STEPS {
        for _ in 0..per_round {
            attempts += 1;
            let candidate = point_nearby(rng, origin, distance, bearing_rad);
            if boundary.contains(&candidate) {
                if step > 0 {
                    debug!(requested_m = distance_m, used_m = distance, step, "distance decayed to stay inside boundary");
                }
                return Ok(candidate);
            }
        }
        distance *= DISTANCE_DECAY;
    }

    Err(FleetError::NoPointFound {
        distance_m,
        attempts,
    })
}

/// Haversine distance in meters on the same sphere as [`destination_point`].
pub fn great_circle_distance_m(a: Point<f64>, b: Point<f64>) -> f64 {
    let (lat1, lon1) = (a.y().to_radians(), a.x().to_radians());
    let (lat2, lon2) = (b.y().to_radians(), b.x().to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let sin_dlat = (dlat * 0.5).sin();
    let sin_dlon = (dlon * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}
