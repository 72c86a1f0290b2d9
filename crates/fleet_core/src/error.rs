//! Errors surfaced by the fleet simulator.

use thiserror::Error;

/// Everything the core can fail on. In-simulation edge cases (empty samples,
/// battery calls on non-electric devices) are handled locally and never show up here.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FleetError {
    /// The origin handed to a constrained offset is not inside the boundary.
    #[error("origin ({lon}, {lat}) lies outside the boundary")]
    OriginOutsideBoundary { lon: f64, lat: f64 },

    /// Distance decay ran out of steps without landing inside the boundary.
    #[error("no point found inside the boundary near {distance_m} m after {attempts} attempts")]
    NoPointFound { distance_m: f64, attempts: usize },

    /// Rejection sampling hit its draw cap.
    #[error("rejection sampling gave up after {attempts} draws")]
    SamplingExhausted { attempts: usize },

    #[error("boundary has no polygons or a zero-area bounding box")]
    EmptyBoundary,

    #[error("invalid run parameters: {0}")]
    InvalidParams(String),

    #[error("invalid version string: {0}")]
    InvalidVersion(String),

    #[error("version {0} is not supported")]
    UnsupportedVersion(String),

    #[error("payload needs either status changes or trips")]
    EmptyPayload,

    #[error("payload can carry status changes or trips, not both")]
    AmbiguousPayload,
}
