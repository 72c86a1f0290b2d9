//! Probability distributions and random helpers for trips and records.
//!
//! Trip durations follow a right-skewed Gamma(3, 4.5) in minutes and GPS
//! accuracy a Rayleigh with scale 5 m. Every sampler takes the caller's RNG so
//! a seeded run stays reproducible end to end.

use chrono::{DateTime, Duration, Utc};
use rand::{Rng, RngCore};
use rand_distr::{Distribution, Gamma};
use uuid::Uuid;

/// Gamma shape for trip duration (minutes).
pub const TRIP_DURATION_SHAPE: f64 = 3.0;
/// Gamma scale for trip duration (minutes).
pub const TRIP_DURATION_SCALE: f64 = 4.5;
/// Rayleigh scale for positional accuracy (meters).
pub const ACCURACY_SCALE_M: f64 = 5.0;

/// Trait for sampling per-trip quantities.
pub trait TripDistribution: Send + Sync + std::fmt::Debug {
    /// Sample a trip duration in seconds. Must be > 0.
    fn sample_duration_secs(&self, rng: &mut dyn RngCore) -> f64;

    /// Sample a positional accuracy in meters.
    fn sample_accuracy_m(&self, rng: &mut dyn RngCore) -> f64;
}

/// Gamma durations and Rayleigh accuracy.
#[derive(Debug, Clone)]
pub struct GammaTripDistribution {
    duration_minutes: Gamma<f64>,
    accuracy_scale_m: f64,
}

impl GammaTripDistribution {
    pub fn new() -> Self {
        Self {
            duration_minutes: Gamma::new(TRIP_DURATION_SHAPE, TRIP_DURATION_SCALE)
                .expect("gamma shape and scale are positive constants"),
            accuracy_scale_m: ACCURACY_SCALE_M,
        }
    }
}

impl Default for GammaTripDistribution {
    fn default() -> Self {
        Self::new()
    }
}

impl TripDistribution for GammaTripDistribution {
    fn sample_duration_secs(&self, rng: &mut dyn RngCore) -> f64 {
        let minutes = self.duration_minutes.sample(rng);
        // Gamma has support (0, inf) but can round to 0.0 in f64.
        (minutes * 60.0).max(f64::MIN_POSITIVE)
    }

    fn sample_accuracy_m(&self, rng: &mut dyn RngCore) -> f64 {
        sample_rayleigh(rng, self.accuracy_scale_m)
    }
}

/// Fixed duration and accuracy, for deterministic tests and benchmarks.
#[derive(Debug, Clone, Copy)]
pub struct FixedTripDistribution {
    pub duration_secs: f64,
    pub accuracy_m: f64,
}

impl TripDistribution for FixedTripDistribution {
    fn sample_duration_secs(&self, _rng: &mut dyn RngCore) -> f64 {
        self.duration_secs
    }

    fn sample_accuracy_m(&self, _rng: &mut dyn RngCore) -> f64 {
        self.accuracy_m
    }
}

/// Rayleigh sample by inverse transform: `scale * sqrt(-2 ln U)`.
pub fn sample_rayleigh<R: Rng + ?Sized>(rng: &mut R, scale: f64) -> f64 {
    let u: f64 = rng.gen();
    let u = u.max(1e-10); // Avoid log(0)
    scale * (-2.0 * u.ln()).sqrt()
}

/// A time uniformly placed in `[reference + min_offset, reference + max_offset]`.
/// The offsets may be given in either order and may be negative.
pub fn random_time_between<R: Rng + ?Sized>(
    rng: &mut R,
    reference: DateTime<Utc>,
    min_offset: Duration,
    max_offset: Duration,
) -> DateTime<Utc> {
    let lo = min_offset.min(max_offset).num_milliseconds();
    let hi = min_offset.max(max_offset).num_milliseconds();
    if lo == hi {
        return reference + Duration::milliseconds(lo);
    }
    reference + Duration::milliseconds(rng.gen_range(lo..=hi))
}

const ID_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Random string of uppercase letters and digits.
pub fn random_string<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| ID_CHARS[rng.gen_range(0..ID_CHARS.len())] as char)
        .collect()
}

/// A v4 UUID drawn from the given RNG.
pub fn random_uuid<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    uuid::Builder::from_random_bytes(rng.gen()).into_uuid()
}

/// Random image URL on the company's host, e.g. `https://acme-mobility.co/x7k2p0q.jpg`.
pub fn random_file_url<R: Rng + ?Sized>(rng: &mut R, company: &str) -> String {
    let host = company.split_whitespace().collect::<Vec<_>>().join("-");
    format!("https://{}.co/{}.jpg", host, random_string(rng, 7)).to_lowercase()
}
