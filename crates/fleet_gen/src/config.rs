//! Command-line options and their resolution into run parameters.
//!
//! Options left unset get the generator's randomized defaults, drawn from an
//! RNG derived from `--seed` so a seeded invocation is fully reproducible.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Parser;
use fleet_core::device::{PropulsionType, VehicleType};
use fleet_core::distributions::random_string;
use fleet_core::scenario::{ServiceParams, MPH_TO_MS};
use fleet_core::version::MdsVersion;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use crate::encoding::DateFormat;

/// Range of the randomized default fleet size.
pub const DEFAULT_DEVICES_RANGE: (usize, usize) = (100, 500);
/// Range of the randomized default inactivity.
pub const DEFAULT_INACTIVITY_RANGE: (f64, f64) = (0.0, 0.05);
/// Range of the randomized default speed, in mph.
pub const DEFAULT_SPEED_MPH_RANGE: (f64, f64) = (8.0, 15.0);

#[derive(Debug, Clone, Parser)]
#[command(
    name = "fleet_gen",
    about = "Generate synthetic shared-mobility provider data",
    long_about = "Simulates a fleet of dockless bicycles and scooters inside a service-area\n\
                  boundary and writes status_changes.json and trips.json payloads."
)]
pub struct Cli {
    /// GeoJSON file with the service-area boundary (Polygon/MultiPolygon)
    #[arg(long, env = "MDS_BOUNDARY")]
    pub boundary: PathBuf,

    /// Provider name [default: "Provider" plus 3 random characters]
    #[arg(long)]
    pub provider: Option<String>,

    /// Provider id [default: random UUID]
    #[arg(long)]
    pub provider_id: Option<Uuid>,

    /// Number of devices [default: random in 100..=500]
    #[arg(long)]
    pub devices: Option<usize>,

    /// Timestamp format: unix, iso8601, or a strftime pattern
    #[arg(long, default_value = "unix")]
    pub date_format: DateFormat,

    /// First service day, YYYY-MM-DD [default: today]
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last service day, YYYY-MM-DD [default: the start date]
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Hour of day service opens (0-23)
    #[arg(long, default_value_t = 7)]
    pub open: u32,

    /// Hour of day service closes (0-23, inclusive)
    #[arg(long, default_value_t = 19)]
    pub close: u32,

    /// Fraction of the fleet inactive for the day, also the hourly chance to skip a trip
    /// [default: random in 0..0.05]
    #[arg(long)]
    pub inactivity: Option<f64>,

    /// Average speed in miles per hour [default: random in 8..15]
    #[arg(long)]
    pub speed_mph: Option<f64>,

    /// Average speed in meters per second (wins over --speed-mph)
    #[arg(long)]
    pub speed_ms: Option<f64>,

    /// Comma-separated vehicle types to draw from
    #[arg(long, value_delimiter = ',', default_value = "bicycle,scooter")]
    pub vehicle_types: Vec<VehicleType>,

    /// Comma-separated propulsion types to draw from
    #[arg(long, value_delimiter = ',', default_value = "human,electric_assist,electric,combustion")]
    pub propulsion_types: Vec<PropulsionType>,

    /// Target data version
    #[arg(long, default_value = "0.2.0")]
    pub version: MdsVersion,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory the payload files are written to
    #[arg(long, default_value = "data")]
    pub output: PathBuf,
}

/// Everything a run needs, with defaults resolved.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub boundary: PathBuf,
    pub params: ServiceParams,
    pub date_format: DateFormat,
    pub output: PathBuf,
}

impl Cli {
    pub fn resolve(self) -> Result<RunConfig> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(0xcafe_babe)),
            None => StdRng::from_entropy(),
        };

        let provider = self
            .provider
            .unwrap_or_else(|| format!("Provider {}", random_string(&mut rng, 3)));
        let devices = self
            .devices
            .unwrap_or_else(|| rng.gen_range(DEFAULT_DEVICES_RANGE.0..=DEFAULT_DEVICES_RANGE.1));
        let inactivity = self
            .inactivity
            .unwrap_or_else(|| rng.gen_range(DEFAULT_INACTIVITY_RANGE.0..DEFAULT_INACTIVITY_RANGE.1));
        let speed_ms = match (self.speed_ms, self.speed_mph) {
            (Some(ms), _) => ms,
            (None, Some(mph)) => mph * MPH_TO_MS,
            (None, None) => rng.gen_range(DEFAULT_SPEED_MPH_RANGE.0..DEFAULT_SPEED_MPH_RANGE.1) * MPH_TO_MS,
        };
        let start = self.start.unwrap_or_else(|| Utc::now().date_naive());
        let end = self.end.unwrap_or(start);

        let mut params = ServiceParams::default()
            .with_provider(provider, self.provider_id)
            .with_devices(devices)
            .with_vehicle_types(self.vehicle_types)
            .with_propulsion_types(self.propulsion_types)
            .with_speed_ms(speed_ms)
            .with_hours(self.open, self.close)
            .with_inactivity(inactivity)
            .with_dates(start, end)
            .with_version(self.version);
        if let Some(seed) = self.seed {
            params = params.with_seed(seed);
        }
        params.validate().context("invalid run parameters")?;

        Ok(RunConfig {
            boundary: self.boundary,
            params,
            date_format: self.date_format,
            output: self.output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["fleet_gen", "--boundary", "area.geojson"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).expect("valid arguments")
    }

    #[test]
    fn seeded_defaults_are_reproducible() {
        let a = parse(&["--seed", "7"]).resolve().expect("resolve");
        let b = parse(&["--seed", "7"]).resolve().expect("resolve");
        assert_eq!(a.params, b.params);
        assert!(a.params.provider_name.starts_with("Provider "));
        assert_eq!(a.params.provider_name.len(), "Provider ".len() + 3);
        assert!((100..=500).contains(&a.params.num_devices));
        assert!((0.0..0.05).contains(&a.params.inactivity));
        assert!((8.0 * MPH_TO_MS..15.0 * MPH_TO_MS).contains(&a.params.speed_ms));
        assert_eq!((a.params.hour_open, a.params.hour_close), (7, 19));
        assert_eq!(a.params.start_date, a.params.end_date);
        assert_eq!(a.date_format, DateFormat::Unix);
        assert_eq!(a.output, PathBuf::from("data"));
    }

    #[test]
    fn explicit_options() {
        let config = parse(&[
            "--provider",
            "Acme",
            "--devices",
            "12",
            "--speed-mph",
            "10",
            "--speed-ms",
            "3.5",
            "--vehicle-types",
            "scooter",
            "--propulsion-types",
            "electric,electric_assist",
            "--start",
            "2024-05-01",
            "--end",
            "2024-05-03",
            "--version",
            "0.3",
            "--date-format",
            "iso8601",
        ])
        .resolve()
        .expect("resolve");

        assert_eq!(config.params.provider_name, "Acme");
        assert_eq!(config.params.num_devices, 12);
        assert_eq!(config.params.speed_ms, 3.5);
        assert_eq!(config.params.vehicle_types, vec![VehicleType::Scooter]);
        assert_eq!(
            config.params.propulsion_types,
            vec![PropulsionType::Electric, PropulsionType::ElectricAssist]
        );
        assert_eq!(config.params.num_days(), 3);
        assert_eq!(config.params.version.to_string(), "0.3.0");
        assert_eq!(config.date_format, DateFormat::Iso8601);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(parse(&["--open", "20", "--close", "8"]).resolve().is_err());
        assert!(parse(&["--inactivity", "2"]).resolve().is_err());
        let argv = ["fleet_gen", "--boundary", "a.geojson", "--version", "0.4.0"];
        assert!(Cli::try_parse_from(argv).is_err());
        let argv = ["fleet_gen", "--boundary", "a.geojson", "--vehicle-types", "tram"];
        assert!(Cli::try_parse_from(argv).is_err());
    }
}
