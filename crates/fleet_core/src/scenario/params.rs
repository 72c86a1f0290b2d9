use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::device::{PropulsionType, VehicleType};
use crate::error::FleetError;
use crate::version::MdsVersion;

/// Miles per hour to meters per second.
pub const MPH_TO_MS: f64 = 0.44704;

/// Default average device speed: 12 mph.
pub const DEFAULT_SPEED_MS: f64 = 12.0 * MPH_TO_MS;

const DEFAULT_NUM_DEVICES: usize = 100;
const DEFAULT_HOUR_OPEN: u32 = 7;
const DEFAULT_HOUR_CLOSE: u32 = 19;
const DEFAULT_INACTIVITY: f64 = 0.02;

/// Parameters for a fleet run.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceParams {
    pub num_devices: usize,
    pub provider_name: String,
    /// Shared provider id. If None, one is drawn from the run's RNG.
    pub provider_id: Option<Uuid>,
    pub vehicle_types: Vec<VehicleType>,
    pub propulsion_types: Vec<PropulsionType>,
    /// Average device speed in m/s.
    pub speed_ms: f64,
    pub hour_open: u32,
    /// Inclusive.
    pub hour_close: u32,
    /// Day-inactive fraction of the roster, and the per-hour chance an active
    /// device skips a trip.
    pub inactivity: f64,
    pub start_date: NaiveDate,
    /// Inclusive.
    pub end_date: NaiveDate,
    /// Seed for RNG (for reproducibility). If None, seeded from entropy.
    pub seed: Option<u64>,
    pub version: MdsVersion,
}

impl Default for ServiceParams {
    fn default() -> Self {
        let today = Utc::now().date_naive();
        Self {
            num_devices: DEFAULT_NUM_DEVICES,
            provider_name: "Provider XXX".to_string(),
            provider_id: None,
            vehicle_types: VehicleType::ALL.to_vec(),
            propulsion_types: PropulsionType::ALL.to_vec(),
            speed_ms: DEFAULT_SPEED_MS,
            hour_open: DEFAULT_HOUR_OPEN,
            hour_close: DEFAULT_HOUR_CLOSE,
            inactivity: DEFAULT_INACTIVITY,
            start_date: today,
            end_date: today,
            seed: None,
            version: MdsVersion::default(),
        }
    }
}

impl ServiceParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_devices(mut self, num_devices: usize) -> Self {
        self.num_devices = num_devices;
        self
    }

    pub fn with_provider(mut self, name: impl Into<String>, id: Option<Uuid>) -> Self {
        self.provider_name = name.into();
        self.provider_id = id;
        self
    }

    pub fn with_vehicle_types(mut self, vehicle_types: Vec<VehicleType>) -> Self {
        self.vehicle_types = vehicle_types;
        self
    }

    pub fn with_propulsion_types(mut self, propulsion_types: Vec<PropulsionType>) -> Self {
        self.propulsion_types = propulsion_types;
        self
    }

    pub fn with_speed_ms(mut self, speed_ms: f64) -> Self {
        self.speed_ms = speed_ms;
        self
    }

    pub fn with_speed_mph(self, speed_mph: f64) -> Self {
        self.with_speed_ms(speed_mph * MPH_TO_MS)
    }

    /// Operating hours, both inclusive.
    pub fn with_hours(mut self, open: u32, close: u32) -> Self {
        self.hour_open = open;
        self.hour_close = close;
        self
    }

    pub fn with_inactivity(mut self, inactivity: f64) -> Self {
        self.inactivity = inactivity;
        self
    }

    /// Date range, both inclusive.
    pub fn with_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn with_version(mut self, version: MdsVersion) -> Self {
        self.version = version;
        self
    }

    /// Number of service days in the run.
    pub fn num_days(&self) -> usize {
        if self.start_date > self.end_date {
            return 0;
        }
        (self.end_date - self.start_date).num_days() as usize + 1
    }

    pub fn validate(&self) -> Result<(), FleetError> {
        let invalid = |msg: String| -> Result<(), FleetError> { Err(FleetError::InvalidParams(msg)) };

        if self.num_devices == 0 {
            return invalid("num_devices must be > 0".to_string());
        }
        if self.vehicle_types.is_empty() {
            return invalid("vehicle_types must not be empty".to_string());
        }
        if self.propulsion_types.is_empty() {
            return invalid("propulsion_types must not be empty".to_string());
        }
        if !self.speed_ms.is_finite() || self.speed_ms <= 0.0 {
            return invalid(format!("speed_ms must be finite and > 0, got {}", self.speed_ms));
        }
        if self.hour_close > 23 {
            return invalid(format!("hour_close must be <= 23, got {}", self.hour_close));
        }
        if self.hour_open > self.hour_close {
            return invalid(format!(
                "hour_open ({}) must be <= hour_close ({})",
                self.hour_open, self.hour_close
            ));
        }
        if !(0.0..=1.0).contains(&self.inactivity) {
            return invalid(format!("inactivity must be in [0, 1], got {}", self.inactivity));
        }
        if self.start_date > self.end_date {
            return invalid(format!(
                "start_date ({}) must be <= end_date ({})",
                self.start_date, self.end_date
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).expect("valid date")
    }

    #[test]
    fn defaults_are_valid() {
        let params = ServiceParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.num_days(), 1);
        assert!((params.speed_ms - 5.36448).abs() < 1e-9);
    }

    #[test]
    fn builders_set_fields() {
        let params = ServiceParams::default()
            .with_seed(9)
            .with_devices(12)
            .with_hours(6, 22)
            .with_inactivity(0.5)
            .with_speed_mph(10.0)
            .with_dates(date(1), date(3));
        assert_eq!(params.seed, Some(9));
        assert_eq!(params.num_devices, 12);
        assert_eq!((params.hour_open, params.hour_close), (6, 22));
        assert!((params.speed_ms - 4.4704).abs() < 1e-9);
        assert_eq!(params.num_days(), 3);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        let cases = [
            ServiceParams::default().with_devices(0),
            ServiceParams::default().with_vehicle_types(vec![]),
            ServiceParams::default().with_propulsion_types(vec![]),
            ServiceParams::default().with_speed_ms(0.0),
            ServiceParams::default().with_speed_ms(f64::NAN),
            ServiceParams::default().with_hours(20, 7),
            ServiceParams::default().with_hours(7, 24),
            ServiceParams::default().with_inactivity(1.5),
            ServiceParams::default().with_inactivity(-0.1),
            ServiceParams::default().with_dates(date(3), date(1)),
        ];
        for params in cases {
            assert!(
                matches!(params.validate(), Err(FleetError::InvalidParams(_))),
                "expected rejection for {params:?}"
            );
        }
    }
}
