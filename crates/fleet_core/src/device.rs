//! Devices: the fixed roster of simulated vehicles for a run.
//!
//! Battery capability is decided once, when the device is built, from its
//! propulsion types. A device without a battery never gains one.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::battery;
use crate::distributions::{random_string, random_uuid};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    Bicycle,
    Scooter,
}

impl VehicleType {
    pub const ALL: [VehicleType; 2] = [VehicleType::Bicycle, VehicleType::Scooter];

    pub fn as_str(self) -> &'static str {
        match self {
            VehicleType::Bicycle => "bicycle",
            VehicleType::Scooter => "scooter",
        }
    }
}

impl std::str::FromStr for VehicleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "bicycle" => Ok(VehicleType::Bicycle),
            "scooter" => Ok(VehicleType::Scooter),
            other => Err(format!("unknown vehicle type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropulsionType {
    Human,
    ElectricAssist,
    Electric,
    Combustion,
}

impl PropulsionType {
    pub const ALL: [PropulsionType; 4] = [
        PropulsionType::Human,
        PropulsionType::ElectricAssist,
        PropulsionType::Electric,
        PropulsionType::Combustion,
    ];

    /// True for propulsion that runs off a battery.
    pub fn is_battery_powered(self) -> bool {
        matches!(self, PropulsionType::Electric | PropulsionType::ElectricAssist)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PropulsionType::Human => "human",
            PropulsionType::ElectricAssist => "electric_assist",
            PropulsionType::Electric => "electric",
            PropulsionType::Combustion => "combustion",
        }
    }
}

impl std::str::FromStr for PropulsionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "human" => Ok(PropulsionType::Human),
            "electric_assist" => Ok(PropulsionType::ElectricAssist),
            "electric" => Ok(PropulsionType::Electric),
            "combustion" => Ok(PropulsionType::Combustion),
            other => Err(format!("unknown propulsion type '{other}'")),
        }
    }
}

/// True when any of the propulsion types needs a battery.
pub fn requires_battery(propulsion: &[PropulsionType]) -> bool {
    propulsion.iter().any(|p| p.is_battery_powered())
}

/// Identity fields shared by every record a device emits.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceIdentity {
    pub provider_id: Uuid,
    pub provider_name: String,
    pub device_id: Uuid,
    pub vehicle_id: String,
    pub vehicle_type: VehicleType,
    pub propulsion_type: Vec<PropulsionType>,
}

/// One simulated vehicle. `battery` is `Some` iff the propulsion set is battery powered.
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    pub identity: DeviceIdentity,
    battery: Option<f64>,
}

impl Device {
    /// Build a device; electric devices start fully charged.
    pub fn new(identity: DeviceIdentity) -> Self {
        let battery = requires_battery(&identity.propulsion_type).then_some(battery::FULL_CHARGE);
        Self { identity, battery }
    }

    pub fn has_battery(&self) -> bool {
        self.battery.is_some()
    }

    pub fn battery(&self) -> Option<f64> {
        self.battery
    }

    /// Overwrite the charge level. Ignored on devices without a battery.
    pub fn set_battery(&mut self, level: f64) {
        if let Some(battery) = self.battery.as_mut() {
            *battery = level;
        }
    }

    pub fn device_id(&self) -> Uuid {
        self.identity.device_id
    }
}

/// Builds the fixed population of devices for a run.
#[derive(Debug, Clone)]
pub struct DeviceRoster;

impl DeviceRoster {
    /// Generate `count` devices for one provider. Each device draws one vehicle type
    /// and one propulsion type from the allow-lists.
    ///
    /// # Panics
    ///
    /// Panics if either allow-list is empty; callers validate params first.
    pub fn generate<R: Rng>(
        rng: &mut R,
        count: usize,
        provider_name: &str,
        provider_id: Option<Uuid>,
        vehicle_types: &[VehicleType],
        propulsion_types: &[PropulsionType],
    ) -> Vec<Device> {
        assert!(!vehicle_types.is_empty(), "vehicle type allow-list must not be empty");
        assert!(!propulsion_types.is_empty(), "propulsion type allow-list must not be empty");

        let provider_id = provider_id.unwrap_or_else(|| random_uuid(rng));
        (0..count)
            .map(|_| {
                let device_id = random_uuid(rng);
                let vehicle_id = random_string(rng, 6);
                let vehicle_type = *vehicle_types.choose(rng).expect("non-empty vehicle types");
                let propulsion = *propulsion_types.choose(rng).expect("non-empty propulsion types");
                Device::new(DeviceIdentity {
                    provider_id,
                    provider_name: provider_name.to_string(),
                    device_id,
                    vehicle_id,
                    vehicle_type,
                    propulsion_type: vec![propulsion],
                })
            })
            .collect()
    }
}
