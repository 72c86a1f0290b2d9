//! Battery model: recharge to full, drain by an absolute amount and/or a rate.
//!
//! `battery = (battery - amount) * (1 - rate)`, clamped to `[0, 1]`.
//! Every operation is a silent no-op on devices without a battery.

use crate::device::Device;

pub const FULL_CHARGE: f64 = 1.0;

/// Below this charge a device is pulled from service.
pub const LOW_BATTERY_THRESHOLD: f64 = 0.2;

pub fn has_battery(device: &Device) -> bool {
    device.has_battery()
}

pub fn recharge(device: &mut Device) {
    device.set_battery(FULL_CHARGE);
}

pub fn drain(device: &mut Device, amount: f64, rate: f64) {
    if let Some(level) = device.battery() {
        let rate = rate.clamp(0.0, 1.0);
        let drained = (level - amount) * (1.0 - rate);
        device.set_battery(drained.clamp(0.0, FULL_CHARGE));
    }
}

pub fn is_low(device: &Device) -> bool {
    device
        .battery()
        .map(|level| level < LOW_BATTERY_THRESHOLD)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{electric_scooter, human_bicycle};

    #[test]
    fn recharge_always_full() {
        let mut device = electric_scooter();
        drain(&mut device, 0.5, 0.3);
        recharge(&mut device);
        assert_eq!(device.battery(), Some(1.0));
    }

    #[test]
    fn drain_applies_amount_then_rate() {
        let mut device = electric_scooter();
        drain(&mut device, 0.2, 0.5);
        let level = device.battery().expect("electric device has a battery");
        assert!((level - 0.4).abs() < 1e-12);
    }

    #[test]
    fn drain_clamps_at_zero() {
        let mut device = electric_scooter();
        drain(&mut device, 1.5, 0.0);
        assert_eq!(device.battery(), Some(0.0));
        drain(&mut device, 0.1, 0.1);
        assert_eq!(device.battery(), Some(0.0));
    }

    #[test]
    fn drain_clamps_rate() {
        let mut device = electric_scooter();
        drain(&mut device, 0.0, -1.0);
        assert_eq!(device.battery(), Some(1.0));
        drain(&mut device, 0.0, 2.0);
        assert_eq!(device.battery(), Some(0.0));
    }

    #[test]
    fn non_electric_devices_untouched() {
        let mut device = human_bicycle();
        recharge(&mut device);
        drain(&mut device, 0.5, 0.5);
        assert!(!has_battery(&device));
        assert!(!is_low(&device));
        assert_eq!(device.battery(), None);
    }

    #[test]
    fn low_battery_threshold() {
        let mut device = electric_scooter();
        assert!(!is_low(&device));
        device.set_battery(0.19);
        assert!(is_low(&device));
        device.set_battery(0.2);
        assert!(!is_low(&device));
    }
}
