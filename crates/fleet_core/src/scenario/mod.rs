//! Run setup: parameters for a multi-day fleet run and the loop that drives
//! the daily simulator over one fixed roster.

mod params;
mod run;

pub use params::{ServiceParams, DEFAULT_SPEED_MS, MPH_TO_MS};
pub use run::{run_service, run_service_with, FleetOutput};
