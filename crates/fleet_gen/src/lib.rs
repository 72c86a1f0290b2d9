//! Generator front end: CLI options, boundary loading, encoding and export
//! around the `fleet_core` simulator.

pub mod boundary_file;
pub mod config;
pub mod encoding;
pub mod export;
