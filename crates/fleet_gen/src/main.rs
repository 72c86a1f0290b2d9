use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use fleet_core::distributions::GammaTripDistribution;
use fleet_core::scenario::run_service_with;
use fleet_gen::boundary_file::load_boundary;
use fleet_gen::config::Cli;
use fleet_gen::encoding::Encoder;
use fleet_gen::export::export_payloads;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let config = Cli::parse().resolve()?;
    let params = &config.params;

    let started = Instant::now();
    let boundary = load_boundary(&config.boundary)?;
    info!(
        path = %config.boundary.display(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "boundary loaded"
    );

    info!(
        provider = %params.provider_name,
        devices = params.num_devices,
        start = %params.start_date,
        end = %params.end_date,
        open = params.hour_open,
        close = params.hour_close,
        inactivity = params.inactivity,
        speed_ms = params.speed_ms,
        version = %params.version,
        "generating"
    );

    let bar = ProgressBar::new(params.num_days() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} days ({eta}) {msg}")
            .context("progress bar template")?
            .progress_chars("#>-"),
    );

    let started = Instant::now();
    let distribution = GammaTripDistribution::new();
    let output = run_service_with(&boundary, params, &distribution, |date, stats| {
        bar.set_message(format!("{date}: {} trips", stats.trips));
        bar.inc(1);
    })?;
    bar.finish_and_clear();
    info!(
        status_changes = output.status_changes.len(),
        trips = output.trips.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "simulation finished"
    );

    let started = Instant::now();
    let encoder = Encoder::new(params.version.clone(), config.date_format.clone());
    let files = export_payloads(&config.output, &encoder, output.status_changes, output.trips)?;
    info!(
        status_changes = %files.status_changes.display(),
        trips = %files.trips.display(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "payloads written"
    );

    Ok(())
}
