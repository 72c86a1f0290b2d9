use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the fleet simulator workspace",
    long_about = "A unified CLI for generating sample data, running benchmarks,\n\
                  load tests and CI checks in the fleet simulator workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the one-day example (100 devices)
    Run,
    /// Generate payload files for the bundled sample boundary
    Generate {
        /// Number of devices
        #[arg(long, default_value_t = 200)]
        devices: usize,
        /// Seed for reproducible output
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Output directory
        #[arg(long, default_value = "data")]
        output: String,
    },
    /// Run Criterion benchmarks
    Bench,
    /// Run CI checks (fmt, clippy, tests, examples, benchmarks)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
    /// Run load tests (ignored tests in fleet_core)
    LoadTest,
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Build and run the example and a sample generation
    Examples,
    /// Run benchmarks
    Bench,
    /// Run check + examples + bench
    All,
}

// ── helpers ────────────────────────────────────────────────────────

const SAMPLE_BOUNDARY: &str = "crates/fleet_gen/data/boundary.geojson";

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo")
}

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn generate(devices: usize, seed: u64, output: &str) {
    let devices = devices.to_string();
    let seed = seed.to_string();
    run_cargo(&[
        "run",
        "-p",
        "fleet_gen",
        "--release",
        "--",
        "--boundary",
        SAMPLE_BOUNDARY,
        "--devices",
        &devices,
        "--seed",
        &seed,
        "--output",
        output,
    ]);
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);

    step("Test fleet_core");
    run_cargo(&["test", "-p", "fleet_core"]);

    step("Test fleet_gen");
    run_cargo(&["test", "-p", "fleet_gen"]);
}

fn ci_examples() {
    step("Run service_day_run (100 devices)");
    run_cargo(&[
        "run",
        "-p",
        "fleet_core",
        "--example",
        "service_day_run",
        "--release",
    ]);

    step("Generate sample payloads");
    generate(200, 42, "target/sample-data");
}

fn ci_bench() {
    step("Run benchmarks");
    run_cargo(&["bench", "--package", "fleet_core", "--bench", "performance"]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            run_cargo(&[
                "run",
                "-p",
                "fleet_core",
                "--example",
                "service_day_run",
                "--release",
            ]);
        }
        Commands::Generate {
            devices,
            seed,
            output,
        } => generate(devices, seed, &output),
        Commands::Bench => ci_bench(),
        Commands::Ci { job } => match job {
            CiJob::Check => ci_check(),
            CiJob::Examples => ci_examples(),
            CiJob::Bench => ci_bench(),
            CiJob::All => {
                ci_check();
                ci_examples();
                ci_bench();
            }
        },
        Commands::LoadTest => {
            run_cargo(&[
                "test",
                "--package",
                "fleet_core",
                "--test",
                "load_tests",
                "--",
                "--ignored",
                "--nocapture",
            ]);
        }
    }
}
