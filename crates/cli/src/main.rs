//! Binary32 multiplier testbench CLI.
//!
//! This binary runs the verification suite against the behavioral multiplier. It performs:
//! 1. **Suite run:** All 36 operand-category cases, or the subset selected by `--a` / `--b`.
//! 2. **Listing:** Print the case names of the test matrix.
//!
//! Logging goes through `tracing`; set `RUST_LOG` (default `info`) to change verbosity.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use fpmul_tb::config::TestbenchConfig;
use fpmul_tb::dut::FaultMode;
use fpmul_tb::model::rounding_modes::RoundingMode;
use fpmul_tb::stimulus::StimulusKind;
use fpmul_tb::suite::{self, TestCase};
use fpmul_tb::tb::StartProtocol;

#[derive(Parser, Debug)]
#[command(
    name = "fpmul-tb",
    author,
    version,
    about = "Self-checking testbench for IEEE-754 binary32 multipliers",
    long_about = "Drive randomized operands through a clocked multiplier, check every result against a reference model, and report pass/fail per operand-category pair.\n\nExamples:\n  fpmul-tb run\n  fpmul-tb run --a nan --b normal --seed 7\n  fpmul-tb run --latency 5 --protocol hold --fault sign-flip\n  fpmul-tb list"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the test matrix (or the cases selected by --a / --b).
    Run(RunArgs),

    /// Print the names of all test cases.
    List,
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Only run cases whose operand A has this kind.
    #[arg(long)]
    a: Option<StimulusKind>,

    /// Only run cases whose operand B has this kind.
    #[arg(long)]
    b: Option<StimulusKind>,

    /// JSON configuration file; command-line flags override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base seed of the stimulus generators.
    #[arg(long)]
    seed: Option<u64>,

    /// Operand pairs per case.
    #[arg(short = 'n', long)]
    transactions: Option<usize>,

    /// Pipeline depth of the behavioral multiplier.
    #[arg(long)]
    latency: Option<usize>,

    /// Fault injected into the multiplier (none, flush-denormals, invalid-as-zero,
    /// sign-flip, swap-adjacent, drop-every:N).
    #[arg(long)]
    fault: Option<FaultMode>,

    /// Start handshake (pulse or hold).
    #[arg(long)]
    protocol: Option<StartProtocol>,

    /// Maximum outstanding operations.
    #[arg(long)]
    max_in_flight: Option<usize>,

    /// Rounding mode (rne, rtz, rdn, rup, rmm).
    #[arg(long)]
    rounding: Option<RoundingMode>,

    /// Print the suite report as JSON instead of text.
    #[arg(long)]
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => process::exit(cmd_run(&args)),
        Commands::List => {
            for case in suite::test_cases() {
                println!("{}", case.name());
            }
        }
    }
}

/// Builds the configuration from the optional file plus flag overrides.
fn build_config(args: &RunArgs) -> Result<TestbenchConfig, fpmul_tb::TestbenchError> {
    let mut config = match &args.config {
        Some(path) => TestbenchConfig::from_file(path)?,
        None => TestbenchConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.run.seed = seed;
    }
    if let Some(n) = args.transactions {
        config.run.transactions_per_case = n;
    }
    if let Some(latency) = args.latency {
        config.dut.latency = latency;
    }
    if let Some(fault) = args.fault {
        config.dut.fault = fault;
    }
    if let Some(protocol) = args.protocol {
        config.driver.protocol = protocol;
    }
    if let Some(n) = args.max_in_flight {
        config.driver.max_in_flight = n;
    }
    if let Some(rounding) = args.rounding {
        config.model.rounding = rounding;
    }
    config.validate()?;
    Ok(config)
}

/// Runs the selected cases and returns the process exit code.
fn cmd_run(args: &RunArgs) -> i32 {
    let config = match build_config(args) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return 2;
        }
    };

    let cases: Vec<TestCase> = suite::test_cases()
        .into_iter()
        .filter(|c| args.a.is_none_or(|a| c.a == a) && args.b.is_none_or(|b| c.b == b))
        .collect();

    let report = match suite::run_cases(&config, &cases, suite::default_dut) {
        Ok(report) => report,
        Err(e) => {
            error!("{e}");
            return 2;
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                error!("{e}");
                return 2;
            }
        }
    } else {
        report.print();
        if let [single] = report.cases.as_slice() {
            single.report.stats.print();
        }
    }

    i32::from(!report.is_success())
}
