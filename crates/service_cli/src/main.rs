//! energy-pricer: command line front end for the option pricing engines
//!
//! # Commands
//!
//! - `energy-pricer lattice` - CRR binomial lattice (European or American)
//! - `energy-pricer monte-carlo` - loop-based Monte Carlo with antithetic
//!   sampling and standardisation
//! - `energy-pricer greeks` - finite-difference greeks on any engine
//! - `energy-pricer check` - environment report and reference prices
//!
//! # Configuration
//!
//! Settings are layered: built-in defaults, then the TOML file given by
//! `--config` (or `energy-pricer.toml` in the working directory), then
//! `PRICER_*` environment variables, then command-line flags.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;

pub use error::{CliError, Result};

use commands::greeks::GreeksArgs;
use commands::lattice::LatticeArgs;
use commands::monte_carlo::MonteCarloArgs;
use commands::OutputFormat;
use config::PricerConfig;

/// Energy and commodity option pricer
#[derive(Parser)]
#[command(name = "energy-pricer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price on the CRR binomial lattice
    Lattice(LatticeArgs),

    /// Price by Monte Carlo simulation
    MonteCarlo(MonteCarloArgs),

    /// Compute finite-difference greeks
    Greeks(GreeksArgs),

    /// Check the environment, configuration and reference prices
    Check,
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = PricerConfig::resolve(cli.config.as_deref())?.with_env_override();

    let level = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    init_tracing(level);

    if cli.verbose {
        info!("Verbose mode enabled");
    }
    debug!(?config, "Configuration loaded");

    match &cli.command {
        Commands::Lattice(args) => commands::lattice::run(args, config, cli.format),
        Commands::MonteCarlo(args) => commands::monte_carlo::run(args, config, cli.format),
        Commands::Greeks(args) => commands::greeks::run(args, config, cli.format),
        Commands::Check => commands::check::run(&config, cli.format),
    }
}
