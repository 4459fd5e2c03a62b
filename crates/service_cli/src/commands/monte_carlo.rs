//! Monte Carlo command implementation
//!
//! Runs the stock capabilities (seeded normal innovations, Wiener log
//! increments, vanilla payoff) through the loop engine.

use std::fmt;
use std::path::{Path, PathBuf};

use clap::Args;
use pricer_core::types::OptionType;
use pricer_models::analytical::GeneralizedBlackScholes;
use pricer_pricing::mc::{
    InnovationBatch, MonteCarloEngine, NormalInnovations, PathMatrix, SimulationConfig,
    SimulationOutcome, VanillaPayoff, WienerPath,
};
use pricer_pricing::ExecutionMode;
use serde::Serialize;
use tracing::{error, info};

use super::{contract_line, emit, fmt_value, ContractArgs, OutputFormat, Side, Table};
use crate::config::{ContractSection, MonteCarloSection, PricerConfig};
use crate::{CliError, Result};

/// Engine assembled from the stock capabilities.
pub type VanillaEngine = MonteCarloEngine<NormalInnovations, WienerPath, VanillaPayoff>;

/// Arguments of `energy-pricer monte-carlo`.
#[derive(Args, Clone, Debug, Default)]
pub struct MonteCarloArgs {
    #[command(flatten)]
    pub contract: ContractArgs,

    /// Number of simulation loops
    #[arg(short = 'l', long)]
    pub loops: Option<usize>,

    /// Paths per loop
    #[arg(short = 'p', long)]
    pub paths: Option<usize>,

    /// Time steps per path
    #[arg(long)]
    pub path_length: Option<usize>,

    /// Seed of the innovation source
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pair every path with its mirror image
    #[arg(long)]
    pub antithetic: bool,

    /// Rescale each innovation batch to mean 0, standard deviation 1
    #[arg(long)]
    pub standardise: bool,

    /// Log the estimate and running mean after every loop
    #[arg(long)]
    pub trace: bool,

    /// Run loops on the rayon pool
    #[arg(long)]
    pub parallel: bool,

    /// JSON file holding a fixed innovation batch (array of rows), reused
    /// by every loop
    #[arg(long)]
    pub innovations: Option<PathBuf>,

    /// Option side(s) to price
    #[arg(long, value_enum, default_value_t = Side::Both)]
    pub side: Side,

    /// Add a generalised Black-Scholes reference column
    #[arg(long)]
    pub compare: bool,
}

impl MonteCarloArgs {
    /// Fold the flags into `config`.
    pub fn apply(&self, config: &mut PricerConfig) {
        self.contract.apply(&mut config.contract);
        let mc = &mut config.monte_carlo;
        if let Some(loops) = self.loops {
            mc.loops = loops;
        }
        if let Some(paths) = self.paths {
            mc.paths = paths;
        }
        if let Some(path_length) = self.path_length {
            mc.path_length = path_length;
        }
        if let Some(seed) = self.seed {
            mc.seed = seed;
        }
        mc.antithetic |= self.antithetic;
        mc.standardise |= self.standardise;
        mc.trace |= self.trace;
        mc.parallel |= self.parallel;
    }
}

/// Read a fixed innovation batch from a JSON array of equally long rows.
pub fn load_innovations(path: &Path) -> Result<InnovationBatch> {
    let content = std::fs::read_to_string(path)?;
    let rows: Vec<Vec<f64>> = serde_json::from_str(&content)?;
    Ok(PathMatrix::from_rows(rows)?)
}

/// Simulation settings from the `[monte_carlo]` section.
pub fn simulation_config(
    section: &MonteCarloSection,
    innovations: Option<InnovationBatch>,
) -> Result<SimulationConfig> {
    let execution = if section.parallel {
        ExecutionMode::Parallel
    } else {
        ExecutionMode::Sequential
    };
    let mut builder = SimulationConfig::builder()
        .mc_loops(section.loops)
        .mc_paths(section.paths)
        .path_length(section.path_length)
        .antithetic(section.antithetic)
        .standardise(section.standardise)
        .trace(section.trace)
        .execution(execution);
    if let Some(batch) = innovations {
        builder = builder.innovations(batch);
    }
    Ok(builder.build()?)
}

/// Engine for the configured contract and simulation settings.
pub fn build_engine(config: &PricerConfig, innovations: Option<InnovationBatch>) -> Result<VanillaEngine> {
    let params = config.contract.to_params()?;
    let simulation = simulation_config(&config.monte_carlo, innovations)?;
    Ok(MonteCarloEngine::builder()
        .config(simulation)
        .params(params)
        .innovations(NormalInnovations::new(config.monte_carlo.seed))
        .path_generator(WienerPath)
        .payoff(VanillaPayoff)
        .build()?)
}

/// One simulated side.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct McPrice {
    /// Call or put.
    pub option_type: OptionType,
    /// Mean of the loop estimates.
    pub price: f64,
    /// Standard error across loops.
    pub std_error: f64,
    /// 95% confidence interval.
    pub confidence_95: (f64, f64),
    /// Closed-form value, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<f64>,
    /// Per-loop estimates, when tracing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimates: Option<Vec<f64>>,
    /// Running mean after each loop, when tracing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub running_means: Option<Vec<f64>>,
}

/// Result of the Monte Carlo command.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MonteCarloReport {
    /// Priced contract.
    pub contract: ContractSection,
    /// Simulation settings.
    pub simulation: MonteCarloSection,
    /// Paths per loop after antithetic doubling, times loops.
    pub total_paths: usize,
    /// Per-side results.
    pub prices: Vec<McPrice>,
}

/// Simulate `sides` with the engine configured in `config`.
///
/// A diverged run is logged with its diagnostic and returned as
/// [`CliError::Divergence`].
pub fn evaluate(
    config: &PricerConfig,
    innovations: Option<InnovationBatch>,
    sides: &[OptionType],
    compare: bool,
) -> Result<MonteCarloReport> {
    let engine = build_engine(config, innovations)?;
    let reference = if compare {
        Some(GeneralizedBlackScholes::new(*engine.contract())?)
    } else {
        None
    };

    let mut prices = Vec::with_capacity(sides.len());
    for &option_type in sides {
        let result = match engine.simulate(option_type)? {
            SimulationOutcome::Completed(result) => result,
            SimulationOutcome::Diverged(diagnostic) => {
                error!(
                    side = %option_type,
                    loop_index = diagnostic.loop_index,
                    "Simulation aborted: {}",
                    diagnostic
                );
                return Err(CliError::Divergence(diagnostic.to_string()));
            }
        };

        let trace = config.monte_carlo.trace;
        prices.push(McPrice {
            option_type,
            price: result.price(),
            std_error: result.std_error(),
            confidence_95: result.confidence_95(),
            reference: reference.as_ref().map(|gbs| gbs.value(option_type)),
            running_means: trace.then(|| result.cumulative_means()),
            estimates: trace.then(|| result.into_vec()),
        });
    }

    Ok(MonteCarloReport {
        contract: config.contract,
        simulation: config.monte_carlo,
        total_paths: engine.config().total_paths(),
        prices,
    })
}

/// Run the monte-carlo command
pub fn run(args: &MonteCarloArgs, mut config: PricerConfig, format: OutputFormat) -> Result<()> {
    args.apply(&mut config);
    config.validate()?;
    let innovations = args.innovations.as_deref().map(load_innovations).transpose()?;

    info!(
        loops = config.monte_carlo.loops,
        paths = config.monte_carlo.paths,
        path_length = config.monte_carlo.path_length,
        fixed_innovations = innovations.is_some(),
        "Running Monte Carlo simulation"
    );
    let report = evaluate(&config, innovations, &args.side.option_types(), args.compare)?;
    emit(&report, format)
}

impl fmt::Display for MonteCarloReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sim = &self.simulation;
        writeln!(f, "{}", contract_line(&self.contract))?;
        writeln!(
            f,
            "loops={} paths={} steps={} antithetic={} standardise={} total paths={}",
            sim.loops, sim.paths, sim.path_length, sim.antithetic, sim.standardise, self.total_paths
        )?;

        let compare = self.prices.iter().any(|p| p.reference.is_some());
        let mut headers = vec!["Side", "Price", "Std error", "95% interval"];
        if compare {
            headers.push("GBS");
        }
        let mut table = Table::new(headers);
        for price in &self.prices {
            let (low, high) = price.confidence_95;
            let mut row = vec![
                price.option_type.to_string(),
                fmt_value(price.price),
                fmt_value(price.std_error),
                format!("[{:.4}, {:.4}]", low, high),
            ];
            if let Some(reference) = price.reference {
                row.push(fmt_value(reference));
            }
            table.row(row);
        }
        write!(f, "{}", table)?;

        for price in &self.prices {
            if let (Some(estimates), Some(running)) = (&price.estimates, &price.running_means) {
                writeln!(f)?;
                writeln!(f, "{} trace:", price.option_type)?;
                let mut trace = Table::new(["Loop", "Estimate", "Running mean"]);
                for (i, (estimate, mean)) in estimates.iter().zip(running).enumerate() {
                    trace.row([i.to_string(), fmt_value(*estimate), fmt_value(*mean)]);
                }
                write!(f, "{}", trace)?;
            }
        }
        Ok(())
    }
}
