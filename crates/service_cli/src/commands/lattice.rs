//! Lattice command implementation
//!
//! Prices the contract on the CRR binomial lattice, optionally next to the
//! generalised Black-Scholes reference.

use std::fmt;

use clap::Args;
use pricer_core::types::{ExerciseStyle, OptionType};
use pricer_models::analytical::GeneralizedBlackScholes;
use pricer_pricing::lattice::BinomialTree;
use pricer_pricing::ExecutionMode;
use serde::Serialize;
use tracing::info;

use super::{contract_line, emit, fmt_value, ContractArgs, OutputFormat, Side, Table};
use crate::config::{ContractSection, PricerConfig};
use crate::Result;

/// Arguments of `energy-pricer lattice`.
#[derive(Args, Clone, Debug, Default)]
pub struct LatticeArgs {
    #[command(flatten)]
    pub contract: ContractArgs,

    /// Number of time steps
    #[arg(short = 'n', long)]
    pub steps: Option<usize>,

    /// Exercise style (european or american)
    #[arg(short = 'e', long)]
    pub exercise: Option<ExerciseStyle>,

    /// Sweep wide lattice steps on the rayon pool
    #[arg(long)]
    pub parallel: bool,

    /// Option side(s) to price
    #[arg(long, value_enum, default_value_t = Side::Both)]
    pub side: Side,

    /// Add a generalised Black-Scholes reference column
    #[arg(long)]
    pub compare: bool,
}

impl LatticeArgs {
    /// Fold the flags into `config`.
    pub fn apply(&self, config: &mut PricerConfig) {
        self.contract.apply(&mut config.contract);
        if let Some(steps) = self.steps {
            config.lattice.steps = steps;
        }
        if let Some(exercise) = self.exercise {
            config.lattice.exercise = exercise;
        }
        if self.parallel {
            config.lattice.parallel = true;
        }
    }
}

/// One priced side.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LatticePrice {
    /// Call or put.
    pub option_type: OptionType,
    /// Lattice value.
    pub price: f64,
    /// Closed-form European value, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<f64>,
}

/// Result of the lattice command.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LatticeReport {
    /// Priced contract.
    pub contract: ContractSection,
    /// Exercise style.
    pub exercise: ExerciseStyle,
    /// Time steps.
    pub steps: usize,
    /// Time step length.
    pub dt: f64,
    /// Up factor.
    pub up: f64,
    /// Risk-neutral up probability.
    pub probability: f64,
    /// Per-side values.
    pub prices: Vec<LatticePrice>,
}

/// Price `sides` with the lattice configured in `config`.
pub fn evaluate(config: &PricerConfig, sides: &[OptionType], compare: bool) -> Result<LatticeReport> {
    let params = config.contract.to_params()?;
    let execution = if config.lattice.parallel {
        ExecutionMode::Parallel
    } else {
        ExecutionMode::Sequential
    };
    let tree = BinomialTree::new(params, config.lattice.steps, config.lattice.exercise)?
        .with_execution(execution);
    let reference = if compare {
        Some(GeneralizedBlackScholes::new(params)?)
    } else {
        None
    };

    let prices = sides
        .iter()
        .map(|&option_type| LatticePrice {
            option_type,
            price: tree.value(option_type),
            reference: reference.as_ref().map(|gbs| gbs.value(option_type)),
        })
        .collect();

    let state = tree.state();
    Ok(LatticeReport {
        contract: config.contract,
        exercise: tree.style(),
        steps: tree.n_steps(),
        dt: state.dt,
        up: state.up,
        probability: state.probability,
        prices,
    })
}

/// Run the lattice command
pub fn run(args: &LatticeArgs, mut config: PricerConfig, format: OutputFormat) -> Result<()> {
    args.apply(&mut config);
    config.validate()?;

    info!(
        steps = config.lattice.steps,
        exercise = %config.lattice.exercise,
        parallel = config.lattice.parallel,
        "Pricing on the binomial lattice"
    );
    let report = evaluate(&config, &args.side.option_types(), args.compare)?;
    emit(&report, format)
}

impl fmt::Display for LatticeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", contract_line(&self.contract))?;
        writeln!(
            f,
            "{} lattice: n={} dt={:.6} u={:.6} p={:.6}",
            self.exercise, self.steps, self.dt, self.up, self.probability
        )?;

        let compare = self.prices.iter().any(|p| p.reference.is_some());
        let mut table = if compare {
            Table::new(["Side", "Lattice", "GBS", "Difference"])
        } else {
            Table::new(["Side", "Lattice"])
        };
        for price in &self.prices {
            match price.reference {
                Some(reference) => table.row([
                    price.option_type.to_string(),
                    fmt_value(price.price),
                    fmt_value(reference),
                    format!("{:+.6}", price.price - reference),
                ]),
                None => table.row([price.option_type.to_string(), fmt_value(price.price)]),
            };
        }
        write!(f, "{}", table)
    }
}
