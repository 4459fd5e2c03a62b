//! Greeks command implementation
//!
//! Bump-and-revalue sensitivities on any of the three pricers.

use std::fmt;

use clap::{Args, ValueEnum};
use pricer_core::types::{ExerciseStyle, OptionType};
use pricer_models::analytical::GeneralizedBlackScholes;
use pricer_models::instruments::OptionPricer;
use pricer_pricing::greeks::{compute_greeks, GreeksConfig, GreeksResult};
use pricer_pricing::lattice::BinomialTree;
use pricer_pricing::ExecutionMode;
use serde::Serialize;
use tracing::info;

use super::{contract_line, emit, fmt_value, monte_carlo, ContractArgs, OutputFormat, Side, Table};
use crate::config::{ContractSection, PricerConfig};
use crate::{CliError, Result};

/// Pricer to revalue under bumped parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Engine {
    /// CRR binomial lattice from the `[lattice]` section.
    #[default]
    Lattice,
    /// Monte Carlo engine from the `[monte_carlo]` section; every bump
    /// reuses the same seed.
    MonteCarlo,
    /// Generalised Black-Scholes (European only).
    ClosedForm,
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Engine::Lattice => "lattice",
            Engine::MonteCarlo => "monte-carlo",
            Engine::ClosedForm => "closed-form",
        };
        f.write_str(name)
    }
}

/// Arguments of `energy-pricer greeks`.
#[derive(Args, Clone, Debug, Default)]
pub struct GreeksArgs {
    #[command(flatten)]
    pub contract: ContractArgs,

    /// Pricer to differentiate
    #[arg(long, value_enum, default_value_t = Engine::Lattice)]
    pub engine: Engine,

    /// Lattice steps
    #[arg(short = 'n', long)]
    pub steps: Option<usize>,

    /// Lattice exercise style (european or american)
    #[arg(short = 'e', long)]
    pub exercise: Option<ExerciseStyle>,

    /// Option side(s)
    #[arg(long, value_enum, default_value_t = Side::Both)]
    pub side: Side,

    /// Relative spot bump
    #[arg(long)]
    pub spot_bump: Option<f64>,

    /// Absolute volatility bump
    #[arg(long)]
    pub vol_bump: Option<f64>,

    /// Time bump in years
    #[arg(long)]
    pub time_bump: Option<f64>,

    /// Absolute rate bump
    #[arg(long)]
    pub rate_bump: Option<f64>,

    /// Absolute cost-of-carry bump
    #[arg(long)]
    pub carry_bump: Option<f64>,
}

impl GreeksArgs {
    /// Fold the flags into `config`.
    pub fn apply(&self, config: &mut PricerConfig) {
        self.contract.apply(&mut config.contract);
        if let Some(steps) = self.steps {
            config.lattice.steps = steps;
        }
        if let Some(exercise) = self.exercise {
            config.lattice.exercise = exercise;
        }
    }

    /// Bump sizes; unset flags keep their defaults.
    pub fn bumps(&self) -> Result<GreeksConfig> {
        let mut builder = GreeksConfig::builder();
        if let Some(bump) = self.spot_bump {
            builder = builder.spot_bump_relative(bump);
        }
        if let Some(bump) = self.vol_bump {
            builder = builder.vol_bump_absolute(bump);
        }
        if let Some(bump) = self.time_bump {
            builder = builder.time_bump_years(bump);
        }
        if let Some(bump) = self.rate_bump {
            builder = builder.rate_bump_absolute(bump);
        }
        if let Some(bump) = self.carry_bump {
            builder = builder.carry_bump_absolute(bump);
        }
        builder
            .build()
            .map_err(|e| CliError::invalid_argument(e.to_string()))
    }
}

/// Greeks of one side.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SideGreeks {
    /// Call or put.
    pub option_type: OptionType,
    /// Price and sensitivities.
    #[serde(flatten)]
    pub greeks: GreeksView,
}

/// Serialisable copy of [`GreeksResult`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GreeksView {
    /// Unbumped price.
    pub price: f64,
    /// ∂V/∂S.
    pub delta: f64,
    /// ∂²V/∂S².
    pub gamma: f64,
    /// ∂V/∂σ.
    pub vega: f64,
    /// Time decay per year.
    pub theta: f64,
    /// ∂V/∂r.
    pub rho: f64,
    /// ∂V/∂b.
    pub carry: f64,
}

impl From<GreeksResult> for GreeksView {
    fn from(r: GreeksResult) -> Self {
        Self {
            price: r.price,
            delta: r.delta,
            gamma: r.gamma,
            vega: r.vega,
            theta: r.theta,
            rho: r.rho,
            carry: r.carry,
        }
    }
}

/// Result of the greeks command.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GreeksReport {
    /// Differentiated contract.
    pub contract: ContractSection,
    /// Pricer used.
    pub engine: Engine,
    /// Per-side greeks.
    pub sides: Vec<SideGreeks>,
}

fn greeks_for<P: OptionPricer>(
    pricer: &P,
    sides: &[OptionType],
    bumps: &GreeksConfig,
) -> Result<Vec<SideGreeks>> {
    sides
        .iter()
        .map(|&option_type| {
            let greeks = compute_greeks(pricer, option_type, bumps)?;
            Ok(SideGreeks {
                option_type,
                greeks: greeks.into(),
            })
        })
        .collect()
}

/// Greeks of `sides` on `engine`.
pub fn evaluate(
    config: &PricerConfig,
    engine: Engine,
    sides: &[OptionType],
    bumps: &GreeksConfig,
) -> Result<GreeksReport> {
    let params = config.contract.to_params()?;
    let sides = match engine {
        Engine::Lattice => {
            let execution = if config.lattice.parallel {
                ExecutionMode::Parallel
            } else {
                ExecutionMode::Sequential
            };
            let tree = BinomialTree::new(params, config.lattice.steps, config.lattice.exercise)?
                .with_execution(execution);
            greeks_for(&tree, sides, bumps)?
        }
        Engine::MonteCarlo => {
            let mc = monte_carlo::build_engine(config, None)?;
            greeks_for(&mc, sides, bumps)?
        }
        Engine::ClosedForm => {
            let gbs = GeneralizedBlackScholes::new(params)?;
            greeks_for(&gbs, sides, bumps)?
        }
    };

    Ok(GreeksReport {
        contract: config.contract,
        engine,
        sides,
    })
}

/// Run the greeks command
pub fn run(args: &GreeksArgs, mut config: PricerConfig, format: OutputFormat) -> Result<()> {
    args.apply(&mut config);
    config.validate()?;
    let bumps = args.bumps()?;

    info!(engine = %args.engine, "Computing finite-difference greeks");
    let report = evaluate(&config, args.engine, &args.side.option_types(), &bumps)?;
    emit(&report, format)
}

impl fmt::Display for GreeksReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", contract_line(&self.contract))?;
        writeln!(f, "engine: {}", self.engine)?;

        let mut headers = vec!["Greek".to_string()];
        headers.extend(self.sides.iter().map(|s| s.option_type.to_string()));
        let mut table = Table::new(headers);

        let rows: [(&str, fn(&GreeksView) -> f64); 7] = [
            ("price", |g| g.price),
            ("delta", |g| g.delta),
            ("gamma", |g| g.gamma),
            ("vega", |g| g.vega),
            ("theta", |g| g.theta),
            ("rho", |g| g.rho),
            ("carry", |g| g.carry),
        ];
        for (name, get) in rows {
            let mut row = vec![name.to_string()];
            row.extend(self.sides.iter().map(|s| fmt_value(get(&s.greeks))));
            table.row(row);
        }
        write!(f, "{}", table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn contract_config() -> PricerConfig {
        let mut config = PricerConfig::default();
        config.contract.spot = 100.0;
        config.contract.strike = 100.0;
        config.contract.maturity = 1.0;
        config.contract.rate = 0.05;
        config.contract.cost_of_carry = 0.05;
        config.contract.volatility = Some(0.2);
        config
    }

    #[test]
    fn test_closed_form_delta() {
        let report = evaluate(
            &contract_config(),
            Engine::ClosedForm,
            &[OptionType::Call],
            &GreeksConfig::default(),
        )
        .unwrap();
        assert_abs_diff_eq!(report.sides[0].greeks.delta, 0.636_83, epsilon = 1e-3);
    }

    #[test]
    fn test_lattice_tracks_closed_form() {
        let mut config = contract_config();
        config.lattice.steps = 500;
        let bumps = GreeksConfig::default();

        let lattice = evaluate(&config, Engine::Lattice, &[OptionType::Put], &bumps).unwrap();
        let closed = evaluate(&config, Engine::ClosedForm, &[OptionType::Put], &bumps).unwrap();
        let (l, c) = (&lattice.sides[0].greeks, &closed.sides[0].greeks);

        assert_abs_diff_eq!(l.price, c.price, epsilon = 2e-2);
        assert_abs_diff_eq!(l.delta, c.delta, epsilon = 2e-3);
        assert_abs_diff_eq!(l.vega, c.vega, epsilon = 0.1);
    }

    #[test]
    fn test_bump_flags() {
        let args = GreeksArgs {
            spot_bump: Some(0.05),
            ..Default::default()
        };
        let bumps = args.bumps().unwrap();
        assert_eq!(bumps.spot_bump_relative, 0.05);
        assert_eq!(bumps.time_bump_years, 1.0 / 252.0);

        let bad = GreeksArgs {
            vol_bump: Some(-0.01),
            ..Default::default()
        };
        assert!(matches!(bad.bumps(), Err(CliError::InvalidArgument(_))));
    }

    #[test]
    fn test_table_has_one_column_per_side() {
        let report = evaluate(
            &contract_config(),
            Engine::ClosedForm,
            &Side::Both.option_types(),
            &GreeksConfig::default(),
        )
        .unwrap();
        let rendered = report.to_string();
        assert!(rendered.contains("call"));
        assert!(rendered.contains("put"));
        assert!(rendered.contains("gamma"));
    }
}
