//! Check command implementation
//!
//! Reports the runtime environment, validates the loaded configuration and
//! prices a few reference contracts whose values are known.

use std::fmt;

use pricer_core::types::{ExerciseStyle, OptionType, PricingError};
use pricer_models::analytical::GeneralizedBlackScholes;
use pricer_models::instruments::ContractParameters;
use pricer_pricing::lattice::BinomialTree;
use pricer_pricing::ExecutionMode;
use serde::Serialize;
use tracing::{info, warn};

use super::{emit, monte_carlo, OutputFormat, Table};
use crate::config::PricerConfig;
use crate::Result;

/// One reference comparison.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SelfCheck {
    /// What was priced.
    pub name: String,
    /// Known value.
    pub expected: f64,
    /// Computed value.
    pub actual: f64,
    /// Allowed absolute difference.
    pub tolerance: f64,
    /// Whether `actual` lies within `tolerance` of `expected`.
    pub passed: bool,
}

impl SelfCheck {
    fn new(name: impl Into<String>, expected: f64, actual: f64, tolerance: f64) -> Self {
        Self {
            name: name.into(),
            expected,
            actual,
            tolerance,
            passed: (actual - expected).abs() <= tolerance,
        }
    }
}

/// Result of the check command.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CheckReport {
    /// Crate version.
    pub version: String,
    /// Size of the global rayon pool.
    pub rayon_threads: usize,
    /// Validation problems in the loaded configuration.
    pub config_errors: Vec<String>,
    /// Reference pricing results.
    pub checks: Vec<SelfCheck>,
}

impl CheckReport {
    /// Whether the configuration is valid and every check passed.
    pub fn passed(&self) -> bool {
        self.config_errors.is_empty() && self.checks.iter().all(|c| c.passed)
    }
}

fn haug_contract() -> std::result::Result<ContractParameters<f64>, PricingError> {
    ContractParameters::new(50.0, 50.0, 5.0 / 12.0, 0.1, 0.1, Some(0.4))
}

/// Price the reference contracts.
pub fn self_checks() -> Result<Vec<SelfCheck>> {
    let mut checks = Vec::new();

    let haug = haug_contract()?;
    let american = BinomialTree::new(haug, 5, ExerciseStyle::American)?;
    checks.push(SelfCheck::new(
        "5-step American put (Haug)",
        4.488_458_534_7,
        american.put(),
        1e-8,
    ));

    let gbs = GeneralizedBlackScholes::new(haug)?;
    let european = BinomialTree::new(haug, 2_000, ExerciseStyle::European)?
        .with_execution(ExecutionMode::Parallel);
    checks.push(SelfCheck::new(
        "2000-step European call vs GBS",
        gbs.price_call(),
        european.call(),
        5e-3,
    ));

    let mut config = PricerConfig::default();
    config.contract.spot = 100.0;
    config.contract.strike = 100.0;
    config.contract.maturity = 1.0 / 12.0;
    config.monte_carlo.loops = 20;
    config.monte_carlo.paths = 5_000;
    config.monte_carlo.antithetic = true;
    config.monte_carlo.parallel = true;
    let report = monte_carlo::evaluate(&config, None, &[OptionType::Call], false)?;
    let reference = GeneralizedBlackScholes::new(config.contract.to_params()?)?.price_call();
    let simulated = &report.prices[0];
    checks.push(SelfCheck::new(
        "Monte Carlo call vs GBS",
        reference,
        simulated.price,
        4.0 * simulated.std_error + 1e-2,
    ));

    Ok(checks)
}

/// Build the check report for `config`.
pub fn evaluate(config: &PricerConfig) -> Result<CheckReport> {
    let config_errors = match config.validate() {
        Ok(()) => Vec::new(),
        Err(crate::config::ConfigError::Validation(errors)) => errors,
        Err(other) => vec![other.to_string()],
    };

    Ok(CheckReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        rayon_threads: rayon::current_num_threads(),
        config_errors,
        checks: self_checks()?,
    })
}

/// Run the check command
pub fn run(config: &PricerConfig, format: OutputFormat) -> Result<()> {
    info!("Checking configuration and reference prices...");
    let report = evaluate(config)?;
    emit(&report, format)?;

    if report.passed() {
        info!("All checks passed");
        Ok(())
    } else {
        warn!("Some checks failed");
        Err(PricingError::NumericalInstability("self-check failed".to_string()).into())
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "energy-pricer {}", self.version)?;
        writeln!(f, "rayon threads: {}", self.rayon_threads)?;
        if self.config_errors.is_empty() {
            writeln!(f, "configuration: ok")?;
        } else {
            for error in &self.config_errors {
                writeln!(f, "configuration: {}", error)?;
            }
        }

        let mut table = Table::new(["Check", "Expected", "Actual", "Status"]);
        for check in &self.checks {
            table.row([
                check.name.clone(),
                format!("{:.6}", check.expected),
                format!("{:.6}", check.actual),
                if check.passed { "ok" } else { "FAILED" }.to_string(),
            ]);
        }
        write!(f, "{}", table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_checks_pass() {
        let checks = self_checks().unwrap();
        assert_eq!(checks.len(), 3);
        for check in &checks {
            assert!(check.passed, "{} failed: {} vs {}", check.name, check.actual, check.expected);
        }
    }

    #[test]
    fn test_invalid_config_fails_report() {
        let mut config = PricerConfig::default();
        config.lattice.steps = 0;

        let report = evaluate(&config).unwrap();
        assert_eq!(report.config_errors.len(), 1);
        assert!(!report.passed());
        assert!(report.rayon_threads >= 1);
    }
}
