//! CLI configuration management.
//!
//! Loads `[contract]`, `[lattice]` and `[monte_carlo]` tables from a TOML
//! file, applies `PRICER_*` environment overrides and validates the result.
//! Command-line flags are applied on top by each command.

use std::path::{Path, PathBuf};

use pricer_core::types::ExerciseStyle;
use pricer_models::instruments::ContractParameters;
use pricer_pricing::lattice::DEFAULT_STEPS;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "energy-pricer.toml";

/// Contract inputs.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractSection {
    /// Underlying price S.
    pub spot: f64,
    /// Strike K.
    pub strike: f64,
    /// Time to maturity t in years.
    pub maturity: f64,
    /// Risk-free rate r.
    pub rate: f64,
    /// Cost-of-carry b.
    pub cost_of_carry: f64,
    /// Volatility sigma.
    pub volatility: Option<f64>,
}

impl Default for ContractSection {
    fn default() -> Self {
        Self {
            spot: 50.0,
            strike: 50.0,
            maturity: 5.0 / 12.0,
            rate: 0.1,
            cost_of_carry: 0.1,
            volatility: Some(0.4),
        }
    }
}

impl ContractSection {
    /// Validated contract parameters.
    pub fn to_params(&self) -> Result<ContractParameters<f64>, pricer_core::types::PricingError> {
        ContractParameters::new(
            self.spot,
            self.strike,
            self.maturity,
            self.rate,
            self.cost_of_carry,
            self.volatility,
        )
    }
}

/// Lattice settings.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LatticeSection {
    /// Time steps n.
    pub steps: usize,
    /// European or American exercise.
    pub exercise: ExerciseStyle,
    /// Sweep wide steps on the rayon pool.
    pub parallel: bool,
}

impl Default for LatticeSection {
    fn default() -> Self {
        Self {
            steps: DEFAULT_STEPS,
            exercise: ExerciseStyle::European,
            parallel: false,
        }
    }
}

/// Monte Carlo settings.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MonteCarloSection {
    /// Number of loops.
    pub loops: usize,
    /// Paths per loop.
    pub paths: usize,
    /// Time steps per path.
    pub path_length: usize,
    /// Seed of the normal innovation source.
    pub seed: u64,
    /// Antithetic sampling.
    pub antithetic: bool,
    /// Batch standardisation.
    pub standardise: bool,
    /// Per-loop trace events.
    pub trace: bool,
    /// Run loops on the rayon pool.
    pub parallel: bool,
}

impl Default for MonteCarloSection {
    fn default() -> Self {
        Self {
            loops: 50,
            paths: 5_000,
            path_length: 30,
            seed: 42,
            antithetic: false,
            standardise: false,
            trace: false,
            parallel: false,
        }
    }
}

/// Full CLI configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PricerConfig {
    /// Log level used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Contract inputs.
    #[serde(default)]
    pub contract: ContractSection,

    /// Lattice settings.
    #[serde(default)]
    pub lattice: LatticeSection,

    /// Monte Carlo settings.
    #[serde(default)]
    pub monte_carlo: MonteCarloSection,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for PricerConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            contract: ContractSection::default(),
            lattice: LatticeSection::default(),
            monte_carlo: MonteCarloSection::default(),
        }
    }
}

impl PricerConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load `path` if given, else [`DEFAULT_CONFIG_FILE`] if present, else
    /// defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::load(&fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Apply `PRICER_*` environment variable overrides.
    pub fn with_env_override(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`; values that fail to parse are logged
    /// and ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(level) = lookup("PRICER_LOG_LEVEL") {
            self.log_level = level;
        }

        let c = &mut self.contract;
        override_parsed(&lookup, "PRICER_SPOT", &mut c.spot);
        override_parsed(&lookup, "PRICER_STRIKE", &mut c.strike);
        override_parsed(&lookup, "PRICER_MATURITY", &mut c.maturity);
        override_parsed(&lookup, "PRICER_RATE", &mut c.rate);
        override_parsed(&lookup, "PRICER_CARRY", &mut c.cost_of_carry);
        if let Some(raw) = lookup("PRICER_VOLATILITY") {
            match raw.trim() {
                "" | "none" => c.volatility = None,
                value => match value.parse() {
                    Ok(sigma) => c.volatility = Some(sigma),
                    Err(_) => warn!(key = "PRICER_VOLATILITY", value, "ignoring unparsable override"),
                },
            }
        }

        let l = &mut self.lattice;
        override_parsed(&lookup, "PRICER_STEPS", &mut l.steps);
        override_parsed(&lookup, "PRICER_EXERCISE", &mut l.exercise);

        let m = &mut self.monte_carlo;
        override_parsed(&lookup, "PRICER_MC_LOOPS", &mut m.loops);
        override_parsed(&lookup, "PRICER_MC_PATHS", &mut m.paths);
        override_parsed(&lookup, "PRICER_PATH_LENGTH", &mut m.path_length);
        override_parsed(&lookup, "PRICER_SEED", &mut m.seed);

        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(format!(
                "Invalid log_level '{}'. Valid values: {:?}",
                self.log_level, valid_log_levels
            ));
        }

        if let Err(e) = self.contract.to_params() {
            errors.push(format!("contract: {}", e));
        }

        if self.lattice.steps == 0 {
            errors.push("lattice.steps must be greater than 0".to_string());
        }

        let mc = &self.monte_carlo;
        for (name, value) in [
            ("monte_carlo.loops", mc.loops),
            ("monte_carlo.paths", mc.paths),
            ("monte_carlo.path_length", mc.path_length),
        ] {
            if value == 0 {
                errors.push(format!("{} must be greater than 0", name));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

fn override_parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    target: &mut T,
) {
    if let Some(raw) = lookup(key) {
        match raw.trim().parse() {
            Ok(value) => *target = value,
            Err(_) => warn!(key, value = raw.as_str(), "ignoring unparsable override"),
        }
    }
}

/// Configuration error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    Io(String),
    /// Parse error in config file
    #[error("Parse error: {0}")]
    Parse(String),
    /// Validation error
    #[error("Validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
