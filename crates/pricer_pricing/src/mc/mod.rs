//! # Composable Monte Carlo Engine
//!
//! The engine owns only the loop structure. Everything model-specific is
//! supplied by the caller through three capability traits:
//!
//! | Capability | Input | Output shape |
//! |------------|-------|--------------|
//! | [`InnovationSource`] | batch shape, loop index | (paths × steps) |
//! | [`PathGenerator`] | innovations, σ, dt, drift b | (paths × steps) log-increments |
//! | [`PayoffEvaluator`] | simulated paths, contract | (paths,) discounted payoffs |
//!
//! ## Loop
//!
//! For each loop index the engine draws a batch (or reuses the override
//! batch), optionally appends its antithetic mirror, optionally standardises
//! it to zero mean and unit variance, binds it to the path generator and
//! averages the payoff vector. The per-loop averages form the
//! [`LoopResult`].
//!
//! A non-finite loop average aborts the run. The outcome is then
//! [`SimulationOutcome::Diverged`] carrying the offending batch, the path
//! increments and the payoff vector.
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_models::instruments::ContractParameters;
//! use pricer_pricing::mc::{
//!     MonteCarloEngine, NormalInnovations, SimulationConfig, VanillaPayoff, WienerPath,
//! };
//!
//! let params = ContractParameters::new(100.0, 100.0, 1.0 / 12.0, 0.1, 0.1, Some(0.4)).unwrap();
//! let config = SimulationConfig::builder()
//!     .mc_loops(10)
//!     .mc_paths(1_000)
//!     .path_length(30)
//!     .antithetic(true)
//!     .build()
//!     .unwrap();
//!
//! let engine = MonteCarloEngine::builder()
//!     .config(config)
//!     .params(params)
//!     .innovations(NormalInnovations::new(42))
//!     .path_generator(WienerPath)
//!     .payoff(VanillaPayoff)
//!     .build()
//!     .unwrap();
//!
//! let outcome = engine.call().unwrap();
//! let loops = outcome.completed().unwrap();
//! assert_eq!(loops.len(), 10);
//! assert!((loops.mean() - 5.0).abs() < 0.5);
//! ```

mod batch;
mod capability;
mod config;
mod engine;
mod error;
mod outcome;
mod strategies;
mod variance;

pub use batch::{InnovationBatch, PathIncrements, PathMatrix, PayoffVector};
pub use capability::{
    InnovationSource, PathDynamics, PathGenerator, PayoffEvaluator, SimulatedPaths,
};
pub use config::{SimulationConfig, SimulationConfigBuilder};
pub use engine::{MonteCarloEngine, MonteCarloEngineBuilder};
pub use error::{ConfigError, McError};
pub use outcome::{DivergenceDiagnostic, LoopResult, SimulationOutcome};
pub use strategies::{NormalInnovations, VanillaPayoff, WienerPath};
pub use variance::{antithetic, standardise};
