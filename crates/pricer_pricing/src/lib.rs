//! # Pricer Pricing (Layer 3: Numerical Engines)
//!
//! ## Layer 3 Role
//!
//! pricer_pricing hosts the two numerically non-trivial engines of the
//! workspace:
//!
//! - [`lattice`]: Cox-Ross-Rubinstein binomial lattice with European and
//!   American exercise
//! - [`mc`]: a Monte Carlo harness composed from three caller-supplied
//!   capabilities (innovations, path construction, payoff) with antithetic
//!   sampling, moment standardisation and divergence detection
//!
//! Supporting modules:
//!
//! - [`rng`]: seeded pseudo-random streams for the stock innovation source
//! - [`greeks`]: finite-difference sensitivities over any
//!   [`OptionPricer`](pricer_models::instruments::OptionPricer)
//! - [`execution`]: sequential vs rayon-parallel execution selection
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_core::types::ExerciseStyle;
//! use pricer_models::instruments::ContractParameters;
//! use pricer_pricing::lattice::BinomialTree;
//!
//! let params = ContractParameters::new(50.0_f64, 50.0, 5.0 / 12.0, 0.1, 0.1, Some(0.4)).unwrap();
//! let tree = BinomialTree::new(params, 5, ExerciseStyle::American).unwrap();
//!
//! // Five-step American put on the Haug reference contract
//! assert!((tree.put() - 4.488_46).abs() < 1e-4);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![allow(unknown_lints)]

pub mod execution;
pub mod greeks;
pub mod lattice;
pub mod mc;
pub mod rng;

// Re-export commonly used items for convenience
pub use execution::ExecutionMode;
pub use greeks::{compute_greeks, Greek, GreeksConfig, GreeksResult};
pub use lattice::{BinomialTree, LatticeError, LatticeState};
pub use mc::{
    InnovationSource, LoopResult, McError, MonteCarloEngine, PathGenerator, PayoffEvaluator,
    SimulationConfig, SimulationOutcome,
};
