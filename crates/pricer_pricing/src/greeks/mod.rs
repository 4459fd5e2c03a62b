//! # Finite-Difference Greeks
//!
//! Sensitivities of any [`OptionPricer`](pricer_models::instruments::OptionPricer)
//! by bump-and-revalue. Each bump builds a new pricer through `with_params`,
//! so the original pricer is never touched and a seeded Monte Carlo engine
//! reuses its random numbers across bumps.
//!
//! | Greek | Parameter | Scheme |
//! |-------|-----------|--------|
//! | Delta | S | central, bump `spot_bump_relative · S` |
//! | Gamma | S | three-point second difference |
//! | Vega | σ | central (forward if σ < bump) |
//! | Theta | t | backward in maturity: `(V(t - h) - V(t)) / h` |
//! | Rho | r, b held | central |
//! | Carry | b | central |
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_core::types::OptionType;
//! use pricer_models::analytical::GeneralizedBlackScholes;
//! use pricer_models::instruments::ContractParameters;
//! use pricer_pricing::greeks::{compute_greeks, GreeksConfig};
//!
//! let params = ContractParameters::new(100.0, 100.0, 1.0, 0.05, 0.05, Some(0.2)).unwrap();
//! let pricer = GeneralizedBlackScholes::new(params).unwrap();
//!
//! let greeks = compute_greeks(&pricer, OptionType::Call, &GreeksConfig::default()).unwrap();
//! assert!((greeks.delta - 0.6368).abs() < 1e-3);
//! assert!(greeks.theta < 0.0);
//! ```

mod config;
mod finite_difference;
mod result;

pub use config::{GreeksConfig, GreeksConfigBuilder, GreeksConfigError};
pub use finite_difference::{compute_greeks, finite_difference};
pub use result::{Greek, GreeksResult};
