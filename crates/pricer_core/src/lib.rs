//! # pricer_core: Foundation for the Energy Option Pricers
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the workspace and provides:
//! - Option side and exercise style enums (`types::option`)
//! - The cross-crate error currency `PricingError` (`types::error`)
//! - Standard normal distribution functions (`math::distributions`)
//! - Sample statistics used by the Monte Carlo diagnostics (`math::statistics`)
//!
//! Layer 1 has no dependencies on other pricer_* crates.
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::math::distributions::norm_cdf;
//! use pricer_core::math::statistics::{mean, standard_error};
//! use pricer_core::types::OptionType;
//!
//! assert_eq!(OptionType::Put.sign::<f64>(), -1.0);
//! assert!((norm_cdf(0.0_f64) - 0.5).abs() < 1e-7);
//!
//! let estimates = [6.10, 6.12, 6.11, 6.13];
//! assert!((mean(&estimates) - 6.115).abs() < 1e-12);
//! assert!(standard_error(&estimates) > 0.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for `OptionType` and `ExerciseStyle`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod types;
