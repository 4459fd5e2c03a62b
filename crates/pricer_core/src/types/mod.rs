//! Core option and error types.
//!
//! This module provides:
//! - `option`: [`OptionType`] (call/put) and [`ExerciseStyle`] (European/American)
//! - `error`: [`PricingError`], the error type shared by every pricer crate

pub mod error;
pub mod option;

pub use error::PricingError;
pub use option::{ExerciseStyle, OptionType};
