//! Contract parameters and the pricer contract.
//!
//! - [`params`]: [`ContractParameters`], [`ContractParametersBuilder`], [`ParamField`]
//! - [`traits`]: [`OptionPricer`]

pub mod params;
pub mod traits;

pub use params::{ContractParameters, ContractParametersBuilder, ParamField};
pub use traits::OptionPricer;
