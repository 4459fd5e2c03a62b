//! The pricer contract.
//!
//! Every engine (lattice, Monte Carlo, closed form) exposes the same small
//! surface so that collaborators such as the finite-difference greeks helper
//! or the CLI summary can drive any of them:
//!
//! - [`OptionPricer::params`]: the immutable contract parameters
//! - [`OptionPricer::with_params`]: a fresh pricer for a perturbed parameter set
//! - [`OptionPricer::call`] / [`OptionPricer::put`]: scalar prices

use pricer_core::types::{OptionType, PricingError};

use super::params::ContractParameters;

/// Contract shared by all scalar option pricers.
///
/// Implementations must be pure: pricing the same instance twice returns the
/// same value, and `with_params` never aliases the receiver.
///
/// # Examples
/// ```
/// use pricer_core::types::{OptionType, PricingError};
/// use pricer_models::instruments::{ContractParameters, OptionPricer};
///
/// struct Intrinsic(ContractParameters<f64>);
///
/// impl OptionPricer for Intrinsic {
///     fn params(&self) -> &ContractParameters<f64> {
///         &self.0
///     }
///
///     fn with_params(&self, params: ContractParameters<f64>) -> Result<Self, PricingError> {
///         Ok(Intrinsic(params))
///     }
///
///     fn price(&self, option_type: OptionType) -> Result<f64, PricingError> {
///         Ok(option_type.intrinsic(self.0.spot(), self.0.strike()))
///     }
/// }
///
/// let params = ContractParameters::new(60.0, 50.0, 1.0, 0.0, 0.0, None).unwrap();
/// assert_eq!(Intrinsic(params).call().unwrap(), 10.0);
/// ```
pub trait OptionPricer: Sized {
    /// Returns the contract parameters this pricer was built with.
    fn params(&self) -> &ContractParameters<f64>;

    /// Returns a new pricer with identical engine settings and new parameters.
    fn with_params(&self, params: ContractParameters<f64>) -> Result<Self, PricingError>;

    /// Prices one side of the option.
    fn price(&self, option_type: OptionType) -> Result<f64, PricingError>;

    /// Prices the call.
    fn call(&self) -> Result<f64, PricingError> {
        self.price(OptionType::Call)
    }

    /// Prices the put.
    fn put(&self) -> Result<f64, PricingError> {
        self.price(OptionType::Put)
    }
}
