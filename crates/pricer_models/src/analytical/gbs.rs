//! Generalised Black-Scholes (cost-of-carry) closed form.
//!
//! ## Formulas
//!
//! **Call**: C = S·e^((b-r)t)·N(d₁) - K·e^(-rt)·N(d₂)
//! **Put**: P = K·e^(-rt)·N(-d₂) - S·e^((b-r)t)·N(-d₁)
//!
//! Where:
//! - d₁ = (ln(S/K) + (b + σ²/2)t) / (σ√t)
//! - d₂ = d₁ - σ√t
//!
//! With σ = 0 the price collapses to the discounted intrinsic value at the
//! deterministic forward.

use num_traits::Float;
use pricer_core::math::distributions::{norm_cdf, norm_pdf};
use pricer_core::types::{OptionType, PricingError};

use crate::instruments::{ContractParameters, OptionPricer};

/// Closed-form European pricer with cost of carry.
///
/// # Examples
/// ```
/// use pricer_models::analytical::GeneralizedBlackScholes;
/// use pricer_models::instruments::ContractParameters;
///
/// let params = ContractParameters::new(50.0_f64, 50.0, 5.0 / 12.0, 0.1, 0.1, Some(0.4)).unwrap();
/// let gbs = GeneralizedBlackScholes::new(params).unwrap();
///
/// // Put-call parity: C - P = S·e^((b-r)t) - K·e^(-rt)
/// let parity = gbs.price_call() - gbs.price_put()
///     - (50.0 - 50.0 * (-0.1_f64 * 5.0 / 12.0).exp());
/// assert!(parity.abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct GeneralizedBlackScholes<T: Float> {
    params: ContractParameters<T>,
    sigma: T,
}

impl<T: Float> GeneralizedBlackScholes<T> {
    /// Creates the pricer.
    ///
    /// # Errors
    /// `PricingError::MissingVolatility` if sigma is absent.
    pub fn new(params: ContractParameters<T>) -> Result<Self, PricingError> {
        let sigma = params.require_volatility("generalised Black-Scholes")?;
        Ok(Self { params, sigma })
    }

    /// Returns the contract parameters.
    #[inline]
    pub fn contract(&self) -> &ContractParameters<T> {
        &self.params
    }

    /// Carry discount `e^((b-r)t)` applied to the spot leg.
    #[inline]
    fn carry_factor(&self) -> T {
        ((self.params.cost_of_carry() - self.params.rate()) * self.params.maturity()).exp()
    }

    fn is_degenerate(&self) -> bool {
        self.sigma * self.params.maturity().sqrt() <= T::epsilon()
    }

    /// Returns `(d₁, d₂)`.
    pub fn d1_d2(&self) -> (T, T) {
        let p = &self.params;
        let two = T::one() + T::one();
        let vol_sqrt_t = self.sigma * p.maturity().sqrt();
        let d1 = ((p.spot() / p.strike()).ln()
            + (p.cost_of_carry() + self.sigma * self.sigma / two) * p.maturity())
            / vol_sqrt_t;
        (d1, d1 - vol_sqrt_t)
    }

    /// Prices either side.
    pub fn value(&self, option_type: OptionType) -> T {
        let p = &self.params;
        if self.is_degenerate() {
            return p.discount_factor() * option_type.intrinsic(p.forward(), p.strike());
        }

        let z = option_type.sign::<T>();
        let (d1, d2) = self.d1_d2();
        z * (p.spot() * self.carry_factor() * norm_cdf(z * d1)
            - p.strike() * p.discount_factor() * norm_cdf(z * d2))
    }

    /// Call price.
    #[inline]
    pub fn price_call(&self) -> T {
        self.value(OptionType::Call)
    }

    /// Put price.
    #[inline]
    pub fn price_put(&self) -> T {
        self.value(OptionType::Put)
    }

    /// Delta ∂V/∂S.
    pub fn delta(&self, option_type: OptionType) -> T {
        let (d1, _) = self.d1_d2();
        match option_type {
            OptionType::Call => self.carry_factor() * norm_cdf(d1),
            OptionType::Put => self.carry_factor() * (norm_cdf(d1) - T::one()),
        }
    }

    /// Gamma ∂²V/∂S², identical for calls and puts.
    pub fn gamma(&self) -> T {
        let (d1, _) = self.d1_d2();
        let p = &self.params;
        self.carry_factor() * norm_pdf(d1) / (p.spot() * self.sigma * p.maturity().sqrt())
    }

    /// Vega ∂V/∂σ, identical for calls and puts.
    pub fn vega(&self) -> T {
        let (d1, _) = self.d1_d2();
        let p = &self.params;
        p.spot() * self.carry_factor() * norm_pdf(d1) * p.maturity().sqrt()
    }
}

impl OptionPricer for GeneralizedBlackScholes<f64> {
    fn params(&self) -> &ContractParameters<f64> {
        &self.params
    }

    fn with_params(&self, params: ContractParameters<f64>) -> Result<Self, PricingError> {
        Self::new(params)
    }

    fn price(&self, option_type: OptionType) -> Result<f64, PricingError> {
        Ok(self.value(option_type))
    }
}
