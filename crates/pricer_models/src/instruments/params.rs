//! Contract parameters for single-underlying options.
//!
//! [`ContractParameters`] is immutable once built. Engines hold their own copy;
//! a changed parameter always produces a new validated instance via
//! [`ContractParameters::with_param`], never an in-place mutation.

use std::fmt;

use num_traits::Float;
use pricer_core::types::PricingError;

/// Identifies one field of [`ContractParameters`] for perturbation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamField {
    /// Underlying price S.
    Spot,
    /// Strike K.
    Strike,
    /// Time to maturity t in years.
    Maturity,
    /// Risk-free rate r.
    Rate,
    /// Cost of carry b.
    CostOfCarry,
    /// Volatility sigma.
    Volatility,
}

impl fmt::Display for ParamField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamField::Spot => "S",
            ParamField::Strike => "K",
            ParamField::Maturity => "t",
            ParamField::Rate => "r",
            ParamField::CostOfCarry => "b",
            ParamField::Volatility => "sigma",
        };
        f.write_str(name)
    }
}

/// Option contract and market parameters.
///
/// # Type Parameters
/// * `T` - Floating-point type implementing `Float` (e.g., `f64`)
///
/// # Fields
/// - `spot` (S): level or index price, positive
/// - `strike` (K): positive
/// - `maturity` (t): years to expiry, positive
/// - `rate` (r): continuously compounded risk-free rate
/// - `cost_of_carry` (b): drift of the underlying under the pricing measure
/// - `volatility` (sigma): optional, non-negative when present
///
/// # Examples
/// ```
/// use pricer_models::instruments::{ContractParameters, ParamField};
///
/// let params = ContractParameters::builder()
///     .spot(50.0_f64)
///     .strike(50.0)
///     .maturity(5.0 / 12.0)
///     .rate(0.1)
///     .cost_of_carry(0.1)
///     .volatility(0.4)
///     .build()
///     .unwrap();
///
/// let bumped = params.with_param(ParamField::Spot, 51.0).unwrap();
/// assert_eq!(params.spot(), 50.0);
/// assert_eq!(bumped.spot(), 51.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContractParameters<T: Float> {
    spot: T,
    strike: T,
    maturity: T,
    rate: T,
    cost_of_carry: T,
    volatility: Option<T>,
}

impl<T: Float> ContractParameters<T> {
    /// Creates validated parameters.
    ///
    /// # Errors
    /// `PricingError::InvalidInput` if any value is non-finite, S, K or t is
    /// not positive, or sigma is negative.
    pub fn new(
        spot: T,
        strike: T,
        maturity: T,
        rate: T,
        cost_of_carry: T,
        volatility: Option<T>,
    ) -> Result<Self, PricingError> {
        let params = Self {
            spot,
            strike,
            maturity,
            rate,
            cost_of_carry,
            volatility,
        };
        params.validate()?;
        Ok(params)
    }

    /// Creates a new builder.
    #[inline]
    pub fn builder() -> ContractParametersBuilder<T> {
        ContractParametersBuilder::default()
    }

    /// Returns the underlying price S.
    #[inline]
    pub fn spot(&self) -> T {
        self.spot
    }

    /// Returns the strike K.
    #[inline]
    pub fn strike(&self) -> T {
        self.strike
    }

    /// Returns the time to maturity t.
    #[inline]
    pub fn maturity(&self) -> T {
        self.maturity
    }

    /// Returns the risk-free rate r.
    #[inline]
    pub fn rate(&self) -> T {
        self.rate
    }

    /// Returns the cost of carry b.
    #[inline]
    pub fn cost_of_carry(&self) -> T {
        self.cost_of_carry
    }

    /// Returns the volatility if one was supplied.
    #[inline]
    pub fn volatility(&self) -> Option<T> {
        self.volatility
    }

    /// Returns the volatility or a `MissingVolatility` error naming the caller.
    ///
    /// # Examples
    /// ```
    /// use pricer_models::instruments::ContractParameters;
    ///
    /// let params = ContractParameters::new(50.0_f64, 50.0, 1.0, 0.05, 0.05, None).unwrap();
    /// assert!(params.require_volatility("lattice").is_err());
    /// ```
    pub fn require_volatility(&self, context: &str) -> Result<T, PricingError> {
        self.volatility.ok_or_else(|| {
            PricingError::MissingVolatility(format!(
                "{} requires sigma for direct pricing",
                context
            ))
        })
    }

    /// Returns the value of a single field.
    ///
    /// `None` only for `ParamField::Volatility` when sigma is absent.
    pub fn get(&self, field: ParamField) -> Option<T> {
        match field {
            ParamField::Spot => Some(self.spot),
            ParamField::Strike => Some(self.strike),
            ParamField::Maturity => Some(self.maturity),
            ParamField::Rate => Some(self.rate),
            ParamField::CostOfCarry => Some(self.cost_of_carry),
            ParamField::Volatility => self.volatility,
        }
    }

    /// Returns a new instance with one field replaced.
    ///
    /// The receiver is left untouched; the copy is re-validated.
    pub fn with_param(&self, field: ParamField, value: T) -> Result<Self, PricingError> {
        let mut next = *self;
        match field {
            ParamField::Spot => next.spot = value,
            ParamField::Strike => next.strike = value,
            ParamField::Maturity => next.maturity = value,
            ParamField::Rate => next.rate = value,
            ParamField::CostOfCarry => next.cost_of_carry = value,
            ParamField::Volatility => next.volatility = Some(value),
        }
        next.validate()?;
        Ok(next)
    }

    /// Returns a new instance with `delta` added to one field.
    ///
    /// # Errors
    /// `MissingVolatility` when bumping an absent sigma, or `InvalidInput` if
    /// the bumped value leaves the admissible domain.
    pub fn bumped(&self, field: ParamField, delta: T) -> Result<Self, PricingError> {
        let base = self.get(field).ok_or_else(|| {
            PricingError::MissingVolatility("cannot perturb an absent sigma".to_string())
        })?;
        self.with_param(field, base + delta)
    }

    /// Validates the parameter set.
    pub fn validate(&self) -> Result<(), PricingError> {
        let zero = T::zero();
        let checks = [
            (ParamField::Spot, self.spot, true),
            (ParamField::Strike, self.strike, true),
            (ParamField::Maturity, self.maturity, true),
            (ParamField::Rate, self.rate, false),
            (ParamField::CostOfCarry, self.cost_of_carry, false),
        ];

        for (field, value, must_be_positive) in checks {
            if !value.is_finite() {
                return Err(PricingError::InvalidInput(format!(
                    "{} must be finite, got {}",
                    field,
                    value.to_f64().unwrap_or(f64::NAN)
                )));
            }
            if must_be_positive && value <= zero {
                return Err(PricingError::InvalidInput(format!(
                    "{} must be positive, got {}",
                    field,
                    value.to_f64().unwrap_or(f64::NAN)
                )));
            }
        }

        if let Some(sigma) = self.volatility {
            if !sigma.is_finite() || sigma < zero {
                return Err(PricingError::InvalidInput(format!(
                    "sigma must be finite and non-negative, got {}",
                    sigma.to_f64().unwrap_or(f64::NAN)
                )));
            }
        }

        Ok(())
    }

    /// Discount factor `exp(-r * t)` to maturity.
    #[inline]
    pub fn discount_factor(&self) -> T {
        (-self.rate * self.maturity).exp()
    }

    /// Deterministic forward `S * exp(b * t)`.
    #[inline]
    pub fn forward(&self) -> T {
        self.spot * (self.cost_of_carry * self.maturity).exp()
    }
}

/// Builder for [`ContractParameters`].
///
/// Spot, strike and maturity are mandatory; rate and cost of carry default to
/// zero; volatility stays absent unless set.
#[derive(Debug, Clone, Copy)]
pub struct ContractParametersBuilder<T: Float> {
    spot: Option<T>,
    strike: Option<T>,
    maturity: Option<T>,
    rate: T,
    cost_of_carry: T,
    volatility: Option<T>,
}

impl<T: Float> Default for ContractParametersBuilder<T> {
    fn default() -> Self {
        Self {
            spot: None,
            strike: None,
            maturity: None,
            rate: T::zero(),
            cost_of_carry: T::zero(),
            volatility: None,
        }
    }
}

impl<T: Float> ContractParametersBuilder<T> {
    /// Sets the underlying price S.
    #[inline]
    pub fn spot(mut self, spot: T) -> Self {
        self.spot = Some(spot);
        self
    }

    /// Sets the strike K.
    #[inline]
    pub fn strike(mut self, strike: T) -> Self {
        self.strike = Some(strike);
        self
    }

    /// Sets the time to maturity t in years.
    #[inline]
    pub fn maturity(mut self, maturity: T) -> Self {
        self.maturity = Some(maturity);
        self
    }

    /// Sets the risk-free rate r.
    #[inline]
    pub fn rate(mut self, rate: T) -> Self {
        self.rate = rate;
        self
    }

    /// Sets the cost of carry b.
    #[inline]
    pub fn cost_of_carry(mut self, cost_of_carry: T) -> Self {
        self.cost_of_carry = cost_of_carry;
        self
    }

    /// Sets the volatility sigma.
    #[inline]
    pub fn volatility(mut self, volatility: T) -> Self {
        self.volatility = Some(volatility);
        self
    }

    /// Builds and validates the parameters.
    ///
    /// # Errors
    /// `InvalidInput` if a mandatory field is missing or any value is invalid.
    pub fn build(self) -> Result<ContractParameters<T>, PricingError> {
        let missing = |name: &str| PricingError::InvalidInput(format!("{} must be specified", name));

        ContractParameters::new(
            self.spot.ok_or_else(|| missing("S"))?,
            self.strike.ok_or_else(|| missing("K"))?,
            self.maturity.ok_or_else(|| missing("t"))?,
            self.rate,
            self.cost_of_carry,
            self.volatility,
        )
    }
}
