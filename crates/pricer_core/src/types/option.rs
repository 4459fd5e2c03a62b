//! Option side and exercise style definitions.

use std::fmt;
use std::str::FromStr;

use num_traits::Float;

use super::error::PricingError;

/// Call or put side of a vanilla option.
///
/// The lattice and payoff code work with the sign `z` (+1 call, -1 put) so
/// that both sides share one formula: `max(z * (S - K), 0)`.
///
/// # Examples
/// ```
/// use pricer_core::types::OptionType;
///
/// assert_eq!(OptionType::Call.sign::<f64>(), 1.0);
/// assert_eq!(OptionType::Put.intrinsic(40.0_f64, 50.0), 10.0);
/// assert_eq!(OptionType::Call.intrinsic(40.0_f64, 50.0), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OptionType {
    /// Right to buy at the strike.
    Call,
    /// Right to sell at the strike.
    Put,
}

impl OptionType {
    /// Returns `z`: +1 for calls, -1 for puts.
    #[inline]
    pub fn sign<T: Float>(self) -> T {
        match self {
            OptionType::Call => T::one(),
            OptionType::Put => -T::one(),
        }
    }

    /// Returns the exercise value `max(z * (spot - strike), 0)`.
    #[inline]
    pub fn intrinsic<T: Float>(self, spot: T, strike: T) -> T {
        (self.sign::<T>() * (spot - strike)).max(T::zero())
    }

    /// Returns whether this is a call.
    #[inline]
    pub fn is_call(self) -> bool {
        matches!(self, OptionType::Call)
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "call"),
            OptionType::Put => write!(f, "put"),
        }
    }
}

impl FromStr for OptionType {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "call" | "c" => Ok(OptionType::Call),
            "put" | "p" => Ok(OptionType::Put),
            other => Err(PricingError::InvalidInput(format!(
                "unknown option type '{}': expected call or put",
                other
            ))),
        }
    }
}

/// Exercise style of the option.
///
/// # Variants
/// - `European`: Exercise only at maturity
/// - `American`: Exercise at any lattice date up to maturity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ExerciseStyle {
    /// Exercise only at expiry.
    #[default]
    European,
    /// Early exercise allowed.
    American,
}

impl ExerciseStyle {
    /// Returns whether early exercise is permitted.
    #[inline]
    pub fn is_american(self) -> bool {
        matches!(self, ExerciseStyle::American)
    }
}

impl fmt::Display for ExerciseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExerciseStyle::European => write!(f, "european"),
            ExerciseStyle::American => write!(f, "american"),
        }
    }
}

impl FromStr for ExerciseStyle {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "european" | "euro" | "e" => Ok(ExerciseStyle::European),
            "american" | "amer" | "a" => Ok(ExerciseStyle::American),
            other => Err(PricingError::InvalidInput(format!(
                "unknown exercise style '{}': expected european or american",
                other
            ))),
        }
    }
}
