//! Error types for the binomial lattice.

use pricer_core::types::PricingError;
use thiserror::Error;

/// Lattice construction errors.
///
/// All validation happens when the tree is built; pricing a built tree
/// cannot fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LatticeError {
    /// Step count must be a positive integer.
    #[error("Invalid step count {0}: must be >= 1")]
    InvalidStepCount(usize),

    /// Sigma is required for lattice pricing.
    #[error("Missing volatility: the binomial lattice requires sigma")]
    MissingVolatility,

    /// Risk-neutral probability outside [0, 1] (ill-posed inputs).
    #[error("Risk-neutral probability {probability} outside [0, 1]: increase sigma or the step count")]
    InvalidProbability {
        /// The offending probability
        probability: f64,
    },

    /// Contract parameters failed validation.
    #[error(transparent)]
    Contract(#[from] PricingError),
}

impl From<LatticeError> for PricingError {
    fn from(err: LatticeError) -> Self {
        match err {
            LatticeError::InvalidStepCount(_) => PricingError::Configuration(err.to_string()),
            LatticeError::MissingVolatility => PricingError::MissingVolatility(err.to_string()),
            LatticeError::InvalidProbability { .. } => PricingError::InvalidInput(err.to_string()),
            LatticeError::Contract(inner) => inner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            LatticeError::InvalidStepCount(0).to_string(),
            "Invalid step count 0: must be >= 1"
        );
        let err = LatticeError::InvalidProbability { probability: 1.2 };
        assert!(err.to_string().contains("1.2"));
    }

    #[test]
    fn test_into_pricing_error() {
        let err: PricingError = LatticeError::InvalidStepCount(0).into();
        assert!(matches!(err, PricingError::Configuration(_)));

        let err: PricingError = LatticeError::MissingVolatility.into();
        assert!(matches!(err, PricingError::MissingVolatility(_)));

        let inner = PricingError::InvalidInput("S must be positive".to_string());
        let err: PricingError = LatticeError::Contract(inner.clone()).into();
        assert_eq!(err, inner);
    }
}
