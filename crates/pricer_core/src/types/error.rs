//! Error types for structured error handling.
//!
//! [`PricingError`] is the currency every pricer crate converts its local
//! errors into, so callers that mix engines (the greeks helper, the CLI)
//! only have to handle one type.

use thiserror::Error;

/// Categorised pricing errors.
///
/// # Variants
/// - `InvalidInput`: Contract parameters outside their admissible domain
/// - `Configuration`: Engine settings (step counts, loop counts, capabilities) are invalid
/// - `MissingVolatility`: A pricer needed sigma but none was supplied
/// - `NumericalInstability`: The computation produced an unusable number
/// - `SimulationDivergence`: A Monte Carlo run aborted on a non-finite loop estimate
///
/// # Examples
/// ```
/// use pricer_core::types::PricingError;
///
/// let err = PricingError::InvalidInput("spot must be positive".to_string());
/// assert_eq!(format!("{}", err), "Invalid input: spot must be positive");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// Invalid input data or parameters.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid engine configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Volatility required for direct pricing but absent.
    #[error("Missing volatility: {0}")]
    MissingVolatility(String),

    /// Numerical instability during computation.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),

    /// Monte Carlo simulation aborted on divergence.
    #[error("Simulation diverged: {0}")]
    SimulationDivergence(String),
}

impl PricingError {
    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_error_display() {
        let err = PricingError::Configuration("mc_loops must be >= 1".to_string());
        assert_eq!(err.to_string(), "Configuration error: mc_loops must be >= 1");

        let err = PricingError::MissingVolatility("lattice".to_string());
        assert!(err.to_string().contains("Missing volatility"));

        let err = PricingError::SimulationDivergence("loop 3".to_string());
        assert!(err.to_string().contains("loop 3"));
    }

    #[test]
    fn test_constructors() {
        assert_eq!(
            PricingError::invalid_input("bad"),
            PricingError::InvalidInput("bad".to_string())
        );
        assert_eq!(
            PricingError::configuration("n"),
            PricingError::Configuration("n".to_string())
        );
    }

    #[test]
    fn test_error_trait_implementation() {
        let err = PricingError::NumericalInstability("NaN".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
