//! Error types for the Monte Carlo engine.
//!
//! [`ConfigError`] is raised while building a configuration or an engine,
//! before any path is simulated. [`McError`] is what `call()`/`put()` return
//! when a run cannot start or a capability breaks its shape contract.
//! Divergence is not an error: it is reported through
//! [`SimulationOutcome::Diverged`](super::SimulationOutcome::Diverged).

use pricer_core::types::PricingError;
use thiserror::Error;

/// Configuration error for the Monte Carlo engine.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Loop count must be at least 1.
    #[error("Invalid loop count {0}: must be at least 1")]
    InvalidLoopCount(usize),

    /// Paths per loop must be at least 1.
    #[error("Invalid path count {0}: must be at least 1")]
    InvalidPathCount(usize),

    /// Steps per path must be at least 1.
    #[error("Invalid path length {0}: must be at least 1")]
    InvalidPathLength(usize),

    /// Override batch does not match (mc_paths, path_length).
    #[error(
        "Innovation override has shape ({}, {}), expected ({}, {})",
        found.0, found.1, expected.0, expected.1
    )]
    InnovationShape {
        /// Configured (mc_paths, path_length).
        expected: (usize, usize),
        /// Shape of the supplied batch.
        found: (usize, usize),
    },

    /// A required engine component was not supplied to the builder.
    #[error("Missing capability: {0}")]
    MissingCapability(&'static str),

    /// Invalid parameter value with name and description.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        value: String,
    },
}

/// Error returned by a Monte Carlo run.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum McError {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Contract carries no volatility.
    #[error("Volatility is required for Monte Carlo simulation")]
    MissingVolatility,

    /// A capability or array constructor produced data of the wrong shape.
    #[error("{component} shape mismatch: {detail}")]
    ShapeMismatch {
        /// Offending component.
        component: &'static str,
        /// What was expected and what was found.
        detail: String,
    },
}

impl McError {
    pub(crate) fn shape(component: &'static str, detail: impl Into<String>) -> Self {
        McError::ShapeMismatch {
            component,
            detail: detail.into(),
        }
    }
}

impl From<McError> for PricingError {
    fn from(err: McError) -> Self {
        match err {
            McError::MissingVolatility => {
                PricingError::MissingVolatility("Monte Carlo engine".to_string())
            }
            other => PricingError::Configuration(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidLoopCount(0);
        assert!(err.to_string().contains("Invalid loop count 0"));

        let err = ConfigError::InvalidPathLength(0);
        assert!(err.to_string().contains("Invalid path length 0"));

        let err = ConfigError::InnovationShape {
            expected: (10, 3),
            found: (10, 4),
        };
        assert_eq!(
            err.to_string(),
            "Innovation override has shape (10, 4), expected (10, 3)"
        );

        let err = ConfigError::MissingCapability("payoff");
        assert!(err.to_string().contains("payoff"));
    }

    #[test]
    fn test_mc_error_from_config() {
        let err: McError = ConfigError::InvalidPathCount(0).into();
        assert!(matches!(err, McError::Config(ConfigError::InvalidPathCount(0))));
        assert!(err.to_string().contains("Invalid path count 0"));
    }

    #[test]
    fn test_into_pricing_error() {
        let err: PricingError = McError::MissingVolatility.into();
        assert!(matches!(err, PricingError::MissingVolatility(_)));

        let err: PricingError = McError::shape("PathGenerator", "expected 10 rows, found 9").into();
        match err {
            PricingError::Configuration(msg) => assert!(msg.contains("PathGenerator")),
            other => panic!("Expected Configuration, got {:?}", other),
        }
    }
}
