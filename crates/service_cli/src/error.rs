//! Error types for the energy-pricer CLI.

use pricer_core::types::PricingError;
use pricer_pricing::lattice::LatticeError;
use pricer_pricing::mc::{self, McError};
use thiserror::Error;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file or environment error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Contract or pricer error
    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    /// Lattice construction error
    #[error("Lattice error: {0}")]
    Lattice(#[from] LatticeError),

    /// Monte Carlo runtime error
    #[error("Monte Carlo error: {0}")]
    MonteCarlo(#[from] McError),

    /// Monte Carlo configuration error
    #[error("Simulation configuration error: {0}")]
    Simulation(#[from] mc::ConfigError),

    /// Monte Carlo run aborted on a non-finite loop mean
    #[error("Simulation diverged: {0}")]
    Divergence(String),

    /// Invalid command-line argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON output error
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

/// Result alias used by every command.
pub type Result<T> = std::result::Result<T, CliError>;
