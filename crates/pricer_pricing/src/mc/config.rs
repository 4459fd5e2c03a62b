//! Monte Carlo simulation configuration.

use std::sync::Arc;

use super::batch::InnovationBatch;
use super::error::ConfigError;
use crate::execution::ExecutionMode;

/// Monte Carlo simulation configuration.
///
/// Immutable once built. Use [`SimulationConfigBuilder`] to construct
/// instances.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::SimulationConfig;
/// use pricer_pricing::ExecutionMode;
///
/// let config = SimulationConfig::builder()
///     .mc_loops(50)
///     .mc_paths(5_000)
///     .path_length(30)
///     .standardise(true)
///     .execution(ExecutionMode::Parallel)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.mc_loops(), 50);
/// assert_eq!(config.total_paths(), 250_000);
/// ```
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    mc_loops: usize,
    mc_paths: usize,
    path_length: usize,
    antithetic: bool,
    standardise: bool,
    trace: bool,
    innovations: Option<Arc<InnovationBatch>>,
    execution: ExecutionMode,
}

impl SimulationConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Number of independent simulation loops.
    #[inline]
    pub fn mc_loops(&self) -> usize {
        self.mc_loops
    }

    /// Paths drawn per loop, before antithetic doubling.
    #[inline]
    pub fn mc_paths(&self) -> usize {
        self.mc_paths
    }

    /// Time steps per path.
    #[inline]
    pub fn path_length(&self) -> usize {
        self.path_length
    }

    /// Whether each batch is extended with its negation.
    #[inline]
    pub fn antithetic(&self) -> bool {
        self.antithetic
    }

    /// Whether each batch is rescaled to zero mean and unit variance.
    #[inline]
    pub fn standardise(&self) -> bool {
        self.standardise
    }

    /// Whether per-loop estimates are logged.
    #[inline]
    pub fn trace(&self) -> bool {
        self.trace
    }

    /// Fixed batch used in place of the innovation source, if any.
    #[inline]
    pub fn innovations(&self) -> Option<&InnovationBatch> {
        self.innovations.as_deref()
    }

    /// Loop scheduling.
    #[inline]
    pub fn execution(&self) -> ExecutionMode {
        self.execution
    }

    /// Paths simulated over the whole run, including antithetic mirrors.
    #[inline]
    pub fn total_paths(&self) -> usize {
        let per_loop = if self.antithetic {
            2 * self.mc_paths
        } else {
            self.mc_paths
        };
        self.mc_loops * per_loop
    }

    /// Returns a copy with a different execution mode.
    pub fn with_execution(&self, execution: ExecutionMode) -> Self {
        Self {
            execution,
            ..self.clone()
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any count is zero or the override batch does
    /// not have shape `(mc_paths, path_length)`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mc_loops == 0 {
            return Err(ConfigError::InvalidLoopCount(self.mc_loops));
        }
        if self.mc_paths == 0 {
            return Err(ConfigError::InvalidPathCount(self.mc_paths));
        }
        if self.path_length == 0 {
            return Err(ConfigError::InvalidPathLength(self.path_length));
        }
        if let Some(batch) = &self.innovations {
            let expected = (self.mc_paths, self.path_length);
            if batch.shape() != expected {
                return Err(ConfigError::InnovationShape {
                    expected,
                    found: batch.shape(),
                });
            }
        }
        Ok(())
    }
}

/// Builder for [`SimulationConfig`].
///
/// `mc_loops`, `mc_paths` and `path_length` are required; flags default to
/// off and execution to sequential.
#[derive(Clone, Debug, Default)]
pub struct SimulationConfigBuilder {
    mc_loops: Option<usize>,
    mc_paths: Option<usize>,
    path_length: Option<usize>,
    antithetic: bool,
    standardise: bool,
    trace: bool,
    innovations: Option<Arc<InnovationBatch>>,
    execution: ExecutionMode,
}

impl SimulationConfigBuilder {
    /// Sets the number of loops.
    #[inline]
    pub fn mc_loops(mut self, mc_loops: usize) -> Self {
        self.mc_loops = Some(mc_loops);
        self
    }

    /// Sets the number of paths per loop.
    #[inline]
    pub fn mc_paths(mut self, mc_paths: usize) -> Self {
        self.mc_paths = Some(mc_paths);
        self
    }

    /// Sets the number of time steps per path.
    #[inline]
    pub fn path_length(mut self, path_length: usize) -> Self {
        self.path_length = Some(path_length);
        self
    }

    /// Enables antithetic sampling.
    #[inline]
    pub fn antithetic(mut self, antithetic: bool) -> Self {
        self.antithetic = antithetic;
        self
    }

    /// Enables batch standardisation.
    #[inline]
    pub fn standardise(mut self, standardise: bool) -> Self {
        self.standardise = standardise;
        self
    }

    /// Enables per-loop trace events.
    #[inline]
    pub fn trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Supplies a fixed `(mc_paths, path_length)` batch reused by every loop
    /// instead of sampling.
    #[inline]
    pub fn innovations(mut self, innovations: InnovationBatch) -> Self {
        self.innovations = Some(Arc::new(innovations));
        self
    }

    /// Sets loop scheduling.
    #[inline]
    pub fn execution(mut self, execution: ExecutionMode) -> Self {
        self.execution = execution;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required count is unset or invalid, or the
    /// override batch has the wrong shape.
    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        let mc_loops = self.mc_loops.ok_or(ConfigError::InvalidParameter {
            name: "mc_loops",
            value: "must be specified".to_string(),
        })?;
        let mc_paths = self.mc_paths.ok_or(ConfigError::InvalidParameter {
            name: "mc_paths",
            value: "must be specified".to_string(),
        })?;
        let path_length = self.path_length.ok_or(ConfigError::InvalidParameter {
            name: "path_length",
            value: "must be specified".to_string(),
        })?;

        let config = SimulationConfig {
            mc_loops,
            mc_paths,
            path_length,
            antithetic: self.antithetic,
            standardise: self.standardise,
            trace: self.trace,
            innovations: self.innovations,
            execution: self.execution,
        };

        config.validate()?;
        Ok(config)
    }
}
