//! Loop orchestration.

use std::borrow::Cow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pricer_core::math::statistics;
use pricer_core::types::{OptionType, PricingError};
use pricer_models::instruments::{ContractParameters, OptionPricer};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::batch::InnovationBatch;
use super::capability::{
    InnovationSource, PathDynamics, PathGenerator, PayoffEvaluator, SimulatedPaths,
};
use super::config::SimulationConfig;
use super::error::{ConfigError, McError};
use super::outcome::{DivergenceDiagnostic, LoopResult, SimulationOutcome};
use super::variance;

/// What one loop produced.
enum LoopOutcome {
    Estimate(f64),
    Diverged(Box<DivergenceDiagnostic>),
}

/// Monte Carlo engine composed from three capabilities.
///
/// The engine is immutable: [`OptionPricer::with_params`] and
/// [`with_config`](Self::with_config) return new engines sharing the same
/// capability instances.
///
/// # Type Parameters
///
/// * `I` - innovation source
/// * `G` - path generator
/// * `P` - payoff evaluator
pub struct MonteCarloEngine<I, G, P> {
    config: SimulationConfig,
    params: ContractParameters<f64>,
    innovations: Arc<I>,
    path_generator: Arc<G>,
    payoff: Arc<P>,
}

impl<I, G, P> Clone for MonteCarloEngine<I, G, P> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            params: self.params,
            innovations: Arc::clone(&self.innovations),
            path_generator: Arc::clone(&self.path_generator),
            payoff: Arc::clone(&self.payoff),
        }
    }
}

impl<I, G, P> std::fmt::Debug for MonteCarloEngine<I, G, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonteCarloEngine")
            .field("config", &self.config)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl<I, G, P> MonteCarloEngine<I, G, P>
where
    I: InnovationSource,
    G: PathGenerator,
    P: PayoffEvaluator,
{
    /// Creates an engine builder.
    #[inline]
    pub fn builder() -> MonteCarloEngineBuilder<I, G, P> {
        MonteCarloEngineBuilder::default()
    }

    /// Simulation settings.
    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Contract parameters.
    #[inline]
    pub fn contract(&self) -> &ContractParameters<f64> {
        &self.params
    }

    /// Innovation source.
    #[inline]
    pub fn innovation_source(&self) -> &I {
        &self.innovations
    }

    /// Path generator.
    #[inline]
    pub fn path_generator(&self) -> &G {
        &self.path_generator
    }

    /// Payoff evaluator.
    #[inline]
    pub fn payoff(&self) -> &P {
        &self.payoff
    }

    /// Returns an engine with different simulation settings.
    pub fn with_config(&self, config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            ..self.clone()
        })
    }

    /// Simulates the call side.
    ///
    /// # Errors
    ///
    /// `McError::MissingVolatility` if the contract has no sigma;
    /// `McError::ShapeMismatch` if a capability breaks its shape contract.
    #[inline]
    pub fn call(&self) -> Result<SimulationOutcome, McError> {
        self.simulate(OptionType::Call)
    }

    /// Simulates the put side.
    ///
    /// # Errors
    ///
    /// As [`call`](Self::call).
    #[inline]
    pub fn put(&self) -> Result<SimulationOutcome, McError> {
        self.simulate(OptionType::Put)
    }

    /// Runs every loop for `option_type`.
    ///
    /// A non-finite loop mean stops the run: no further loops start and the
    /// outcome is [`SimulationOutcome::Diverged`]. In parallel mode loops
    /// already in flight finish, and the lowest diverged loop index observed
    /// is reported.
    pub fn simulate(&self, option_type: OptionType) -> Result<SimulationOutcome, McError> {
        let sigma = self
            .params
            .volatility()
            .ok_or(McError::MissingVolatility)?;
        let dynamics = PathDynamics {
            sigma,
            dt: self.params.maturity() / self.config.path_length() as f64,
            drift: self.params.cost_of_carry(),
        };

        let outcome = if self.config.execution().is_parallel() {
            self.run_parallel(option_type, &dynamics)?
        } else {
            self.run_sequential(option_type, &dynamics)?
        };

        if let SimulationOutcome::Diverged(diagnostic) = &outcome {
            warn!(
                loop_index = diagnostic.loop_index,
                estimate = diagnostic.estimate,
                non_finite_payoffs = diagnostic.non_finite_payoffs(),
                "Monte Carlo loop returned a non-finite mean; run aborted"
            );
        }
        Ok(outcome)
    }

    fn run_sequential(
        &self,
        option_type: OptionType,
        dynamics: &PathDynamics,
    ) -> Result<SimulationOutcome, McError> {
        let mut estimates = Vec::with_capacity(self.config.mc_loops());
        let mut running_sum = 0.0;

        for loop_index in 0..self.config.mc_loops() {
            match self.run_loop(loop_index, option_type, dynamics)? {
                LoopOutcome::Estimate(estimate) => {
                    estimates.push(estimate);
                    if self.config.trace() {
                        running_sum += estimate;
                        trace_loop(loop_index, estimate, running_sum / (loop_index + 1) as f64);
                    }
                }
                LoopOutcome::Diverged(diagnostic) => {
                    return Ok(SimulationOutcome::Diverged(diagnostic));
                }
            }
        }

        Ok(SimulationOutcome::Completed(LoopResult::new(estimates)))
    }

    fn run_parallel(
        &self,
        option_type: OptionType,
        dynamics: &PathDynamics,
    ) -> Result<SimulationOutcome, McError> {
        let cancelled = AtomicBool::new(false);

        let results: Vec<Option<Result<LoopOutcome, McError>>> = (0..self.config.mc_loops())
            .into_par_iter()
            .map(|loop_index| {
                if cancelled.load(Ordering::Relaxed) {
                    return None;
                }
                let result = self.run_loop(loop_index, option_type, dynamics);
                if !matches!(result, Ok(LoopOutcome::Estimate(_))) {
                    cancelled.store(true, Ordering::Relaxed);
                }
                Some(result)
            })
            .collect();

        let mut estimates = Vec::with_capacity(results.len());
        for result in results.into_iter().flatten() {
            match result? {
                LoopOutcome::Estimate(estimate) => estimates.push(estimate),
                LoopOutcome::Diverged(diagnostic) => {
                    return Ok(SimulationOutcome::Diverged(diagnostic));
                }
            }
        }

        if self.config.trace() {
            for (loop_index, (estimate, running_mean)) in estimates
                .iter()
                .zip(statistics::cumulative_means(&estimates))
                .enumerate()
            {
                trace_loop(loop_index, *estimate, running_mean);
            }
        }

        Ok(SimulationOutcome::Completed(LoopResult::new(estimates)))
    }

    fn run_loop(
        &self,
        loop_index: usize,
        option_type: OptionType,
        dynamics: &PathDynamics,
    ) -> Result<LoopOutcome, McError> {
        let mut batch = self.draw(loop_index)?;

        if self.config.antithetic() {
            batch = Cow::Owned(variance::antithetic(&batch));
        }
        if self.config.standardise() {
            variance::standardise(batch.to_mut());
        }

        let paths = SimulatedPaths::new(self.path_generator.as_ref(), &batch, *dynamics);
        let payoffs = self.payoff.evaluate(option_type, &paths, &self.params);

        if payoffs.len() != batch.n_paths() {
            return Err(McError::shape(
                "PayoffEvaluator",
                format!(
                    "expected {} payoffs, found {}",
                    batch.n_paths(),
                    payoffs.len()
                ),
            ));
        }
        if let Some(shape) = paths.generated_shape() {
            if shape != batch.shape() {
                return Err(McError::shape(
                    "PathGenerator",
                    format!("expected {:?}, found {:?}", batch.shape(), shape),
                ));
            }
        }

        let estimate = statistics::mean(&payoffs);
        if estimate.is_finite() {
            return Ok(LoopOutcome::Estimate(estimate));
        }

        let path_increments = paths.into_increments();
        Ok(LoopOutcome::Diverged(Box::new(DivergenceDiagnostic {
            loop_index,
            estimate,
            innovations: batch.into_owned(),
            path_increments,
            payoffs,
        })))
    }

    /// The override batch if configured, otherwise a fresh draw.
    fn draw(&self, loop_index: usize) -> Result<Cow<'_, InnovationBatch>, McError> {
        if let Some(batch) = self.config.innovations() {
            return Ok(Cow::Borrowed(batch));
        }

        let expected = (self.config.mc_paths(), self.config.path_length());
        let batch = self
            .innovations
            .sample_innovation(expected.0, expected.1, loop_index);
        if batch.shape() != expected {
            return Err(McError::shape(
                "InnovationSource",
                format!("expected {:?}, found {:?}", expected, batch.shape()),
            ));
        }
        Ok(Cow::Owned(batch))
    }
}

fn trace_loop(loop_index: usize, estimate: f64, running_mean: f64) {
    info!(loop_index, estimate, running_mean, "Monte Carlo loop");
}

impl<I, G, P> OptionPricer for MonteCarloEngine<I, G, P>
where
    I: InnovationSource,
    G: PathGenerator,
    P: PayoffEvaluator,
{
    fn params(&self) -> &ContractParameters<f64> {
        &self.params
    }

    fn with_params(&self, params: ContractParameters<f64>) -> Result<Self, PricingError> {
        params.validate()?;
        Ok(Self {
            params,
            ..self.clone()
        })
    }

    /// Mean of the loop estimates.
    fn price(&self, option_type: OptionType) -> Result<f64, PricingError> {
        Ok(self.simulate(option_type)?.into_result()?.mean())
    }
}

/// Builder for [`MonteCarloEngine`].
///
/// All five parts are required.
pub struct MonteCarloEngineBuilder<I, G, P> {
    config: Option<SimulationConfig>,
    params: Option<ContractParameters<f64>>,
    innovations: Option<Arc<I>>,
    path_generator: Option<Arc<G>>,
    payoff: Option<Arc<P>>,
}

impl<I, G, P> Default for MonteCarloEngineBuilder<I, G, P> {
    fn default() -> Self {
        Self {
            config: None,
            params: None,
            innovations: None,
            path_generator: None,
            payoff: None,
        }
    }
}

impl<I, G, P> MonteCarloEngineBuilder<I, G, P>
where
    I: InnovationSource,
    G: PathGenerator,
    P: PayoffEvaluator,
{
    /// Sets the simulation settings.
    #[inline]
    pub fn config(mut self, config: SimulationConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the contract.
    #[inline]
    pub fn params(mut self, params: ContractParameters<f64>) -> Self {
        self.params = Some(params);
        self
    }

    /// Sets the innovation source.
    #[inline]
    pub fn innovations(mut self, source: I) -> Self {
        self.innovations = Some(Arc::new(source));
        self
    }

    /// Sets the path generator.
    #[inline]
    pub fn path_generator(mut self, generator: G) -> Self {
        self.path_generator = Some(Arc::new(generator));
        self
    }

    /// Sets the payoff evaluator.
    #[inline]
    pub fn payoff(mut self, payoff: P) -> Self {
        self.payoff = Some(Arc::new(payoff));
        self
    }

    /// Builds the engine.
    ///
    /// # Errors
    ///
    /// `ConfigError::MissingCapability` if a capability was not supplied,
    /// `ConfigError::InvalidParameter` if the configuration or contract is
    /// missing, or the configuration's own validation error.
    pub fn build(self) -> Result<MonteCarloEngine<I, G, P>, ConfigError> {
        let config = self.config.ok_or(ConfigError::InvalidParameter {
            name: "config",
            value: "must be specified".to_string(),
        })?;
        config.validate()?;
        let params = self.params.ok_or(ConfigError::InvalidParameter {
            name: "params",
            value: "must be specified".to_string(),
        })?;
        let innovations = self
            .innovations
            .ok_or(ConfigError::MissingCapability("innovation source"))?;
        let path_generator = self
            .path_generator
            .ok_or(ConfigError::MissingCapability("path generator"))?;
        let payoff = self
            .payoff
            .ok_or(ConfigError::MissingCapability("payoff evaluator"))?;

        debug!(
            mc_loops = config.mc_loops(),
            mc_paths = config.mc_paths(),
            path_length = config.path_length(),
            antithetic = config.antithetic(),
            standardise = config.standardise(),
            parallel = config.execution().is_parallel(),
            "Monte Carlo engine configured"
        );

        Ok(MonteCarloEngine {
            config,
            params,
            innovations,
            path_generator,
            payoff,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mc::{NormalInnovations, PathMatrix, VanillaPayoff, WienerPath};
    use crate::ExecutionMode;
    use approx::assert_relative_eq;

    type StockEngine = MonteCarloEngine<NormalInnovations, WienerPath, VanillaPayoff>;

    fn params() -> ContractParameters<f64> {
        ContractParameters::new(100.0, 100.0, 1.0 / 12.0, 0.1, 0.1, Some(0.4)).unwrap()
    }

    fn config(loops: usize, paths: usize) -> SimulationConfig {
        SimulationConfig::builder()
            .mc_loops(loops)
            .mc_paths(paths)
            .path_length(10)
            .build()
            .unwrap()
    }

    fn engine(config: SimulationConfig) -> StockEngine {
        MonteCarloEngine::builder()
            .config(config)
            .params(params())
            .innovations(NormalInnovations::new(7))
            .path_generator(WienerPath)
            .payoff(VanillaPayoff)
            .build()
            .unwrap()
    }

    /// Returns a batch with one path per row but the wrong step count.
    struct Misshapen;

    impl InnovationSource for Misshapen {
        fn sample_innovation(&self, n_paths: usize, n_steps: usize, _: usize) -> InnovationBatch {
            PathMatrix::zeros(n_paths, n_steps + 1)
        }
    }

    #[test]
    fn test_missing_capability() {
        let result = StockEngine::builder()
            .config(config(1, 1))
            .params(params())
            .innovations(NormalInnovations::new(1))
            .path_generator(WienerPath)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::MissingCapability("payoff evaluator"))
        ));

        let result = StockEngine::builder()
            .config(config(1, 1))
            .params(params())
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::MissingCapability("innovation source"))
        ));
    }

    #[test]
    fn test_missing_config_and_params() {
        let result = StockEngine::builder().params(params()).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter { name: "config", .. })
        ));

        let result = StockEngine::builder().config(config(1, 1)).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter { name: "params", .. })
        ));
    }

    #[test]
    fn test_loop_count_matches_config() {
        let outcome = engine(config(7, 200)).call().unwrap();
        let result = outcome.completed().unwrap();
        assert_eq!(result.len(), 7);
        assert!(result.estimates().iter().all(|e| e.is_finite() && *e >= 0.0));
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let a = engine(config(5, 300)).put().unwrap();
        let b = engine(config(5, 300)).put().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let seq = engine(config(12, 250));
        let par = seq
            .with_config(seq.config().with_execution(ExecutionMode::Parallel))
            .unwrap();
        assert_eq!(seq.call().unwrap(), par.call().unwrap());
    }

    #[test]
    fn test_missing_volatility() {
        let no_vol = ContractParameters::new(100.0, 100.0, 1.0, 0.1, 0.1, None).unwrap();
        let engine = StockEngine::builder()
            .config(config(1, 10))
            .params(no_vol)
            .innovations(NormalInnovations::new(1))
            .path_generator(WienerPath)
            .payoff(VanillaPayoff)
            .build()
            .unwrap();
        assert_eq!(engine.call().unwrap_err(), McError::MissingVolatility);
        assert!(matches!(
            OptionPricer::call(&engine),
            Err(PricingError::MissingVolatility(_))
        ));
    }

    #[test]
    fn test_misshapen_innovations_rejected() {
        let engine = MonteCarloEngine::builder()
            .config(config(2, 10))
            .params(params())
            .innovations(Misshapen)
            .path_generator(WienerPath)
            .payoff(VanillaPayoff)
            .build()
            .unwrap();
        assert!(matches!(
            engine.call(),
            Err(McError::ShapeMismatch {
                component: "InnovationSource",
                ..
            })
        ));
    }

    #[test]
    fn test_override_batch_used_every_loop() {
        let eps = PathMatrix::from_fn(4, 10, |i, j| if (i + j) % 2 == 0 { 1.0 } else { -1.0 });
        let config = SimulationConfig::builder()
            .mc_loops(3)
            .mc_paths(4)
            .path_length(10)
            .innovations(eps)
            .build()
            .unwrap();
        let outcome = engine(config).call().unwrap();
        let estimates = outcome.completed().unwrap().estimates().to_vec();
        assert_eq!(estimates[0], estimates[1]);
        assert_eq!(estimates[1], estimates[2]);
    }

    #[test]
    fn test_option_pricer_price_is_mean() {
        let engine = engine(config(4, 500));
        let mean = engine.call().unwrap().completed().unwrap().mean();
        assert_relative_eq!(OptionPricer::call(&engine).unwrap(), mean);

        let bumped = engine.with_params(params().with_param(
            pricer_models::instruments::ParamField::Spot,
            120.0,
        ).unwrap()).unwrap();
        assert_eq!(bumped.contract().spot(), 120.0);
        assert!(OptionPricer::call(&bumped).unwrap() > mean);
    }
}
