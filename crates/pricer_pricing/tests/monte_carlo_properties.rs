//! Monte Carlo engine behaviour with stock and probe capabilities.
//!
//! # Test Categories
//!
//! 1. **Convergence**: loop mean vs generalised Black-Scholes
//! 2. **Variance reduction**: antithetic sampling and standardisation
//! 3. **Divergence**: abort at the first non-finite loop mean
//! 4. **Scheduling**: parallel loops reproduce the sequential result

use std::sync::atomic::{AtomicUsize, Ordering};

use pricer_core::types::OptionType;
use pricer_models::analytical::GeneralizedBlackScholes;
use pricer_models::instruments::{ContractParameters, OptionPricer};
use pricer_pricing::mc::{
    ConfigError, InnovationBatch, InnovationSource, MonteCarloEngine, NormalInnovations,
    PathDynamics, PathGenerator, PathIncrements, PathMatrix, PayoffEvaluator, PayoffVector,
    SimulatedPaths, SimulationConfig, SimulationOutcome, VanillaPayoff, WienerPath,
};
use pricer_pricing::ExecutionMode;

fn haug_one_month() -> ContractParameters<f64> {
    ContractParameters::new(100.0, 100.0, 1.0 / 12.0, 0.1, 0.1, Some(0.4)).unwrap()
}

fn config(loops: usize, paths: usize) -> SimulationConfig {
    SimulationConfig::builder()
        .mc_loops(loops)
        .mc_paths(paths)
        .path_length(30)
        .build()
        .unwrap()
}

fn stock_engine(
    config: SimulationConfig,
    params: ContractParameters<f64>,
) -> MonteCarloEngine<NormalInnovations, WienerPath, VanillaPayoff> {
    MonteCarloEngine::builder()
        .config(config)
        .params(params)
        .innovations(NormalInnovations::new(20240101))
        .path_generator(WienerPath)
        .payoff(VanillaPayoff)
        .build()
        .unwrap()
}

// ============================================================================
// Probe capabilities
// ============================================================================

/// Passes innovations through unchanged.
struct Identity;

impl PathGenerator for Identity {
    fn generate_path(&self, innovations: &InnovationBatch, _: &PathDynamics) -> PathIncrements {
        innovations.clone()
    }
}

/// Per-path mean of the bound innovations (call) or of their squares (put).
struct MomentProbe;

impl PayoffEvaluator for MomentProbe {
    fn call(&self, paths: &SimulatedPaths<'_>, _: &ContractParameters<f64>) -> PayoffVector {
        let n = paths.innovations().n_steps() as f64;
        paths.innovations().rows().map(|r| r.iter().sum::<f64>() / n).collect()
    }

    fn put(&self, paths: &SimulatedPaths<'_>, _: &ContractParameters<f64>) -> PayoffVector {
        let n = paths.innovations().n_steps() as f64;
        paths
            .innovations()
            .rows()
            .map(|r| r.iter().map(|x| x * x).sum::<f64>() / n)
            .collect()
    }
}

/// Returns +inf payoffs on its `poison`-th invocation.
struct PoisonedPayoff {
    calls: AtomicUsize,
    poison: usize,
}

impl PayoffEvaluator for PoisonedPayoff {
    fn call(&self, paths: &SimulatedPaths<'_>, params: &ContractParameters<f64>) -> PayoffVector {
        let call_index = self.calls.fetch_add(1, Ordering::SeqCst);
        let mut payoffs = VanillaPayoff.call(paths, params);
        if call_index == self.poison {
            payoffs[0] = f64::INFINITY;
        }
        payoffs
    }

    fn put(&self, paths: &SimulatedPaths<'_>, params: &ContractParameters<f64>) -> PayoffVector {
        VanillaPayoff.put(paths, params)
    }
}

/// Normal draws, except loop `poison` which is all NaN.
struct NanAtLoop {
    inner: NormalInnovations,
    poison: usize,
    draws: AtomicUsize,
}

impl InnovationSource for NanAtLoop {
    fn sample_innovation(&self, n_paths: usize, n_steps: usize, loop_index: usize) -> InnovationBatch {
        self.draws.fetch_add(1, Ordering::SeqCst);
        if loop_index == self.poison {
            PathMatrix::from_fn(n_paths, n_steps, |_, _| f64::NAN)
        } else {
            self.inner.sample_innovation(n_paths, n_steps, loop_index)
        }
    }
}

// ============================================================================
// Convergence
// ============================================================================

#[test]
fn test_converges_to_closed_form() {
    let params = haug_one_month();
    let gbs = GeneralizedBlackScholes::new(params).unwrap();
    let engine = stock_engine(config(50, 5_000), params);

    for (option_type, exact) in [
        (OptionType::Call, gbs.price_call()),
        (OptionType::Put, gbs.price_put()),
    ] {
        let outcome = engine.simulate(option_type).unwrap();
        let result = outcome.completed().unwrap();
        assert_eq!(result.len(), 50);

        let error = (result.mean() - exact).abs();
        assert!(
            error < 4.0 * result.std_error(),
            "{} estimate {} vs closed form {} (se {})",
            option_type,
            result.mean(),
            exact,
            result.std_error()
        );
    }
}

#[test]
fn test_option_pricer_uses_loop_mean() {
    let params = haug_one_month();
    let engine = stock_engine(config(10, 1_000), params);
    let mean = engine.put().unwrap().completed().unwrap().mean();
    assert_eq!(engine.price(OptionType::Put).unwrap(), mean);
}

// ============================================================================
// Variance reduction
// ============================================================================

#[test]
fn test_antithetic_reduces_loop_dispersion_at_fixed_budget() {
    // In the money: the payoff is close to linear in the terminal shock.
    let params = ContractParameters::new(120.0, 100.0, 1.0 / 12.0, 0.1, 0.1, Some(0.4)).unwrap();

    let plain = stock_engine(config(100, 1_000), params);
    let mirrored_config = SimulationConfig::builder()
        .mc_loops(100)
        .mc_paths(500)
        .path_length(30)
        .antithetic(true)
        .build()
        .unwrap();
    let mirrored = stock_engine(mirrored_config, params);

    assert_eq!(plain.config().total_paths(), mirrored.config().total_paths());

    let plain_se = plain.call().unwrap().completed().unwrap().std_error();
    let mirrored_se = mirrored.call().unwrap().completed().unwrap().std_error();
    assert!(
        mirrored_se < 0.7 * plain_se,
        "antithetic se {} vs plain se {}",
        mirrored_se,
        plain_se
    );
}

#[test]
fn test_standardised_batch_moments() {
    let skewed = PathMatrix::from_fn(200, 30, |i, j| 3.0 + 2.0 * (((i * 31 + j * 7) % 17) as f64));
    let config = SimulationConfig::builder()
        .mc_loops(2)
        .mc_paths(200)
        .path_length(30)
        .standardise(true)
        .innovations(skewed)
        .build()
        .unwrap();
    let engine = MonteCarloEngine::builder()
        .config(config)
        .params(haug_one_month())
        .innovations(NormalInnovations::new(0))
        .path_generator(Identity)
        .payoff(MomentProbe)
        .build()
        .unwrap();

    let mean = engine.call().unwrap().completed().unwrap().mean();
    let second_moment = engine.put().unwrap().completed().unwrap().mean();
    assert!(mean.abs() < 1e-9, "mean {}", mean);
    assert!((second_moment - 1.0).abs() < 1e-9, "variance {}", second_moment);
}

#[test]
fn test_antithetic_batch_is_symmetric() {
    let config = SimulationConfig::builder()
        .mc_loops(3)
        .mc_paths(64)
        .path_length(30)
        .antithetic(true)
        .build()
        .unwrap();
    let engine = MonteCarloEngine::builder()
        .config(config)
        .params(haug_one_month())
        .innovations(NormalInnovations::new(5))
        .path_generator(Identity)
        .payoff(MomentProbe)
        .build()
        .unwrap();

    let result = engine.call().unwrap();
    for estimate in result.completed().unwrap().estimates() {
        assert!(estimate.abs() < 1e-12);
    }
}

// ============================================================================
// Divergence
// ============================================================================

#[test]
fn test_divergence_aborts_at_loop_k() {
    let k = 3;
    let engine = MonteCarloEngine::builder()
        .config(config(10, 200))
        .params(haug_one_month())
        .innovations(NormalInnovations::new(9))
        .path_generator(WienerPath)
        .payoff(PoisonedPayoff {
            calls: AtomicUsize::new(0),
            poison: k,
        })
        .build()
        .unwrap();

    let outcome = engine.call().unwrap();
    let diagnostic = match &outcome {
        SimulationOutcome::Diverged(d) => d,
        other => panic!("Expected divergence, got {:?}", other),
    };

    assert_eq!(diagnostic.loop_index, k);
    assert_eq!(diagnostic.estimate, f64::INFINITY);
    assert_eq!(diagnostic.innovations.shape(), (200, 30));
    assert_eq!(diagnostic.path_increments.shape(), (200, 30));
    assert_eq!(diagnostic.payoffs.len(), 200);
    assert_eq!(diagnostic.non_finite_payoffs(), 1);
    assert_eq!(engine.payoff().calls.load(Ordering::SeqCst), k + 1);
}

#[test]
fn test_nan_innovations_diverge_in_both_modes() {
    for execution in [ExecutionMode::Sequential, ExecutionMode::Parallel] {
        let config = config(8, 100).with_execution(execution);
        let engine = MonteCarloEngine::builder()
            .config(config)
            .params(haug_one_month())
            .innovations(NanAtLoop {
                inner: NormalInnovations::new(1),
                poison: 5,
                draws: AtomicUsize::new(0),
            })
            .path_generator(WienerPath)
            .payoff(VanillaPayoff)
            .build()
            .unwrap();

        let outcome = engine.put().unwrap();
        let diagnostic = outcome.diagnostic().expect("run should diverge");
        assert_eq!(diagnostic.loop_index, 5);
        assert!(diagnostic.estimate.is_nan());
        assert!(diagnostic.innovations.as_slice().iter().all(|x| x.is_nan()));
        assert!(outcome.completed().is_none());

        if execution == ExecutionMode::Sequential {
            assert_eq!(engine.innovation_source().draws.load(Ordering::SeqCst), 6);
        }
    }
}

// ============================================================================
// Configuration and scheduling
// ============================================================================

#[test]
fn test_invalid_configuration_rejected() {
    let base = || SimulationConfig::builder().mc_loops(1).mc_paths(1).path_length(1);
    assert_eq!(base().mc_loops(0).build().unwrap_err(), ConfigError::InvalidLoopCount(0));
    assert_eq!(base().mc_paths(0).build().unwrap_err(), ConfigError::InvalidPathCount(0));
    assert_eq!(base().path_length(0).build().unwrap_err(), ConfigError::InvalidPathLength(0));
    assert!(matches!(
        base().innovations(PathMatrix::zeros(2, 1)).build(),
        Err(ConfigError::InnovationShape { .. })
    ));
}

#[test]
fn test_parallel_loops_match_sequential() {
    let config = SimulationConfig::builder()
        .mc_loops(16)
        .mc_paths(400)
        .path_length(12)
        .antithetic(true)
        .standardise(true)
        .build()
        .unwrap();
    let sequential = stock_engine(config.clone(), haug_one_month());
    let parallel = stock_engine(config.with_execution(ExecutionMode::Parallel), haug_one_month());

    assert_eq!(sequential.call().unwrap(), parallel.call().unwrap());
    assert_eq!(sequential.put().unwrap(), parallel.put().unwrap());
}

#[test]
fn test_trace_does_not_change_results() {
    let quiet = config(6, 300);
    let traced = SimulationConfig::builder()
        .mc_loops(6)
        .mc_paths(300)
        .path_length(30)
        .trace(true)
        .build()
        .unwrap();

    let a = stock_engine(quiet, haug_one_month()).call().unwrap();
    let b = stock_engine(traced, haug_one_month()).call().unwrap();
    assert_eq!(a, b);
}
