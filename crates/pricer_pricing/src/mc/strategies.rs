//! Stock capabilities: seeded Gaussian innovations, geometric Brownian
//! motion increments and the plain vanilla payoff.

use pricer_models::instruments::ContractParameters;

use super::batch::{InnovationBatch, PathIncrements, PathMatrix, PayoffVector};
use super::capability::{
    InnovationSource, PathDynamics, PathGenerator, PayoffEvaluator, SimulatedPaths,
};
use crate::rng::PricerRng;

/// Independent standard normal draws.
///
/// Loop `k` of a run draws from stream `k` of the seed, so batches do not
/// depend on loop scheduling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NormalInnovations {
    seed: u64,
}

impl NormalInnovations {
    /// Source seeded with `seed`.
    #[inline]
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Run seed.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl InnovationSource for NormalInnovations {
    fn sample_innovation(&self, n_paths: usize, n_steps: usize, loop_index: usize) -> InnovationBatch {
        let mut rng = PricerRng::for_stream(self.seed, loop_index as u64);
        let mut batch = PathMatrix::zeros(n_paths, n_steps);
        rng.fill_normal(batch.as_mut_slice());
        batch
    }
}

/// Log-increments of geometric Brownian motion under cost-of-carry b:
/// `(b - σ²/2)·dt + σ·√dt·ε`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WienerPath;

impl PathGenerator for WienerPath {
    fn generate_path(&self, innovations: &InnovationBatch, dynamics: &PathDynamics) -> PathIncrements {
        let PathDynamics { sigma, dt, drift } = *dynamics;
        let mu = (drift - 0.5 * sigma * sigma) * dt;
        let vol = sigma * dt.sqrt();
        innovations.map(|eps| mu + vol * eps)
    }
}

/// European payoff on the terminal price `S·exp(Σ increments)`, discounted
/// by `exp(-r·t)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VanillaPayoff;

impl VanillaPayoff {
    fn terminal_prices(paths: &SimulatedPaths<'_>, spot: f64) -> impl Iterator<Item = f64> {
        paths
            .generate_path()
            .row_sums()
            .into_iter()
            .map(move |log_return| spot * log_return.exp())
    }
}

/// `max(x, 0)` that keeps NaN, so a broken path still reaches the divergence
/// check instead of paying zero.
#[inline]
fn positive_part(x: f64) -> f64 {
    if x.is_nan() {
        x
    } else {
        x.max(0.0)
    }
}

impl PayoffEvaluator for VanillaPayoff {
    fn call(&self, paths: &SimulatedPaths<'_>, params: &ContractParameters<f64>) -> PayoffVector {
        let df = params.discount_factor();
        let strike = params.strike();
        Self::terminal_prices(paths, params.spot())
            .map(|s_t| df * positive_part(s_t - strike))
            .collect()
    }

    fn put(&self, paths: &SimulatedPaths<'_>, params: &ContractParameters<f64>) -> PayoffVector {
        let df = params.discount_factor();
        let strike = params.strike();
        Self::terminal_prices(paths, params.spot())
            .map(|s_t| df * positive_part(strike - s_t))
            .collect()
    }
}
