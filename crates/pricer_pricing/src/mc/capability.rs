//! Capability traits the Monte Carlo engine is composed from.
//!
//! Each trait is a single concern with a documented shape contract. The
//! engine checks the shapes it receives and reports violations as
//! [`McError::ShapeMismatch`](super::McError::ShapeMismatch).

use std::sync::OnceLock;

use pricer_core::types::OptionType;
use pricer_models::instruments::ContractParameters;

use super::batch::{InnovationBatch, PathIncrements, PayoffVector};

/// Produces raw stochastic draws.
///
/// # Contract
///
/// Returns a fresh `(n_paths, n_steps)` batch on every call. `loop_index`
/// identifies the simulation loop; a seeded source should derive its stream
/// from it so that a loop draws the same batch however loops are scheduled.
pub trait InnovationSource: Send + Sync {
    /// Draws one batch.
    fn sample_innovation(&self, n_paths: usize, n_steps: usize, loop_index: usize)
        -> InnovationBatch;
}

/// Market dynamics a path generator is bound to for one loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathDynamics {
    /// Volatility σ.
    pub sigma: f64,
    /// Time step t / path_length.
    pub dt: f64,
    /// Cost-of-carry b.
    pub drift: f64,
}

/// Maps innovations to per-step log-increments.
///
/// # Contract
///
/// Deterministic in its inputs; must not draw new randomness. The output has
/// the same shape as `innovations`.
pub trait PathGenerator: Send + Sync {
    /// Builds the log-increments for every path.
    fn generate_path(&self, innovations: &InnovationBatch, dynamics: &PathDynamics)
        -> PathIncrements;
}

/// A path generator bound to one loop's innovation batch.
///
/// This is what a [`PayoffEvaluator`] consumes. The increments are generated
/// on first use and cached, so several calls to
/// [`generate_path`](Self::generate_path) cost one generation.
pub struct SimulatedPaths<'a> {
    generator: &'a dyn PathGenerator,
    innovations: &'a InnovationBatch,
    dynamics: PathDynamics,
    increments: OnceLock<PathIncrements>,
}

impl<'a> SimulatedPaths<'a> {
    /// Binds `generator` to a batch and dynamics.
    pub fn new(
        generator: &'a dyn PathGenerator,
        innovations: &'a InnovationBatch,
        dynamics: PathDynamics,
    ) -> Self {
        Self {
            generator,
            innovations,
            dynamics,
            increments: OnceLock::new(),
        }
    }

    /// Per-path, per-step log-increments.
    pub fn generate_path(&self) -> &PathIncrements {
        self.increments
            .get_or_init(|| self.generator.generate_path(self.innovations, &self.dynamics))
    }

    /// The bound innovation batch.
    #[inline]
    pub fn innovations(&self) -> &InnovationBatch {
        self.innovations
    }

    /// The bound dynamics.
    #[inline]
    pub fn dynamics(&self) -> &PathDynamics {
        &self.dynamics
    }

    /// Number of paths in this loop (doubled under antithetic sampling).
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.innovations.n_paths()
    }

    /// Shape of the increments if they have been generated.
    pub(crate) fn generated_shape(&self) -> Option<(usize, usize)> {
        self.increments.get().map(|m| m.shape())
    }

    pub(crate) fn into_increments(self) -> PathIncrements {
        match self.increments.into_inner() {
            Some(increments) => increments,
            None => self.generator.generate_path(self.innovations, &self.dynamics),
        }
    }
}

/// Turns simulated paths into discounted per-path payoffs.
///
/// # Contract
///
/// Returns one present value per path (`paths.n_paths()` entries). Vanilla
/// payoffs are non-negative; other payoffs may not be.
pub trait PayoffEvaluator: Send + Sync {
    /// Call-side payoffs.
    fn call(&self, paths: &SimulatedPaths<'_>, params: &ContractParameters<f64>) -> PayoffVector;

    /// Put-side payoffs.
    fn put(&self, paths: &SimulatedPaths<'_>, params: &ContractParameters<f64>) -> PayoffVector;

    /// Dispatches on `option_type`.
    fn evaluate(
        &self,
        option_type: OptionType,
        paths: &SimulatedPaths<'_>,
        params: &ContractParameters<f64>,
    ) -> PayoffVector {
        match option_type {
            OptionType::Call => self.call(paths, params),
            OptionType::Put => self.put(paths, params),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mc::PathMatrix;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting(AtomicUsize);

    impl PathGenerator for Counting {
        fn generate_path(&self, innovations: &InnovationBatch, d: &PathDynamics) -> PathIncrements {
            self.0.fetch_add(1, Ordering::SeqCst);
            innovations.map(|e| d.drift + e)
        }
    }

    fn dynamics() -> PathDynamics {
        PathDynamics {
            sigma: 0.2,
            dt: 0.1,
            drift: 1.0,
        }
    }

    #[test]
    fn test_generate_path_is_cached() {
        let generator = Counting(AtomicUsize::new(0));
        let eps = PathMatrix::zeros(4, 2);
        let paths = SimulatedPaths::new(&generator, &eps, dynamics());

        assert_eq!(paths.generate_path().as_slice(), &[1.0; 8]);
        paths.generate_path();
        assert_eq!(generator.0.load(Ordering::SeqCst), 1);
        assert_eq!(paths.n_paths(), 4);
        assert_eq!(paths.dynamics().sigma, 0.2);
    }

    #[test]
    fn test_into_increments_generates_when_unused() {
        let generator = Counting(AtomicUsize::new(0));
        let eps = PathMatrix::zeros(1, 3);
        let paths = SimulatedPaths::new(&generator, &eps, dynamics());

        let increments = paths.into_increments();
        assert_eq!(increments.shape(), (1, 3));
        assert_eq!(generator.0.load(Ordering::SeqCst), 1);
    }
}
