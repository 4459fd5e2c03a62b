//! Results of a Monte Carlo run.

use std::fmt;

use pricer_core::math::statistics;
use pricer_core::types::PricingError;

use super::batch::{InnovationBatch, PathIncrements, PayoffVector};

/// Per-loop mean payoffs, in loop order.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::LoopResult;
///
/// let result = LoopResult::new(vec![4.0, 6.0, 5.0, 5.0]);
/// assert_eq!(result.len(), 4);
/// assert_eq!(result.price(), 5.0);
/// assert_eq!(result.cumulative_means(), vec![4.0, 5.0, 5.0, 5.0]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct LoopResult {
    estimates: Vec<f64>,
}

impl LoopResult {
    /// Wraps per-loop estimates.
    pub fn new(estimates: Vec<f64>) -> Self {
        Self { estimates }
    }

    /// Per-loop estimates.
    #[inline]
    pub fn estimates(&self) -> &[f64] {
        &self.estimates
    }

    /// Number of loops.
    #[inline]
    pub fn len(&self) -> usize {
        self.estimates.len()
    }

    /// Returns whether no loop ran.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.estimates.is_empty()
    }

    /// Mean of the loop estimates.
    #[inline]
    pub fn mean(&self) -> f64 {
        statistics::mean(&self.estimates)
    }

    /// Price estimate; same as [`mean`](Self::mean).
    #[inline]
    pub fn price(&self) -> f64 {
        self.mean()
    }

    /// Sample standard deviation of the loop estimates over sqrt(mc_loops).
    #[inline]
    pub fn std_error(&self) -> f64 {
        statistics::standard_error(&self.estimates)
    }

    /// 95% confidence interval `(mean - 1.96·se, mean + 1.96·se)`.
    pub fn confidence_95(&self) -> (f64, f64) {
        let half = 1.96 * self.std_error();
        (self.mean() - half, self.mean() + half)
    }

    /// Running mean after each loop.
    pub fn cumulative_means(&self) -> Vec<f64> {
        statistics::cumulative_means(&self.estimates)
    }

    /// Consumes the result, returning the estimates.
    #[inline]
    pub fn into_vec(self) -> Vec<f64> {
        self.estimates
    }
}

/// Everything the loop that diverged produced.
#[derive(Clone, Debug, PartialEq)]
pub struct DivergenceDiagnostic {
    /// Index of the loop whose mean was not finite.
    pub loop_index: usize,
    /// The non-finite loop mean.
    pub estimate: f64,
    /// Innovation batch after antithetic and standardisation transforms.
    pub innovations: InnovationBatch,
    /// Log-increments generated from `innovations`.
    pub path_increments: PathIncrements,
    /// Payoff vector returned by the evaluator.
    pub payoffs: PayoffVector,
}

impl DivergenceDiagnostic {
    /// Number of payoffs that are NaN or infinite.
    pub fn non_finite_payoffs(&self) -> usize {
        self.payoffs.iter().filter(|p| !p.is_finite()).count()
    }
}

impl fmt::Display for DivergenceDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "loop {} returned {} ({} of {} payoffs non-finite, batch {}x{})",
            self.loop_index,
            self.estimate,
            self.non_finite_payoffs(),
            self.payoffs.len(),
            self.innovations.n_paths(),
            self.innovations.n_steps()
        )
    }
}

/// Terminal state of a run.
#[derive(Clone, Debug, PartialEq)]
pub enum SimulationOutcome {
    /// Every loop produced a finite mean.
    Completed(LoopResult),
    /// The run stopped at a non-finite loop mean; no partial estimates are
    /// reported.
    Diverged(Box<DivergenceDiagnostic>),
}

impl SimulationOutcome {
    /// Returns whether all loops completed.
    #[inline]
    pub fn is_completed(&self) -> bool {
        matches!(self, SimulationOutcome::Completed(_))
    }

    /// Returns whether the run diverged.
    #[inline]
    pub fn is_diverged(&self) -> bool {
        matches!(self, SimulationOutcome::Diverged(_))
    }

    /// Loop estimates, if the run completed.
    pub fn completed(&self) -> Option<&LoopResult> {
        match self {
            SimulationOutcome::Completed(result) => Some(result),
            SimulationOutcome::Diverged(_) => None,
        }
    }

    /// Diagnostic bundle, if the run diverged.
    pub fn diagnostic(&self) -> Option<&DivergenceDiagnostic> {
        match self {
            SimulationOutcome::Completed(_) => None,
            SimulationOutcome::Diverged(diagnostic) => Some(diagnostic),
        }
    }

    /// Converts divergence into `PricingError::SimulationDivergence`.
    pub fn into_result(self) -> Result<LoopResult, PricingError> {
        match self {
            SimulationOutcome::Completed(result) => Ok(result),
            SimulationOutcome::Diverged(diagnostic) => {
                Err(PricingError::SimulationDivergence(diagnostic.to_string()))
            }
        }
    }
}
