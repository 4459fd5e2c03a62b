//! Cox-Ross-Rubinstein binomial tree.
//!
//! Node prices are read from a table of `exp(k·σ√dt)` for `k = -n..=n`
//! instead of repeated powers of `u` and `d`, so deep lattices stay finite
//! and the American exercise check costs one multiply per node.

use num_traits::Float;
use pricer_core::types::{ExerciseStyle, OptionType, PricingError};
use pricer_models::instruments::{ContractParameters, OptionPricer};
use rayon::prelude::*;

use super::error::LatticeError;
use crate::execution::ExecutionMode;

/// Step count used when the caller has no preference.
pub const DEFAULT_STEPS: usize = 5;

/// Minimum node count in a backward step before the parallel sweep is used.
pub const PARALLEL_NODE_THRESHOLD: usize = 2_048;

#[inline]
fn lit<T: Float>(x: usize) -> T {
    T::from(x).unwrap_or_else(T::nan)
}

/// Per-step lattice parameters.
///
/// # Invariants
/// - `up * down == 1`
/// - `probability` in [0, 1]
///
/// With σ = 0 the lattice collapses (`up == down == 1`); the tree then prices
/// along the single deterministic forward path and `probability` is reported
/// as 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeState<T: Float> {
    /// Number of time steps n.
    pub n_steps: usize,
    /// Step length t / n in years.
    pub dt: T,
    /// Up factor u = exp(σ√dt).
    pub up: T,
    /// Down factor d = 1 / u.
    pub down: T,
    /// Risk-neutral up probability p.
    pub probability: T,
    /// Per-step discount factor exp(-r·dt).
    pub discount: T,
}

impl<T: Float> LatticeState<T> {
    fn new(params: &ContractParameters<T>, sigma: T, n_steps: usize) -> Result<Self, LatticeError> {
        let one = T::one();
        let dt = params.maturity() / lit(n_steps);
        let discount = (-params.rate() * dt).exp();

        if sigma == T::zero() {
            return Ok(Self {
                n_steps,
                dt,
                up: one,
                down: one,
                probability: one,
                discount,
            });
        }

        let up = (sigma * dt.sqrt()).exp();
        let down = one / up;
        let probability = ((params.cost_of_carry() * dt).exp() - down) / (up - down);

        // NaN fails both comparisons, which also catches u == d underflow.
        if !(probability >= T::zero() && probability <= one) {
            return Err(LatticeError::InvalidProbability {
                probability: probability.to_f64().unwrap_or(f64::NAN),
            });
        }

        Ok(Self {
            n_steps,
            dt,
            up,
            down,
            probability,
            discount,
        })
    }

    /// Returns whether the lattice collapsed to a single path (σ = 0).
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.up == self.down
    }
}

/// Binomial lattice pricer for European and American options.
///
/// # Type Parameters
/// * `T` - Floating-point type implementing `Float` (e.g., `f64`)
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::ExerciseStyle;
/// use pricer_models::instruments::ContractParameters;
/// use pricer_pricing::lattice::BinomialTree;
///
/// let params = ContractParameters::new(50.0_f64, 50.0, 5.0 / 12.0, 0.1, 0.1, Some(0.4)).unwrap();
///
/// let european = BinomialTree::new(params, 500, ExerciseStyle::European).unwrap();
/// let american = BinomialTree::new(params, 500, ExerciseStyle::American).unwrap();
///
/// assert!((european.call() - 6.1165).abs() < 1e-2);
/// assert!(american.put() >= european.put());
/// ```
#[derive(Debug, Clone)]
pub struct BinomialTree<T: Float> {
    params: ContractParameters<T>,
    style: ExerciseStyle,
    execution: ExecutionMode,
    state: LatticeState<T>,
    vol_sqrt_dt: T,
}

impl<T: Float + Send + Sync> BinomialTree<T> {
    /// Builds the lattice.
    ///
    /// # Errors
    ///
    /// - `LatticeError::InvalidStepCount` if `n_steps == 0`
    /// - `LatticeError::MissingVolatility` if sigma is absent
    /// - `LatticeError::InvalidProbability` if p falls outside [0, 1]
    pub fn new(
        params: ContractParameters<T>,
        n_steps: usize,
        style: ExerciseStyle,
    ) -> Result<Self, LatticeError> {
        if n_steps == 0 {
            return Err(LatticeError::InvalidStepCount(n_steps));
        }
        let sigma = params
            .volatility()
            .ok_or(LatticeError::MissingVolatility)?;
        let state = LatticeState::new(&params, sigma, n_steps)?;

        Ok(Self {
            params,
            style,
            execution: ExecutionMode::Sequential,
            state,
            vol_sqrt_dt: sigma * state.dt.sqrt(),
        })
    }

    /// Selects sequential or parallel node sweeps.
    #[inline]
    pub fn with_execution(mut self, execution: ExecutionMode) -> Self {
        self.execution = execution;
        self
    }

    /// Returns the contract parameters.
    #[inline]
    pub fn contract(&self) -> &ContractParameters<T> {
        &self.params
    }

    /// Returns the step count n.
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.state.n_steps
    }

    /// Returns the exercise style.
    #[inline]
    pub fn style(&self) -> ExerciseStyle {
        self.style
    }

    /// Returns the execution mode.
    #[inline]
    pub fn execution(&self) -> ExecutionMode {
        self.execution
    }

    /// Returns the per-step lattice parameters.
    #[inline]
    pub fn state(&self) -> &LatticeState<T> {
        &self.state
    }

    /// Call price (z = +1).
    #[inline]
    pub fn call(&self) -> T {
        self.value(OptionType::Call)
    }

    /// Put price (z = -1).
    #[inline]
    pub fn put(&self) -> T {
        self.value(OptionType::Put)
    }

    /// Present value of either side by backward induction.
    pub fn value(&self, option_type: OptionType) -> T {
        if self.state.is_degenerate() {
            return self.degenerate_value(option_type);
        }

        let n = self.state.n_steps;
        let powers = self.power_table();
        let mut values = self.terminal_values(option_type, &powers);
        let mut scratch = if self.execution.is_parallel() && n >= PARALLEL_NODE_THRESHOLD {
            vec![T::zero(); n + 1]
        } else {
            Vec::new()
        };

        for j in (0..n).rev() {
            if self.execution.is_parallel() && j + 1 >= PARALLEL_NODE_THRESHOLD {
                self.parallel_step(&values, &mut scratch, j, option_type, &powers);
                std::mem::swap(&mut values, &mut scratch);
            } else {
                self.sequential_step(&mut values, j, option_type, &powers);
            }
        }

        values[0]
    }

    /// `exp(k·σ√dt)` at index `k + n` for `k = -n..=n`.
    fn power_table(&self) -> Vec<T> {
        let n = self.state.n_steps;
        (0..=2 * n)
            .map(|idx| {
                let k = lit::<T>(idx) - lit::<T>(n);
                (k * self.vol_sqrt_dt).exp()
            })
            .collect()
    }

    /// Underlying price at node `i` of step `j`: S·u^i·d^(j-i).
    #[inline]
    fn node_price(&self, i: usize, j: usize, powers: &[T]) -> T {
        self.params.spot() * powers[2 * i + self.state.n_steps - j]
    }

    fn terminal_values(&self, option_type: OptionType, powers: &[T]) -> Vec<T> {
        let n = self.state.n_steps;
        let strike = self.params.strike();
        (0..=n)
            .map(|i| option_type.intrinsic(self.node_price(i, n, powers), strike))
            .collect()
    }

    #[inline]
    fn node_value(
        &self,
        lower: T,
        upper: T,
        i: usize,
        j: usize,
        option_type: OptionType,
        powers: &[T],
    ) -> T {
        let p = self.state.probability;
        let continuation = self.state.discount * (p * upper + (T::one() - p) * lower);

        match self.style {
            ExerciseStyle::European => continuation,
            ExerciseStyle::American => {
                let z = option_type.sign::<T>();
                let exercise = z * (self.node_price(i, j, powers) - self.params.strike());
                exercise.max(continuation)
            }
        }
    }

    /// In place: node `i` reads `i` and `i + 1`, both still holding step `j + 1`.
    fn sequential_step(&self, values: &mut [T], j: usize, option_type: OptionType, powers: &[T]) {
        for i in 0..=j {
            values[i] = self.node_value(values[i], values[i + 1], i, j, option_type, powers);
        }
    }

    fn parallel_step(
        &self,
        current: &[T],
        next: &mut [T],
        j: usize,
        option_type: OptionType,
        powers: &[T],
    ) {
        next[..=j]
            .par_iter_mut()
            .enumerate()
            .for_each(|(i, slot)| {
                *slot = self.node_value(current[i], current[i + 1], i, j, option_type, powers);
            });
    }

    /// σ = 0: the underlying follows S·exp(b·t_j) on the lattice dates.
    fn degenerate_value(&self, option_type: OptionType) -> T {
        let p = &self.params;
        match self.style {
            ExerciseStyle::European => {
                p.discount_factor() * option_type.intrinsic(p.forward(), p.strike())
            }
            ExerciseStyle::American => (0..=self.state.n_steps)
                .map(|j| {
                    let t_j = self.state.dt * lit(j);
                    let forward = p.spot() * (p.cost_of_carry() * t_j).exp();
                    (-p.rate() * t_j).exp() * option_type.intrinsic(forward, p.strike())
                })
                .fold(T::zero(), T::max),
        }
    }
}

impl OptionPricer for BinomialTree<f64> {
    fn params(&self) -> &ContractParameters<f64> {
        &self.params
    }

    fn with_params(&self, params: ContractParameters<f64>) -> Result<Self, PricingError> {
        Ok(BinomialTree::new(params, self.state.n_steps, self.style)?.with_execution(self.execution))
    }

    fn price(&self, option_type: OptionType) -> Result<f64, PricingError> {
        Ok(self.value(option_type))
    }
}
