//! Variance-reduction transforms applied to an innovation batch before it is
//! bound to the path generator.

use pricer_core::math::statistics::{mean, population_std_dev};
use tracing::warn;

use super::batch::InnovationBatch;

/// Appends the negated batch below the original.
///
/// A `(p, s)` batch becomes `(2p, s)` where row `p + i` is `-row(i)`. The
/// doubling applies to the returned batch only.
///
/// ```rust
/// use pricer_pricing::mc::{antithetic, PathMatrix};
///
/// let eps = PathMatrix::from_rows(vec![vec![0.5, -1.0]]).unwrap();
/// let mirrored = antithetic(&eps);
/// assert_eq!(mirrored.shape(), (2, 2));
/// assert_eq!(mirrored.row(1), &[-0.5, 1.0]);
/// ```
pub fn antithetic(batch: &InnovationBatch) -> InnovationBatch {
    let mut data = Vec::with_capacity(2 * batch.len());
    data.extend_from_slice(batch.as_slice());
    data.extend(batch.as_slice().iter().map(|x| -x));
    InnovationBatch::from_raw(data, 2 * batch.n_paths(), batch.n_steps())
}

/// Rescales the whole batch to mean 0 and standard deviation 1.
///
/// Mean and standard deviation are taken over every entry with the
/// population (ddof = 0) convention. A batch with zero or non-finite spread
/// is only centred.
pub fn standardise(batch: &mut InnovationBatch) {
    if batch.is_empty() {
        return;
    }
    let mu = mean(batch.as_slice());
    let sd = population_std_dev(batch.as_slice());

    if sd > 0.0 && sd.is_finite() {
        for x in batch.as_mut_slice() {
            *x = (*x - mu) / sd;
        }
    } else {
        warn!(std_dev = sd, "innovation batch has no spread; centring only");
        for x in batch.as_mut_slice() {
            *x -= mu;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mc::PathMatrix;
    use crate::rng::PricerRng;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_antithetic_layout() {
        let eps = PathMatrix::from_fn(3, 2, |i, j| (i + j) as f64 + 0.5);
        let doubled = antithetic(&eps);

        assert_eq!(doubled.shape(), (6, 2));
        for i in 0..3 {
            assert_eq!(doubled.row(i), eps.row(i));
            let negated: Vec<f64> = eps.row(i).iter().map(|x| -x).collect();
            assert_eq!(doubled.row(i + 3), negated.as_slice());
        }
        assert_abs_diff_eq!(mean(doubled.as_slice()), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_standardise_moments() {
        let mut rng = PricerRng::from_seed(11);
        let mut eps = PathMatrix::from_fn(500, 20, |_, _| 3.0 + 2.5 * rng.gen_normal());
        standardise(&mut eps);

        assert_abs_diff_eq!(mean(eps.as_slice()), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(population_std_dev(eps.as_slice()), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_standardise_constant_batch_is_centred() {
        let mut eps = PathMatrix::from_fn(4, 4, |_, _| 2.0);
        standardise(&mut eps);
        assert!(eps.as_slice().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_standardise_empty_batch() {
        let mut eps = PathMatrix::zeros(0, 3);
        standardise(&mut eps);
        assert!(eps.is_empty());
    }
}
