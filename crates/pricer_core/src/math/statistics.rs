//! Sample statistics for Monte Carlo diagnostics.
//!
//! All reductions run in index order, so the result for a given slice is
//! bit-identical no matter how the slice was produced (sequentially or by a
//! parallel loop writing results by index).

/// Arithmetic mean of the sample. Returns NaN for an empty slice.
///
/// # Examples
/// ```
/// use pricer_core::math::statistics::mean;
///
/// assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
/// assert!(mean(&[]).is_nan());
/// ```
#[inline]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Variance with `ddof` delta degrees of freedom (0 = population, 1 = sample).
///
/// Returns NaN when `values.len() <= ddof`.
pub fn variance_ddof(values: &[f64], ddof: usize) -> f64 {
    let n = values.len();
    if n <= ddof {
        return f64::NAN;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|&v| (v - m) * (v - m)).sum();
    sum_sq / (n - ddof) as f64
}

/// Unbiased sample variance (ddof = 1).
#[inline]
pub fn variance(values: &[f64]) -> f64 {
    variance_ddof(values, 1)
}

/// Population standard deviation (ddof = 0).
#[inline]
pub fn population_std_dev(values: &[f64]) -> f64 {
    variance_ddof(values, 0).sqrt()
}

/// Sample standard deviation (ddof = 1).
#[inline]
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Standard error of the mean: `std_dev / sqrt(n)`.
///
/// A single observation carries no dispersion information; zero is returned
/// in that case instead of NaN so that one-loop runs still report a price.
///
/// # Examples
/// ```
/// use pricer_core::math::statistics::standard_error;
///
/// assert_eq!(standard_error(&[4.2]), 0.0);
/// assert!(standard_error(&[1.0, 2.0, 3.0, 4.0]) > 0.0);
/// ```
pub fn standard_error(values: &[f64]) -> f64 {
    match values.len() {
        0 => f64::NAN,
        1 => 0.0,
        n => std_dev(values) / (n as f64).sqrt(),
    }
}

/// Running (cumulative) means: element `i` is the mean of `values[..=i]`.
pub fn cumulative_means(values: &[f64]) -> Vec<f64> {
    let mut sum = 0.0;
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            sum += v;
            sum / (i + 1) as f64
        })
        .collect()
}
