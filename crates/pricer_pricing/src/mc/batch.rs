//! Dense (paths × steps) arrays exchanged between the engine and its
//! capabilities.

use super::error::McError;

/// Row-major matrix with one row per path and one column per time step.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::PathMatrix;
///
/// let m = PathMatrix::from_rows(vec![vec![0.1, 0.2], vec![-0.3, 0.4]]).unwrap();
/// assert_eq!(m.shape(), (2, 2));
/// assert_eq!(m.row(1), &[-0.3, 0.4]);
/// assert_eq!(m.row_sums(), vec![0.1 + 0.2, -0.3 + 0.4]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PathMatrix {
    data: Vec<f64>,
    n_paths: usize,
    n_steps: usize,
}

/// Raw stochastic draws for one loop.
pub type InnovationBatch = PathMatrix;

/// Per-path, per-step log-increments of the underlying.
pub type PathIncrements = PathMatrix;

/// Per-path discounted payoffs.
pub type PayoffVector = Vec<f64>;

impl PathMatrix {
    /// Zero-filled matrix.
    pub fn zeros(n_paths: usize, n_steps: usize) -> Self {
        Self {
            data: vec![0.0; n_paths * n_steps],
            n_paths,
            n_steps,
        }
    }

    /// Wraps row-major data.
    ///
    /// # Errors
    ///
    /// `McError::ShapeMismatch` if `data.len() != n_paths * n_steps` or
    /// `n_steps` is zero.
    pub fn from_vec(data: Vec<f64>, n_paths: usize, n_steps: usize) -> Result<Self, McError> {
        if n_steps == 0 {
            return Err(McError::shape("PathMatrix", "step count must be at least 1"));
        }
        if data.len() != n_paths * n_steps {
            return Err(McError::shape(
                "PathMatrix",
                format!(
                    "{} values cannot fill a ({}, {}) matrix",
                    data.len(),
                    n_paths,
                    n_steps
                ),
            ));
        }
        Ok(Self {
            data,
            n_paths,
            n_steps,
        })
    }

    /// Caller guarantees `data.len() == n_paths * n_steps`.
    pub(crate) fn from_raw(data: Vec<f64>, n_paths: usize, n_steps: usize) -> Self {
        debug_assert_eq!(data.len(), n_paths * n_steps);
        Self {
            data,
            n_paths,
            n_steps,
        }
    }

    /// Builds a matrix from equally long rows.
    ///
    /// # Errors
    ///
    /// `McError::ShapeMismatch` on ragged or empty rows.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, McError> {
        let n_paths = rows.len();
        let n_steps = rows.first().map_or(0, Vec::len);
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_steps) {
            return Err(McError::shape(
                "PathMatrix",
                format!("row {} has {} steps, row 0 has {}", i, row.len(), n_steps),
            ));
        }
        Self::from_vec(rows.into_iter().flatten().collect(), n_paths, n_steps)
    }

    /// Fills entry (path, step) with `f(path, step)`.
    pub fn from_fn(n_paths: usize, n_steps: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(n_paths * n_steps);
        for i in 0..n_paths {
            for j in 0..n_steps {
                data.push(f(i, j));
            }
        }
        Self {
            data,
            n_paths,
            n_steps,
        }
    }

    /// Number of paths (rows).
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Number of time steps (columns).
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// `(n_paths, n_steps)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_paths, self.n_steps)
    }

    /// Total number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns whether the matrix has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Steps of path `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= n_paths`.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n_steps..(i + 1) * self.n_steps]
    }

    /// Iterator over paths.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks(self.n_steps.max(1)).take(self.n_paths)
    }

    /// Row-major view of every entry.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable row-major view of every entry.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consumes the matrix, returning row-major data.
    #[inline]
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Applies `f` to every entry, keeping the shape.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self::from_raw(
            self.data.iter().map(|&x| f(x)).collect(),
            self.n_paths,
            self.n_steps,
        )
    }

    /// Sum of each row; for log-increments this is the terminal log-return.
    pub fn row_sums(&self) -> Vec<f64> {
        self.rows().map(|row| row.iter().sum()).collect()
    }

    /// Returns whether every entry is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }
}
