//! Execution mode selection shared by both engines.
//!
//! The lattice parallelises only the node loop inside one backward step; the
//! Monte Carlo engine parallelises whole loops. Both keep results indexed by
//! position so the parallel answer equals the sequential one.

/// How an engine schedules its independent units of work.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExecutionMode {
    /// Single-threaded, in index order.
    #[default]
    Sequential,
    /// Work-stealing on the global rayon pool.
    Parallel,
}

impl ExecutionMode {
    /// Returns whether parallel execution was requested.
    #[inline]
    pub fn is_parallel(self) -> bool {
        matches!(self, ExecutionMode::Parallel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_sequential() {
        assert_eq!(ExecutionMode::default(), ExecutionMode::Sequential);
        assert!(ExecutionMode::Parallel.is_parallel());
    }
}
