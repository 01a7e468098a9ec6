/// Iteration budget shared by the QR-style iterative kernels
/// (Francis double-shift QR, tridiagonal QR, bidiagonal QR).
///
/// The total budget for an `n×n` problem is `max_iter_per_dim * max(n, 1)`.
/// Exhausting it yields [`MatrixError::NumericalFailure`](crate::MatrixError::NumericalFailure).
///
/// ```
/// use matrixkit::linalg::IterationLimits;
///
/// let limits = IterationLimits::default();
/// assert_eq!(limits.budget(4), 120);
/// assert_eq!(IterationLimits::new(5).budget(0), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationLimits {
    /// Sweeps allowed per matrix dimension.
    pub max_iter_per_dim: usize,
    /// Francis QR uses an ad-hoc exceptional shift every this many
    /// iterations to escape shift cycles. Zero disables exceptional shifts.
    pub exceptional_shift_period: usize,
}

impl IterationLimits {
    pub const DEFAULT_MAX_ITER_PER_DIM: usize = 30;
    pub const DEFAULT_EXCEPTIONAL_SHIFT_PERIOD: usize = 10;

    /// Limits with the given per-dimension sweep count and the default
    /// exceptional shift period.
    pub const fn new(max_iter_per_dim: usize) -> Self {
        Self {
            max_iter_per_dim,
            exceptional_shift_period: Self::DEFAULT_EXCEPTIONAL_SHIFT_PERIOD,
        }
    }

    /// Total iteration budget for an `n`-dimensional problem.
    #[inline]
    pub fn budget(&self, n: usize) -> usize {
        self.max_iter_per_dim.saturating_mul(n.max(1))
    }

    #[inline]
    pub(crate) fn is_exceptional(&self, iter: usize) -> bool {
        self.exceptional_shift_period != 0 && iter % self.exceptional_shift_period == 0
    }
}

impl Default for IterationLimits {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ITER_PER_DIM)
    }
}
