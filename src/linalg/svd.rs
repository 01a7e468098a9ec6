use log::{debug, trace};

use crate::dense::DenseMatrix;
use crate::error::{MatrixError, Result};
use crate::linalg::config::IterationLimits;
use crate::linalg::symmetric_eigen::givens;
use crate::traits::{FloatScalar, MatrixMut};

// ── Reduction to bidiagonal form ────────────────────────────────────

/// Alternate column and row reflectors on a tall `a` (`M ≥ N`) until only
/// the main diagonal and first superdiagonal survive; those two bands are
/// written to `diag` and `off_diag`.
///
/// `a` is scratch afterwards. Reflectors are discarded because callers only
/// want singular values.
pub(crate) fn bidiagonalize<T: FloatScalar>(
    a: &mut impl MatrixMut<T>,
    diag: &mut [T],
    off_diag: &mut [T],
) {
    let m = a.nrows();
    let n = a.ncols();
    assert!(m >= n, "bidiagonalize requires M >= N");
    assert!(diag.len() >= n);
    assert!(off_diag.len() + 1 >= n);

    let tiny = T::min_positive_value();

    for k in 0..n {
        // column reflector: clear below the diagonal in column k
        let mut norm_sq = T::zero();
        for i in k..m {
            let val = *a.get(i, k);
            norm_sq = norm_sq + val * val;
        }

        if norm_sq > tiny {
            let norm = norm_sq.sqrt();
            let akk = *a.get(k, k);
            let sigma = if akk < T::zero() { -norm } else { norm };
            let v0 = akk + sigma;

            for i in (k + 1)..m {
                let val = *a.get(i, k) / v0;
                *a.get_mut(i, k) = val;
            }
            let tau = v0 / sigma;

            // remaining columns of the panel
            for j in (k + 1)..n {
                let mut dot = *a.get(k, j);
                for i in (k + 1)..m {
                    dot = dot + *a.get(i, k) * *a.get(i, j);
                }
                dot = dot * tau;

                *a.get_mut(k, j) = *a.get(k, j) - dot;
                for i in (k + 1)..m {
                    let vi = *a.get(i, k);
                    *a.get_mut(i, j) = *a.get(i, j) - dot * vi;
                }
            }

            diag[k] = -sigma;
        } else {
            diag[k] = *a.get(k, k);
        }

        // row reflector: clear right of the superdiagonal in row k
        if k + 2 < n {
            let mut norm_sq = T::zero();
            for j in (k + 1)..n {
                let val = *a.get(k, j);
                norm_sq = norm_sq + val * val;
            }

            if norm_sq > tiny {
                let norm = norm_sq.sqrt();
                let ak_k1 = *a.get(k, k + 1);
                let sigma = if ak_k1 < T::zero() { -norm } else { norm };
                let v0 = ak_k1 + sigma;

                for j in (k + 2)..n {
                    let val = *a.get(k, j) / v0;
                    *a.get_mut(k, j) = val;
                }
                let tau = v0 / sigma;

                for i in (k + 1)..m {
                    let mut dot = *a.get(i, k + 1);
                    for j in (k + 2)..n {
                        dot = dot + *a.get(i, j) * *a.get(k, j);
                    }
                    dot = dot * tau;

                    *a.get_mut(i, k + 1) = *a.get(i, k + 1) - dot;
                    for j in (k + 2)..n {
                        let vj = *a.get(k, j);
                        *a.get_mut(i, j) = *a.get(i, j) - dot * vj;
                    }
                }

                off_diag[k] = -sigma;
            } else {
                off_diag[k] = *a.get(k, k + 1);
            }
        } else if k + 1 < n {
            off_diag[k] = *a.get(k, k + 1);
        }
    }
}

// ── Bidiagonal sweeps ───────────────────────────────────────────────

/// Drive the superdiagonal to zero with shifted implicit QR sweeps.
///
/// Finishes with `diag` made non-negative and sorted largest first; the sweep
/// count is returned and `off_diag` is left zeroed.
pub(crate) fn bidiagonal_qr<T: FloatScalar>(
    diag: &mut [T],
    off_diag: &mut [T],
    limits: &IterationLimits,
) -> Result<usize> {
    let n = diag.len();
    let mut iter = 0usize;

    if n > 1 {
        let max_iter = limits.budget(n);
        let eps = T::epsilon();
        let two = T::two();
        let mut anorm = T::zero();
        for i in 0..n {
            let e = if i + 1 < n { off_diag[i].abs() } else { T::zero() };
            anorm = anorm.max(diag[i].abs() + e);
        }
        let mut hi = n - 1;

        while hi > 0 {
            let threshold = eps * (diag[hi - 1].abs() + diag[hi].abs());
            if off_diag[hi - 1].abs() <= threshold {
                trace!("bidiagonal_qr: deflated singular value {hi}");
                off_diag[hi - 1] = T::zero();
                hi -= 1;
                continue;
            }

            // walk up to the top of the active block
            let mut lo = hi - 1;
            while lo > 0 {
                let threshold = eps * (diag[lo - 1].abs() + diag[lo].abs());
                if off_diag[lo - 1].abs() <= threshold {
                    off_diag[lo - 1] = T::zero();
                    break;
                }
                lo -= 1;
            }

            iter += 1;
            if iter > max_iter {
                debug!("bidiagonal_qr: no convergence after {max_iter} sweeps");
                return Err(MatrixError::NumericalFailure {
                    iterations: max_iter,
                });
            }

            // zero pivot: rotate its superdiagonal neighbour down and out
            if let Some(idx) = (lo..hi).find(|&i| diag[i].abs() <= eps * anorm) {
                trace!("bidiagonal_qr: chasing zero diagonal at {idx}");
                diag[idx] = T::zero();
                let mut z = off_diag[idx];
                off_diag[idx] = T::zero();
                for j in (idx + 1)..=hi {
                    let (c, s) = givens(diag[j], z);
                    diag[j] = c * diag[j] + s * z;
                    if j < hi {
                        z = -s * off_diag[j];
                        off_diag[j] = c * off_diag[j];
                    }
                }
                continue;
            }

            // shift from the trailing 2×2 block of BᵀB
            let d_hi = diag[hi];
            let d_hi1 = diag[hi - 1];
            let e_hi1 = off_diag[hi - 1];
            let e_hi2 = if hi >= 2 && hi - 2 >= lo {
                off_diag[hi - 2]
            } else {
                T::zero()
            };

            let t11 = d_hi1 * d_hi1 + e_hi2 * e_hi2;
            let t12 = d_hi1 * e_hi1;
            let t22 = d_hi * d_hi + e_hi1 * e_hi1;

            let d = (t11 - t22) / two;
            let sign_d = if d >= T::zero() { T::one() } else { -T::one() };
            let mu = t22 - t12 * t12 / (d + sign_d * (d * d + t12 * t12).sqrt());

            let mut x = diag[lo] * diag[lo] - mu;
            let mut z = diag[lo] * off_diag[lo];

            for k in lo..hi {
                // column pass creates a bulge below the diagonal
                let (c, s) = givens(x, z);
                if k > lo {
                    off_diag[k - 1] = c * x + s * z;
                }

                let dk = diag[k];
                let ek = off_diag[k];
                let dk1 = diag[k + 1];

                diag[k] = c * dk + s * ek;
                off_diag[k] = c * ek - s * dk;
                let bulge = s * dk1;
                diag[k + 1] = c * dk1;

                // row pass removes it and pushes it one step on
                let (c2, s2) = givens(diag[k], bulge);
                diag[k] = c2 * diag[k] + s2 * bulge;
                let old_ek = off_diag[k];
                let old_dk1 = diag[k + 1];
                off_diag[k] = c2 * old_ek + s2 * old_dk1;
                diag[k + 1] = c2 * old_dk1 - s2 * old_ek;

                if k + 1 < hi {
                    let old_ek1 = off_diag[k + 1];
                    x = off_diag[k];
                    z = s2 * old_ek1;
                    off_diag[k + 1] = c2 * old_ek1;
                }
            }
        }
    }

    for d in diag.iter_mut() {
        *d = d.abs();
    }
    diag.sort_by(|a, b| b.partial_cmp(a).unwrap_or(core::cmp::Ordering::Equal));

    Ok(iter)
}

// ── Singular values ─────────────────────────────────────────────────

/// Singular values of a matrix of any shape, sorted descending.
///
/// Wide inputs are transposed first; the result always has `min(M, N)`
/// entries.
///
/// ```
/// use matrixkit::DenseMatrix;
/// use matrixkit::linalg::SingularValues;
///
/// let a = DenseMatrix::from_rows(&[[3.0_f64, 2.0], [2.0, 3.0]]).unwrap();
/// let sv = SingularValues::new(&a).unwrap();
/// assert!((sv.values()[0] - 5.0).abs() < 1e-10);
/// assert!((sv.values()[1] - 1.0).abs() < 1e-10);
/// assert_eq!(sv.rank(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct SingularValues<T> {
    values: Vec<T>,
    max_dim: usize,
}

impl<T: FloatScalar> SingularValues<T> {
    /// Compute singular values with default iteration limits.
    pub fn new(a: &DenseMatrix<T>) -> Result<Self> {
        Self::with_limits(a, &IterationLimits::default())
    }

    /// Compute singular values with an explicit iteration budget.
    pub fn with_limits(a: &DenseMatrix<T>, limits: &IterationLimits) -> Result<Self> {
        let mut work = if a.nrows() >= a.ncols() {
            a.clone()
        } else {
            a.transpose()
        };
        let (m, n) = work.shape();
        let mut diag = vec![T::zero(); n];
        let mut off_diag = vec![T::zero(); n.saturating_sub(1)];

        bidiagonalize(&mut work, &mut diag, &mut off_diag);
        let sweeps = bidiagonal_qr(&mut diag, &mut off_diag, limits)?;
        debug!("svd: {m}x{n} singular values after {sweeps} sweeps");

        Ok(Self {
            values: diag,
            max_dim: m,
        })
    }

    /// Largest first.
    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Largest singular value (`0` for an empty matrix).
    pub fn max(&self) -> T {
        self.values.first().copied().unwrap_or_else(T::zero)
    }

    /// Smallest singular value (`0` for an empty matrix).
    pub fn min(&self) -> T {
        self.values.last().copied().unwrap_or_else(T::zero)
    }

    /// Rank threshold `max(M, N) · σ_max · ε`.
    pub fn tolerance(&self) -> T {
        T::from_usize(self.max_dim) * self.max() * T::epsilon()
    }

    /// Numerical rank: number of singular values above [`tolerance`](Self::tolerance).
    pub fn rank(&self) -> usize {
        let tol = self.tolerance();
        self.values.iter().filter(|&&s| s > tol).count()
    }

    /// `σ_max / σ_min`, or `∞` once `σ_min` is exactly zero.
    pub fn condition_number(&self) -> T {
        let s_min = self.min();
        if s_min == T::zero() {
            T::infinity()
        } else {
            self.max() / s_min
        }
    }
}

/// Convenience methods for singular values on any matrix shape.
impl<T: FloatScalar> DenseMatrix<T> {
    /// Singular values, sorted descending.
    pub fn singular_values(&self) -> Result<Vec<T>> {
        Ok(SingularValues::new(self)?.values)
    }

    /// Numerical rank via singular values.
    ///
    /// ```
    /// use matrixkit::DenseMatrix;
    /// let a = DenseMatrix::from_rows(&[[1.0_f64, 2.0, 3.0], [2.0, 4.0, 6.0]]).unwrap();
    /// assert_eq!(a.rank().unwrap(), 1);
    /// ```
    pub fn rank(&self) -> Result<usize> {
        Ok(SingularValues::new(self)?.rank())
    }

    /// 2-norm condition number `σ_max / σ_min` (infinite when singular).
    pub fn cond(&self) -> Result<T> {
        Ok(SingularValues::new(self)?.condition_number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    fn assert_near(a: f64, b: f64, tol: f64, msg: &str) {
        assert!((a - b).abs() < tol, "{}: {} vs {} (diff {})", msg, a, b, (a - b).abs());
    }

    fn rows<const N: usize>(r: &[[f64; N]]) -> DenseMatrix<f64> {
        DenseMatrix::from_rows(r).unwrap()
    }

    #[test]
    fn identity_3x3() {
        let a = DenseMatrix::<f64>::identity(3).unwrap();
        let sv = a.singular_values().unwrap();
        for (i, s) in sv.iter().enumerate() {
            assert_near(*s, 1.0, TOL, &format!("σ[{}]", i));
        }
    }

    #[test]
    fn diagonal_with_negative() {
        let a = rows(&[[-3.0, 0.0], [0.0, 2.0]]);
        let sv = a.singular_values().unwrap();
        assert_near(sv[0], 3.0, TOL, "σ[0]");
        assert_near(sv[1], 2.0, TOL, "σ[1]");
    }

    #[test]
    fn known_2x2() {
        // AᵀA = [[13, 12], [12, 13]], eigenvalues 25 and 1
        let sv = rows(&[[3.0, 2.0], [2.0, 3.0]]).singular_values().unwrap();
        assert_near(sv[0], 5.0, TOL, "σ[0]");
        assert_near(sv[1], 1.0, TOL, "σ[1]");
    }

    #[test]
    fn sum_of_squares_matches_frobenius() {
        let a = rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 0.0], [1.0, -1.0, 2.0]]);
        let sv = a.singular_values().unwrap();
        assert_eq!(sv.len(), 3);
        let fro: f64 = a.as_slice().iter().map(|x| x * x).sum();
        let sq: f64 = sv.iter().map(|s| s * s).sum();
        assert_near(sq, fro, 1e-9, "Σσ² = ‖A‖_F²");
        for w in sv.windows(2) {
            assert!(w[0] >= w[1]);
        }
    }

    #[test]
    fn wide_matches_transpose() {
        let a = rows(&[[3.0, 2.0, 2.0], [2.0, 3.0, -2.0]]);
        let sv = a.singular_values().unwrap();
        let svt = a.transpose().singular_values().unwrap();
        assert_eq!(sv.len(), 2);
        assert_near(sv[0], 5.0, TOL, "σ[0]");
        assert_near(sv[1], 3.0, TOL, "σ[1]");
        for i in 0..2 {
            assert_near(sv[i], svt[i], TOL, &format!("σ[{}]", i));
        }
    }

    #[test]
    fn rank_deficient() {
        let a = rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        assert_eq!(a.rank().unwrap(), 2);
        assert_eq!(a.transpose().rank().unwrap(), 2);
    }

    #[test]
    fn zero_matrix_rank_and_cond() {
        let a = DenseMatrix::fill(2, 3, 0.0_f64).unwrap();
        assert_eq!(a.rank().unwrap(), 0);
        assert!(a.cond().unwrap().is_infinite());
    }

    #[test]
    fn condition_number() {
        let a = rows(&[[5.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 0.5]]);
        assert_near(a.cond().unwrap(), 10.0, TOL, "cond");
        let s = rows(&[[1.0, 2.0], [2.0, 4.0]]);
        assert!(s.cond().unwrap() > 1e15);
    }

    #[test]
    fn zero_diagonal_in_bidiagonal() {
        let a = rows(&[[0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0, 0.0]]);
        let sv = a.singular_values().unwrap();
        assert_near(sv[0], 1.0, TOL, "σ[0]");
        assert_near(sv[1], 1.0, TOL, "σ[1]");
        assert_near(sv[2], 0.0, TOL, "σ[2]");
        assert_eq!(a.rank().unwrap(), 2);
    }

    #[test]
    fn size_1x1_negative() {
        let sv = rows(&[[-7.0]]).singular_values().unwrap();
        assert_eq!(sv, vec![7.0]);
    }

    #[test]
    fn f32_support() {
        let a = DenseMatrix::from_rows(&[[3.0_f32, 0.0], [0.0, 4.0]]).unwrap();
        let sv = a.singular_values().unwrap();
        assert!((sv[0] - 4.0).abs() < 1e-5);
        assert!((sv[1] - 3.0).abs() < 1e-5);
    }
}
