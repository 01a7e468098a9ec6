use log::trace;

use crate::dense::DenseMatrix;
use crate::error::{MatrixError, Result};
use crate::traits::{FloatScalar, MatrixMut};

use super::lu::pivot_tolerance;

/// Overwrite a tall `a` with its Householder factorization `A = Q·R`.
///
/// `R` ends up on and above the diagonal. Below it, column `k` stores the
/// tail of reflector `k` (leading entry 1 implied) and `tau[k]` its scale.
///
/// Works on rectangular matrices (M >= N). Fails with `SingularMatrix`
/// when a column is numerically dependent on the ones before it, judged
/// relative to the largest entry of the input.
pub fn qr_in_place<T: FloatScalar>(a: &mut impl MatrixMut<T>, tau: &mut [T]) -> Result<()> {
    let m = a.nrows();
    let n = a.ncols();
    assert!(m >= n, "QR decomposition requires M >= N");
    assert_eq!(tau.len(), n, "tau length must equal N");

    let mut scale = T::zero();
    for i in 0..m {
        for j in 0..n {
            scale = scale.max(a.get(i, j).abs());
        }
    }
    let tol = pivot_tolerance(m, scale);

    for col in 0..n {
        let mut norm_sq = T::zero();
        for i in col..m {
            let v = *a.get(i, col);
            norm_sq = norm_sq + v * v;
        }
        let norm = norm_sq.sqrt();

        if norm <= tol {
            trace!("qr: column {col} is dependent (|v| = {norm:?})");
            return Err(MatrixError::SingularMatrix);
        }

        // sigma = sign(a[col,col]) * ||x|| avoids cancellation in v0
        let a_col_col = *a.get(col, col);
        let sigma = if a_col_col < T::zero() { -norm } else { norm };

        let v0 = a_col_col + sigma;
        let tau_val = v0 / sigma;
        tau[col] = tau_val;

        // Scale the sub-diagonal entries by 1/v0 for storage (v[0] = 1 implicit)
        for i in (col + 1)..m {
            let val = *a.get(i, col) / v0;
            *a.get_mut(i, col) = val;
        }

        // A[col:m, j] -= tau * v * (v^T A[col:m, j])
        for j in (col + 1)..n {
            let mut dot = *a.get(col, j);
            for i in (col + 1)..m {
                dot = dot + *a.get(i, col) * *a.get(i, j);
            }
            dot = dot * tau_val;

            *a.get_mut(col, j) = *a.get(col, j) - dot;
            for i in (col + 1)..m {
                let vi = *a.get(i, col);
                let old = *a.get(i, j);
                *a.get_mut(i, j) = old - dot * vi;
            }
        }

        *a.get_mut(col, col) = -sigma;
    }

    Ok(())
}

/// Householder QR decomposition of an `M×N` matrix with `M >= N`.
///
/// Stores the packed Householder vectors, R, and tau scalars. Used for
/// least-squares solves of tall systems and, applied to `Aᵀ`, for the
/// minimum-norm solution of wide ones.
///
/// # Example
///
/// ```
/// use matrixkit::DenseMatrix;
///
/// // line through (0, 1), (1, 2), (2, 4) in the least-squares sense
/// let a = DenseMatrix::from_rows(&[[1.0_f64, 0.0], [1.0, 1.0], [1.0, 2.0]]).unwrap();
/// let b = DenseMatrix::from_rows(&[[1.0_f64], [2.0], [4.0]]).unwrap();
/// let x = a.qr().unwrap().solve(&b).unwrap();
/// assert!((x[(0, 0)] - 5.0 / 6.0).abs() < 1e-10);
/// assert!((x[(1, 0)] - 3.0 / 2.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct QrDecomposition<T> {
    qr: DenseMatrix<T>,
    tau: Vec<T>,
}

impl<T: FloatScalar> QrDecomposition<T> {
    /// Decompose a matrix with at least as many rows as columns.
    ///
    /// Fails with `DimensionMismatch` for wide input and `SingularMatrix`
    /// when the columns are linearly dependent.
    pub fn new(a: &DenseMatrix<T>) -> Result<Self> {
        if a.nrows() < a.ncols() {
            return Err(MatrixError::DimensionMismatch {
                expected: (a.ncols(), a.ncols()),
                got: a.shape(),
            });
        }
        let mut qr = a.clone();
        let mut tau = vec![T::zero(); a.ncols()];
        qr_in_place(&mut qr, &mut tau)?;
        Ok(Self { qr, tau })
    }

    /// Square upper triangle `R`, `N × N`.
    pub fn r(&self) -> DenseMatrix<T> {
        let n = self.qr.ncols();
        DenseMatrix::tabulate(n, n, |i, j| if i <= j { self.qr[(i, j)] } else { T::zero() })
    }

    /// Economy `Q`, `M × N` with orthonormal columns, built by running the
    /// stored reflectors backwards over the leading identity columns.
    pub fn q(&self) -> DenseMatrix<T> {
        let (m, n) = self.qr.shape();
        let mut q = DenseMatrix::zeros(m, n);
        for i in 0..n {
            q[(i, i)] = T::one();
        }

        for col in (0..n).rev() {
            let tau_val = self.tau[col];
            for j in col..n {
                let mut dot = q[(col, j)];
                for i in (col + 1)..m {
                    dot = dot + self.qr[(i, col)] * q[(i, j)];
                }
                dot = dot * tau_val;

                q[(col, j)] = q[(col, j)] - dot;
                for i in (col + 1)..m {
                    q[(i, j)] = q[(i, j)] - dot * self.qr[(i, col)];
                }
            }
        }

        q
    }

    /// Apply `Qᵀ` to one right-hand side of length M, in place.
    fn apply_qt(&self, b: &mut [T]) {
        let (m, n) = self.qr.shape();
        for col in 0..n {
            let tau_val = self.tau[col];
            let mut dot = b[col];
            for i in (col + 1)..m {
                dot = dot + self.qr[(i, col)] * b[i];
            }
            dot = dot * tau_val;

            b[col] = b[col] - dot;
            for i in (col + 1)..m {
                b[i] = b[i] - dot * self.qr[(i, col)];
            }
        }
    }

    /// Solve the least-squares problem `min ‖A·X − B‖` column by column.
    ///
    /// Computes `X = R⁻¹ Qᵀ B` via Householder application and back
    /// substitution. `B` must have M rows.
    pub fn solve(&self, b: &DenseMatrix<T>) -> Result<DenseMatrix<T>> {
        let (m, n) = self.qr.shape();
        if b.nrows() != m {
            return Err(MatrixError::DimensionMismatch {
                expected: (m, b.ncols()),
                got: b.shape(),
            });
        }
        let mut x = DenseMatrix::zeros(n, b.ncols());
        let mut qtb = vec![T::zero(); m];
        for c in 0..b.ncols() {
            for i in 0..m {
                qtb[i] = b[(i, c)];
            }
            self.apply_qt(&mut qtb);
            for i in (0..n).rev() {
                let mut sum = qtb[i];
                for j in (i + 1)..n {
                    sum = sum - self.qr[(i, j)] * x[(j, c)];
                }
                x[(i, c)] = sum / self.qr[(i, i)];
            }
        }
        Ok(x)
    }

    /// Minimum-norm solution of the transposed system.
    ///
    /// With `self` the decomposition of `Aᵀ` (so `A` is wide, N × M), solves
    /// `A·X = C` by forward substitution `Rᵀ·Z = C` followed by `X = Q·Z`.
    /// `C` must have N rows; the result has M rows.
    pub fn solve_transposed(&self, c: &DenseMatrix<T>) -> Result<DenseMatrix<T>> {
        let (m, n) = self.qr.shape();
        if c.nrows() != n {
            return Err(MatrixError::DimensionMismatch {
                expected: (n, c.ncols()),
                got: c.shape(),
            });
        }
        let p = c.ncols();
        let mut z = DenseMatrix::zeros(n, p);
        for k in 0..p {
            for i in 0..n {
                let mut sum = c[(i, k)];
                for j in 0..i {
                    sum = sum - self.qr[(j, i)] * z[(j, k)];
                }
                z[(i, k)] = sum / self.qr[(i, i)];
            }
        }
        let x = self.q().matmul(&z)?;
        debug_assert_eq!(x.shape(), (m, p));
        Ok(x)
    }
}

impl<T: FloatScalar> DenseMatrix<T> {
    /// Factor with [`QrDecomposition::new`]; needs `M >= N`.
    pub fn qr(&self) -> Result<QrDecomposition<T>> {
        QrDecomposition::new(self)
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
    fn qr_square_3x3() {
        let a = rows(&[[12.0, -51.0, 4.0], [6.0, 167.0, -68.0], [-4.0, 24.0, -41.0]]);
        let qr = a.qr().unwrap();
        let q = qr.q();
        let r = qr.r();

        let qr_prod = q.matmul(&r).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                assert_near(qr_prod[(i, j)], a[(i, j)], TOL, &format!("QR[({},{})]", i, j));
            }
        }

        let qtq = q.transpose().matmul(&q).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_near(qtq[(i, j)], expected, TOL, &format!("QtQ[({},{})]", i, j));
            }
        }
    }

    #[test]
    fn qr_rectangular_4x3() {
        let a = rows(&[[1.0, -1.0, 4.0], [1.0, 4.0, -2.0], [1.0, 4.0, 2.0], [1.0, -1.0, 0.0]]);
        let qr = a.qr().unwrap();
        let prod = qr.q().matmul(&qr.r()).unwrap();
        assert_eq!(prod.shape(), (4, 3));
        for i in 0..4 {
            for j in 0..3 {
                assert_near(prod[(i, j)], a[(i, j)], TOL, &format!("QR[({},{})]", i, j));
            }
        }
    }

    #[test]
    fn qr_least_squares_residual_orthogonal() {
        let a = rows(&[[1.0, 0.0], [1.0, 1.0], [1.0, 2.0]]);
        let b = rows(&[[1.0], [2.0], [4.0]]);
        let x = a.qr().unwrap().solve(&b).unwrap();
        assert_near(x[(0, 0)], 5.0 / 6.0, TOL, "c0");
        assert_near(x[(1, 0)], 3.0 / 2.0, TOL, "c1");

        // A^T (b - Ax) ≈ 0
        let r = b.sub_elementwise(&a.matmul(&x).unwrap()).unwrap();
        let atr = a.transpose().matmul(&r).unwrap();
        for i in 0..2 {
            assert_near(atr[(i, 0)], 0.0, TOL, &format!("A^T r[{}]", i));
        }
    }

    #[test]
    fn min_norm_wide_system() {
        // x + y = 2 has minimum-norm solution (1, 1)
        let a = rows(&[[1.0, 1.0]]);
        let c = rows(&[[2.0]]);
        let x = a.transpose().qr().unwrap().solve_transposed(&c).unwrap();
        assert_eq!(x.shape(), (2, 1));
        assert_near(x[(0, 0)], 1.0, TOL, "x0");
        assert_near(x[(1, 0)], 1.0, TOL, "x1");
    }

    #[test]
    fn min_norm_satisfies_system() {
        let a = rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 7.0]]);
        let c = rows(&[[1.0, 0.0], [2.0, 1.0]]);
        let x = a.transpose().qr().unwrap().solve_transposed(&c).unwrap();
        let ax = a.matmul(&x).unwrap();
        for i in 0..2 {
            for j in 0..2 {
                assert_near(ax[(i, j)], c[(i, j)], TOL, &format!("AX[({},{})]", i, j));
            }
        }
    }

    #[test]
    fn qr_rank_deficient() {
        let a = rows(&[[1.0, 2.0], [2.0, 4.0], [3.0, 6.0]]);
        assert_eq!(a.qr().unwrap_err(), MatrixError::SingularMatrix);
    }

    #[test]
    fn qr_wide_rejected() {
        let a = rows(&[[1.0, 2.0, 3.0]]);
        assert!(matches!(a.qr(), Err(MatrixError::DimensionMismatch { .. })));
    }

    #[test]
    fn qr_rhs_rows_mismatch() {
        let a = rows(&[[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]);
        let b = rows(&[[1.0], [2.0]]);
        assert!(matches!(
            a.qr().unwrap().solve(&b),
            Err(MatrixError::DimensionMismatch { .. })
        ));
    }
}
