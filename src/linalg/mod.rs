//! Numerical engines behind `solve`, `inverse`, `det`, eigen analysis and
//! rank.
//!
//! Each algorithm is an in-place free function over
//! [`MatrixMut`](crate::MatrixMut) plus a decomposition struct that owns its
//! factors. The convenience methods on [`DenseMatrix`] (`a.solve(&c)`,
//! `a.inverse()`, `a.det()`, `a.eigen()`, `a.rank()`) are thin wrappers.

pub mod config;
pub(crate) mod eigen;
pub(crate) mod hessenberg;
pub(crate) mod lu;
pub(crate) mod qr;
pub(crate) mod schur;
pub(crate) mod svd;
pub(crate) mod symmetric_eigen;

pub use config::IterationLimits;
pub use eigen::Eigen;
pub use hessenberg::hessenberg;
pub use lu::{lu_in_place, lu_solve, LuDecomposition};
pub use qr::{qr_in_place, QrDecomposition};
pub use schur::{francis_qr, standardize_blocks, SchurDecomposition};
pub use svd::SingularValues;
pub use symmetric_eigen::{tridiagonal_qr, tridiagonalize, SymmetricEigen};

use core::cmp::Ordering;

use log::debug;

use crate::dense::DenseMatrix;
use crate::error::{MatrixError, Result};
use crate::traits::FloatScalar;

/// Solve `A·X = C` for any shape of `A`.
///
/// - square: pivoted LU; `SingularMatrix` when no pivot survives
/// - tall (`m > n`): Householder least squares, minimizing `‖A·X − C‖`
/// - wide (`m < n`): minimum-norm solution through a QR factorization of `Aᵀ`
///
/// `C` must have as many rows as `A`; the result is `ncols(A) × ncols(C)`.
///
/// ```
/// use matrixkit::DenseMatrix;
/// use matrixkit::linalg::solve;
///
/// let a = DenseMatrix::from_rows(&[[2.0_f64, 1.0], [1.0, 3.0]]).unwrap();
/// let c = DenseMatrix::from_rows(&[[3.0_f64], [5.0]]).unwrap();
/// let x = solve(&a, &c).unwrap();
/// assert!((x[(0, 0)] - 0.8).abs() < 1e-12);
/// assert!((x[(1, 0)] - 1.4).abs() < 1e-12);
/// ```
pub fn solve<T: FloatScalar>(a: &DenseMatrix<T>, c: &DenseMatrix<T>) -> Result<DenseMatrix<T>> {
    let (m, n) = a.shape();
    if c.nrows() != m {
        return Err(MatrixError::DimensionMismatch {
            expected: (m, c.ncols()),
            got: c.shape(),
        });
    }
    match m.cmp(&n) {
        Ordering::Equal => {
            debug!("solve: {m}x{n} system via LU");
            a.lu()?.solve(c)
        }
        Ordering::Greater => {
            debug!("solve: {m}x{n} system via QR least squares");
            a.qr()?.solve(c)
        }
        Ordering::Less => {
            debug!("solve: {m}x{n} system via minimum-norm QR of the transpose");
            a.transpose().qr()?.solve_transposed(c)
        }
    }
}

impl<T: FloatScalar> DenseMatrix<T> {
    /// Solve `self · X = c`; see [`solve`](crate::linalg::solve).
    pub fn solve(&self, c: &Self) -> Result<Self> {
        solve(self, c)
    }
}
