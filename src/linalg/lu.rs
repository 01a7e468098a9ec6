use log::trace;

use crate::dense::DenseMatrix;
use crate::error::{MatrixError, Result};
use crate::traits::{FloatScalar, MatrixMut, MatrixRef};

/// Smallest pivot magnitude accepted for an `n×n` matrix whose largest
/// absolute entry is `scale`.
#[inline]
pub(crate) fn pivot_tolerance<T: FloatScalar>(n: usize, scale: T) -> T {
    T::from_usize(n) * T::epsilon() * scale
}

/// Factor `P·A = L·U` by row-pivoted elimination, overwriting `a`.
///
/// `U` occupies the diagonal and everything above it; the multipliers of the
/// unit lower triangle `L` fill the strict lower part.
///
/// `perm` is filled with the row permutation: row `i` of `P·A` is row
/// `perm[i]` of `A`. Returns `true` if the number of row swaps was even.
///
/// Fails with `SingularMatrix` when the largest candidate pivot of some
/// column is at or below `n · ε · max|aᵢⱼ|`.
pub fn lu_in_place<T: FloatScalar>(
    a: &mut impl MatrixMut<T>,
    perm: &mut [usize],
) -> Result<bool> {
    let n = a.nrows();
    assert_eq!(n, a.ncols(), "LU decomposition requires a square matrix");
    assert_eq!(n, perm.len(), "permutation slice length must match matrix size");

    let mut scale = T::zero();
    for i in 0..n {
        perm[i] = i;
        for j in 0..n {
            scale = scale.max(a.get(i, j).abs());
        }
    }
    let tol = pivot_tolerance(n, scale);

    let mut even = true;

    for col in 0..n {
        // Partial pivoting: find row with largest magnitude in this column
        let mut max_row = col;
        let mut max_val = a.get(col, col).abs();
        for row in (col + 1)..n {
            let val = a.get(row, col).abs();
            if val > max_val {
                max_val = val;
                max_row = row;
            }
        }

        if max_val <= tol {
            trace!("lu: no usable pivot in column {col} (|p| = {max_val:?})");
            return Err(MatrixError::SingularMatrix);
        }

        if max_row != col {
            trace!("lu: swap rows {col} <-> {max_row}");
            perm.swap(col, max_row);
            a.swap_rows_in_place(col, max_row);
            even = !even;
        }

        let inv_pivot = T::one() / *a.get(col, col);

        // Store multipliers below the pivot and apply the rank-1 update
        for row in (col + 1)..n {
            let factor = *a.get(row, col) * inv_pivot;
            *a.get_mut(row, col) = factor;
            if factor == T::zero() {
                continue;
            }
            for j in (col + 1)..n {
                let upd = *a.get(row, j) - factor * *a.get(col, j);
                *a.get_mut(row, j) = upd;
            }
        }
    }

    Ok(even)
}

/// Solve one right-hand side against factors produced by [`lu_in_place`].
///
/// `b` is read through `perm`; the solution lands in `x`.
pub fn lu_solve<T: FloatScalar>(lu: &impl MatrixRef<T>, perm: &[usize], b: &[T], x: &mut [T]) {
    let n = lu.nrows();

    // L y = P b
    for i in 0..n {
        let mut sum = b[perm[i]];
        for j in 0..i {
            sum = sum - *lu.get(i, j) * x[j];
        }
        x[i] = sum;
    }

    // U x = y
    for i in (0..n).rev() {
        let mut sum = x[i];
        for j in (i + 1)..n {
            sum = sum - *lu.get(i, j) * x[j];
        }
        x[i] = sum / *lu.get(i, i);
    }
}

/// LU decomposition of a square matrix.
///
/// Holds the packed factors and the pivot order, so a matrix factored once
/// can be reused for several solves, an inverse and a determinant.
///
/// # Example
///
/// ```
/// use matrixkit::DenseMatrix;
/// use matrixkit::linalg::LuDecomposition;
///
/// let a = DenseMatrix::from_rows(&[[2.0_f64, 1.0], [5.0, 3.0]]).unwrap();
/// let lu = LuDecomposition::new(&a).unwrap();
///
/// let b = DenseMatrix::from_rows(&[[4.0], [11.0]]).unwrap();
/// let x = lu.solve(&b).unwrap();
/// assert!((x[(0, 0)] - 1.0).abs() < 1e-12);
/// assert!((x[(1, 0)] - 2.0).abs() < 1e-12);
/// assert!((lu.det() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct LuDecomposition<T> {
    lu: DenseMatrix<T>,
    perm: Vec<usize>,
    even: bool,
}

impl<T: FloatScalar> LuDecomposition<T> {
    /// Decompose a matrix.
    ///
    /// Fails with `NotSquare` for rectangular input and `SingularMatrix`
    /// when no usable pivot exists.
    pub fn new(a: &DenseMatrix<T>) -> Result<Self> {
        let n = a.require_square()?;
        let mut lu = a.clone();
        let mut perm = vec![0usize; n];
        let even = lu_in_place(&mut lu, &mut perm)?;
        Ok(Self { lu, perm, even })
    }

    /// Dimension of the factored matrix.
    #[inline]
    pub fn dim(&self) -> usize {
        self.lu.nrows()
    }

    /// Solve `A·X = B` for every column of `B`.
    pub fn solve(&self, b: &DenseMatrix<T>) -> Result<DenseMatrix<T>> {
        let n = self.dim();
        if b.nrows() != n {
            return Err(MatrixError::DimensionMismatch {
                expected: (n, b.ncols()),
                got: b.shape(),
            });
        }
        let mut x = DenseMatrix::zeros(n, b.ncols());
        let mut rhs = vec![T::zero(); n];
        let mut col_buf = vec![T::zero(); n];
        for col in 0..b.ncols() {
            for row in 0..n {
                rhs[row] = b[(row, col)];
            }
            lu_solve(&self.lu, &self.perm, &rhs, &mut col_buf);
            for row in 0..n {
                x[(row, col)] = col_buf[row];
            }
        }
        Ok(x)
    }

    /// `A⁻¹`, one unit column at a time.
    pub fn inverse(&self) -> DenseMatrix<T> {
        let n = self.dim();
        let mut inv = DenseMatrix::zeros(n, n);
        let mut e = vec![T::zero(); n];
        let mut col_buf = vec![T::zero(); n];

        for col in 0..n {
            if col > 0 {
                e[col - 1] = T::zero();
            }
            e[col] = T::one();

            lu_solve(&self.lu, &self.perm, &e, &mut col_buf);

            for row in 0..n {
                inv[(row, col)] = col_buf[row];
            }
        }

        inv
    }

    /// Compute the determinant: signed product of the U diagonal.
    pub fn det(&self) -> T {
        let mut d = if self.even { T::one() } else { -T::one() };
        for i in 0..self.dim() {
            d = d * self.lu[(i, i)];
        }
        d
    }

    /// Unit lower-triangular factor L.
    pub fn lower(&self) -> DenseMatrix<T> {
        let n = self.dim();
        DenseMatrix::tabulate(n, n, |i, j| match i.cmp(&j) {
            core::cmp::Ordering::Greater => self.lu[(i, j)],
            core::cmp::Ordering::Equal => T::one(),
            core::cmp::Ordering::Less => T::zero(),
        })
    }

    /// Upper-triangular factor U.
    pub fn upper(&self) -> DenseMatrix<T> {
        let n = self.dim();
        DenseMatrix::tabulate(n, n, |i, j| if i <= j { self.lu[(i, j)] } else { T::zero() })
    }

    /// Row permutation: row `i` of `P·A` is row `permutation()[i]` of `A`.
    #[inline]
    pub fn permutation(&self) -> &[usize] {
        &self.perm
    }
}

impl<T: FloatScalar> DenseMatrix<T> {
    /// Factor with [`LuDecomposition::new`].
    pub fn lu(&self) -> Result<LuDecomposition<T>> {
        LuDecomposition::new(self)
    }

    /// Determinant via pivoted elimination.
    ///
    /// Fails with `NotSquare` for rectangular input; a singular matrix
    /// yields `0`, not an error.
    ///
    /// ```
    /// use matrixkit::DenseMatrix;
    /// let m = DenseMatrix::from_rows(&[[3.0_f64, 8.0], [4.0, 6.0]]).unwrap();
    /// assert!((m.det().unwrap() - (-14.0)).abs() < 1e-12);
    /// let s = DenseMatrix::from_rows(&[[1.0_f64, 2.0], [2.0, 4.0]]).unwrap();
    /// assert_eq!(s.det().unwrap(), 0.0);
    /// ```
    pub fn det(&self) -> Result<T> {
        self.require_square()?;
        match LuDecomposition::new(self) {
            Ok(lu) => Ok(lu.det()),
            Err(MatrixError::SingularMatrix) => Ok(T::zero()),
            Err(e) => Err(e),
        }
    }

    /// Matrix inverse via LU decomposition.
    ///
    /// ```
    /// use matrixkit::DenseMatrix;
    /// let a = DenseMatrix::from_rows(&[[4.0_f64, 7.0], [2.0, 6.0]]).unwrap();
    /// let id = a.matmul(&a.inverse().unwrap()).unwrap();
    /// assert!((id[(0, 0)] - 1.0).abs() < 1e-12);
    /// assert!(id[(0, 1)].abs() < 1e-12);
    /// ```
    pub fn inverse(&self) -> Result<Self> {
        Ok(self.lu()?.inverse())
    }
}
