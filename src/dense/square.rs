use crate::error::Result;
use crate::traits::{FloatScalar, Scalar};

use super::DenseMatrix;

impl<T: Scalar> DenseMatrix<T> {
    /// Sum of diagonal elements. Fails with `NotSquare` for rectangular input.
    ///
    /// ```
    /// use matrixkit::DenseMatrix;
    /// let m = DenseMatrix::from_rows(&[[1.0_f64, 2.0], [3.0, 4.0]]).unwrap();
    /// assert_eq!(m.trace(), Ok(5.0));
    /// ```
    pub fn trace(&self) -> Result<T> {
        let n = self.require_square()?;
        let mut sum = T::zero();
        for i in 0..n {
            sum = sum + self[(i, i)];
        }
        Ok(sum)
    }

    /// Check if the matrix is exactly symmetric (`A == A^T`).
    ///
    /// ```
    /// use matrixkit::DenseMatrix;
    /// let sym = DenseMatrix::from_rows(&[[1.0_f64, 2.0], [2.0, 3.0]]).unwrap();
    /// assert!(sym.is_symmetric());
    /// ```
    pub fn is_symmetric(&self) -> bool {
        if !self.is_square() {
            return false;
        }
        let n = self.nrows;
        for i in 0..n {
            for j in (i + 1)..n {
                if self[(i, j)] != self[(j, i)] {
                    return false;
                }
            }
        }
        true
    }
}

impl<T: FloatScalar> DenseMatrix<T> {
    /// Largest absolute cell value; the scale used by relative tolerances.
    pub fn max_abs(&self) -> T {
        self.data
            .iter()
            .fold(T::zero(), |acc, &x| if x.abs() > acc { x.abs() } else { acc })
    }
}
