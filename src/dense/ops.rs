use core::ops::{Add, Mul, Neg, Sub};

use crate::error::{MatrixError, Result};
use crate::traits::Scalar;

use super::DenseMatrix;

// ── Checked element-wise arithmetic ─────────────────────────────────

impl<T: Scalar> DenseMatrix<T> {
    fn zip_with(&self, rhs: &Self, f: impl Fn(T, T) -> T) -> Result<Self> {
        rhs.require_shape(self.shape())?;
        let data = self
            .data
            .iter()
            .zip(rhs.data.iter())
            .map(|(&a, &b)| f(a, b))
            .collect();
        Ok(DenseMatrix {
            data,
            nrows: self.nrows,
            ncols: self.ncols,
        })
    }

    /// `self + rhs`, cell by cell.
    pub fn add_elementwise(&self, rhs: &Self) -> Result<Self> {
        self.zip_with(rhs, |a, b| a + b)
    }

    /// `self - rhs`, cell by cell.
    pub fn sub_elementwise(&self, rhs: &Self) -> Result<Self> {
        self.zip_with(rhs, |a, b| a - b)
    }

    /// Hadamard product `self ∘ rhs`.
    ///
    /// ```
    /// use matrixkit::DenseMatrix;
    /// let a = DenseMatrix::from_rows(&[[1.0_f64, 2.0], [3.0, 4.0]]).unwrap();
    /// let b = DenseMatrix::from_rows(&[[5.0_f64, 6.0], [7.0, 8.0]]).unwrap();
    /// let c = a.mul_elementwise(&b).unwrap();
    /// assert_eq!(c.as_slice(), &[5.0, 12.0, 21.0, 32.0]);
    /// ```
    pub fn mul_elementwise(&self, rhs: &Self) -> Result<Self> {
        self.zip_with(rhs, |a, b| a * b)
    }

    /// Add `c` to every cell.
    pub fn add_scalar(&self, c: T) -> Self {
        self.map(|x| x + c)
    }

    /// Multiply every cell by `c`.
    pub fn scale(&self, c: T) -> Self {
        self.map(|x| x * c)
    }

    /// Standard matrix product `self · rhs`.
    ///
    /// Fails with `DimensionMismatch` when `self.ncols() != rhs.nrows()`.
    ///
    /// ```
    /// use matrixkit::DenseMatrix;
    /// let a = DenseMatrix::from_rows(&[[1.0_f64, 2.0], [3.0, 4.0]]).unwrap();
    /// let b = DenseMatrix::from_rows(&[[5.0_f64], [6.0]]).unwrap();
    /// let c = a.matmul(&b).unwrap();
    /// assert_eq!(c.as_slice(), &[17.0, 39.0]);
    /// ```
    pub fn matmul(&self, rhs: &Self) -> Result<Self> {
        if self.ncols != rhs.nrows {
            return Err(MatrixError::DimensionMismatch {
                expected: (self.ncols, rhs.ncols),
                got: (rhs.nrows, rhs.ncols),
            });
        }
        let (m, n, p) = (self.nrows, self.ncols, rhs.ncols);
        let mut out = DenseMatrix::zeros(m, p);
        // i-k-j order keeps both inner accesses row-contiguous
        for i in 0..m {
            for k in 0..n {
                let a_ik = self.data[i * n + k];
                let rhs_row = &rhs.data[k * p..(k + 1) * p];
                let out_row = &mut out.data[i * p..(i + 1) * p];
                for (o, &b) in out_row.iter_mut().zip(rhs_row) {
                    *o = *o + a_ik * b;
                }
            }
        }
        Ok(out)
    }
}

// ── Operators ───────────────────────────────────────────────────────
//
// Operator forms panic on shape mismatch; use the checked methods above
// when shapes come from untrusted input.

impl<T: Scalar> Add<&DenseMatrix<T>> for &DenseMatrix<T> {
    type Output = DenseMatrix<T>;

    fn add(self, rhs: &DenseMatrix<T>) -> DenseMatrix<T> {
        match self.add_elementwise(rhs) {
            Ok(m) => m,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<T: Scalar> Sub<&DenseMatrix<T>> for &DenseMatrix<T> {
    type Output = DenseMatrix<T>;

    fn sub(self, rhs: &DenseMatrix<T>) -> DenseMatrix<T> {
        match self.sub_elementwise(rhs) {
            Ok(m) => m,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<T: Scalar> Mul<&DenseMatrix<T>> for &DenseMatrix<T> {
    type Output = DenseMatrix<T>;

    fn mul(self, rhs: &DenseMatrix<T>) -> DenseMatrix<T> {
        match self.matmul(rhs) {
            Ok(m) => m,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<T: Scalar> Mul<T> for &DenseMatrix<T> {
    type Output = DenseMatrix<T>;

    fn mul(self, rhs: T) -> DenseMatrix<T> {
        self.scale(rhs)
    }
}

impl<T: Scalar + Neg<Output = T>> Neg for &DenseMatrix<T> {
    type Output = DenseMatrix<T>;

    fn neg(self) -> DenseMatrix<T> {
        self.map(|x| -x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a() -> DenseMatrix<f64> {
        DenseMatrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap()
    }

    #[test]
    fn add_sub() {
        let b = DenseMatrix::fill(2, 2, 1.0).unwrap();
        assert_eq!((&a() + &b).as_slice(), &[2.0, 3.0, 4.0, 5.0]);
        assert_eq!((&a() - &b).as_slice(), &[0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn elementwise_shape_mismatch() {
        let b = DenseMatrix::fill(2, 3, 1.0).unwrap();
        assert_eq!(
            a().add_elementwise(&b),
            Err(MatrixError::DimensionMismatch {
                expected: (2, 2),
                got: (2, 3)
            })
        );
    }

    #[test]
    #[should_panic(expected = "dimension mismatch")]
    fn operator_panics_on_mismatch() {
        let b = DenseMatrix::fill(3, 3, 1.0).unwrap();
        let _ = &a() + &b;
    }

    #[test]
    fn scalar_ops() {
        assert_eq!(a().add_scalar(1.5).as_slice(), &[2.5, 3.5, 4.5, 5.5]);
        assert_eq!((&a() * 2.0).as_slice(), &[2.0, 4.0, 6.0, 8.0]);
        assert_eq!((-&a()).as_slice(), &[-1.0, -2.0, -3.0, -4.0]);
    }

    #[test]
    fn matmul_rectangular() {
        let x = DenseMatrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        let y = DenseMatrix::from_rows(&[[7.0, 8.0], [9.0, 10.0], [11.0, 12.0]]).unwrap();
        let z = x.matmul(&y).unwrap();
        assert_eq!(z.shape(), (2, 2));
        assert_eq!(z.as_slice(), &[58.0, 64.0, 139.0, 154.0]);
    }

    #[test]
    fn matmul_inner_mismatch() {
        let x = DenseMatrix::fill(2, 3, 1.0).unwrap();
        assert!(matches!(
            x.matmul(&x),
            Err(MatrixError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn matmul_identity() {
        let x = DenseMatrix::from_fn(3, 4, |i, j| (i * 4 + j) as f64).unwrap();
        let id3 = DenseMatrix::<f64>::identity(3).unwrap();
        let id4 = DenseMatrix::<f64>::identity(4).unwrap();
        assert_eq!(id3.matmul(&x).unwrap(), x);
        assert_eq!(x.matmul(&id4).unwrap(), x);
    }
}
