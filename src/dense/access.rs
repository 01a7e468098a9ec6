use crate::error::{MatrixError, Result};
use crate::traits::Scalar;

use super::DenseMatrix;

#[inline]
fn check_index(index: usize, extent: usize) -> Result<()> {
    if index >= extent {
        return Err(MatrixError::IndexOutOfRange { index, extent });
    }
    Ok(())
}

// ── Cell access ─────────────────────────────────────────────────────

impl<T: Copy> DenseMatrix<T> {
    /// Checked read of cell `(i, j)`.
    ///
    /// ```
    /// use matrixkit::{DenseMatrix, MatrixError};
    /// let m = DenseMatrix::from_rows(&[[1.0_f64, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
    /// assert_eq!(m.at(1, 2), Ok(6.0));
    /// assert_eq!(m.at(2, 0), Err(MatrixError::IndexOutOfRange { index: 2, extent: 2 }));
    /// ```
    pub fn at(&self, i: usize, j: usize) -> Result<T> {
        check_index(i, self.nrows)?;
        check_index(j, self.ncols)?;
        Ok(self[(i, j)])
    }

    /// Checked write of cell `(i, j)`.
    pub fn set(&mut self, i: usize, j: usize, value: T) -> Result<()> {
        check_index(i, self.nrows)?;
        check_index(j, self.ncols)?;
        self[(i, j)] = value;
        Ok(())
    }
}

// ── Row / Column access ─────────────────────────────────────────────

impl<T: Copy> DenseMatrix<T> {
    /// Row `i` as a contiguous slice.
    pub fn row_slice(&self, i: usize) -> Result<&[T]> {
        check_index(i, self.nrows)?;
        let start = i * self.ncols;
        Ok(&self.data[start..start + self.ncols])
    }

    /// Copy of row `i`.
    pub fn row(&self, i: usize) -> Result<Vec<T>> {
        self.row_slice(i).map(<[T]>::to_vec)
    }

    /// Copy of column `j`.
    pub fn col(&self, j: usize) -> Result<Vec<T>> {
        check_index(j, self.ncols)?;
        Ok((0..self.nrows).map(|i| self[(i, j)]).collect())
    }

    /// Replace row `i`; `values` must have exactly `ncols` entries.
    ///
    /// The length is checked before the index.
    pub fn set_row(&mut self, i: usize, values: &[T]) -> Result<()> {
        if values.len() != self.ncols {
            return Err(MatrixError::DimensionMismatch {
                expected: (1, self.ncols),
                got: (1, values.len()),
            });
        }
        check_index(i, self.nrows)?;
        let start = i * self.ncols;
        self.data[start..start + self.ncols].copy_from_slice(values);
        Ok(())
    }

    /// Replace column `j`; `values` must have exactly `nrows` entries.
    pub fn set_col(&mut self, j: usize, values: &[T]) -> Result<()> {
        if values.len() != self.nrows {
            return Err(MatrixError::DimensionMismatch {
                expected: (self.nrows, 1),
                got: (values.len(), 1),
            });
        }
        check_index(j, self.ncols)?;
        for (i, &v) in values.iter().enumerate() {
            self[(i, j)] = v;
        }
        Ok(())
    }

    /// Swap two rows in place. No-op when `a == b`.
    ///
    /// ```
    /// use matrixkit::DenseMatrix;
    /// let mut m = DenseMatrix::from_rows(&[[1.0_f64, 2.0], [3.0, 4.0]]).unwrap();
    /// m.swap_rows(0, 1).unwrap();
    /// assert_eq!(m[(0, 0)], 3.0);
    /// assert_eq!(m[(1, 0)], 1.0);
    /// ```
    pub fn swap_rows(&mut self, a: usize, b: usize) -> Result<()> {
        check_index(a, self.nrows)?;
        check_index(b, self.nrows)?;
        if a != b {
            let n = self.ncols;
            for j in 0..n {
                self.data.swap(a * n + j, b * n + j);
            }
        }
        Ok(())
    }

    /// Swap two columns in place. No-op when `a == b`.
    pub fn swap_cols(&mut self, a: usize, b: usize) -> Result<()> {
        check_index(a, self.ncols)?;
        check_index(b, self.ncols)?;
        if a != b {
            for i in 0..self.nrows {
                self.data.swap(i * self.ncols + a, i * self.ncols + b);
            }
        }
        Ok(())
    }
}

// ── Blocks ──────────────────────────────────────────────────────────

impl<T: Scalar> DenseMatrix<T> {
    /// Rows `[r1, r2)` and columns `[c1, c2)` as a new matrix.
    ///
    /// Fails with `InvalidRange` if either range is empty or inverted, or
    /// extends past the matrix.
    ///
    /// ```
    /// use matrixkit::DenseMatrix;
    /// let m = DenseMatrix::from_fn(3, 3, |i, j| (i * 3 + j + 1) as f64).unwrap();
    /// let b = m.submatrix(0, 1, 2, 3).unwrap();
    /// assert_eq!(b.to_row_list(), vec![vec![2.0, 3.0], vec![5.0, 6.0]]);
    /// ```
    pub fn submatrix(&self, r1: usize, c1: usize, r2: usize, c2: usize) -> Result<Self> {
        if r1 >= r2 || c1 >= c2 || r2 > self.nrows || c2 > self.ncols {
            return Err(MatrixError::InvalidRange {
                r1,
                c1,
                r2,
                c2,
                rows: self.nrows,
                cols: self.ncols,
            });
        }
        Ok(DenseMatrix::tabulate(r2 - r1, c2 - c1, |r, c| self[(r1 + r, c1 + c)]))
    }

    /// Transpose: `result[(j, i)] = self[(i, j)]`.
    pub fn transpose(&self) -> Self {
        DenseMatrix::tabulate(self.ncols, self.nrows, |i, j| self[(j, i)])
    }
}

// ── Map ─────────────────────────────────────────────────────────────

impl<T: Copy> DenseMatrix<T> {
    /// Apply a function to every element, producing a new matrix.
    ///
    /// ```
    /// use matrixkit::DenseMatrix;
    /// let m = DenseMatrix::from_rows(&[[1.0_f64, 4.0], [9.0, 16.0]]).unwrap();
    /// let r = m.map(f64::sqrt);
    /// assert_eq!(r[(1, 1)], 4.0);
    /// ```
    pub fn map<U>(&self, f: impl Fn(T) -> U) -> DenseMatrix<U> {
        DenseMatrix {
            data: self.data.iter().map(|&x| f(x)).collect(),
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }

    /// Cellwise combination of `self` with any number of equally-shaped
    /// matrices.
    ///
    /// `f` receives one argument per matrix for each cell, `self` first and
    /// then `others` in order. Fails with `DimensionMismatch` if any of
    /// `others` differs in shape from `self`.
    ///
    /// ```
    /// use matrixkit::DenseMatrix;
    /// let a = DenseMatrix::from_rows(&[[1.0_f64, 2.0]]).unwrap();
    /// let b = DenseMatrix::from_rows(&[[10.0_f64, 20.0]]).unwrap();
    /// let c = a.zip_map(&[&b, &b], |args| args.iter().sum::<f64>()).unwrap();
    /// assert_eq!(c.as_slice(), &[21.0, 42.0]);
    /// ```
    pub fn zip_map<U>(
        &self,
        others: &[&DenseMatrix<T>],
        f: impl Fn(&[T]) -> U,
    ) -> Result<DenseMatrix<U>> {
        for other in others {
            other.require_shape(self.shape())?;
        }
        let mut args = Vec::with_capacity(others.len() + 1);
        let data = (0..self.data.len())
            .map(|k| {
                args.clear();
                args.push(self.data[k]);
                args.extend(others.iter().map(|m| m.data[k]));
                f(&args)
            })
            .collect();
        Ok(DenseMatrix {
            data,
            nrows: self.nrows,
            ncols: self.ncols,
        })
    }
}
