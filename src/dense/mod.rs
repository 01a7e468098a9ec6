mod access;
mod ops;
mod square;

use core::ops::{Index, IndexMut};

use crate::error::{MatrixError, Result};
use crate::traits::{MatrixMut, MatrixRef, Scalar};

/// Dense, heap-allocated matrix with dimensions fixed at construction.
///
/// Row-major `Vec<T>` storage: element `(i, j)` lives at `data[i * ncols + j]`.
/// Both dimensions are at least 1 for every matrix built through the checked
/// constructors. Implements [`MatrixRef`] and [`MatrixMut`], so all linalg
/// free functions work with `DenseMatrix` directly.
///
/// `DenseMatrix` has ordinary value semantics (`clone` deep-copies). For the
/// shared-handle type see [`Matrix`](crate::Matrix).
///
/// # Examples
///
/// ```
/// use matrixkit::DenseMatrix;
///
/// let a = DenseMatrix::from_rows(&[[1.0_f64, 2.0], [3.0, 4.0]]).unwrap();
/// assert_eq!(a[(0, 1)], 2.0);
/// assert_eq!(a.nrows(), 2);
///
/// let id = DenseMatrix::<f64>::identity(3).unwrap();
/// assert_eq!(id[(2, 2)], 1.0);
/// assert_eq!(id[(0, 2)], 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawDense<T>", into = "RawDense<T>"),
    serde(bound(serialize = "T: Clone + serde::Serialize", deserialize = "T: serde::Deserialize<'de>"))
)]
pub struct DenseMatrix<T> {
    data: Vec<T>,
    nrows: usize,
    ncols: usize,
}

fn check_dims(nrows: usize, ncols: usize) -> Result<()> {
    if nrows == 0 || ncols == 0 {
        return Err(MatrixError::InvalidDimension {
            rows: nrows,
            cols: ncols,
        });
    }
    Ok(())
}

// ── Constructors ────────────────────────────────────────────────────

impl<T: Scalar> DenseMatrix<T> {
    /// Create an `nrows x ncols` matrix filled with `value`.
    ///
    /// ```
    /// use matrixkit::{DenseMatrix, MatrixError};
    /// let m = DenseMatrix::fill(2, 3, 7.0_f64).unwrap();
    /// assert_eq!(m[(1, 2)], 7.0);
    /// assert!(matches!(
    ///     DenseMatrix::fill(0, 3, 1.0_f64),
    ///     Err(MatrixError::InvalidDimension { .. })
    /// ));
    /// ```
    pub fn fill(nrows: usize, ncols: usize, value: T) -> Result<Self> {
        check_dims(nrows, ncols)?;
        Ok(Self {
            data: vec![value; nrows * ncols],
            nrows,
            ncols,
        })
    }

    /// Create an `n x n` identity matrix.
    pub fn identity(n: usize) -> Result<Self> {
        check_dims(n, n)?;
        Ok(Self::eye(n))
    }

    /// Build a matrix from a sequence of equal-length rows.
    ///
    /// Fails with `InvalidDimension` for no rows or empty rows, and with
    /// `RaggedInput` when row lengths differ.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self> {
        let ncols = rows.first().map_or(0, |r| r.as_ref().len());
        check_dims(rows.len(), ncols)?;
        let mut data = Vec::with_capacity(rows.len() * ncols);
        for (index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != ncols {
                return Err(MatrixError::RaggedInput {
                    index,
                    expected: ncols,
                    got: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            data,
            nrows: rows.len(),
            ncols,
        })
    }

    /// Build a matrix from a sequence of equal-length columns.
    ///
    /// ```
    /// use matrixkit::DenseMatrix;
    /// let m = DenseMatrix::from_columns(&[[1.0_f64, 4.0], [2.0, 5.0], [3.0, 6.0]]).unwrap();
    /// assert_eq!((m.nrows(), m.ncols()), (2, 3));
    /// assert_eq!(m[(1, 2)], 6.0);
    /// ```
    pub fn from_columns<C: AsRef<[T]>>(cols: &[C]) -> Result<Self> {
        let nrows = cols.first().map_or(0, |c| c.as_ref().len());
        check_dims(nrows, cols.len())?;
        for (index, col) in cols.iter().enumerate() {
            let got = col.as_ref().len();
            if got != nrows {
                return Err(MatrixError::RaggedInput {
                    index,
                    expected: nrows,
                    got,
                });
            }
        }
        Ok(Self::tabulate(nrows, cols.len(), |i, j| cols[j].as_ref()[i]))
    }

    /// Create a matrix from an owned `Vec<T>` in row-major order.
    pub fn from_row_major(nrows: usize, ncols: usize, data: Vec<T>) -> Result<Self> {
        check_dims(nrows, ncols)?;
        if data.len() != nrows * ncols {
            return Err(MatrixError::DimensionMismatch {
                expected: (nrows, ncols),
                got: (1, data.len()),
            });
        }
        Ok(Self { data, nrows, ncols })
    }

    /// Unchecked `n x n` identity, used internally where `n` is known positive
    /// or where a 0x0 workspace is acceptable.
    pub(crate) fn eye(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m[(i, i)] = T::one();
        }
        m
    }

    /// Unchecked zero matrix for workspaces.
    pub(crate) fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            data: vec![T::zero(); nrows * ncols],
            nrows,
            ncols,
        }
    }
}

impl<T> DenseMatrix<T> {
    /// Number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// Whether the matrix is square.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// Row-major view of the backing store.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Create a matrix by calling `f(row, col)` for each element.
    ///
    /// Fails with `InvalidDimension` if either extent is zero.
    ///
    /// ```
    /// use matrixkit::DenseMatrix;
    /// let m = DenseMatrix::from_fn(3, 3, |i, j| (i * 3 + j) as f64).unwrap();
    /// assert_eq!(m[(1, 1)], 4.0);
    /// assert_eq!(m[(2, 0)], 6.0);
    /// assert!(DenseMatrix::from_fn(3, 0, |_, _| 0.0).is_err());
    /// ```
    pub fn from_fn(nrows: usize, ncols: usize, f: impl Fn(usize, usize) -> T) -> Result<Self> {
        check_dims(nrows, ncols)?;
        Ok(Self::tabulate(nrows, ncols, f))
    }

    /// Unchecked [`from_fn`](Self::from_fn) for extents derived from an
    /// existing matrix.
    pub(crate) fn tabulate(nrows: usize, ncols: usize, f: impl Fn(usize, usize) -> T) -> Self {
        debug_assert!(nrows > 0 && ncols > 0);
        let mut data = Vec::with_capacity(nrows * ncols);
        for i in 0..nrows {
            for j in 0..ncols {
                data.push(f(i, j));
            }
        }
        Self { data, nrows, ncols }
    }

    pub(crate) fn require_square(&self) -> Result<usize> {
        if !self.is_square() {
            return Err(MatrixError::NotSquare {
                rows: self.nrows,
                cols: self.ncols,
            });
        }
        Ok(self.nrows)
    }

    pub(crate) fn require_shape(&self, expected: (usize, usize)) -> Result<()> {
        if self.shape() != expected {
            return Err(MatrixError::DimensionMismatch {
                expected,
                got: self.shape(),
            });
        }
        Ok(())
    }
}

impl<T: Copy> DenseMatrix<T> {
    /// Rows as nested vectors (inverse of [`from_rows`](Self::from_rows)).
    pub fn to_row_list(&self) -> Vec<Vec<T>> {
        self.data.chunks(self.ncols).map(<[T]>::to_vec).collect()
    }

    /// Columns as nested vectors (inverse of [`from_columns`](Self::from_columns)).
    pub fn to_column_list(&self) -> Vec<Vec<T>> {
        (0..self.ncols)
            .map(|j| (0..self.nrows).map(|i| self[(i, j)]).collect())
            .collect()
    }
}

// ── MatrixRef / MatrixMut ───────────────────────────────────────────

impl<T> MatrixRef<T> for DenseMatrix<T> {
    #[inline]
    fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.ncols
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> &T {
        &self.data[row * self.ncols + col]
    }
}

impl<T> MatrixMut<T> for DenseMatrix<T> {
    #[inline]
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        &mut self.data[row * self.ncols + col]
    }
}

// ── Index ───────────────────────────────────────────────────────────

impl<T> Index<(usize, usize)> for DenseMatrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        debug_assert!(row < self.nrows && col < self.ncols);
        &self.data[row * self.ncols + col]
    }
}

impl<T> IndexMut<(usize, usize)> for DenseMatrix<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        debug_assert!(row < self.nrows && col < self.ncols);
        &mut self.data[row * self.ncols + col]
    }
}

// ── Serde ───────────────────────────────────────────────────────────

/// Wire form used by the `serde` feature; validated on the way in.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RawDense<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

#[cfg(feature = "serde")]
impl<T> From<DenseMatrix<T>> for RawDense<T> {
    fn from(m: DenseMatrix<T>) -> Self {
        Self {
            rows: m.nrows,
            cols: m.ncols,
            data: m.data,
        }
    }
}

#[cfg(feature = "serde")]
impl<T> TryFrom<RawDense<T>> for DenseMatrix<T> {
    type Error = MatrixError;

    fn try_from(raw: RawDense<T>) -> Result<Self> {
        check_dims(raw.rows, raw.cols)?;
        if raw.data.len() != raw.rows * raw.cols {
            return Err(MatrixError::DimensionMismatch {
                expected: (raw.rows, raw.cols),
                got: (1, raw.data.len()),
            });
        }
        Ok(Self {
            data: raw.data,
            nrows: raw.rows,
            ncols: raw.cols,
        })
    }
}
