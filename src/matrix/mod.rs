mod arith;

pub use arith::{minus, plus, times, times_elementwise, Operand};

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use crate::dense::DenseMatrix;
use crate::error::Result;
use crate::linalg::{Eigen, IterationLimits};
use crate::regress::RegressionFit;

/// Shared, mutable handle to a dense `f64` matrix.
///
/// Cloning a `Matrix` clones the *handle*: both values refer to the same
/// storage and observe each other's mutations. [`copy`](Self::copy) is the
/// only way to obtain an independent instance. Dimensions never change after
/// construction.
///
/// Mutating methods take `&self`. The handle is neither `Send` nor `Sync`;
/// share it across threads by copying into a [`DenseMatrix`] first.
///
/// # Examples
///
/// ```
/// use matrixkit::Matrix;
///
/// let a = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
/// assert_eq!(a.dimensions(), (2, 3));
/// assert_eq!(a.get(1, 2), Ok(6.0));
///
/// let alias = a.clone();
/// let independent = a.copy();
/// alias.set(0, 0, 10.0).unwrap();
/// assert_eq!(a.get(0, 0), Ok(10.0));
/// assert_eq!(independent.get(0, 0), Ok(1.0));
/// ```
#[derive(Clone)]
pub struct Matrix(Rc<RefCell<DenseMatrix<f64>>>);

impl Matrix {
    fn read(&self) -> Ref<'_, DenseMatrix<f64>> {
        self.0.borrow()
    }

    fn write(&self) -> RefMut<'_, DenseMatrix<f64>> {
        self.0.borrow_mut()
    }

    // ── Construction ────────────────────────────────────────────────

    /// `rows x cols` matrix with every cell equal to `value`.
    ///
    /// Fails with `InvalidDimension` when either extent is zero.
    pub fn make_constant(rows: usize, cols: usize, value: f64) -> Result<Self> {
        DenseMatrix::fill(rows, cols, value).map(Self::from)
    }

    /// `n x n` identity matrix.
    pub fn make_identity(n: usize) -> Result<Self> {
        DenseMatrix::identity(n).map(Self::from)
    }

    /// Build from equal-length rows; `RaggedInput` when lengths differ.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        DenseMatrix::from_rows(rows).map(Self::from)
    }

    /// Build from equal-length columns; `RaggedInput` when lengths differ.
    ///
    /// ```
    /// use matrixkit::Matrix;
    /// let m = Matrix::from_columns(&[vec![1.0, 4.0], vec![2.0, 5.0]]).unwrap();
    /// assert_eq!(m.get_row(1), Ok(vec![4.0, 5.0]));
    /// ```
    pub fn from_columns<C: AsRef<[f64]>>(cols: &[C]) -> Result<Self> {
        DenseMatrix::from_columns(cols).map(Self::from)
    }

    /// Independent deep copy; the only operation that breaks aliasing.
    pub fn copy(&self) -> Self {
        Self::from(self.to_dense())
    }

    /// Snapshot of the current contents as an owned [`DenseMatrix`].
    pub fn to_dense(&self) -> DenseMatrix<f64> {
        self.read().clone()
    }

    /// Whether two handles share the same storage.
    #[inline]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    // ── Shape ───────────────────────────────────────────────────────

    /// `(rows, cols)`.
    pub fn dimensions(&self) -> (usize, usize) {
        self.read().shape()
    }

    pub fn nrows(&self) -> usize {
        self.read().nrows()
    }

    pub fn ncols(&self) -> usize {
        self.read().ncols()
    }

    // ── Element access ──────────────────────────────────────────────

    /// Read cell `(i, j)`.
    pub fn get(&self, i: usize, j: usize) -> Result<f64> {
        self.read().at(i, j)
    }

    /// Write cell `(i, j)`; visible through every alias of this handle.
    pub fn set(&self, i: usize, j: usize, value: f64) -> Result<()> {
        self.write().set(i, j, value)
    }

    /// A new independent matrix equal to this one with cell `(i, j)` set to
    /// `value`. The receiver is left unchanged.
    ///
    /// ```
    /// use matrixkit::Matrix;
    /// let a = Matrix::make_constant(2, 2, 0.0).unwrap();
    /// let b = a.set_and_report(1, 0, 5.0).unwrap();
    /// assert_eq!(b.get(1, 0), Ok(5.0));
    /// assert_eq!(a.get(1, 0), Ok(0.0));
    /// ```
    pub fn set_and_report(&self, i: usize, j: usize, value: f64) -> Result<Self> {
        let mut out = self.to_dense();
        out.set(i, j, value)?;
        Ok(Self::from(out))
    }

    pub fn get_row(&self, i: usize) -> Result<Vec<f64>> {
        self.read().row(i)
    }

    pub fn get_column(&self, j: usize) -> Result<Vec<f64>> {
        self.read().col(j)
    }

    /// Replace row `i`. `values` must have one entry per column.
    pub fn set_row(&self, i: usize, values: &[f64]) -> Result<()> {
        self.write().set_row(i, values)
    }

    /// Replace column `j`. `values` must have one entry per row.
    pub fn set_column(&self, j: usize, values: &[f64]) -> Result<()> {
        self.write().set_col(j, values)
    }

    pub fn swap_rows(&self, a: usize, b: usize) -> Result<()> {
        self.write().swap_rows(a, b)
    }

    pub fn swap_columns(&self, a: usize, b: usize) -> Result<()> {
        self.write().swap_cols(a, b)
    }

    pub fn to_row_list(&self) -> Vec<Vec<f64>> {
        self.read().to_row_list()
    }

    pub fn to_column_list(&self) -> Vec<Vec<f64>> {
        self.read().to_column_list()
    }

    // ── Structural transforms ───────────────────────────────────────

    /// Rows `[r1, r2)` and columns `[c1, c2)` as a new matrix.
    pub fn submatrix(&self, r1: usize, c1: usize, r2: usize, c2: usize) -> Result<Self> {
        self.read().submatrix(r1, c1, r2, c2).map(Self::from)
    }

    pub fn transpose(&self) -> Self {
        Self::from(self.read().transpose())
    }

    /// Cellwise function of this matrix and any number of equally-shaped
    /// matrices.
    ///
    /// `f` receives this matrix's cell first, followed by the corresponding
    /// cell of each of `others` in order. Fails with `DimensionMismatch` if
    /// any shape differs. Passing the receiver itself among `others` is
    /// allowed.
    ///
    /// ```
    /// use matrixkit::Matrix;
    /// let a = Matrix::from_rows(&[[1.0, 2.0]]).unwrap();
    /// let b = Matrix::from_rows(&[[3.0, 4.0]]).unwrap();
    /// let c = a.map(&[&b], |x| x[0] * x[1]).unwrap();
    /// assert_eq!(c.to_row_list(), vec![vec![3.0, 8.0]]);
    /// ```
    pub fn map(&self, others: &[&Matrix], f: impl Fn(&[f64]) -> f64) -> Result<Self> {
        let guards: Vec<Ref<'_, DenseMatrix<f64>>> = others.iter().map(|m| m.read()).collect();
        let refs: Vec<&DenseMatrix<f64>> = guards.iter().map(|g| &**g).collect();
        self.read().zip_map(&refs, f).map(Self::from)
    }

    // ── Analysis ────────────────────────────────────────────────────

    /// Solve `self · X = c`: exact for square input, least squares when
    /// tall, minimum norm when wide.
    ///
    /// ```
    /// use matrixkit::Matrix;
    /// let a = Matrix::from_rows(&[[1.0, 3.0], [7.0, -4.0]]).unwrap();
    /// let c = Matrix::from_rows(&[[10.0], [20.0]]).unwrap();
    /// let x = a.solve(&c).unwrap();
    /// assert!((x.get(0, 0).unwrap() - 4.0).abs() < 1e-9);
    /// assert!((x.get(1, 0).unwrap() - 2.0).abs() < 1e-9);
    /// ```
    pub fn solve(&self, c: &Matrix) -> Result<Self> {
        let c = c.read();
        self.read().solve(&c).map(Self::from)
    }

    pub fn inverse(&self) -> Result<Self> {
        self.read().inverse().map(Self::from)
    }

    /// Determinant; `0.0` for singular input, `NotSquare` for rectangular.
    pub fn det(&self) -> Result<f64> {
        self.read().det()
    }

    pub fn trace(&self) -> Result<f64> {
        self.read().trace()
    }

    /// Number of singular values above `max(m, n) · σ_max · ε`.
    pub fn rank(&self) -> Result<usize> {
        self.read().rank()
    }

    /// 2-norm condition number `σ_max / σ_min`, infinite when singular.
    pub fn cond(&self) -> Result<f64> {
        self.read().cond()
    }

    /// Full eigendecomposition. Prefer this over the three single-purpose
    /// accessors when more than one part is needed.
    pub fn eigen(&self) -> Result<Eigen<f64>> {
        self.read().eigen()
    }

    /// Eigendecomposition with an explicit iteration budget.
    pub fn eigen_with_limits(&self, limits: &IterationLimits) -> Result<Eigen<f64>> {
        Eigen::with_limits(&self.read(), limits)
    }

    /// Real parts of the eigenvalues, in the order documented on [`Eigen`].
    pub fn real_eigenvalues(&self) -> Result<Vec<f64>> {
        self.eigen().map(|e| e.into_parts().0)
    }

    /// Imaginary parts of the eigenvalues, parallel to
    /// [`real_eigenvalues`](Self::real_eigenvalues).
    pub fn imaginary_eigenvalues(&self) -> Result<Vec<f64>> {
        self.eigen().map(|e| e.into_parts().1)
    }

    /// Eigenvector matrix; column `k` pairs with eigenvalue `k`.
    pub fn eigenvectors(&self) -> Result<Self> {
        self.eigen().map(|e| Self::from(e.into_parts().2))
    }

    /// OLS fit of column 0 against columns `1..`; see [`regress`](crate::regress::regress).
    pub fn regress(&self) -> Result<RegressionFit> {
        crate::regress::regress(&self.read())
    }
}

impl From<DenseMatrix<f64>> for Matrix {
    fn from(m: DenseMatrix<f64>) -> Self {
        Self(Rc::new(RefCell::new(m)))
    }
}

/// Value equality: same dimensions and identical cells.
impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other) || *self.read() == *other.read()
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Matrix").field(&*self.read()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatrixError;

    fn m3() -> Matrix {
        Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]).unwrap()
    }

    #[test]
    fn clone_aliases_and_copy_does_not() {
        let a = m3();
        let alias = a.clone();
        let copy = a.copy();
        assert!(Matrix::ptr_eq(&a, &alias));
        assert!(!Matrix::ptr_eq(&a, &copy));

        alias.swap_rows(0, 2).unwrap();
        assert_eq!(a.get_row(0), Ok(vec![7.0, 8.0, 9.0]));
        assert_eq!(copy.get_row(0), Ok(vec![1.0, 2.0, 3.0]));

        copy.set(1, 1, 0.0).unwrap();
        assert_eq!(a.get(1, 1), Ok(5.0));
    }

    #[test]
    fn row_and_column_mutation() {
        let a = m3();
        a.set_row(1, &[0.0, 0.0, 0.0]).unwrap();
        a.set_column(2, &[-1.0, -2.0, -3.0]).unwrap();
        assert_eq!(a.to_row_list()[1], vec![0.0, 0.0, -2.0]);
        assert_eq!(a.get_column(2), Ok(vec![-1.0, -2.0, -3.0]));

        assert!(matches!(
            a.set_row(0, &[1.0, 2.0]),
            Err(MatrixError::DimensionMismatch { .. })
        ));
        assert_eq!(
            a.set_column(3, &[1.0, 2.0, 3.0]),
            Err(MatrixError::IndexOutOfRange { index: 3, extent: 3 })
        );
    }

    #[test]
    fn swap_columns_and_noop() {
        let a = m3();
        a.swap_columns(0, 0).unwrap();
        assert_eq!(a, m3());
        a.swap_columns(0, 2).unwrap();
        assert_eq!(a.get_row(0), Ok(vec![3.0, 2.0, 1.0]));
        assert!(a.swap_columns(0, 5).is_err());
    }

    #[test]
    fn map_accepts_self_as_operand() {
        let a = m3();
        let sq = a.map(&[&a], |x| x[0] * x[1]).unwrap();
        assert_eq!(sq.get(2, 2), Ok(81.0));

        let wide = Matrix::make_constant(3, 4, 1.0).unwrap();
        assert!(matches!(
            a.map(&[&wide], |x| x[0]),
            Err(MatrixError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn solve_against_alias_of_self() {
        let a = Matrix::from_rows(&[[2.0, 0.0], [0.0, 4.0]]).unwrap();
        let x = a.solve(&a.clone()).unwrap();
        assert_eq!(x, Matrix::make_identity(2).unwrap());
    }

    #[test]
    fn value_equality() {
        assert_eq!(m3(), m3());
        assert_ne!(m3(), m3().transpose());
        assert_ne!(m3(), Matrix::make_constant(3, 2, 1.0).unwrap());
    }

    #[test]
    fn eigen_accessors_agree() {
        let a = Matrix::from_rows(&[[0.0, -1.0], [1.0, 0.0]]).unwrap();
        let eig = a.eigen().unwrap();
        assert_eq!(a.real_eigenvalues().unwrap(), eig.real());
        assert_eq!(a.imaginary_eigenvalues().unwrap(), eig.imag());
        assert_eq!(a.eigenvectors().unwrap().to_dense(), *eig.vectors());
        assert!(matches!(
            a.eigen_with_limits(&IterationLimits::new(0)),
            Err(MatrixError::NumericalFailure { .. })
        ));
    }

    #[test]
    fn scalar_analyses() {
        let a = m3();
        assert_eq!(a.trace(), Ok(15.0));
        assert_eq!(a.rank(), Ok(2));
        assert!(a.det().unwrap().abs() < 1e-9);
        assert!(a.cond().unwrap() > 1e12);
        assert_eq!(a.inverse().unwrap_err(), MatrixError::SingularMatrix);
    }
}
