use log::debug;

use crate::dense::DenseMatrix;
use crate::error::Result;
use crate::linalg::config::IterationLimits;
use crate::linalg::schur::SchurDecomposition;
use crate::linalg::symmetric_eigen::SymmetricEigen;
use crate::traits::FloatScalar;

/// Eigendecomposition of a real square matrix.
///
/// Exactly symmetric input takes the tridiagonal path: all imaginary parts
/// are zero, eigenvalues ascend, and the eigenvector columns are
/// orthonormal. Anything else goes through Hessenberg reduction and Francis
/// QR, reporting eigenvalues in real Schur order.
///
/// A complex conjugate pair occupies positions `k, k+1` with
/// `imag[k] > 0` and `imag[k+1] = -imag[k]`. Column `k` of
/// [`vectors`](Self::vectors) holds the real part and column `k+1` the
/// imaginary part of the eigenvector for `real[k] + i·imag[k]`.
///
/// # Example
///
/// ```
/// use matrixkit::DenseMatrix;
/// use matrixkit::linalg::Eigen;
///
/// let a = DenseMatrix::from_rows(&[[0.0_f64, -2.0], [2.0, 0.0]]).unwrap();
/// let eig = Eigen::new(&a).unwrap();
/// assert!(eig.real()[0].abs() < 1e-12);
/// assert!((eig.imag()[0] - 2.0).abs() < 1e-12);
/// assert!((eig.imag()[1] + 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct Eigen<T> {
    real: Vec<T>,
    imag: Vec<T>,
    vectors: DenseMatrix<T>,
    symmetric: bool,
}

impl<T: FloatScalar> Eigen<T> {
    /// Decompose with default iteration limits.
    ///
    /// Fails with `NotSquare` for rectangular input and `NumericalFailure`
    /// when the iteration budget runs out.
    pub fn new(a: &DenseMatrix<T>) -> Result<Self> {
        Self::with_limits(a, &IterationLimits::default())
    }

    /// Decompose with an explicit iteration budget.
    pub fn with_limits(a: &DenseMatrix<T>, limits: &IterationLimits) -> Result<Self> {
        let n = a.require_square()?;
        if a.is_symmetric() {
            debug!("eigen: {n}x{n} symmetric input, tridiagonal path");
            let (real, vectors) = SymmetricEigen::with_limits(a, limits)?.into_parts();
            Ok(Self {
                imag: vec![T::zero(); n],
                real,
                vectors,
                symmetric: true,
            })
        } else {
            debug!("eigen: {n}x{n} general input, Hessenberg/Francis path");
            let schur = SchurDecomposition::with_limits(a, limits)?;
            let (real, imag) = schur.eigenvalues();
            let vectors = schur.eigenvectors();
            Ok(Self {
                real,
                imag,
                vectors,
                symmetric: false,
            })
        }
    }

    /// Real parts of the eigenvalues.
    #[inline]
    pub fn real(&self) -> &[T] {
        &self.real
    }

    /// Imaginary parts of the eigenvalues, parallel to [`real`](Self::real).
    #[inline]
    pub fn imag(&self) -> &[T] {
        &self.imag
    }

    /// Eigenvector matrix; column `k` belongs to eigenvalue `k`.
    #[inline]
    pub fn vectors(&self) -> &DenseMatrix<T> {
        &self.vectors
    }

    /// Whether the symmetric path was taken.
    #[inline]
    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    /// Whether every eigenvalue is real.
    pub fn is_real(&self) -> bool {
        self.imag.iter().all(|&x| x == T::zero())
    }

    /// Consume into `(real, imag, vectors)`.
    pub fn into_parts(self) -> (Vec<T>, Vec<T>, DenseMatrix<T>) {
        (self.real, self.imag, self.vectors)
    }
}

impl<T: FloatScalar> DenseMatrix<T> {
    /// Full eigendecomposition, dispatching on symmetry.
    pub fn eigen(&self) -> Result<Eigen<T>> {
        Eigen::new(self)
    }
}
