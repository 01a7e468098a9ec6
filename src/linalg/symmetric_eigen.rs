use log::{debug, trace};

use crate::dense::DenseMatrix;
use crate::error::{MatrixError, Result};
use crate::linalg::config::IterationLimits;
use crate::traits::{FloatScalar, MatrixMut, MatrixRef};

/// Orthogonal reduction of a symmetric `a` to tridiagonal `T = Qᵀ A Q`.
///
/// Only the band of `T` is written out: its main diagonal into `diag` and
/// its subdiagonal into `off_diag` (entry `i` couples rows `i` and `i + 1`).
/// `q` is overwritten with the product of reflectors; `a` is read-only and
/// its upper triangle is trusted to mirror the lower one.
pub fn tridiagonalize<T: FloatScalar>(
    a: &impl MatrixRef<T>,
    diag: &mut [T],
    off_diag: &mut [T],
    q: &mut impl MatrixMut<T>,
) {
    let n = a.nrows();
    assert_eq!(n, a.ncols(), "tridiagonalize requires a square matrix");
    assert!(diag.len() >= n);
    assert!(off_diag.len() + 1 >= n);

    let mut w = DenseMatrix::tabulate(n, n, |i, j| *a.get(i, j));

    for i in 0..n {
        for j in 0..n {
            *q.get_mut(i, j) = if i == j { T::one() } else { T::zero() };
        }
    }

    let sub_len = n.saturating_sub(1);
    let mut p = vec![T::zero(); sub_len];
    let mut q_vec = vec![T::zero(); sub_len];
    let mut v = vec![T::zero(); sub_len];

    for k in 0..n.saturating_sub(2) {
        let mut norm_sq = T::zero();
        for i in (k + 1)..n {
            let x = w[(i, k)];
            norm_sq = norm_sq + x * x;
        }

        if norm_sq <= T::min_positive_value() {
            off_diag[k] = w[(k + 1, k)];
            continue;
        }

        let norm = norm_sq.sqrt();
        let wk1k = w[(k + 1, k)];
        let sigma = if wk1k < T::zero() { -norm } else { norm };

        // unnormalized reflector; tau rescales it
        let sub_n = n - k - 1;
        v[0] = wk1k + sigma;
        for i in 1..sub_n {
            v[i] = w[(k + 1 + i, k)];
        }
        let mut v_norm_sq = T::zero();
        for &vi in &v[..sub_n] {
            v_norm_sq = v_norm_sq + vi * vi;
        }
        let tau = T::two() / v_norm_sq;

        // symmetric two-sided update via p and its corrected form
        for i in 0..sub_n {
            let mut dot = T::zero();
            for j in 0..sub_n {
                dot = dot + w[(k + 1 + i, k + 1 + j)] * v[j];
            }
            p[i] = tau * dot;
        }

        let mut vtp = T::zero();
        for i in 0..sub_n {
            vtp = vtp + v[i] * p[i];
        }
        let half = tau / T::two() * vtp;
        for i in 0..sub_n {
            q_vec[i] = p[i] - half * v[i];
        }

        // trailing block loses v qᵀ + q vᵀ
        for i in 0..sub_n {
            for j in 0..sub_n {
                let cell = &mut w[(k + 1 + i, k + 1 + j)];
                *cell = *cell - v[i] * q_vec[j] - q_vec[i] * v[j];
            }
        }

        off_diag[k] = -sigma;

        // fold the reflector into q
        for row in 0..n {
            let mut s = T::zero();
            for j in 0..sub_n {
                s = s + *q.get(row, k + 1 + j) * v[j];
            }
            s = tau * s;
            for j in 0..sub_n {
                let upd = *q.get(row, k + 1 + j) - s * v[j];
                *q.get_mut(row, k + 1 + j) = upd;
            }
        }
    }

    for i in 0..n {
        diag[i] = w[(i, i)];
    }
    if n >= 2 {
        off_diag[n - 2] = w[(n - 1, n - 2)];
    }
}

/// Diagonalize the tridiagonal band in `diag`/`off_diag` by implicitly shifted
/// QR, chasing each bulge with plane rotations that are also applied to the
/// columns of `q`.
///
/// On success `diag` holds the eigenvalues in ascending order with `q`'s
/// columns permuted to match, and `off_diag` is garbage. The sweep count is
/// returned; exceeding `limits` is `NumericalFailure`.
pub fn tridiagonal_qr<T: FloatScalar>(
    diag: &mut [T],
    off_diag: &mut [T],
    q: &mut impl MatrixMut<T>,
    limits: &IterationLimits,
) -> Result<usize> {
    let n = diag.len();
    if n <= 1 {
        return Ok(0);
    }

    let max_iter = limits.budget(n);
    let eps = T::epsilon();
    let two = T::two();
    let mut iter = 0usize;
    let mut hi = n - 1;

    while hi > 0 {
        let mut lo = hi;
        while lo > 0 {
            let threshold = eps * (diag[lo - 1].abs() + diag[lo].abs());
            if off_diag[lo - 1].abs() <= threshold {
                off_diag[lo - 1] = T::zero();
                break;
            }
            lo -= 1;
        }

        if lo == hi {
            trace!("tridiagonal_qr: deflated eigenvalue {hi}");
            hi -= 1;
            continue;
        }

        iter += 1;
        if iter > max_iter {
            debug!("tridiagonal_qr: no convergence after {max_iter} sweeps");
            return Err(MatrixError::NumericalFailure {
                iterations: max_iter,
            });
        }

        // shift toward the eigenvalue of the trailing 2×2 nearest diag[hi]
        let d = (diag[hi - 1] - diag[hi]) / two;
        let e = off_diag[hi - 1];
        let r = (d * d + e * e).sqrt();
        let shift = diag[hi] - e * e / (d + if d >= T::zero() { r } else { -r });

        let mut x = diag[lo] - shift;
        let mut z = off_diag[lo];

        for k in lo..hi {
            // rotate (x, z) onto the first axis
            let (c, s) = givens(x, z);

            if k > lo {
                off_diag[k - 1] = c * x + s * z;
            }

            let d_k = diag[k];
            let d_k1 = diag[k + 1];
            let e_k = off_diag[k];

            diag[k] = c * c * d_k + two * c * s * e_k + s * s * d_k1;
            diag[k + 1] = s * s * d_k - two * c * s * e_k + c * c * d_k1;
            off_diag[k] = c * s * (d_k1 - d_k) + (c * c - s * s) * e_k;

            if k + 1 < hi {
                let e_next = off_diag[k + 1];
                x = off_diag[k];
                z = s * e_next;
                off_diag[k + 1] = c * e_next;
            }

            // same rotation on columns k, k+1 of q
            for i in 0..q.nrows() {
                let qik = *q.get(i, k);
                let qik1 = *q.get(i, k + 1);
                *q.get_mut(i, k) = c * qik + s * qik1;
                *q.get_mut(i, k + 1) = c * qik1 - s * qik;
            }
        }
    }

    sort_eigen_with_vecs(diag, q);

    Ok(iter)
}

/// Cosine and sine that map `(a, b)` to `(r, 0)`, computed without overflow.
#[inline]
pub(crate) fn givens<T: FloatScalar>(a: T, b: T) -> (T, T) {
    if b == T::zero() {
        (T::one(), T::zero())
    } else if b.abs() > a.abs() {
        let t = a / b;
        let s = T::one() / (T::one() + t * t).sqrt();
        (s * t, s)
    } else {
        let t = b / a;
        let c = T::one() / (T::one() + t * t).sqrt();
        (c, c * t)
    }
}

/// Selection sort on `diag`, dragging the columns of `q` along.
fn sort_eigen_with_vecs<T: FloatScalar>(diag: &mut [T], q: &mut impl MatrixMut<T>) {
    let n = diag.len();
    for i in 0..n {
        let mut min_idx = i;
        for j in (i + 1)..n {
            if diag[j] < diag[min_idx] {
                min_idx = j;
            }
        }
        if min_idx != i {
            diag.swap(i, min_idx);
            for row in 0..q.nrows() {
                let tmp = *q.get(row, i);
                *q.get_mut(row, i) = *q.get(row, min_idx);
                *q.get_mut(row, min_idx) = tmp;
            }
        }
    }
}

/// Eigenvalues and orthonormal eigenvectors of a symmetric matrix.
///
/// Runs [`tridiagonalize`] and then [`tridiagonal_qr`]. Values come out in
/// ascending order and column `j` of the vector matrix belongs to value `j`.
/// Symmetry is not checked here; [`Eigen`](crate::linalg::Eigen) does that
/// before choosing this path.
///
/// ```
/// use matrixkit::DenseMatrix;
/// use matrixkit::linalg::SymmetricEigen;
///
/// let a = DenseMatrix::from_rows(&[[2.0_f64, -1.0], [-1.0, 2.0]]).unwrap();
/// let eig = SymmetricEigen::new(&a).unwrap();
/// assert!((eig.eigenvalues()[0] - 1.0).abs() < 1e-10);
/// assert!((eig.eigenvalues()[1] - 3.0).abs() < 1e-10);
///
/// // first column pairs with the smallest value
/// let q = eig.eigenvectors();
/// for i in 0..2 {
///     let av = a[(i, 0)] * q[(0, 0)] + a[(i, 1)] * q[(1, 0)];
///     assert!((av - eig.eigenvalues()[0] * q[(i, 0)]).abs() < 1e-10);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SymmetricEigen<T> {
    eigenvalues: Vec<T>,
    eigenvectors: DenseMatrix<T>,
}

impl<T: FloatScalar> SymmetricEigen<T> {
    /// Decompose a symmetric matrix with default iteration limits.
    pub fn new(a: &DenseMatrix<T>) -> Result<Self> {
        Self::with_limits(a, &IterationLimits::default())
    }

    /// Decompose a symmetric matrix with an explicit iteration budget.
    pub fn with_limits(a: &DenseMatrix<T>, limits: &IterationLimits) -> Result<Self> {
        let n = a.require_square()?;
        let mut diag = vec![T::zero(); n];
        let mut off_diag = vec![T::zero(); n.saturating_sub(1)];
        let mut q = DenseMatrix::zeros(n, n);

        tridiagonalize(a, &mut diag, &mut off_diag, &mut q);
        let sweeps = tridiagonal_qr(&mut diag, &mut off_diag, &mut q, limits)?;
        debug!("symmetric eigen: {n}x{n} converged after {sweeps} QR sweeps");

        Ok(Self {
            eigenvalues: diag,
            eigenvectors: q,
        })
    }

    /// Ascending.
    #[inline]
    pub fn eigenvalues(&self) -> &[T] {
        &self.eigenvalues
    }

    /// Unit eigenvectors stored column-wise, orthogonal to each other.
    #[inline]
    pub fn eigenvectors(&self) -> &DenseMatrix<T> {
        &self.eigenvectors
    }

    pub(crate) fn into_parts(self) -> (Vec<T>, DenseMatrix<T>) {
        (self.eigenvalues, self.eigenvectors)
    }
}

impl<T: FloatScalar> DenseMatrix<T> {
    /// Symmetric eigendecomposition.
    ///
    /// ```
    /// use matrixkit::DenseMatrix;
    ///
    /// let a = DenseMatrix::from_rows(&[[5.0_f64, 2.0], [2.0, 2.0]]).unwrap();
    /// let eig = a.eig_symmetric().unwrap();
    /// assert!((eig.eigenvalues()[0] - 1.0).abs() < 1e-10);
    /// assert!((eig.eigenvalues()[1] - 6.0).abs() < 1e-10);
    /// ```
    pub fn eig_symmetric(&self) -> Result<SymmetricEigen<T>> {
        SymmetricEigen::new(self)
    }
}
