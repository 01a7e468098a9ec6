use log::{debug, trace};
use num_complex::Complex;

use crate::dense::DenseMatrix;
use crate::error::{MatrixError, Result};
use crate::linalg::config::IterationLimits;
use crate::linalg::hessenberg::hessenberg;
use crate::traits::{FloatScalar, MatrixMut, MatrixRef};

/// By-value read.
#[inline]
fn g<T: Copy>(m: &impl MatrixRef<T>, i: usize, j: usize) -> T {
    *m.get(i, j)
}

/// Bring an upper Hessenberg `h` to real Schur form with implicit
/// double-shift sweeps, applying every reflector to `q` as well.
///
/// Real eigenvalues appear as 1×1 diagonal blocks; 2×2 blocks hold either
/// a complex conjugate pair or two real eigenvalues that were deflated
/// together (see [`standardize_blocks`]).
///
/// Returns the number of QR sweeps performed, or `NumericalFailure` once
/// `limits.budget(n)` sweeps have been spent without full deflation.
pub fn francis_qr<T: FloatScalar>(
    h: &mut impl MatrixMut<T>,
    q: &mut impl MatrixMut<T>,
    limits: &IterationLimits,
) -> Result<usize> {
    let n = h.nrows();
    if n <= 1 {
        return Ok(0);
    }

    let max_iter = limits.budget(n);
    let eps = T::epsilon();
    let mut iter = 0usize;
    let mut p = n; // rows and columns at or past p are converged

    while p > 2 {
        // split off the last row when its subdiagonal is negligible
        let tol = eps * (g(h, p - 2, p - 2).abs() + g(h, p - 1, p - 1).abs());
        if g(h, p - 1, p - 2).abs() <= tol {
            trace!("francis_qr: deflated 1x1 block at {}", p - 1);
            *h.get_mut(p - 1, p - 2) = T::zero();
            p -= 1;
            continue;
        }

        // 2×2 block at the bottom
        let tol2 = eps * (g(h, p - 3, p - 3).abs() + g(h, p - 2, p - 2).abs());
        if g(h, p - 2, p - 3).abs() <= tol2 {
            trace!("francis_qr: deflated 2x2 block at {}", p - 2);
            *h.get_mut(p - 2, p - 3) = T::zero();
            p -= 2;
            continue;
        }

        iter += 1;
        if iter > max_iter {
            debug!("francis_qr: no convergence after {max_iter} sweeps");
            return Err(MatrixError::NumericalFailure {
                iterations: max_iter,
            });
        }

        // top of the unreduced block ending at p - 1
        let mut q_start = p - 1;
        while q_start > 0 {
            let tol_q = eps * (g(h, q_start - 1, q_start - 1).abs() + g(h, q_start, q_start).abs());
            if g(h, q_start, q_start - 1).abs() <= tol_q {
                *h.get_mut(q_start, q_start - 1) = T::zero();
                break;
            }
            q_start -= 1;
        }

        let (s, t) = if limits.is_exceptional(iter) {
            trace!("francis_qr: exceptional shift at sweep {iter}");
            let w = g(h, p - 1, p - 2).abs() + g(h, p - 2, p - 3).abs();
            (w + w, w * w)
        } else {
            // shifts are the eigenvalues of the trailing 2×2 block
            let a11 = g(h, p - 2, p - 2);
            let a12 = g(h, p - 2, p - 1);
            let a21 = g(h, p - 1, p - 2);
            let a22 = g(h, p - 1, p - 1);
            (a11 + a22, a11 * a22 - a12 * a21)
        };

        // Implicit double shift: first column of (H² - s·H + t·I)
        let h00 = g(h, q_start, q_start);
        let h10 = g(h, q_start + 1, q_start);
        let h01 = g(h, q_start, q_start + 1);
        let h11 = g(h, q_start + 1, q_start + 1);

        let mut x = h00 * h00 + h01 * h10 - s * h00 + t;
        let mut y = h10 * (h00 + h11 - s);
        let mut z = if q_start + 2 < p {
            h10 * g(h, q_start + 2, q_start + 1)
        } else {
            T::zero()
        };

        // push the 3×3 bulge down and off the block
        for k in q_start..(p - 1) {
            let use3 = k + 2 < p;
            let (v1, v2, tau) = if use3 {
                householder3(x, y, z)
            } else {
                let (v1h, tau_h) = householder2(x, y);
                (v1h, T::zero(), tau_h)
            };

            let col_start = if k > q_start { k - 1 } else { k };

            // rows
            for j in col_start..n {
                let mut dot = g(h, k, j) + v1 * g(h, k + 1, j);
                if use3 {
                    dot = dot + v2 * g(h, k + 2, j);
                }
                dot = tau * dot;
                *h.get_mut(k, j) = g(h, k, j) - dot;
                *h.get_mut(k + 1, j) = g(h, k + 1, j) - dot * v1;
                if use3 {
                    *h.get_mut(k + 2, j) = g(h, k + 2, j) - dot * v2;
                }
            }

            // columns
            let row_end = if use3 { (k + 4).min(p) } else { p };
            for i in 0..row_end {
                let mut dot = g(h, i, k) + v1 * g(h, i, k + 1);
                if use3 {
                    dot = dot + v2 * g(h, i, k + 2);
                }
                dot = tau * dot;
                *h.get_mut(i, k) = g(h, i, k) - dot;
                *h.get_mut(i, k + 1) = g(h, i, k + 1) - dot * v1;
                if use3 {
                    *h.get_mut(i, k + 2) = g(h, i, k + 2) - dot * v2;
                }
            }

            // q
            for i in 0..n {
                let mut dot = g(q, i, k) + v1 * g(q, i, k + 1);
                if use3 {
                    dot = dot + v2 * g(q, i, k + 2);
                }
                dot = tau * dot;
                *q.get_mut(i, k) = g(q, i, k) - dot;
                *q.get_mut(i, k + 1) = g(q, i, k + 1) - dot * v1;
                if use3 {
                    *q.get_mut(i, k + 2) = g(q, i, k + 2) - dot * v2;
                }
            }

            // Next bulge from the fill-in entries of column k
            if k + 2 < p - 1 {
                x = g(h, k + 1, k);
                y = g(h, k + 2, k);
                z = g(h, k + 3, k);
            } else if k + 1 < p - 1 {
                x = g(h, k + 1, k);
                y = g(h, k + 2, k);
                z = T::zero();
            }
        }

        // drop roundoff below the first subdiagonal
        for i in 0..n {
            for j in 0..i.saturating_sub(1) {
                if g(h, i, j).abs() < eps * (g(h, i, i).abs() + g(h, j, j).abs()) {
                    *h.get_mut(i, j) = T::zero();
                }
            }
        }
    }

    if p == 2 {
        let tol = eps * (g(h, 0, 0).abs() + g(h, 1, 1).abs());
        if g(h, 1, 0).abs() <= tol {
            *h.get_mut(1, 0) = T::zero();
        }
    }

    Ok(iter)
}

/// 3-element Householder with implicit leading 1: returns (v1, v2, tau).
#[inline]
fn householder3<T: FloatScalar>(x: T, y: T, z: T) -> (T, T, T) {
    let norm = (x * x + y * y + z * z).sqrt();
    if norm <= T::epsilon() {
        return (T::zero(), T::zero(), T::zero());
    }
    let sign = if x >= T::zero() { T::one() } else { -T::one() };
    let u0 = x + sign * norm;
    let v1 = y / u0;
    let v2 = z / u0;
    let tau = T::two() / (T::one() + v1 * v1 + v2 * v2);
    (v1, v2, tau)
}

/// 2-element Householder with implicit leading 1: returns (v1, tau).
#[inline]
fn householder2<T: FloatScalar>(x: T, y: T) -> (T, T) {
    let norm = (x * x + y * y).sqrt();
    if norm <= T::epsilon() {
        return (T::zero(), T::zero());
    }
    let sign = if x >= T::zero() { T::one() } else { -T::one() };
    let u0 = x + sign * norm;
    let v1 = y / u0;
    let tau = T::two() / (T::one() + v1 * v1);
    (v1, tau)
}

/// `((a - d) / 2)² + b·c` for the block `[[a, b], [c, d]]`: negative iff the
/// block's eigenvalues are a complex pair.
#[inline]
fn block_discriminant<T: FloatScalar>(a: T, b: T, c: T, d: T) -> T {
    let p = (a - d) / T::two();
    p * p + b * c
}

/// Split every 2×2 diagonal block of `s` that has real eigenvalues into two
/// 1×1 blocks with a Givens similarity, updating `q` to match.
///
/// Afterwards a nonzero `s[(i + 1, i)]` marks a complex conjugate pair.
pub fn standardize_blocks<T: FloatScalar>(s: &mut impl MatrixMut<T>, q: &mut impl MatrixMut<T>) {
    let n = s.nrows();
    let mut i = 0;
    while i + 1 < n {
        if g(s, i + 1, i) == T::zero() {
            i += 1;
            continue;
        }
        let (a, b, c, d) = (g(s, i, i), g(s, i, i + 1), g(s, i + 1, i), g(s, i + 1, i + 1));
        let disc = block_discriminant(a, b, c, d);
        if disc < T::zero() {
            i += 2;
            continue;
        }

        // Larger-magnitude root avoids cancellation
        let half_tr = (a + d) / T::two();
        let root = disc.sqrt();
        let lambda = if half_tr >= T::zero() { half_tr + root } else { half_tr - root };

        // Eigenvector of the block for lambda, whichever form is better scaled
        let (v1, v2) = {
            let (p0, p1) = (b, lambda - a);
            let (r0, r1) = (lambda - d, c);
            if p0 * p0 + p1 * p1 >= r0 * r0 + r1 * r1 {
                (p0, p1)
            } else {
                (r0, r1)
            }
        };
        let nrm = (v1 * v1 + v2 * v2).sqrt();
        let (cs, sn) = (v1 / nrm, v2 / nrm);
        trace!("standardize_blocks: split real 2x2 block at {i}");

        // S ← Gᵀ S on rows i, i+1
        for j in 0..n {
            let (x, y) = (g(s, i, j), g(s, i + 1, j));
            *s.get_mut(i, j) = cs * x + sn * y;
            *s.get_mut(i + 1, j) = cs * y - sn * x;
        }
        // S ← S G and Q ← Q G on columns i, i+1
        for r in 0..n {
            let (x, y) = (g(s, r, i), g(s, r, i + 1));
            *s.get_mut(r, i) = cs * x + sn * y;
            *s.get_mut(r, i + 1) = cs * y - sn * x;
            let (x, y) = (g(q, r, i), g(q, r, i + 1));
            *q.get_mut(r, i) = cs * x + sn * y;
            *q.get_mut(r, i + 1) = cs * y - sn * x;
        }
        *s.get_mut(i + 1, i) = T::zero();
        i += 2;
    }
}

/// Real Schur decomposition of a square matrix.
///
/// `A = Q S Qᵀ` with `Q` orthogonal and `S` block upper triangular. The diagonal of S consists of 1×1 blocks (real
/// eigenvalues) and 2×2 blocks, each holding one complex conjugate pair.
///
/// # Example
///
/// ```
/// use matrixkit::DenseMatrix;
/// use matrixkit::linalg::SchurDecomposition;
///
/// let a = DenseMatrix::from_rows(&[[0.0_f64, -1.0], [1.0, 0.0]]).unwrap();
/// let schur = SchurDecomposition::new(&a).unwrap();
/// let (re, im) = schur.eigenvalues();
///
/// // 90° rotation: eigenvalues ±i, positive imaginary part first
/// assert!(re[0].abs() < 1e-12);
/// assert!((im[0] - 1.0).abs() < 1e-12);
/// assert!((im[1] + 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct SchurDecomposition<T> {
    s: DenseMatrix<T>,
    q: DenseMatrix<T>,
}

impl<T: FloatScalar> SchurDecomposition<T> {
    /// Compute the real Schur decomposition with default iteration limits.
    pub fn new(a: &DenseMatrix<T>) -> Result<Self> {
        Self::with_limits(a, &IterationLimits::default())
    }

    /// Compute the real Schur decomposition with an explicit iteration budget.
    pub fn with_limits(a: &DenseMatrix<T>, limits: &IterationLimits) -> Result<Self> {
        let n = a.require_square()?;
        let mut s = a.clone();
        let mut q = DenseMatrix::zeros(n, n);

        hessenberg(&mut s, &mut q);
        let sweeps = francis_qr(&mut s, &mut q, limits)?;
        debug!("schur: {n}x{n} converged after {sweeps} Francis sweeps");

        // Entries below the subdiagonal carry only rounding noise
        for i in 2..n {
            for j in 0..i - 1 {
                s[(i, j)] = T::zero();
            }
        }
        standardize_blocks(&mut s, &mut q);

        Ok(Self { s, q })
    }

    /// `S`.
    #[inline]
    pub fn schur_form(&self) -> &DenseMatrix<T> {
        &self.s
    }

    /// `Q`; its columns span nested invariant subspaces of `A`.
    #[inline]
    pub fn schur_vectors(&self) -> &DenseMatrix<T> {
        &self.q
    }

    /// Extract eigenvalues as (real_parts, imaginary_parts), in Schur order.
    ///
    /// Each 2×2 block yields a conjugate pair with the positive imaginary
    /// part first.
    pub fn eigenvalues(&self) -> (Vec<T>, Vec<T>) {
        let n = self.s.nrows();
        let mut re = vec![T::zero(); n];
        let mut im = vec![T::zero(); n];

        let mut i = 0;
        while i < n {
            if i + 1 < n && self.s[(i + 1, i)] != T::zero() {
                let (a, b, c, d) = self.block(i);
                let disc = block_discriminant(a, b, c, d);
                let mid = (a + d) / T::two();
                let sq = (-disc).max(T::zero()).sqrt();
                re[i] = mid;
                re[i + 1] = mid;
                im[i] = sq;
                im[i + 1] = -sq;
                i += 2;
            } else {
                re[i] = self.s[(i, i)];
                i += 1;
            }
        }

        (re, im)
    }

    /// Eigenvectors, packed into a real matrix.
    ///
    /// For a real eigenvalue at position `k`, column `k` is a unit-norm
    /// eigenvector. For a conjugate pair at `(k, k+1)`, columns `k` and
    /// `k+1` hold the real and imaginary parts of the eigenvector belonging
    /// to `re[k] + i·im[k]`, scaled so that `‖Re‖² + ‖Im‖² = 1`. The partner
    /// eigenvector is its conjugate.
    pub fn eigenvectors(&self) -> DenseMatrix<T> {
        let n = self.s.nrows();
        let (re, im) = self.eigenvalues();
        let mut out = DenseMatrix::zeros(n, n);

        let norm = self.s.max_abs();
        let small = (T::epsilon() * norm).max(T::min_positive_value());

        let mut k = 0;
        while k < n {
            let pair = im[k] != T::zero();
            let lambda = Complex::new(re[k], im[k]);
            let y = self.back_substitute(k, pair, lambda, small);

            // x = Q y
            let mut x = vec![Complex::new(T::zero(), T::zero()); n];
            for (r, xr) in x.iter_mut().enumerate() {
                let mut acc = Complex::new(T::zero(), T::zero());
                for (j, yj) in y.iter().enumerate() {
                    acc = acc + *yj * self.q[(r, j)];
                }
                *xr = acc;
            }

            let mut total = T::zero();
            for v in &x {
                total = total + v.norm_sqr();
            }
            let scale = if total > T::zero() { T::one() / total.sqrt() } else { T::one() };

            for (r, v) in x.iter().enumerate() {
                out[(r, k)] = v.re * scale;
                if pair {
                    out[(r, k + 1)] = v.im * scale;
                }
            }
            k += if pair { 2 } else { 1 };
        }

        out
    }

    #[inline]
    fn block(&self, i: usize) -> (T, T, T, T) {
        (
            self.s[(i, i)],
            self.s[(i, i + 1)],
            self.s[(i + 1, i)],
            self.s[(i + 1, i + 1)],
        )
    }

    /// Solve `(S - λI) y = 0` for the eigenvector of S whose eigenvalue sits
    /// at position `k` (a pair occupies `k` and `k+1`).
    fn back_substitute(&self, k: usize, pair: bool, lambda: Complex<T>, small: T) -> Vec<Complex<T>> {
        let n = self.s.nrows();
        let zero = Complex::new(T::zero(), T::zero());
        let one = Complex::new(T::one(), T::zero());
        let guard = |d: Complex<T>| {
            if d.norm_sqr() == T::zero() {
                Complex::new(small, T::zero())
            } else {
                d
            }
        };

        let mut y = vec![zero; n];
        let top = if pair {
            // Row k of the block: (a - λ) y_k + b y_{k+1} = 0
            let (a, b, _, _) = self.block(k);
            y[k + 1] = one;
            y[k] = -Complex::new(b, T::zero()) / guard(Complex::new(a, T::zero()) - lambda);
            k + 1
        } else {
            y[k] = one;
            k
        };

        // r_p = Σ_{j > row, j ≤ top} S[p, j] y_j
        let residual = |p: usize, from: usize, y: &[Complex<T>]| {
            let mut acc = zero;
            for j in from..=top {
                acc = acc + y[j] * self.s[(p, j)];
            }
            acc
        };

        let mut i = k;
        while i > 0 {
            let row = i - 1;
            if row > 0 && self.s[(row, row - 1)] != T::zero() {
                // 2×2 block on rows row-1, row
                let p = row - 1;
                let r0 = residual(p, row + 1, &y);
                let r1 = residual(row, row + 1, &y);
                let m00 = Complex::new(self.s[(p, p)], T::zero()) - lambda;
                let m01 = self.s[(p, row)];
                let m10 = self.s[(row, p)];
                let m11 = Complex::new(self.s[(row, row)], T::zero()) - lambda;
                let det = guard(m00 * m11 - Complex::new(m01 * m10, T::zero()));
                y[p] = (-r0 * m11 + r1 * m01) / det;
                y[row] = (-r1 * m00 + r0 * m10) / det;
                i -= 2;
            } else {
                let r = residual(row, row + 1, &y);
                let d = guard(Complex::new(self.s[(row, row)], T::zero()) - lambda);
                y[row] = -r / d;
                i -= 1;
            }
        }

        y
    }
}

/// Convenience methods for Schur decomposition.
impl<T: FloatScalar> DenseMatrix<T> {
    /// Real Schur decomposition: `A = Q S Qᵀ`.
    pub fn schur(&self) -> Result<SchurDecomposition<T>> {
        SchurDecomposition::new(self)
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

    fn verify_schur(a: &DenseMatrix<f64>, schur: &SchurDecomposition<f64>) {
        let n = a.nrows();
        let s = schur.schur_form();
        let q = schur.schur_vectors();

        let qtaq = q.transpose().matmul(a).unwrap().matmul(q).unwrap();
        for i in 0..n {
            for j in 0..n {
                assert_near(qtaq[(i, j)], s[(i, j)], TOL, &format!("Q^TAQ[({},{})]", i, j));
            }
        }

        let qtq = q.transpose().matmul(q).unwrap();
        for i in 0..n {
            for j in 0..n {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_near(qtq[(i, j)], expected, TOL, &format!("QtQ[({},{})]", i, j));
            }
        }

        for i in 2..n {
            for j in 0..i - 1 {
                assert_eq!(s[(i, j)], 0.0, "S[({},{})] should be 0", i, j);
            }
        }
    }

    /// ‖A v − λ v‖ for every (possibly complex) eigenpair.
    fn verify_eigenpairs(a: &DenseMatrix<f64>, schur: &SchurDecomposition<f64>) {
        let n = a.nrows();
        let (re, im) = schur.eigenvalues();
        let v = schur.eigenvectors();
        let mut k = 0;
        while k < n {
            if im[k] == 0.0 {
                for i in 0..n {
                    let mut av = 0.0;
                    for j in 0..n {
                        av += a[(i, j)] * v[(j, k)];
                    }
                    assert_near(av, re[k] * v[(i, k)], 1e-9, &format!("(Av)[{}] for λ{}", i, k));
                }
                k += 1;
            } else {
                for i in 0..n {
                    let (mut avr, mut avi) = (0.0, 0.0);
                    for j in 0..n {
                        avr += a[(i, j)] * v[(j, k)];
                        avi += a[(i, j)] * v[(j, k + 1)];
                    }
                    let lvr = re[k] * v[(i, k)] - im[k] * v[(i, k + 1)];
                    let lvi = re[k] * v[(i, k + 1)] + im[k] * v[(i, k)];
                    assert_near(avr, lvr, 1e-9, &format!("Re(Av)[{}]", i));
                    assert_near(avi, lvi, 1e-9, &format!("Im(Av)[{}]", i));
                }
                k += 2;
            }
        }
    }

    #[test]
    fn schur_all_real_eigenvalues() {
        let a = rows(&[[1.0, 2.0, 3.0], [0.0, 4.0, 5.0], [0.0, 0.0, 6.0]]);
        let schur = a.schur().unwrap();
        verify_schur(&a, &schur);

        let (mut re, im) = schur.eigenvalues();
        re.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_near(re[0], 1.0, TOL, "λ[0]");
        assert_near(re[1], 4.0, TOL, "λ[1]");
        assert_near(re[2], 6.0, TOL, "λ[2]");
        assert!(im.iter().all(|&x| x == 0.0));
        verify_eigenpairs(&a, &schur);
    }

    #[test]
    fn schur_general_3x3() {
        let a = rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 0.0]]);
        let schur = a.schur().unwrap();
        verify_schur(&a, &schur);

        let (re, _) = schur.eigenvalues();
        assert_near(re.iter().sum(), 6.0, TOL, "trace");
        verify_eigenpairs(&a, &schur);
    }

    #[test]
    fn real_2x2_block_is_split() {
        // Non-symmetric 2x2 with real eigenvalues (5 ± √33) / 2
        let a = rows(&[[1.0, 2.0], [3.0, 4.0]]);
        let schur = a.schur().unwrap();
        verify_schur(&a, &schur);
        assert_eq!(schur.schur_form()[(1, 0)], 0.0);

        let (mut re, im) = schur.eigenvalues();
        re.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_near(re[0], (5.0 - 33.0_f64.sqrt()) / 2.0, TOL, "λ[0]");
        assert_near(re[1], (5.0 + 33.0_f64.sqrt()) / 2.0, TOL, "λ[1]");
        assert_eq!(im, vec![0.0, 0.0]);
        verify_eigenpairs(&a, &schur);
    }

    #[test]
    fn schur_complex_conjugate_pair() {
        let theta = core::f64::consts::FRAC_PI_4;
        let (c, s) = (theta.cos(), theta.sin());
        let a = rows(&[[c, -s], [s, c]]);
        let schur = a.schur().unwrap();

        let (re, im) = schur.eigenvalues();
        assert_near(re[0], c, TOL, "re[0]");
        assert_near(re[1], c, TOL, "re[1]");
        assert_near(im[0], s, TOL, "im[0]");
        assert_near(im[1], -s, TOL, "im[1]");
        verify_eigenpairs(&a, &schur);
    }

    #[test]
    fn complex_eigenvector_normalized() {
        let a = rows(&[[0.0, -1.0], [1.0, 0.0]]);
        let v = a.schur().unwrap().eigenvectors();
        let total: f64 = v.as_slice().iter().map(|x| x * x).sum();
        assert_near(total, 1.0, TOL, "‖Re‖² + ‖Im‖²");
    }

    #[test]
    fn general_4x4() {
        let b = rows(&[
            [4.0, 1.0, -2.0, -5.0],
            [1.0, 2.0, 0.0, 1.0],
            [-2.0, 0.0, 3.0, -2.0],
            [2.0, 1.0, -2.0, -1.0],
        ]);
        let schur = b.schur().unwrap();
        verify_schur(&b, &schur);
        let (re, _) = schur.eigenvalues();
        assert_near(re.iter().sum(), b.trace().unwrap(), 1e-9, "trace");
        verify_eigenpairs(&b, &schur);
    }

    #[test]
    fn schur_companion_matrix() {
        // p(x) = x^3 - 6x^2 + 11x - 6 = (x-1)(x-2)(x-3)
        let a = rows(&[[0.0, 0.0, 6.0], [1.0, 0.0, -11.0], [0.0, 1.0, 6.0]]);
        let schur = a.schur().unwrap();
        let (mut re, im) = schur.eigenvalues();
        re.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_near(re[0], 1.0, 1e-9, "root 1");
        assert_near(re[1], 2.0, 1e-9, "root 2");
        assert_near(re[2], 3.0, 1e-9, "root 3");
        assert!(im.iter().all(|&x| x == 0.0));
        verify_eigenpairs(&a, &schur);
    }

    #[test]
    fn zero_iteration_budget_fails() {
        let a = rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 0.0]]);
        let limits = IterationLimits::new(0);
        assert_eq!(
            SchurDecomposition::with_limits(&a, &limits).unwrap_err(),
            MatrixError::NumericalFailure { iterations: 0 }
        );
    }

    #[test]
    fn schur_1x1() {
        let a = rows(&[[42.0]]);
        let schur = a.schur().unwrap();
        let (re, im) = schur.eigenvalues();
        assert_eq!(re, vec![42.0]);
        assert_eq!(im, vec![0.0]);
        assert_eq!(schur.eigenvectors()[(0, 0)], 1.0);
    }

    #[test]
    fn zero_matrix_vectors_are_finite() {
        let a = DenseMatrix::fill(3, 3, 0.0_f64).unwrap();
        let v = a.schur().unwrap().eigenvectors();
        assert!(v.as_slice().iter().all(|x| x.is_finite()));
    }

    #[test]
    fn not_square() {
        let a = DenseMatrix::fill(2, 3, 1.0).unwrap();
        assert!(matches!(a.schur(), Err(MatrixError::NotSquare { .. })));
    }

    #[test]
    fn f32_support() {
        let a = DenseMatrix::from_rows(&[[1.0_f32, 2.0], [3.0, 4.0]]).unwrap();
        let (re, im) = a.schur().unwrap().eigenvalues();
        assert!((re[0] + re[1] - 5.0).abs() < 1e-5);
        assert!(im.iter().all(|x| x.abs() < 1e-5));
    }
}
