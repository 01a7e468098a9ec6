use crate::traits::{FloatScalar, MatrixMut};

/// In-place orthogonal similarity `A = Q H Qᵀ` with `H` zero below the first
/// subdiagonal.
///
/// `a` ends up holding `H`; `q` is overwritten with the accumulated
/// reflectors. Columns whose subdiagonal tail is already negligible are
/// skipped.
pub fn hessenberg<T: FloatScalar>(a: &mut impl MatrixMut<T>, q: &mut impl MatrixMut<T>) {
    let n = a.nrows();
    assert_eq!(n, a.ncols(), "hessenberg requires a square matrix");
    assert_eq!(q.nrows(), n);
    assert_eq!(q.ncols(), n);

    for i in 0..n {
        for j in 0..n {
            *q.get_mut(i, j) = if i == j { T::one() } else { T::zero() };
        }
    }

    let tiny = T::min_positive_value();

    for k in 0..n.saturating_sub(2) {
        // reflector annihilating column k below the subdiagonal
        let mut norm_sq = T::zero();
        for i in (k + 1)..n {
            let v = *a.get(i, k);
            norm_sq = norm_sq + v * v;
        }

        if norm_sq <= tiny {
            continue;
        }

        let norm = norm_sq.sqrt();
        let ak1k = *a.get(k + 1, k);
        let sigma = if ak1k < T::zero() { -norm } else { norm };
        let v0 = ak1k + sigma;

        // tail of v parked in the zeroed part of column k; leading 1 implied
        for i in (k + 2)..n {
            let val = *a.get(i, k) / v0;
            *a.get_mut(i, k) = val;
        }

        let tau = v0 / sigma;

        // apply from the left to the trailing rows (column k is fixed up last)
        for j in (k + 1)..n {
            let mut dot = *a.get(k + 1, j);
            for i in (k + 2)..n {
                dot = dot + *a.get(i, k) * *a.get(i, j);
            }
            dot = dot * tau;

            *a.get_mut(k + 1, j) = *a.get(k + 1, j) - dot;
            for i in (k + 2)..n {
                let upd = *a.get(i, j) - dot * *a.get(i, k);
                *a.get_mut(i, j) = upd;
            }
        }

        // then from the right to every row
        for i in 0..n {
            let mut dot = *a.get(i, k + 1);
            for jj in (k + 2)..n {
                dot = dot + *a.get(i, jj) * *a.get(jj, k);
            }
            dot = dot * tau;

            *a.get_mut(i, k + 1) = *a.get(i, k + 1) - dot;
            for jj in (k + 2)..n {
                let vj = *a.get(jj, k);
                *a.get_mut(i, jj) = *a.get(i, jj) - dot * vj;
            }
        }

        // accumulate into q
        for i in 0..n {
            let mut dot = *q.get(i, k + 1);
            for jj in (k + 2)..n {
                dot = dot + *q.get(i, jj) * *a.get(jj, k);
            }
            dot = dot * tau;

            *q.get_mut(i, k + 1) = *q.get(i, k + 1) - dot;
            for jj in (k + 2)..n {
                let vj = *a.get(jj, k);
                *q.get_mut(i, jj) = *q.get(i, jj) - dot * vj;
            }
        }

        *a.get_mut(k + 1, k) = -sigma;
        for i in (k + 2)..n {
            *a.get_mut(i, k) = T::zero();
        }
    }
}
