use matrixkit::{plus, times, DenseMatrix, Matrix};
use proptest::prelude::*;

/// Arbitrary `rows x cols` matrix with entries in `[-5, 5)`.
fn arb_matrix(rows: usize, cols: usize) -> impl Strategy<Value = Matrix> {
    prop::collection::vec(-5.0..5.0_f64, rows * cols).prop_map(move |data| {
        Matrix::from(DenseMatrix::from_row_major(rows, cols, data).unwrap())
    })
}

fn arb_rectangular() -> impl Strategy<Value = Matrix> {
    (1usize..=5, 1usize..=5).prop_flat_map(|(r, c)| arb_matrix(r, c))
}

fn arb_square() -> impl Strategy<Value = Matrix> {
    (1usize..=5).prop_flat_map(|n| arb_matrix(n, n))
}

/// Strictly diagonally dominant, hence comfortably non-singular.
fn arb_well_conditioned() -> impl Strategy<Value = Matrix> {
    arb_square().prop_map(|m| {
        let n = m.nrows();
        for i in 0..n {
            let row_sum: f64 = m.get_row(i).unwrap().iter().map(|x| x.abs()).sum();
            let d = m.get(i, i).unwrap();
            m.set(i, i, d.signum() * (row_sum + 1.0)).unwrap();
        }
        m
    })
}

fn max_abs_diff(a: &Matrix, b: &Matrix) -> f64 {
    a.to_row_list()
        .iter()
        .flatten()
        .zip(b.to_row_list().iter().flatten())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

proptest! {
    #[test]
    fn transpose_is_an_involution(a in arb_rectangular()) {
        prop_assert_eq!(a.transpose().transpose(), a);
    }

    #[test]
    fn plus_commutes(
        (a, b) in (1usize..=5, 1usize..=5)
            .prop_flat_map(|(r, c)| (arb_matrix(r, c), arb_matrix(r, c)))
    ) {
        let ab = plus(&[(&a).into(), (&b).into()]).unwrap();
        let ba = plus(&[(&b).into(), (&a).into()]).unwrap();
        prop_assert_eq!(ab, ba);
    }

    #[test]
    fn det_is_transpose_invariant(a in arb_square()) {
        let d = a.det().unwrap();
        let dt = a.transpose().det().unwrap();
        prop_assert!((d - dt).abs() <= 1e-8 * (1.0 + d.abs()), "{} vs {}", d, dt);
    }

    #[test]
    fn inverse_is_two_sided(a in arb_well_conditioned()) {
        let n = a.nrows();
        let inv = a.inverse().unwrap();
        let eye = Matrix::make_identity(n).unwrap();
        let right = times(&[(&a).into(), (&inv).into()]).unwrap();
        let left = times(&[(&inv).into(), (&a).into()]).unwrap();
        prop_assert!(max_abs_diff(&right, &eye) < 1e-9);
        prop_assert!(max_abs_diff(&left, &eye) < 1e-9);
    }

    #[test]
    fn solve_agrees_with_inverse(
        (a, c) in arb_well_conditioned()
            .prop_flat_map(|a| {
                let n = a.nrows();
                (Just(a), (1usize..=3).prop_flat_map(move |p| arb_matrix(n, p)))
            })
    ) {
        let x = a.solve(&c).unwrap();
        let via_inverse = times(&[a.inverse().unwrap().into(), (&c).into()]).unwrap();
        prop_assert!(max_abs_diff(&x, &via_inverse) < 1e-9);
    }

    #[test]
    fn trace_is_eigenvalue_sum(a in arb_square()) {
        let sum: f64 = a.real_eigenvalues().unwrap().iter().sum();
        let tr = a.trace().unwrap();
        prop_assert!((sum - tr).abs() < 1e-8 * (1.0 + tr.abs()) + 1e-8, "{} vs {}", sum, tr);
    }

    #[test]
    fn imaginary_parts_come_in_conjugate_pairs(a in arb_square()) {
        let im = a.imaginary_eigenvalues().unwrap();
        let mut k = 0;
        while k < im.len() {
            if im[k] != 0.0 {
                prop_assert!(im[k] > 0.0);
                prop_assert_eq!(im[k + 1], -im[k]);
                k += 2;
            } else {
                k += 1;
            }
        }
    }

    #[test]
    fn rank_is_bounded(a in arb_rectangular()) {
        let (r, c) = a.dimensions();
        prop_assert!(a.rank().unwrap() <= r.min(c));
    }

    #[test]
    fn nonsingular_has_full_rank(a in arb_well_conditioned()) {
        prop_assert_eq!(a.rank().unwrap(), a.nrows());
        prop_assert!(a.cond().unwrap().is_finite());
    }

    #[test]
    fn copy_is_independent(
        (a, i, j) in arb_rectangular().prop_flat_map(|a| {
            let (r, c) = a.dimensions();
            (Just(a), 0..r, 0..c)
        }),
        value in 10.0..20.0_f64,
    ) {
        let a = a.copy();
        let original = a.get(i, j).unwrap();
        let c = a.copy();
        prop_assert_eq!(&c, &a);

        c.set(i, j, value).unwrap();
        prop_assert_eq!(a.get(i, j).unwrap(), original);

        a.set(i, j, -value).unwrap();
        prop_assert_eq!(c.get(i, j).unwrap(), value);
    }
}
