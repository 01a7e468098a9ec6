use criterion::{criterion_group, criterion_main, Criterion};
use matrixkit::{times, DenseMatrix, Matrix, Operand};

// ---------------------------------------------------------------------------
// Helpers: deterministic, well-conditioned test matrices
// ---------------------------------------------------------------------------

fn entry(i: usize, j: usize, n: usize) -> f64 {
    let base = ((i * 7 + j * 13) % 17) as f64 / 17.0 - 0.5;
    if i == j {
        base + n as f64
    } else {
        base
    }
}

fn dense(n: usize) -> DenseMatrix<f64> {
    DenseMatrix::from_fn(n, n, |i, j| entry(i, j, n)).unwrap()
}

fn nalgebra_dense(n: usize) -> nalgebra::DMatrix<f64> {
    nalgebra::DMatrix::from_fn(n, n, |i, j| entry(i, j, n))
}

fn dense_symmetric(n: usize) -> DenseMatrix<f64> {
    DenseMatrix::from_fn(n, n, |i, j| entry(i.min(j), i.max(j), n)).unwrap()
}

fn nalgebra_symmetric(n: usize) -> nalgebra::DMatrix<f64> {
    nalgebra::DMatrix::from_fn(n, n, |i, j| entry(i.min(j), i.max(j), n))
}

// ---------------------------------------------------------------------------
// Matrix multiply
// ---------------------------------------------------------------------------

fn matmul_50(c: &mut Criterion) {
    let mut g = c.benchmark_group("matmul_50");

    g.bench_function("matrixkit", |b| {
        let a = dense(50);
        let m = dense(50);
        b.iter(|| std::hint::black_box(&a).matmul(std::hint::black_box(&m)).unwrap())
    });

    g.bench_function("matrixkit_handle_fold", |b| {
        let a = Matrix::from(dense(50));
        let m = Matrix::from(dense(50));
        b.iter(|| times(&[Operand::from(&a), Operand::from(&m)]).unwrap())
    });

    g.bench_function("nalgebra", |b| {
        let a = nalgebra_dense(50);
        let m = nalgebra_dense(50);
        b.iter(|| std::hint::black_box(&a) * std::hint::black_box(&m))
    });

    g.finish();
}

// ---------------------------------------------------------------------------
// Elimination
// ---------------------------------------------------------------------------

fn solve_50(c: &mut Criterion) {
    let mut g = c.benchmark_group("solve_50");

    g.bench_function("matrixkit", |b| {
        let a = dense(50);
        let rhs = DenseMatrix::from_fn(50, 1, |i, _| i as f64).unwrap();
        b.iter(|| std::hint::black_box(&a).solve(&rhs).unwrap())
    });

    g.bench_function("nalgebra", |b| {
        let a = nalgebra_dense(50);
        let rhs = nalgebra::DMatrix::from_fn(50, 1, |i, _| i as f64);
        b.iter(|| std::hint::black_box(&a).clone().lu().solve(&rhs).unwrap())
    });

    g.finish();
}

fn least_squares_200x5(c: &mut Criterion) {
    let mut g = c.benchmark_group("least_squares_200x5");

    g.bench_function("matrixkit", |b| {
        let a = DenseMatrix::from_fn(200, 5, |i, j| entry(i, j, 5)).unwrap();
        let rhs = DenseMatrix::from_fn(200, 1, |i, _| (i % 11) as f64).unwrap();
        b.iter(|| std::hint::black_box(&a).solve(&rhs).unwrap())
    });

    g.bench_function("nalgebra", |b| {
        let a = nalgebra::DMatrix::from_fn(200, 5, |i, j| entry(i, j, 5));
        let rhs = nalgebra::DMatrix::from_fn(200, 1, |i, _| (i % 11) as f64);
        b.iter(|| {
            let qr = std::hint::black_box(&a).clone().qr();
            let qtb = qr.q().transpose() * &rhs;
            qr.r().solve_upper_triangular(&qtb).unwrap()
        })
    });

    g.finish();
}

fn inverse_20(c: &mut Criterion) {
    let mut g = c.benchmark_group("inverse_20");

    g.bench_function("matrixkit", |b| {
        let a = dense(20);
        b.iter(|| std::hint::black_box(&a).inverse().unwrap())
    });

    g.bench_function("nalgebra", |b| {
        let a = nalgebra_dense(20);
        b.iter(|| std::hint::black_box(&a).clone().try_inverse().unwrap())
    });

    g.finish();
}

// ---------------------------------------------------------------------------
// Eigen and SVD
// ---------------------------------------------------------------------------

fn eigen_symmetric_20(c: &mut Criterion) {
    let mut g = c.benchmark_group("eigen_symmetric_20");

    g.bench_function("matrixkit", |b| {
        let a = dense_symmetric(20);
        b.iter(|| std::hint::black_box(&a).eigen().unwrap())
    });

    g.bench_function("nalgebra", |b| {
        let a = nalgebra_symmetric(20);
        b.iter(|| std::hint::black_box(&a).clone().symmetric_eigen())
    });

    g.finish();
}

fn eigen_general_20(c: &mut Criterion) {
    let mut g = c.benchmark_group("eigen_general_20");

    g.bench_function("matrixkit_values_and_vectors", |b| {
        let a = dense(20);
        b.iter(|| std::hint::black_box(&a).eigen().unwrap())
    });

    g.bench_function("matrixkit_schur", |b| {
        let a = dense(20);
        b.iter(|| std::hint::black_box(&a).schur().unwrap())
    });

    g.bench_function("nalgebra_schur", |b| {
        let a = nalgebra_dense(20);
        b.iter(|| std::hint::black_box(&a).clone().schur())
    });

    g.finish();
}

fn singular_values_20(c: &mut Criterion) {
    let mut g = c.benchmark_group("singular_values_20");

    g.bench_function("matrixkit", |b| {
        let a = dense(20);
        b.iter(|| std::hint::black_box(&a).singular_values().unwrap())
    });

    g.bench_function("nalgebra", |b| {
        let a = nalgebra_dense(20);
        b.iter(|| std::hint::black_box(&a).singular_values())
    });

    g.finish();
}

// ---------------------------------------------------------------------------
// Regression
// ---------------------------------------------------------------------------

fn regress_500x3(c: &mut Criterion) {
    let data = DenseMatrix::from_fn(500, 4, |i, j| match j {
        0 => 1.0 + 0.5 * i as f64 + ((i * 31) % 7) as f64,
        _ => entry(i, j, 3) + i as f64 * j as f64,
    })
    .unwrap();
    c.bench_function("regress_500x3", |b| {
        b.iter(|| matrixkit::regress::regress(std::hint::black_box(&data)).unwrap())
    });
}

criterion_group!(
    benches,
    matmul_50,
    solve_50,
    least_squares_200x5,
    inverse_20,
    eigen_symmetric_20,
    eigen_general_20,
    singular_values_20,
    regress_500x3,
);
criterion_main!(benches);
