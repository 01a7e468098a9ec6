//! # matrixkit
//!
//! Dense real matrices with shared-handle semantics and the numerical
//! engines behind them: pivoted elimination, least squares, eigenvalues of
//! general real matrices (complex pairs included), SVD-based rank, and
//! ordinary least squares regression with growth forecasts.
//!
//! ## Quick start
//!
//! ```
//! use matrixkit::{times, Matrix, Operand};
//!
//! // Solve a linear system A·X = C
//! let a = Matrix::from_rows(&[[2.0, 1.0, -1.0], [-3.0, -1.0, 2.0], [-2.0, 1.0, 2.0]]).unwrap();
//! let c = Matrix::from_rows(&[[8.0], [-11.0], [-3.0]]).unwrap();
//! let x = a.solve(&c).unwrap(); // x = [2, 3, -1]
//! assert!((x.get(1, 0).unwrap() - 3.0).abs() < 1e-12);
//!
//! // A·A⁻¹ = I
//! let p = times(&[Operand::from(&a), Operand::from(a.inverse().unwrap())]).unwrap();
//! assert!((p.get(0, 0).unwrap() - 1.0).abs() < 1e-12);
//! ```
//!
//! ## Modules
//!
//! - [`matrix`] — [`Matrix`], a reference-counted mutable handle over a
//!   `DenseMatrix<f64>`. Clones alias; [`Matrix::copy`] deep-copies. Every
//!   access, structural, and analysis operation is a method; the variadic
//!   arithmetic folds ([`plus`], [`minus`], [`times_elementwise`], [`times`])
//!   take mixed scalar/matrix [`Operand`]s.
//!
//! - [`dense`] — [`DenseMatrix<T>`], owned row-major storage with value
//!   semantics, checked constructors and accessors, and arithmetic.
//!   Implements [`MatrixRef`] / [`MatrixMut`], so all linalg free functions
//!   work on it directly.
//!
//! - [`linalg`] — LU (partial pivoting), Householder QR, Hessenberg
//!   reduction, Francis double-shift QR (real Schur form), symmetric
//!   tridiagonal QR, and Golub–Kahan singular values. Free functions operate
//!   in place on `&mut impl MatrixMut<T>`; wrapper structs own their factors;
//!   convenience methods on `DenseMatrix` (`a.solve(&c)`, `a.inverse()`,
//!   `a.det()`, `a.eigen()`, `a.rank()`, `a.cond()`) tie them together.
//!
//! - [`regress`] — ordinary least squares ([`regress::regress`]) and linear,
//!   compound, and continuous growth forecasts.
//!
//! - [`traits`] — element trait hierarchy:
//!   - [`Scalar`] — all matrix elements (`Copy + PartialEq + Debug + Zero + One + Num`)
//!   - [`FloatScalar`] — real floats (`Scalar + Float`), used by every decomposition
//!   - [`MatrixRef`] / [`MatrixMut`] — generic read/write access for algorithms
//!
//! - [`error`] — [`MatrixError`], one variant per failure kind, and the
//!   crate-wide [`Result`] alias.
//!
//! ## Logging
//!
//! Decomposition paths, iteration counts, and pivoting decisions are reported
//! through the [`log`](https://docs.rs/log) facade at `debug` and `trace`
//! level. Nothing is printed unless the application installs a logger, and
//! failures are always reported through [`MatrixError`].
//!
//! ## Cargo features
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `serde` | no      | `Serialize` / `Deserialize` for `DenseMatrix`, `RegressionFit`, `Forecast` |

pub mod dense;
pub mod error;
pub mod linalg;
pub mod matrix;
pub mod regress;
pub mod traits;

pub use dense::DenseMatrix;
pub use error::{MatrixError, Result};
pub use linalg::{Eigen, IterationLimits};
pub use matrix::{minus, plus, times, times_elementwise, Matrix, Operand};
pub use regress::{Forecast, RegressionFit};
pub use traits::{FloatScalar, MatrixMut, MatrixRef, Scalar};
