//! Error taxonomy shared by every matrix operation.

use thiserror::Error;

/// Errors returned by matrix construction, access, arithmetic and analysis.
///
/// Every fallible operation either returns a well-formed result or exactly
/// one of these variants. Nothing is retried and no partial results escape.
///
/// ```
/// use matrixkit::{Matrix, MatrixError};
///
/// let singular = Matrix::from_rows(&[[1.0, 2.0], [2.0, 4.0]]).unwrap();
/// assert_eq!(singular.inverse().unwrap_err(), MatrixError::SingularMatrix);
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatrixError {
    /// Non-positive row or column count requested at construction.
    #[error("invalid dimensions {rows}x{cols}: both must be positive")]
    InvalidDimension { rows: usize, cols: usize },

    /// Row/column-list construction from sequences of unequal length.
    #[error("ragged input: sequence {index} has length {got}, expected {expected}")]
    RaggedInput {
        index: usize,
        expected: usize,
        got: usize,
    },

    /// Row or column index outside `[0, extent)`.
    #[error("index {index} out of range for extent {extent}")]
    IndexOutOfRange { index: usize, extent: usize },

    /// Operand shapes are incompatible for the requested operation.
    #[error("dimension mismatch: expected {}x{}, got {}x{}", expected.0, expected.1, got.0, got.1)]
    DimensionMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },

    /// Submatrix bounds are inverted, empty, or outside the matrix.
    #[error("invalid range rows [{r1}, {r2}) cols [{c1}, {c2}) for {rows}x{cols} matrix")]
    InvalidRange {
        r1: usize,
        c1: usize,
        r2: usize,
        c2: usize,
        rows: usize,
        cols: usize,
    },

    /// Variadic arithmetic invoked without any matrix operand.
    #[error("at least one operand must be a matrix")]
    NoMatrixOperand,

    /// A square-only operation received a non-square matrix.
    #[error("matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    /// No usable pivot exists within numerical tolerance.
    #[error("matrix is singular")]
    SingularMatrix,

    /// An iterative algorithm exhausted its iteration budget.
    #[error("iteration did not converge within {iterations} iterations")]
    NumericalFailure { iterations: usize },

    /// Regression has no more observations than independent variables.
    #[error("insufficient data: {observations} observations for {variables} independent variables")]
    InsufficientData {
        observations: usize,
        variables: usize,
    },

    /// A log-transform forecast met a value that is zero or negative.
    #[error("series element {index} is {value}, expected a positive value")]
    NonPositiveValue { index: usize, value: f64 },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, MatrixError>;
