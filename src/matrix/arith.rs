use crate::dense::DenseMatrix;
use crate::error::{MatrixError, Result};

use super::Matrix;

/// One argument of a variadic arithmetic operation.
///
/// A scalar stands for a matrix of the first matrix operand's shape with
/// every cell equal to that scalar.
///
/// ```
/// use matrixkit::{plus, Matrix, Operand};
///
/// let a = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
/// let sum = plus(&[Operand::Scalar(10.0), Operand::from(&a)]).unwrap();
/// assert_eq!(sum.to_row_list(), vec![vec![11.0, 12.0], vec![13.0, 14.0]]);
/// ```
#[derive(Debug, Clone)]
pub enum Operand {
    Scalar(f64),
    Matrix(Matrix),
}

impl From<f64> for Operand {
    fn from(c: f64) -> Self {
        Operand::Scalar(c)
    }
}

impl From<Matrix> for Operand {
    fn from(m: Matrix) -> Self {
        Operand::Matrix(m)
    }
}

/// Shares the handle; no cells are copied.
impl From<&Matrix> for Operand {
    fn from(m: &Matrix) -> Self {
        Operand::Matrix(m.clone())
    }
}

fn first_matrix_shape(operands: &[Operand]) -> Result<(usize, usize)> {
    operands
        .iter()
        .find_map(|op| match op {
            Operand::Matrix(m) => Some(m.dimensions()),
            Operand::Scalar(_) => None,
        })
        .ok_or(MatrixError::NoMatrixOperand)
}

type CellwiseOp = fn(&DenseMatrix<f64>, &DenseMatrix<f64>) -> Result<DenseMatrix<f64>>;

/// Left fold of `op` after normalizing scalars to the first matrix's shape.
fn fold_cellwise(operands: &[Operand], op: CellwiseOp) -> Result<Matrix> {
    let (rows, cols) = first_matrix_shape(operands)?;
    let mut acc: Option<DenseMatrix<f64>> = None;
    for operand in operands {
        let filled;
        let guard;
        let next: &DenseMatrix<f64> = match operand {
            Operand::Scalar(c) => {
                filled = DenseMatrix::fill(rows, cols, *c)?;
                &filled
            }
            Operand::Matrix(m) => {
                guard = m.read();
                &*guard
            }
        };
        acc = Some(match acc.take() {
            None => next.clone(),
            Some(lhs) => op(&lhs, next)?,
        });
    }
    acc.map(Matrix::from).ok_or(MatrixError::NoMatrixOperand)
}

/// Cellwise sum of all operands, folded left to right.
///
/// Fails with `NoMatrixOperand` if no operand is a matrix and with
/// `DimensionMismatch` if the matrix operands differ in shape. A single
/// matrix operand yields an independent copy of it.
pub fn plus(operands: &[Operand]) -> Result<Matrix> {
    fold_cellwise(operands, DenseMatrix::add_elementwise)
}

/// Cellwise difference folded left to right: `minus(a, b, c) = (a - b) - c`.
///
/// ```
/// use matrixkit::{minus, Matrix, Operand};
///
/// let a = Matrix::from_rows(&[[10.0, 20.0]]).unwrap();
/// let b = Matrix::from_rows(&[[1.0, 2.0]]).unwrap();
/// let d = minus(&[a.into(), b.into(), Operand::Scalar(3.0)]).unwrap();
/// assert_eq!(d.get_row(0), Ok(vec![6.0, 15.0]));
/// ```
pub fn minus(operands: &[Operand]) -> Result<Matrix> {
    fold_cellwise(operands, DenseMatrix::sub_elementwise)
}

/// Cellwise (Hadamard) product folded left to right.
pub fn times_elementwise(operands: &[Operand]) -> Result<Matrix> {
    fold_cellwise(operands, DenseMatrix::mul_elementwise)
}

enum Product {
    Scalar(f64),
    Matrix(DenseMatrix<f64>),
}

/// Matrix product folded left to right; scalar operands scale every cell.
///
/// Fails with `DimensionMismatch` when adjacent matrix operands have
/// incompatible inner dimensions and with `NoMatrixOperand` when every
/// operand is a scalar.
///
/// ```
/// use matrixkit::{times, Matrix, Operand};
///
/// let a = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
/// let col = Matrix::from_rows(&[[1.0], [1.0]]).unwrap();
/// let p = times(&[Operand::Scalar(2.0), (&a).into(), (&col).into()]).unwrap();
/// assert_eq!(p.get_column(0), Ok(vec![6.0, 14.0]));
/// ```
pub fn times(operands: &[Operand]) -> Result<Matrix> {
    let mut acc: Option<Product> = None;
    for operand in operands {
        acc = Some(match (acc.take(), operand) {
            (None, Operand::Scalar(c)) => Product::Scalar(*c),
            (None, Operand::Matrix(m)) => Product::Matrix(m.to_dense()),
            (Some(Product::Scalar(s)), Operand::Scalar(c)) => Product::Scalar(s * c),
            (Some(Product::Scalar(s)), Operand::Matrix(m)) => Product::Matrix(m.read().scale(s)),
            (Some(Product::Matrix(lhs)), Operand::Scalar(c)) => Product::Matrix(lhs.scale(*c)),
            (Some(Product::Matrix(lhs)), Operand::Matrix(m)) => {
                Product::Matrix(lhs.matmul(&m.read())?)
            }
        });
    }
    match acc {
        Some(Product::Matrix(m)) => Ok(Matrix::from(m)),
        _ => Err(MatrixError::NoMatrixOperand),
    }
}

impl Matrix {
    /// New matrix with `c` added to every cell.
    pub fn plus_scalar(&self, c: f64) -> Matrix {
        Matrix::from(self.read().add_scalar(c))
    }

    /// New matrix with every cell multiplied by `c`.
    pub fn times_scalar(&self, c: f64) -> Matrix {
        Matrix::from(self.read().scale(c))
    }
}
