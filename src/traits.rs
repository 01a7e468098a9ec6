use core::fmt::Debug;
use num_traits::{Float, Num, One, Zero};

/// Trait for types that can be stored in a [`DenseMatrix`](crate::DenseMatrix).
///
/// Blanket-implemented for all types satisfying the bounds.
/// Covers `f32`, `f64`, and all integer types.
pub trait Scalar: Copy + PartialEq + Debug + Zero + One + Num {}

impl<T: Copy + PartialEq + Debug + Zero + One + Num> Scalar for T {}

/// Trait for real floating-point matrix elements.
///
/// Required by every decomposition (`sqrt`, `abs`, `epsilon`).
/// Blanket-implemented for `f32` and `f64`.
pub trait FloatScalar: Scalar + Float {
    /// `2` in the element type.
    #[inline]
    fn two() -> Self {
        Self::one() + Self::one()
    }

    /// Convert a dimension or count into the element type.
    #[inline]
    fn from_usize(n: usize) -> Self {
        <Self as num_traits::NumCast>::from(n).unwrap_or_else(Self::max_value)
    }
}

impl<T: Scalar + Float> FloatScalar for T {}

/// Read-only access to a matrix-like type.
///
/// Lets the in-place kernels in [`linalg`](crate::linalg) operate on any
/// storage that can hand out elements by `(row, col)`.
pub trait MatrixRef<T> {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn get(&self, row: usize, col: usize) -> &T;
}

/// Mutable access to a matrix-like type.
///
/// Extends `MatrixRef` with mutable element access, enabling
/// in-place algorithms (LU, QR, Hessenberg, ...) to work generically.
pub trait MatrixMut<T>: MatrixRef<T> {
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T;

    /// Swap two rows in place.
    fn swap_rows_in_place(&mut self, a: usize, b: usize)
    where
        T: Copy,
    {
        if a == b {
            return;
        }
        for j in 0..self.ncols() {
            let tmp = *self.get(a, j);
            *self.get_mut(a, j) = *self.get(b, j);
            *self.get_mut(b, j) = tmp;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_helpers() {
        assert_eq!(f64::two(), 2.0);
        assert_eq!(f32::from_usize(7), 7.0);
    }
}
