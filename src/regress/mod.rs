//! Ordinary least squares regression and growth forecasts.
//!
//! - [`regress`] — OLS fit of one dependent variable against any number of
//!   independent variables, with an implicit intercept
//! - [`forecast_linear_growth`] — `y = a + b·t`
//! - [`forecast_compound_growth`] — `y = a·gᵗ`, fit on `ln y`
//! - [`forecast_continuous_growth`] — `y = a·e^(r·t)`, fit on `ln y`
//!
//! Every forecast regresses the series against its index `t = 0..n` and
//! predicts the next value at `t = n`.

mod forecast;


pub use forecast::{
    forecast_compound_growth, forecast_continuous_growth, forecast_linear_growth, Forecast,
};

use log::debug;

use crate::dense::DenseMatrix;
use crate::error::{MatrixError, Result};
use crate::linalg::solve;

/// Result of an ordinary least squares fit.
///
/// Always carries at least the intercept; deserialization rejects an empty
/// coefficient list.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawFit", into = "RawFit")
)]
pub struct RegressionFit {
    coefficients: Vec<f64>,
    r_squared: f64,
    total_sum_of_squares: f64,
    residual_sum_of_squares: f64,
}

impl RegressionFit {
    /// Intercept followed by one slope per independent variable.
    #[inline]
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    #[inline]
    pub fn intercept(&self) -> f64 {
        self.coefficients[0]
    }

    /// Slopes of the independent variables, in column order.
    #[inline]
    pub fn slopes(&self) -> &[f64] {
        &self.coefficients[1..]
    }

    /// Coefficient of determination `1 − RSS/TSS`; `1` when `TSS = 0`.
    #[inline]
    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }

    /// `Σ(yᵢ − ȳ)²`.
    #[inline]
    pub fn total_sum_of_squares(&self) -> f64 {
        self.total_sum_of_squares
    }

    /// `Σ(yᵢ − ŷᵢ)²`.
    #[inline]
    pub fn residual_sum_of_squares(&self) -> f64 {
        self.residual_sum_of_squares
    }

    /// `[R², TSS, RSS]`.
    pub fn statistics(&self) -> [f64; 3] {
        [
            self.r_squared,
            self.total_sum_of_squares,
            self.residual_sum_of_squares,
        ]
    }

    /// Fitted value at one observation of the independent variables.
    ///
    /// Fails with `DimensionMismatch` unless `x` has one entry per slope.
    ///
    /// ```
    /// use matrixkit::{regress::regress, DenseMatrix};
    ///
    /// let data = DenseMatrix::from_rows(&[[1.0, 0.0], [3.0, 1.0], [5.0, 2.0]]).unwrap();
    /// let fit = regress(&data).unwrap();
    /// assert!((fit.predict(&[10.0]).unwrap() - 21.0).abs() < 1e-9);
    /// ```
    pub fn predict(&self, x: &[f64]) -> Result<f64> {
        let slopes = self.slopes();
        if x.len() != slopes.len() {
            return Err(MatrixError::DimensionMismatch {
                expected: (1, slopes.len()),
                got: (1, x.len()),
            });
        }
        Ok(self.intercept() + slopes.iter().zip(x).map(|(b, x)| b * x).sum::<f64>())
    }
}

/// Fit column 0 of `data` against columns `1..=k` by ordinary least squares.
///
/// The design matrix is `data` with column 0 replaced by ones, so the first
/// coefficient is the intercept. Requires more observations than independent
/// variables (`InsufficientData` otherwise); collinear independent variables
/// yield `SingularMatrix`.
///
/// ```
/// use matrixkit::{regress::regress, DenseMatrix};
///
/// let y = [20.0, 25.0, 28.0, 32.0, 35.0, 39.0];
/// let data = DenseMatrix::from_fn(6, 2, |i, j| if j == 0 { y[i] } else { i as f64 }).unwrap();
/// let fit = regress(&data).unwrap();
/// assert!((fit.intercept() - 20.619).abs() < 1e-3);
/// assert!((fit.slopes()[0] - 3.6857).abs() < 1e-3);
/// assert!((fit.r_squared() - 0.9954).abs() < 1e-3);
/// ```
pub fn regress(data: &DenseMatrix<f64>) -> Result<RegressionFit> {
    let (m, cols) = data.shape();
    let k = cols.checked_sub(1).ok_or(MatrixError::InvalidDimension { rows: m, cols })?;
    if m <= k {
        return Err(MatrixError::InsufficientData {
            observations: m,
            variables: k,
        });
    }
    debug!("regress: {m} observations, {k} independent variables");

    let design = DenseMatrix::tabulate(m, k + 1, |i, j| if j == 0 { 1.0 } else { data[(i, j)] });
    let y = DenseMatrix::tabulate(m, 1, |i, _| data[(i, 0)]);
    let beta = solve(&design, &y)?;
    let fitted = design.matmul(&beta)?;

    let mean = y.as_slice().iter().sum::<f64>() / m as f64;
    let mut tss = 0.0;
    let mut rss = 0.0;
    for (&yi, &fi) in y.as_slice().iter().zip(fitted.as_slice()) {
        tss += (yi - mean) * (yi - mean);
        rss += (yi - fi) * (yi - fi);
    }
    let r_squared = if tss == 0.0 { 1.0 } else { 1.0 - rss / tss };

    Ok(RegressionFit {
        coefficients: beta.as_slice().to_vec(),
        r_squared,
        total_sum_of_squares: tss,
        residual_sum_of_squares: rss,
    })
}

/// Wire form used by the `serde` feature; validated on the way in.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RawFit {
    coefficients: Vec<f64>,
    r_squared: f64,
    total_sum_of_squares: f64,
    residual_sum_of_squares: f64,
}

#[cfg(feature = "serde")]
impl From<RegressionFit> for RawFit {
    fn from(fit: RegressionFit) -> Self {
        Self {
            coefficients: fit.coefficients,
            r_squared: fit.r_squared,
            total_sum_of_squares: fit.total_sum_of_squares,
            residual_sum_of_squares: fit.residual_sum_of_squares,
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<RawFit> for RegressionFit {
    type Error = MatrixError;

    fn try_from(raw: RawFit) -> Result<Self> {
        if raw.coefficients.is_empty() {
            return Err(MatrixError::InvalidDimension { rows: 0, cols: 1 });
        }
        Ok(Self {
            coefficients: raw.coefficients,
            r_squared: raw.r_squared,
            total_sum_of_squares: raw.total_sum_of_squares,
            residual_sum_of_squares: raw.residual_sum_of_squares,
        })
    }
}
