use crate::dense::DenseMatrix;
use crate::error::{MatrixError, Result};

use super::{regress, RegressionFit};

/// One-step-ahead forecast from a growth model fitted against `t = 0..n`.
///
/// `growth` is the slope for linear growth, the per-step growth factor for
/// compound growth, and the continuous rate for continuous growth.
/// `r_squared` is measured on the regression actually performed, which is
/// the log-transformed one for the two exponential models.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Forecast {
    pub forecast: f64,
    pub constant: f64,
    pub growth: f64,
    pub r_squared: f64,
}

impl Forecast {
    /// `[forecast, constant, growth, R²]`.
    pub fn to_array(&self) -> [f64; 4] {
        [self.forecast, self.constant, self.growth, self.r_squared]
    }
}

/// Regress `values` against their index.
fn fit_against_index(values: &[f64]) -> Result<RegressionFit> {
    if values.len() < 2 {
        return Err(MatrixError::InsufficientData {
            observations: values.len(),
            variables: 1,
        });
    }
    let data = DenseMatrix::tabulate(values.len(), 2, |i, j| {
        if j == 0 {
            values[i]
        } else {
            i as f64
        }
    });
    regress(&data)
}

fn log_series(series: &[f64]) -> Result<Vec<f64>> {
    if let Some((index, &value)) = series
        .iter()
        .enumerate()
        .find(|(_, v)| v.is_nan() || **v <= 0.0)
    {
        return Err(MatrixError::NonPositiveValue { index, value });
    }
    Ok(series.iter().map(|v| v.ln()).collect())
}

/// Linear trend `constant + growth·t`, forecast at `t = n`.
///
/// ```
/// use matrixkit::regress::forecast_linear_growth;
///
/// let f = forecast_linear_growth(&[1.0, 3.0, 5.0, 7.0]).unwrap();
/// assert!((f.forecast - 9.0).abs() < 1e-9);
/// assert!((f.growth - 2.0).abs() < 1e-9);
/// ```
pub fn forecast_linear_growth(series: &[f64]) -> Result<Forecast> {
    let fit = fit_against_index(series)?;
    let (constant, slope) = (fit.intercept(), fit.slopes()[0]);
    Ok(Forecast {
        forecast: constant + slope * series.len() as f64,
        constant,
        growth: slope,
        r_squared: fit.r_squared(),
    })
}

/// Compound growth `constant·growthᵗ`, fit on `ln(series)`.
///
/// Every element must be positive; the first offender is reported as
/// `NonPositiveValue` before any fitting happens.
///
/// ```
/// use matrixkit::regress::forecast_compound_growth;
///
/// let f = forecast_compound_growth(&[3.0, 6.0, 12.0]).unwrap();
/// assert!((f.constant - 3.0).abs() < 1e-9);
/// assert!((f.growth - 2.0).abs() < 1e-9);
/// assert!((f.forecast - 24.0).abs() < 1e-9);
/// ```
pub fn forecast_compound_growth(series: &[f64]) -> Result<Forecast> {
    let fit = fit_against_index(&log_series(series)?)?;
    let constant = fit.intercept().exp();
    let growth = fit.slopes()[0].exp();
    Ok(Forecast {
        forecast: constant * growth.powf(series.len() as f64),
        constant,
        growth,
        r_squared: fit.r_squared(),
    })
}

/// Continuous growth `constant·e^(rate·t)`, fit on `ln(series)`.
///
/// Same preconditions as [`forecast_compound_growth`]; `growth` is the rate
/// itself rather than its exponential.
pub fn forecast_continuous_growth(series: &[f64]) -> Result<Forecast> {
    let fit = fit_against_index(&log_series(series)?)?;
    let constant = fit.intercept().exp();
    let rate = fit.slopes()[0];
    Ok(Forecast {
        forecast: constant * (rate * series.len() as f64).exp(),
        constant,
        growth: rate,
        r_squared: fit.r_squared(),
    })
}
