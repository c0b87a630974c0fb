//! Linear trend over the observation index.
//!
//! The index is the time axis: observation `i` sits at `x = i` regardless of
//! its calendar date. Use `GapPolicy::Interpolate` upstream when the history
//! has missing months and equal spacing matters.

use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};
use crate::math::simple_linear_fit;

/// `cost ≈ intercept + slope · i`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendModel {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendModel {
    /// Trend value at index `i` (fractional and out-of-sample indices allowed).
    pub fn value_at(&self, i: f64) -> f64 {
        self.slope * i + self.intercept
    }
}

/// OLS fit of `costs` against `0..n`.
///
/// Needs at least two points; a single point has a zero index variance.
pub fn fit_trend(costs: &[f64]) -> Result<TrendModel> {
    let x: Vec<f64> = (0..costs.len()).map(|i| i as f64).collect();
    let (slope, intercept) = simple_linear_fit(&x, costs)
        .ok_or(ForecastError::ArithmeticDegenerate("trend needs at least two distinct indices"))?;
    Ok(TrendModel { slope, intercept })
}
