//! Descriptive statistics over cost slices.
//!
//! All functions return `None` for empty input instead of producing `NaN`.

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population variance (denominator `n`).
pub fn population_variance(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some(ss / values.len() as f64)
}

/// Population standard deviation (denominator `n`).
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    population_variance(values).map(f64::sqrt)
}

/// Root of the residual sum of squares over `dof` degrees of freedom.
///
/// Falls back to the plain mean square when `dof` is zero.
pub fn residual_std_dev(residuals: &[f64], dof: usize) -> Option<f64> {
    if residuals.is_empty() {
        return None;
    }
    let sse: f64 = residuals.iter().map(|r| r * r).sum();
    let denom = if dof == 0 { residuals.len() } else { dof };
    Some((sse / denom as f64).sqrt())
}
