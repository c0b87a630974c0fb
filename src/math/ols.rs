//! Closed-form simple linear regression.
//!
//! The forecasting models only ever regress a cost on a single regressor (the
//! observation index), so the normal equations reduce to:
//!
//! ```text
//! slope     = Σ (x_i - x̄)(y_i - ȳ) / Σ (x_i - x̄)²
//! intercept = ȳ - slope · x̄
//! ```

/// Minimum `Σ (x_i - x̄)²` treated as non-zero.
const MIN_SXX: f64 = 1e-12;

/// Fit `y = intercept + slope · x`.
///
/// Returns `None` if the inputs are empty, have different lengths, or all `x`
/// coincide (zero denominator).
pub fn simple_linear_fit(x: &[f64], y: &[f64]) -> Option<(f64, f64)> {
    if x.is_empty() || x.len() != y.len() {
        return None;
    }
    let n = x.len() as f64;
    let x_mean = x.iter().sum::<f64>() / n;
    let y_mean = y.iter().sum::<f64>() / n;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        sxy += (xi - x_mean) * (yi - y_mean);
        sxx += (xi - x_mean).powi(2);
    }

    if sxx < MIN_SXX {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;
    Some((slope, intercept))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_exact_line() {
        // y = 2 + 3x on x = [0,1,2]
        let (slope, intercept) = simple_linear_fit(&[0.0, 1.0, 2.0], &[2.0, 5.0, 8.0]).unwrap();
        assert!((slope - 3.0).abs() < 1e-10);
        assert!((intercept - 2.0).abs() < 1e-10);
    }

    #[test]
    fn coincident_x_is_degenerate() {
        assert!(simple_linear_fit(&[1.0, 1.0], &[3.0, 4.0]).is_none());
        assert!(simple_linear_fit(&[0.0], &[3.0]).is_none());
        assert!(simple_linear_fit(&[], &[]).is_none());
        assert!(simple_linear_fit(&[0.0, 1.0], &[1.0]).is_none());
    }
}
