//! Forecast band width and confidence score.
//!
//! Band half-width is `z · σ` where σ depends on the policy:
//!
//! - `ResidualSigma`: `sqrt(Σ r² / (n - 2))` over the model's in-sample residuals
//!   (plain mean square when `n <= 2`)
//! - `CoefficientOfVariation`: population standard deviation of the history
//!
//! The confidence score is a step function of the history's coefficient of
//! variation (population σ / mean) under either policy, forced to `0.70` for
//! histories shorter than six points.

use crate::domain::{ConfidenceLevel, IntervalPolicy};
use crate::math::{mean, population_std_dev, residual_std_dev};

/// Histories shorter than this get `LOW_SAMPLE_CONFIDENCE`.
pub const MIN_POINTS_FOR_CONFIDENCE: usize = 6;

/// Score used when the history is too short to judge dispersion.
pub const LOW_SAMPLE_CONFIDENCE: f64 = 0.70;

/// `(cv upper bound, score)` steps, checked in order.
const CONFIDENCE_STEPS: [(f64, f64); 3] = [(0.05, 0.95), (0.10, 0.90), (0.15, 0.85)];

/// Score when dispersion exceeds every step.
const FLOOR_CONFIDENCE: f64 = 0.80;

/// Band parameters for one fitted series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// Half-width applied around each unperturbed estimate.
    pub margin: f64,
    /// Residual σ (also scales the optional perturbation).
    pub residual_std_dev: f64,
    pub confidence: f64,
}

/// Compute the band for a fitted series.
///
/// `costs` and `residuals` are the normalized history and the model's
/// in-sample residuals (same length).
pub fn compute_band(
    policy: IntervalPolicy,
    level: ConfidenceLevel,
    costs: &[f64],
    residuals: &[f64],
) -> Band {
    let n = costs.len();
    let sigma_resid = residual_std_dev(residuals, n.saturating_sub(2)).unwrap_or(0.0);
    let sigma_hist = population_std_dev(costs).unwrap_or(0.0);
    let cost_mean = mean(costs).unwrap_or(0.0);

    let dispersion = match policy {
        IntervalPolicy::ResidualSigma => sigma_resid,
        IntervalPolicy::CoefficientOfVariation => sigma_hist,
    };

    Band {
        margin: level.z_score() * dispersion,
        residual_std_dev: sigma_resid,
        confidence: confidence_score(n, sigma_hist, cost_mean),
    }
}

/// Classify reliability from sample size and the history's `std_dev / mean`.
pub fn confidence_score(n: usize, std_dev: f64, mean: f64) -> f64 {
    if n < MIN_POINTS_FOR_CONFIDENCE {
        return LOW_SAMPLE_CONFIDENCE;
    }

    let cv = if mean > 0.0 {
        std_dev / mean
    } else if std_dev == 0.0 {
        0.0
    } else {
        f64::INFINITY
    };

    CONFIDENCE_STEPS
        .iter()
        .find(|(bound, _)| cv < *bound)
        .map(|&(_, score)| score)
        .unwrap_or(FLOOR_CONFIDENCE)
}

/// Enforce `0 <= lower <= estimate <= upper`.
///
/// Costs cannot be negative, so the estimate is floored at zero; the bounds are
/// then widened, never narrowed, to contain it.
pub fn clamp_bounds(estimate: f64, lower: f64, upper: f64) -> (f64, f64, f64) {
    let estimate = estimate.max(0.0);
    let lower = lower.max(0.0).min(estimate);
    let upper = upper.max(estimate);
    (estimate, lower, upper)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_history_forces_low_confidence() {
        assert_eq!(confidence_score(5, 0.0, 100.0), LOW_SAMPLE_CONFIDENCE);
        assert_eq!(confidence_score(0, 0.0, 0.0), LOW_SAMPLE_CONFIDENCE);
    }

    #[test]
    fn confidence_steps_follow_cv() {
        assert_eq!(confidence_score(6, 4.0, 100.0), 0.95);
        assert_eq!(confidence_score(6, 5.0, 100.0), 0.90);
        assert_eq!(confidence_score(6, 9.9, 100.0), 0.90);
        assert_eq!(confidence_score(6, 14.0, 100.0), 0.85);
        assert_eq!(confidence_score(6, 15.0, 100.0), 0.80);
        assert_eq!(confidence_score(6, 0.0, 0.0), 0.95);
        assert_eq!(confidence_score(6, 1.0, 0.0), 0.80);
    }

    #[test]
    fn cv_policy_uses_history_dispersion() {
        // Perfectly linear history: residuals are zero but history varies.
        let costs = [100.0, 110.0, 120.0];
        let residuals = [0.0, 0.0, 0.0];

        let band = compute_band(IntervalPolicy::ResidualSigma, ConfidenceLevel::P95, &costs, &residuals);
        assert_eq!(band.margin, 0.0);

        let band = compute_band(
            IntervalPolicy::CoefficientOfVariation,
            ConfidenceLevel::P99,
            &costs,
            &residuals,
        );
        let sigma = (200.0_f64 / 3.0).sqrt();
        assert!((band.margin - 2.58 * sigma).abs() < 1e-9);
    }

    #[test]
    fn residual_sigma_uses_n_minus_two() {
        let costs = [10.0, 10.0, 10.0, 10.0];
        let residuals = [1.0, -1.0, 1.0, -1.0];
        let band = compute_band(IntervalPolicy::ResidualSigma, ConfidenceLevel::P95, &costs, &residuals);
        assert!((band.residual_std_dev - 2.0_f64.sqrt()).abs() < 1e-12);
        assert!((band.margin - 1.96 * 2.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn confidence_is_graded_from_history_not_residuals() {
        // A year of swinging costs that a seasonal fit reproduces exactly.
        let costs = [
            500.0, 1700.0, 600.0, 1600.0, 550.0, 1650.0, 700.0, 1500.0, 650.0, 1550.0, 800.0, 1083.0,
        ];
        let residuals = [0.0; 12];

        for policy in [IntervalPolicy::ResidualSigma, IntervalPolicy::CoefficientOfVariation] {
            let band = compute_band(policy, ConfidenceLevel::P95, &costs, &residuals);
            assert_eq!(band.confidence, 0.80, "{policy:?}");
        }

        let steady = [1000.0, 1010.0, 990.0, 1005.0, 995.0, 1000.0];
        let band = compute_band(IntervalPolicy::ResidualSigma, ConfidenceLevel::P95, &steady, &[5.0; 6]);
        assert_eq!(band.confidence, 0.95);
    }

    #[test]
    fn clamp_keeps_ordering_and_non_negativity() {
        assert_eq!(clamp_bounds(-5.0, -20.0, 10.0), (0.0, 0.0, 10.0));
        assert_eq!(clamp_bounds(-50.0, -60.0, -40.0), (0.0, 0.0, 0.0));
        assert_eq!(clamp_bounds(12.0, 5.0, 11.0), (12.0, 5.0, 12.0));
        assert_eq!(clamp_bounds(12.0, 13.0, 20.0), (12.0, 12.0, 20.0));
    }
}
