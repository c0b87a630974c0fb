//! Holt's linear (double exponential) smoothing.
//!
//! ```text
//! level_0 = c_0                trend_0 = c_1 - c_0
//! level_i = α c_i + (1 - α)(level_{i-1} + trend_{i-1})
//! trend_i = β (level_i - level_{i-1}) + (1 - β) trend_{i-1}
//! ŷ_{n-1+k} = level_{n-1} + k · trend_{n-1}
//! ```
//!
//! No seasonal term: monthly patterns are smoothed away.

use serde::{Deserialize, Serialize};

use crate::domain::HoltParams;
use crate::error::{ForecastError, Result};

/// Smoothed state at every index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoltState {
    pub levels: Vec<f64>,
    pub trends: Vec<f64>,
}

impl HoltState {
    pub fn last_level(&self) -> f64 {
        self.levels.last().copied().unwrap_or(0.0)
    }

    pub fn last_trend(&self) -> f64 {
        self.trends.last().copied().unwrap_or(0.0)
    }

    /// Projection `k` periods past the last observation.
    pub fn project(&self, k: usize) -> f64 {
        self.last_level() + k as f64 * self.last_trend()
    }

    /// One-step-ahead in-sample fit, with the first point fitted exactly.
    pub fn fitted(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.levels.len());
        for i in 0..self.levels.len() {
            if i == 0 {
                out.push(self.levels[0]);
            } else {
                out.push(self.levels[i - 1] + self.trends[i - 1]);
            }
        }
        out
    }
}

impl HoltParams {
    /// Reject constants outside the open interval `(0, 1)`.
    pub fn validate(&self) -> Result<()> {
        for (name, v) in [("alpha", self.alpha), ("beta", self.beta)] {
            if !(v.is_finite() && v > 0.0 && v < 1.0) {
                return Err(ForecastError::InvalidParameter(format!(
                    "{name} must be in (0, 1), got {v}"
                )));
            }
        }
        Ok(())
    }
}

/// Run the recursion over `costs`.
pub fn smooth(costs: &[f64], params: HoltParams) -> Result<HoltState> {
    params.validate()?;
    if costs.len() < 2 {
        return Err(ForecastError::InsufficientData {
            needed: 2,
            got: costs.len(),
        });
    }

    let HoltParams { alpha, beta } = params;
    let mut levels = Vec::with_capacity(costs.len());
    let mut trends = Vec::with_capacity(costs.len());
    levels.push(costs[0]);
    trends.push(costs[1] - costs[0]);

    for i in 1..costs.len() {
        let prev_level = levels[i - 1];
        let prev_trend = trends[i - 1];
        let level = alpha * costs[i] + (1.0 - alpha) * (prev_level + prev_trend);
        let trend = beta * (level - prev_level) + (1.0 - beta) * prev_trend;
        levels.push(level);
        trends.push(trend);
    }

    Ok(HoltState { levels, trends })
}
