//! Short-horizon cost trend summary.
//!
//! Unlike [`ForecastEngine::forecast`], a short history is an error here: the
//! summary reports a month-over-month change, which needs two observations.

use crate::domain::{ForecastOptions, Observation, TrendAnalysis};
use crate::error::{ForecastError, Result};
use crate::forecast::engine::{ForecastEngine, MIN_OBSERVATIONS};
use crate::series::normalize;

/// Latest cost, last month-over-month move, and a one-month projection.
pub fn analyze_trend(observations: &[Observation], options: ForecastOptions) -> Result<TrendAnalysis> {
    let engine = ForecastEngine::new(options)?;
    let series = normalize(observations, options.gaps)?;
    let n = series.len();
    if n < MIN_OBSERVATIONS {
        return Err(ForecastError::InsufficientData {
            needed: MIN_OBSERVATIONS,
            got: n,
        });
    }

    let current_cost = series.costs[n - 1];
    let previous_cost = series.costs[n - 2];
    let percent_change = if previous_cost > 0.0 {
        (current_cost - previous_cost) / previous_cost * 100.0
    } else {
        0.0
    };

    let out = engine.forecast_series(&series, 1)?;
    let forecast_next_month = out
        .forecast
        .first()
        .map(|p| p.point_estimate)
        .unwrap_or(current_cost);

    Ok(TrendAnalysis {
        current_cost,
        percent_change,
        forecast_next_month,
        trend: out.trend,
    })
}
