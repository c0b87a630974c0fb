//! Model evaluation for both forecasting strategies.
//!
//! The engine relies on three primitive operations:
//! - fit a model of the requested kind to a normalized series
//! - evaluate the in-sample fit (for residuals and the band width)
//! - predict `k` periods past the last observation
//!
//! These are implemented here for each strategy kind.

use chrono::NaiveDate;

use crate::domain::{HoltParams, StrategyKind};
use crate::error::Result;
use crate::models::holt::{HoltState, smooth};
use crate::models::seasonal::{SeasonalProfile, decompose};
use crate::models::trend::{TrendModel, fit_trend};
use crate::series::NormalizedSeries;

/// A model fitted to one series.
#[derive(Debug, Clone, PartialEq)]
pub enum FittedModel {
    SeasonalTrend {
        trend: TrendModel,
        seasonal: SeasonalProfile,
    },
    Holt {
        state: HoltState,
    },
}

impl FittedModel {
    /// Fit `kind` to `series` (which must hold at least two observations).
    pub fn fit(kind: StrategyKind, series: &NormalizedSeries, holt: HoltParams) -> Result<Self> {
        match kind {
            StrategyKind::SeasonalTrend => {
                let trend = fit_trend(&series.costs)?;
                let seasonal = decompose(&series.costs, &series.dates, &trend);
                Ok(FittedModel::SeasonalTrend { trend, seasonal })
            }
            StrategyKind::HoltSmoothing => {
                let state = smooth(&series.costs, holt)?;
                Ok(FittedModel::Holt { state })
            }
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            FittedModel::SeasonalTrend { .. } => StrategyKind::SeasonalTrend,
            FittedModel::Holt { .. } => StrategyKind::HoltSmoothing,
        }
    }

    /// In-sample fitted values, index-aligned with `series`.
    pub fn fitted_values(&self, series: &NormalizedSeries) -> Vec<f64> {
        match self {
            FittedModel::SeasonalTrend { trend, seasonal } => series
                .dates
                .iter()
                .enumerate()
                .map(|(i, &date)| trend.value_at(i as f64) + seasonal.adjustment(date))
                .collect(),
            FittedModel::Holt { state } => state.fitted(),
        }
    }

    /// `observed - fitted` for each historical point.
    pub fn residuals(&self, series: &NormalizedSeries) -> Vec<f64> {
        self.fitted_values(series)
            .iter()
            .zip(&series.costs)
            .map(|(fit, cost)| cost - fit)
            .collect()
    }

    /// Predict the value `k >= 1` periods after the last of `n` observations,
    /// falling on calendar `date`.
    pub fn predict(&self, n: usize, k: usize, date: NaiveDate) -> f64 {
        match self {
            FittedModel::SeasonalTrend { trend, seasonal } => {
                let index = (n + k - 1) as f64;
                trend.value_at(index) + seasonal.adjustment(date)
            }
            FittedModel::Holt { state } => state.project(k),
        }
    }
}
