//! Forecast generation for a single series.
//!
//! Given historical observations we:
//! - normalize them (validate, stable-sort, optional gap fill)
//! - fit the configured strategy
//! - derive the band from the in-sample residuals
//! - emit one dated point per future calendar month
//!
//! With fewer than two observations the forecast is empty and no error is
//! raised: sparse series are a normal outcome for the caller.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Uniform};

use crate::domain::{ForecastOptions, ForecastOutput, ForecastPoint, Observation, TrendDirection};
use crate::error::{ForecastError, Result};
use crate::forecast::interval::{LOW_SAMPLE_CONFIDENCE, clamp_bounds, compute_band};
use crate::models::FittedModel;
use crate::series::{NormalizedSeries, add_months, normalize};

/// Minimum history needed to fit a trend.
pub const MIN_OBSERVATIONS: usize = 2;

/// A configured forecaster.
///
/// Holds no per-series state: every call is independent, so one engine can be
/// shared across threads.
#[derive(Debug, Clone, Default)]
pub struct ForecastEngine {
    options: ForecastOptions,
}

impl ForecastEngine {
    /// Build an engine, rejecting out-of-range Holt constants up front.
    pub fn new(options: ForecastOptions) -> Result<Self> {
        options.holt.validate()?;
        Ok(Self { options })
    }

    /// Forecast `periods` months past the last observation.
    pub fn forecast(&self, observations: &[Observation], periods: usize) -> Result<ForecastOutput> {
        let series = normalize(observations, self.options.gaps)?;
        self.forecast_series(&series, periods)
    }

    /// Forecast from an already normalized series.
    pub(crate) fn forecast_series(&self, series: &NormalizedSeries, periods: usize) -> Result<ForecastOutput> {
        let opts = &self.options;
        let n = series.len();

        let Some(last) = series.last().copied() else {
            return Ok(empty_output(opts, n));
        };
        if n < MIN_OBSERVATIONS {
            tracing::debug!(n, "not enough history to forecast");
            return Ok(empty_output(opts, n));
        }

        let horizon_end = u32::try_from(periods)
            .ok()
            .and_then(|k| add_months(last.date, k));
        if horizon_end.is_none() {
            return Err(ForecastError::InvalidParameter(format!(
                "forecast horizon of {periods} months exceeds the supported date range"
            )));
        }

        let model = FittedModel::fit(opts.strategy, series, opts.holt)?;
        let residuals = model.residuals(series);
        let band = compute_band(opts.interval, opts.level, &series.costs, &residuals);

        let mut noise = if opts.perturb {
            let dist = Uniform::new(-0.5, 0.5);
            Some((StdRng::seed_from_u64(opts.seed), dist))
        } else {
            None
        };

        let mut points = Vec::with_capacity(periods);
        for k in 1..=periods {
            let date = u32::try_from(k)
                .ok()
                .and_then(|k| add_months(last.date, k))
                .ok_or_else(|| {
                    ForecastError::InvalidParameter(format!(
                        "forecast horizon of {periods} months exceeds the supported date range"
                    ))
                })?;

            let center = model.predict(n, k, date);
            let jitter = match noise.as_mut() {
                Some((rng, dist)) => dist.sample(rng) * band.residual_std_dev,
                None => 0.0,
            };

            let (mut estimate, mut lower, mut upper) =
                clamp_bounds(center + jitter, center - band.margin, center + band.margin);
            if opts.round {
                estimate = estimate.round();
                lower = lower.round();
                upper = upper.round();
            }

            points.push(ForecastPoint {
                date,
                point_estimate: estimate,
                lower_bound: lower,
                upper_bound: upper,
            });
        }

        let trend = classify_trend(last.cost, points.last().map(|p| p.point_estimate));

        tracing::debug!(
            n,
            periods,
            strategy = ?model.kind(),
            sigma = band.residual_std_dev,
            confidence = band.confidence,
            %trend,
            "forecast generated"
        );

        Ok(ForecastOutput {
            strategy: model.kind(),
            n_observations: n,
            residual_std_dev: band.residual_std_dev,
            forecast: points,
            trend,
            confidence: band.confidence,
        })
    }
}

/// Forecast with a one-off engine.
pub fn forecast(
    observations: &[Observation],
    periods: usize,
    options: ForecastOptions,
) -> Result<ForecastOutput> {
    ForecastEngine::new(options)?.forecast(observations, periods)
}

/// Compare the last forecast estimate with the last historical cost.
///
/// `> +5%` is rising, `< -5%` decreasing, anything else (including no
/// forecast at all) stable.
pub fn classify_trend(last_historical: f64, last_forecast: Option<f64>) -> TrendDirection {
    let Some(last_forecast) = last_forecast else {
        return TrendDirection::Stable;
    };
    if last_historical <= 0.0 {
        return if last_forecast > 0.0 {
            TrendDirection::Rising
        } else {
            TrendDirection::Stable
        };
    }
    let pct = (last_forecast - last_historical) / last_historical * 100.0;
    TrendDirection::from_percent_change(pct)
}

fn empty_output(opts: &ForecastOptions, n: usize) -> ForecastOutput {
    ForecastOutput {
        strategy: opts.strategy,
        n_observations: n,
        residual_std_dev: 0.0,
        forecast: Vec::new(),
        trend: TrendDirection::Stable,
        confidence: LOW_SAMPLE_CONFIDENCE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HoltParams, IntervalPolicy, StrategyKind};
    use chrono::NaiveDate;

    fn month(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn linear_history() -> Vec<Observation> {
        vec![
            Observation::new(month(2023, 1), 100.0),
            Observation::new(month(2023, 2), 110.0),
            Observation::new(month(2023, 3), 120.0),
        ]
    }

    #[test]
    fn linear_trend_scenario() {
        let out = forecast(&linear_history(), 2, ForecastOptions::default()).unwrap();
        assert_eq!(out.forecast.len(), 2);
        assert_eq!(out.forecast[0].date, month(2023, 4));
        assert_eq!(out.forecast[1].date, month(2023, 5));
        assert!((out.forecast[0].point_estimate - 130.0).abs() < 1e-9);
        assert!((out.forecast[1].point_estimate - 140.0).abs() < 1e-9);
        assert_eq!(out.trend, TrendDirection::Rising);
        assert_eq!(out.confidence, LOW_SAMPLE_CONFIDENCE);
    }

    #[test]
    fn single_observation_gives_empty_forecast() {
        let out = forecast(&linear_history()[..1], 6, ForecastOptions::default()).unwrap();
        assert!(out.forecast.is_empty());
        assert_eq!(out.trend, TrendDirection::Stable);
        assert_eq!(out.n_observations, 1);

        let out = forecast(&[], 6, ForecastOptions::default()).unwrap();
        assert!(out.forecast.is_empty());
    }

    #[test]
    fn zero_periods_gives_empty_forecast() {
        let out = forecast(&linear_history(), 0, ForecastOptions::default()).unwrap();
        assert!(out.forecast.is_empty());
        assert_eq!(out.trend, TrendDirection::Stable);
    }

    #[test]
    fn invalid_cost_is_rejected_even_for_short_series() {
        let obs = vec![Observation::new(month(2023, 1), f64::NAN)];
        assert!(matches!(
            forecast(&obs, 3, ForecastOptions::default()),
            Err(ForecastError::InvalidObservation { index: 0, .. })
        ));
    }

    #[test]
    fn holt_strategy_projects_level_plus_trend() {
        let opts = ForecastOptions {
            strategy: StrategyKind::HoltSmoothing,
            ..ForecastOptions::default()
        };
        let out = forecast(&linear_history(), 3, opts).unwrap();
        assert_eq!(out.strategy, StrategyKind::HoltSmoothing);
        let estimates: Vec<f64> = out.forecast.iter().map(|p| p.point_estimate).collect();
        for (e, want) in estimates.iter().zip([130.0, 140.0, 150.0]) {
            assert!((e - want).abs() < 1e-9, "got {e}, want {want}");
        }
    }

    #[test]
    fn engine_rejects_bad_holt_params() {
        let opts = ForecastOptions {
            holt: HoltParams { alpha: 0.0, beta: 0.1 },
            ..ForecastOptions::default()
        };
        assert!(matches!(ForecastEngine::new(opts), Err(ForecastError::InvalidParameter(_))));
    }

    #[test]
    fn falling_series_clamps_at_zero() {
        let obs = vec![
            Observation::new(month(2023, 1), 300.0),
            Observation::new(month(2023, 2), 200.0),
            Observation::new(month(2023, 3), 100.0),
        ];
        let out = forecast(&obs, 4, ForecastOptions::default()).unwrap();
        assert_eq!(out.trend, TrendDirection::Decreasing);
        for p in &out.forecast {
            assert!(p.lower_bound >= 0.0);
            assert!(p.point_estimate >= 0.0);
            assert!(p.lower_bound <= p.point_estimate && p.point_estimate <= p.upper_bound);
        }
        assert_eq!(out.forecast[3].point_estimate, 0.0);
    }

    #[test]
    fn perturbation_is_bounded_and_seeded() {
        let obs: Vec<Observation> = [100.0, 130.0, 95.0, 140.0, 105.0, 150.0]
            .iter()
            .enumerate()
            .map(|(i, &c)| Observation::new(month(2023, 1 + i as u32), c))
            .collect();
        let opts = ForecastOptions {
            perturb: true,
            seed: 7,
            ..ForecastOptions::default()
        };
        let a = forecast(&obs, 6, opts).unwrap();
        let b = forecast(&obs, 6, opts).unwrap();
        assert_eq!(a, b);

        let plain = forecast(&obs, 6, ForecastOptions::default()).unwrap();
        for (p, q) in a.forecast.iter().zip(&plain.forecast) {
            assert!((p.point_estimate - q.point_estimate).abs() <= 0.5 * a.residual_std_dev + 1e-9);
            assert!(p.lower_bound <= p.point_estimate && p.point_estimate <= p.upper_bound);
        }
    }

    #[test]
    fn rounding_produces_whole_units() {
        let obs = vec![
            Observation::new(month(2023, 1), 100.4),
            Observation::new(month(2023, 2), 111.3),
            Observation::new(month(2023, 3), 119.9),
            Observation::new(month(2023, 4), 133.2),
        ];
        let opts = ForecastOptions {
            round: true,
            interval: IntervalPolicy::CoefficientOfVariation,
            ..ForecastOptions::default()
        };
        let out = forecast(&obs, 3, opts).unwrap();
        for p in &out.forecast {
            assert_eq!(p.point_estimate, p.point_estimate.round());
            assert_eq!(p.lower_bound, p.lower_bound.round());
            assert_eq!(p.upper_bound, p.upper_bound.round());
        }
    }

    #[test]
    fn horizon_past_the_date_range_is_rejected() {
        for periods in [usize::MAX, u32::MAX as usize, 5_000_000] {
            assert!(matches!(
                forecast(&linear_history(), periods, ForecastOptions::default()),
                Err(ForecastError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn classify_trend_edge_cases() {
        assert_eq!(classify_trend(100.0, None), TrendDirection::Stable);
        assert_eq!(classify_trend(100.0, Some(104.0)), TrendDirection::Stable);
        assert_eq!(classify_trend(100.0, Some(106.0)), TrendDirection::Rising);
        assert_eq!(classify_trend(100.0, Some(94.0)), TrendDirection::Decreasing);
        assert_eq!(classify_trend(0.0, Some(10.0)), TrendDirection::Rising);
        assert_eq!(classify_trend(0.0, Some(0.0)), TrendDirection::Stable);
    }
}
